//! Property-based tests for the wrapped FASTA writer and reader

use hps_index::formats::{FastaReader, FastaWriter};
use proptest::prelude::*;

fn arb_name() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_.]{1,20}"
}

fn arb_sequence() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(vec![b'A', b'C', b'G', b'T', b'N']), 0..300)
}

fn write_records(records: &[(String, Vec<u8>)], wrap: usize) -> String {
    let mut writer = FastaWriter::with_wrap(Vec::new(), wrap);
    for (name, seq) in records {
        writer.begin_ref(name).unwrap();
        writer.write_seq(seq).unwrap();
    }
    String::from_utf8(writer.finish().unwrap()).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// No emitted sequence line exceeds the wrap width.
    #[test]
    fn prop_no_line_exceeds_wrap(
        name in arb_name(),
        seq in arb_sequence(),
        wrap in 1usize..80,
    ) {
        let out = write_records(&[(name, seq)], wrap);
        for line in out.lines() {
            if !line.starts_with('>') {
                prop_assert!(line.len() <= wrap, "line {:?} exceeds wrap {}", line, wrap);
            }
        }
    }

    /// Concatenating the sequence lines of a block reproduces the input.
    #[test]
    fn prop_sequence_lines_concatenate(
        name in arb_name(),
        seq in arb_sequence(),
        wrap in 1usize..80,
    ) {
        let out = write_records(&[(name.clone(), seq.clone())], wrap);
        let joined: Vec<u8> = out
            .lines()
            .filter(|l| !l.starts_with('>'))
            .flat_map(|l| l.bytes())
            .collect();
        prop_assert_eq!(joined, seq);
    }

    /// The reader round trips whatever the writer produced, including
    /// chunked writes that straddle line boundaries.
    #[test]
    fn prop_reader_round_trips_writer(
        records in prop::collection::vec((arb_name(), arb_sequence()), 1..5),
        wrap in 1usize..80,
        chunk in 1usize..40,
    ) {
        // Dedup names; the reader keys records by their order, but
        // identical names would make the comparison ambiguous.
        let mut seen = std::collections::HashSet::new();
        let records: Vec<(String, Vec<u8>)> = records
            .into_iter()
            .filter(|(name, _)| seen.insert(name.clone()))
            .collect();

        let mut writer = FastaWriter::with_wrap(Vec::new(), wrap);
        for (name, seq) in &records {
            writer.begin_ref(name).unwrap();
            for piece in seq.chunks(chunk) {
                writer.write_seq(piece).unwrap();
            }
        }
        let out = writer.finish().unwrap();

        let mut reader = FastaReader::new(&out[..]);
        for (name, seq) in &records {
            let record = reader.next_record().unwrap().unwrap();
            prop_assert_eq!(&record.name, name);
            prop_assert_eq!(&record.sequence, seq);
        }
        prop_assert!(reader.next_record().is_none());
    }
}
