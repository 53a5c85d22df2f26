//! Homopolymer stripping pipeline
//!
//! Drives a whole-genome pass: read reference sequences from FASTA,
//! collapse homopolymer runs, and emit the collapsed FASTA alongside the
//! binary index that records every run for later coordinate translation.

use crate::core::collapse::collapse_sequence;
use crate::core::io::create_buf_writer;
use crate::core::{HpsError, IndexWriter, Result, WriteError};
use crate::formats::fasta::{open_fasta, FastaWriter};
use std::path::Path;

/// Statistics from one stripping run
#[derive(Debug, Default, Clone)]
pub struct StripStats {
    /// References processed
    pub references: usize,
    /// Bases read from the input genome
    pub bases_in: u64,
    /// Bases written to the collapsed genome
    pub bases_out: u64,
    /// Homopolymer runs recorded in the index
    pub runs: u64,
}

/// Strip homopolymer runs from a FASTA genome
///
/// Writes the collapsed genome as wrapped FASTA to `fasta_out` and the run
/// index to `index_out`. Input may be gzip or bzip2 compressed. References
/// keep their input order in both outputs.
pub fn strip_fasta<P: AsRef<Path>>(
    input: P,
    fasta_out: P,
    index_out: P,
    wrap: usize,
) -> Result<StripStats> {
    let mut reader = open_fasta(input.as_ref())?;
    let mut index = IndexWriter::create(index_out.as_ref())?;
    let mut fasta = FastaWriter::with_wrap(create_buf_writer(fasta_out.as_ref())?, wrap);

    let mut stats = StripStats::default();
    while let Some(record) = reader.next_record() {
        let record = record?;
        let (collapsed, runs) = collapse_sequence(&record.sequence);

        index.begin_reference(&record.name)?;
        for run in &runs {
            let position = u32::try_from(run.position)
                .map_err(|_| HpsError::Write(WriteError::PositionOverflow(run.position as u64)))?;
            index.append(position, run.length as u64)?;
        }

        fasta.begin_ref(&record.name)?;
        fasta.write_seq(&collapsed)?;

        log::info!(
            "{}: {} bases -> {} bases, {} runs",
            record.name,
            record.sequence.len(),
            collapsed.len(),
            runs.len()
        );
        stats.references += 1;
        stats.bases_in += record.sequence.len() as u64;
        stats.bases_out += collapsed.len() as u64;
        stats.runs += runs.len() as u64;
    }

    index.close()?;
    fasta.finish()?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CoordinateMapper, IndexReader};
    use std::io::Write as _;
    use tempfile::tempdir;

    #[test]
    fn test_strip_fasta_end_to_end() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("genome.fa");
        let fasta_out = dir.path().join("collapsed.fa");
        let index_out = dir.path().join("genome.hps");

        let mut f = std::fs::File::create(&input).unwrap();
        // chr1: AAA at 0, GGG at 4; chr2: no runs
        f.write_all(b">chr1\nAAACGGGT\n>chr2\nACGT\n").unwrap();
        drop(f);

        let stats = strip_fasta(&input, &fasta_out, &index_out, 50).unwrap();
        assert_eq!(stats.references, 2);
        assert_eq!(stats.bases_in, 12);
        assert_eq!(stats.bases_out, 8);
        assert_eq!(stats.runs, 2);

        let collapsed = std::fs::read_to_string(&fasta_out).unwrap();
        assert_eq!(collapsed, ">chr1\nACGT\n\n>chr2\nACGT\n");

        let reader = IndexReader::open(&index_out).unwrap();
        assert_eq!(reader.references(), &["chr1", "chr2"]);

        let mut mapper = CoordinateMapper::new(reader);
        // G run [4,7) collapses onto one base; bases before it lost 2 to AAA
        assert_eq!(mapper.original_to_collapsed("chr1", 4).unwrap(), 2);
        assert_eq!(mapper.original_to_collapsed("chr1", 6).unwrap(), 2);
        assert_eq!(mapper.original_to_collapsed("chr1", 7).unwrap(), 3);
        assert_eq!(mapper.collapsed_to_original("chr1", 3).unwrap(), 7);
    }

    #[test]
    fn test_strip_preserves_reference_order() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("genome.fa");
        let fasta_out = dir.path().join("collapsed.fa");
        let index_out = dir.path().join("genome.hps");

        let mut f = std::fs::File::create(&input).unwrap();
        f.write_all(b">zulu\nAAT\n>alpha\nGGC\n>mike\nTTA\n").unwrap();
        drop(f);

        strip_fasta(&input, &fasta_out, &index_out, 50).unwrap();
        let reader = IndexReader::open(&index_out).unwrap();
        assert_eq!(reader.references(), &["zulu", "alpha", "mike"]);
    }

    #[test]
    fn test_strip_missing_input() {
        let dir = tempdir().unwrap();
        let err = strip_fasta(
            &dir.path().join("absent.fa"),
            &dir.path().join("out.fa"),
            &dir.path().join("out.hps"),
            50,
        )
        .unwrap_err();
        assert!(matches!(err, HpsError::Fasta(_)));
    }
}
