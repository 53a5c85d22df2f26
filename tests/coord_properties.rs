//! Property-based tests for coordinate translation

use hps_index::core::{CoordinateIndex, PositionRecord};
use proptest::prelude::*;

/// Generate disjoint runs and build a coordinate index directly
fn arb_index() -> impl Strategy<Value = CoordinateIndex> {
    prop::collection::vec((0u32..200, 2u32..30), 0..40).prop_map(|pairs| {
        let mut records = Vec::with_capacity(pairs.len());
        let mut pos: u32 = 0;
        let mut offset: u32 = 0;
        for (gap, len) in pairs {
            pos += gap;
            records.push(PositionRecord {
                position: pos,
                run_length: len,
                collapsed_offset: offset,
            });
            pos += len;
            offset += len;
        }
        CoordinateIndex::from_records("chr1".to_string(), records).unwrap()
    })
}

/// Reference model: collapse each run to one base by walking the records
fn model_original_to_collapsed(index: &CoordinateIndex, pos: u32) -> u32 {
    let mut removed: u32 = 0;
    for record in index.records() {
        let run_end = record.position + record.run_length;
        if pos < record.position {
            break;
        }
        if pos < run_end {
            // Mid-run: same collapsed base as the run start
            return record.position - removed;
        }
        removed += record.run_length - 1;
    }
    pos - removed
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The binary-search translation agrees with a linear-walk model.
    #[test]
    fn prop_translation_matches_model(index in arb_index(), pos in 0u32..12000) {
        prop_assert_eq!(
            index.original_to_collapsed(pos),
            model_original_to_collapsed(&index, pos)
        );
    }

    /// original_to_collapsed never decreases as pos increases.
    #[test]
    fn prop_forward_translation_is_monotonic(index in arb_index(), start in 0u32..10000) {
        let mut last = index.original_to_collapsed(start);
        for pos in start + 1..start + 200 {
            let collapsed = index.original_to_collapsed(pos);
            prop_assert!(
                collapsed >= last,
                "translation regressed at {}: {} < {}",
                pos, collapsed, last
            );
            last = collapsed;
        }
    }

    /// Every base of a run maps to the run's single collapsed coordinate.
    #[test]
    fn prop_run_bases_map_to_one_coordinate(index in arb_index()) {
        for record in index.records() {
            let collapsed = index.original_to_collapsed(record.position);
            for pos in record.position..record.position + record.run_length {
                prop_assert_eq!(index.original_to_collapsed(pos), collapsed);
            }
            // The base after the run moves one past the collapsed base
            prop_assert_eq!(
                index.original_to_collapsed(record.position + record.run_length),
                collapsed + 1
            );
        }
    }

    /// Round trip recovers the start of the run containing pos, or pos
    /// itself outside of runs: the many-to-one collapse semantics.
    #[test]
    fn prop_round_trip_recovers_run_start(index in arb_index(), pos in 0u32..12000) {
        let back = index.collapsed_to_original(index.original_to_collapsed(pos));
        match index.run_at(pos) {
            Some(run) => prop_assert_eq!(back, run.position),
            None => prop_assert_eq!(back, pos),
        }
    }

    /// The reverse direction round trips exactly: each collapsed coordinate
    /// names exactly one original base (a run start or an untouched base).
    #[test]
    fn prop_reverse_round_trip_is_exact(index in arb_index(), collapsed in 0u32..12000) {
        let original = index.collapsed_to_original(collapsed);
        prop_assert_eq!(index.original_to_collapsed(original), collapsed);
    }

    /// Translations are bounded by the total removed bases.
    #[test]
    fn prop_translation_shift_is_bounded(index in arb_index(), pos in 0u32..12000) {
        let collapsed = index.original_to_collapsed(pos);
        prop_assert!(collapsed <= pos);
        prop_assert!(pos as u64 - collapsed as u64 <= index.removed_bases());
    }
}
