use std::ops::RangeInclusive;

use super::model::MeasurementRecord;

// ---------------------------------------------------------------------------
// Level filter: keep only cervical levels
// ---------------------------------------------------------------------------

/// The biologically valid cervical spinal levels.
pub const CERVICAL_LEVELS: RangeInclusive<u8> = 2..=8;

/// Retain only records at cervical levels.
///
/// Total function: an empty result is a valid degenerate input for both the
/// table and the figure, not an error.
pub fn cervical_only(mut records: Vec<MeasurementRecord>) -> Vec<MeasurementRecord> {
    records.retain(|r| CERVICAL_LEVELS.contains(&r.spinal_level));
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(level: u8) -> MeasurementRecord {
        MeasurementRecord {
            subject: "sub-007".into(),
            rater: "rater1".into(),
            spinal_level: level,
            distance_from_pmj_start: 40.0,
            distance_from_pmj_end: 30.0,
            height: 10.0,
        }
    }

    #[test]
    fn keeps_levels_two_through_eight() {
        let records: Vec<_> = (0..=10).map(record).collect();
        let kept = cervical_only(records);
        let levels: Vec<u8> = kept.iter().map(|r| r.spinal_level).collect();
        assert_eq!(levels, vec![2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(cervical_only(Vec::new()).is_empty());
    }
}
