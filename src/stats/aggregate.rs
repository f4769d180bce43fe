use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::config::Roster;
use crate::data::model::MeasurementRecord;
use crate::error::PipelineError;

// ---------------------------------------------------------------------------
// MidpointEntry – one cell of the roster × level grid
// ---------------------------------------------------------------------------

/// The midpoint position of one (subject, rater, level) combination.
///
/// `mean_position` is `None` when the combination was never annotated.
/// "No measurement" and "measurement equal to zero" must stay distinguishable
/// downstream, so absence is never encoded as a numeric placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct MidpointEntry {
    pub subject: String,
    pub rater: String,
    pub spinal_level: u8,
    pub mean_position: Option<f64>,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Compute midpoints for every roster subject × roster rater × spinal level
/// observed in `records`.
///
/// At most one record may exist per (subject, rater, level) key; a duplicate
/// is [`PipelineError::AmbiguousCombination`]. Records from subjects or
/// raters outside the roster are ignored. Entries come out in roster order
/// (subjects, then raters, then ascending level).
pub fn aggregate_midpoints(
    records: &[MeasurementRecord],
    roster: &Roster,
) -> Result<Vec<MidpointEntry>, PipelineError> {
    // Explicit keyed index instead of an automatic reshape: the missing-key
    // semantics (None, not a fill value) are part of the contract.
    let mut index: BTreeMap<(&str, &str, u8), f64> = BTreeMap::new();
    for record in records {
        let key = (
            record.subject.as_str(),
            record.rater.as_str(),
            record.spinal_level,
        );
        if index.insert(key, record.midpoint()).is_some() {
            return Err(PipelineError::AmbiguousCombination {
                subject: record.subject.clone(),
                rater: record.rater.clone(),
                level: record.spinal_level,
            });
        }
    }

    let levels: BTreeSet<u8> = records.iter().map(|r| r.spinal_level).collect();

    let mut entries = Vec::new();
    for subject in &roster.subject_order {
        for rater in &roster.rater_order {
            for &level in &levels {
                let mean_position = index
                    .get(&(subject.as_str(), rater.as_str(), level))
                    .copied();
                entries.push(MidpointEntry {
                    subject: subject.clone(),
                    rater: rater.clone(),
                    spinal_level: level,
                    mean_position,
                });
            }
        }
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(subject: &str, rater: &str, level: u8, end: f64, height: f64) -> MeasurementRecord {
        MeasurementRecord {
            subject: subject.into(),
            rater: rater.into(),
            spinal_level: level,
            distance_from_pmj_start: end + height,
            distance_from_pmj_end: end,
            height,
        }
    }

    #[test]
    fn midpoint_is_exact() {
        let roster = Roster::default();
        let records = vec![record("sub-007", "rater1", 4, 50.0, 10.0)];
        let entries = aggregate_midpoints(&records, &roster).unwrap();

        let entry = entries
            .iter()
            .find(|e| e.subject == "sub-007" && e.rater == "rater1" && e.spinal_level == 4)
            .unwrap();
        assert_eq!(entry.mean_position, Some(55.0));
    }

    #[test]
    fn unannotated_combinations_are_explicitly_missing() {
        let roster = Roster::default();
        let records = vec![record("sub-007", "rater1", 4, 50.0, 10.0)];
        let entries = aggregate_midpoints(&records, &roster).unwrap();

        // Full roster grid over the single observed level.
        assert_eq!(
            entries.len(),
            roster.subject_order.len() * roster.rater_order.len()
        );
        let missing = entries
            .iter()
            .filter(|e| e.mean_position.is_none())
            .count();
        assert_eq!(missing, entries.len() - 1);
    }

    #[test]
    fn duplicate_key_is_ambiguous() {
        let roster = Roster::default();
        let records = vec![
            record("sub-007", "rater1", 4, 50.0, 10.0),
            record("sub-007", "rater1", 4, 51.0, 9.0),
        ];
        assert!(matches!(
            aggregate_midpoints(&records, &roster),
            Err(PipelineError::AmbiguousCombination { level: 4, .. })
        ));
    }

    #[test]
    fn off_roster_records_are_ignored() {
        let roster = Roster::default();
        let records = vec![record("sub-elsewhere", "rater9", 4, 50.0, 10.0)];
        let entries = aggregate_midpoints(&records, &roster).unwrap();
        assert!(entries.iter().all(|e| e.mean_position.is_none()));
    }

    #[test]
    fn empty_input_yields_no_entries() {
        let roster = Roster::default();
        let entries = aggregate_midpoints(&[], &roster).unwrap();
        assert!(entries.is_empty());
    }
}
