use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};

use super::aggregate::MidpointEntry;
use crate::config::Roster;

/// File name of the output table, written into the input directory.
pub const TABLE_FILE: &str = "table_inter_rater_variability.csv";

// ---------------------------------------------------------------------------
// VariabilityTable – spinal level rows × (subject, rater) columns + COV
// ---------------------------------------------------------------------------

/// One row of the output table.
#[derive(Debug, Clone, PartialEq)]
pub struct VariabilityRow {
    pub spinal_level: u8,
    /// Midpoints, parallel to [`VariabilityTable::columns`].
    pub midpoints: Vec<Option<f64>>,
    /// Per-subject COV in percent, parallel to [`VariabilityTable::subjects`].
    pub cov_per_subject: Vec<Option<f64>>,
    /// Mean of the defined per-subject COVs; `None` iff all are undefined.
    pub cov_mean: Option<f64>,
}

/// The final inter-rater variability table.
#[derive(Debug, Clone)]
pub struct VariabilityTable {
    /// Midpoint columns in roster order: subjects outer, raters inner.
    pub columns: Vec<(String, String)>,
    /// Subject order of the COV columns.
    pub subjects: Vec<String>,
    /// Rows in ascending spinal-level order.
    pub rows: Vec<VariabilityRow>,
}

// ---------------------------------------------------------------------------
// Reduction
// ---------------------------------------------------------------------------

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n−1 denominator), matching the convention the
/// rest of the study's tooling uses. Requires at least two values.
fn sample_std(values: &[f64]) -> f64 {
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

/// COV in percent across one subject's rater midpoints at one level.
///
/// Undefined with fewer than two values: the deviation of a single
/// measurement is zero by construction and must not be reported as 0% COV.
fn cov_percent(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    Some(sample_std(values) / mean(values) * 100.0)
}

/// Reshape midpoint entries into the level × (subject, rater) table and
/// compute the per-subject and mean COV columns.
pub fn reduce(entries: &[MidpointEntry], roster: &Roster) -> VariabilityTable {
    let columns: Vec<(String, String)> = roster
        .subject_order
        .iter()
        .flat_map(|s| {
            roster
                .rater_order
                .iter()
                .map(move |r| (s.clone(), r.clone()))
        })
        .collect();

    // level → (subject, rater) → midpoint
    let mut by_level: BTreeMap<u8, BTreeMap<(&str, &str), Option<f64>>> = BTreeMap::new();
    for entry in entries {
        by_level
            .entry(entry.spinal_level)
            .or_default()
            .insert((&entry.subject, &entry.rater), entry.mean_position);
    }

    let rows = by_level
        .iter()
        .map(|(&spinal_level, cells)| {
            let midpoints: Vec<Option<f64>> = columns
                .iter()
                .map(|(s, r)| {
                    cells
                        .get(&(s.as_str(), r.as_str()))
                        .copied()
                        .flatten()
                })
                .collect();

            let cov_per_subject: Vec<Option<f64>> = roster
                .subject_order
                .iter()
                .map(|subject| {
                    let values: Vec<f64> = roster
                        .rater_order
                        .iter()
                        .filter_map(|rater| {
                            cells
                                .get(&(subject.as_str(), rater.as_str()))
                                .copied()
                                .flatten()
                        })
                        .collect();
                    cov_percent(&values)
                })
                .collect();

            let defined: Vec<f64> = cov_per_subject.iter().filter_map(|c| *c).collect();
            let cov_mean = if defined.is_empty() {
                None
            } else {
                Some(mean(&defined))
            };

            VariabilityRow {
                spinal_level,
                midpoints,
                cov_per_subject,
                cov_mean,
            }
        })
        .collect();

    VariabilityTable {
        columns,
        subjects: roster.subject_order.clone(),
        rows,
    }
}

// ---------------------------------------------------------------------------
// CSV output
// ---------------------------------------------------------------------------

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Write the table as a flat CSV: one row per spinal level, midpoint columns
/// named `<subject>_<rater>`, then `COV_<subject>` columns and `COV_mean`.
/// Missing values are serialized as empty cells.
pub fn write_csv(table: &VariabilityTable, path: &Path) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;

    let mut header = vec!["spinal_level".to_string()];
    header.extend(table.columns.iter().map(|(s, r)| format!("{s}_{r}")));
    header.extend(table.subjects.iter().map(|s| format!("COV_{s}")));
    header.push("COV_mean".to_string());
    writer.write_record(&header)?;

    for row in &table.rows {
        let mut fields = vec![row.spinal_level.to_string()];
        fields.extend(row.midpoints.iter().map(|v| cell(*v)));
        fields.extend(row.cov_per_subject.iter().map(|v| cell(*v)));
        fields.push(cell(row.cov_mean));
        writer.write_record(&fields)?;
    }

    writer
        .flush()
        .with_context(|| format!("writing {}", path.display()))?;
    log::info!("Table saved to {}", path.display());
    Ok(())
}
