use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use super::model::{MeasurementRecord, RawRow};
use crate::error::PipelineError;

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// A file name produced by the upstream rootlets-to-spinal-levels tool:
/// contains `label-rootlet` and ends with `_pmj_distance.csv`.
fn is_measurement_file(name: &str) -> bool {
    name.contains("label-rootlet") && name.ends_with("_pmj_distance.csv")
}

/// Recursively collect all measurement files under `root`. Unreadable
/// directory entries are skipped.
///
/// The result is sorted by path so the concatenated record order (and with
/// it both outputs) is identical across runs and platforms.
pub fn discover_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(is_measurement_file)
        })
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

// ---------------------------------------------------------------------------
// CSV ingestion
// ---------------------------------------------------------------------------

/// Read one measurement file into records, deriving subject/rater from each
/// row's `fname` column.
fn load_file(path: &Path) -> Result<Vec<MeasurementRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<RawRow>().enumerate() {
        let raw = result.with_context(|| format!("{}, row {row_no}", path.display()))?;
        let record = MeasurementRecord::from_raw(&raw)
            .with_context(|| format!("{}, row {row_no}", path.display()))?;
        records.push(record);
    }
    log::debug!("{}: {} rows", path.display(), records.len());
    Ok(records)
}

/// Load every measurement file under `root` into one record sequence.
///
/// Fails with [`PipelineError::InvalidInputPath`] when `root` is not a
/// directory and with [`PipelineError::NoInputFound`] when the search comes
/// back empty. Both are fatal: continuing with zero records would only
/// produce an empty table and figure that look like a successful run.
pub fn load_directory(root: &Path) -> Result<Vec<MeasurementRecord>> {
    if !root.is_dir() {
        return Err(PipelineError::InvalidInputPath(root.to_path_buf()).into());
    }

    let files = discover_files(root);
    if files.is_empty() {
        return Err(PipelineError::NoInputFound(root.to_path_buf()).into());
    }
    log::info!("Found {} measurement files under {}", files.len(), root.display());

    let mut records = Vec::new();
    for file in &files {
        records.extend(load_file(file)?);
    }
    Ok(records)
}
