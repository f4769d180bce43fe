use std::path::PathBuf;

use thiserror::Error;

/// Domain errors of the aggregation pipeline.
///
/// All of these are fatal: the binary reports the error chain and exits with
/// a nonzero status. Missing (subject, rater, level) combinations are *not*
/// errors; they flow through aggregation as explicit `None` midpoints.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input root does not exist or is not a directory.
    #[error("input path '{0}' does not exist or is not a directory")]
    InvalidInputPath(PathBuf),

    /// The recursive search found no measurement files under the root.
    #[error("no '*label-rootlet*_pmj_distance.csv' files found under '{0}'")]
    NoInputFound(PathBuf),

    /// A source-file identity that does not follow `<subject>_..._<rater>.<ext>`.
    #[error("cannot parse subject/rater from file name '{0}'")]
    MalformedFilename(String),

    /// More than one measurement for a single (subject, rater, level) key.
    #[error("multiple measurements for subject '{subject}', rater '{rater}', spinal level {level}")]
    AmbiguousCombination {
        subject: String,
        rater: String,
        level: u8,
    },
}
