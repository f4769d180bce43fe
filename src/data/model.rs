use serde::Deserialize;

use crate::error::PipelineError;

// ---------------------------------------------------------------------------
// RawRow – one CSV row as it appears on disk
// ---------------------------------------------------------------------------

/// Serde view of one row of a `*_pmj_distance.csv` file. Columns beyond
/// these are ignored by the reader.
///
/// `spinal_level` is declared as `f64` because the upstream tool writes it
/// as a float whenever the table contains missing cells.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRow {
    pub fname: String,
    pub spinal_level: f64,
    pub distance_from_pmj_start: f64,
    pub distance_from_pmj_end: f64,
    pub height: f64,
}

// ---------------------------------------------------------------------------
// SourceIdentity – subject/rater parsed from a file name
// ---------------------------------------------------------------------------

/// Subject and rater identity encoded in a measurement file name.
///
/// Grammar: `<subject>_..._<rater>.<ext>` where the stem (everything before
/// the first `.`) splits on `_` into at least two non-empty tokens; the
/// first token is the subject, the last is the rater. Any path prefix is
/// stripped first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceIdentity {
    pub subject: String,
    pub rater: String,
}

impl SourceIdentity {
    pub fn parse(fname: &str) -> Result<Self, PipelineError> {
        let malformed = || PipelineError::MalformedFilename(fname.to_string());

        let base = fname.rsplit(['/', '\\']).next().ok_or_else(malformed)?;
        let stem = base.split('.').next().ok_or_else(malformed)?;

        let tokens: Vec<&str> = stem.split('_').collect();
        if tokens.len() < 2 {
            return Err(malformed());
        }
        let subject = tokens[0];
        let rater = tokens[tokens.len() - 1];
        if subject.is_empty() || rater.is_empty() {
            return Err(malformed());
        }

        Ok(SourceIdentity {
            subject: subject.to_string(),
            rater: rater.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// MeasurementRecord – one spinal level annotated by one rater
// ---------------------------------------------------------------------------

/// One spinal level of one subject as annotated by one rater. Distances are
/// millimeters from the pontomedullary junction (PMJ).
///
/// `height` is carried through from the source data, not re-derived from
/// `end - start`; the two are expected to agree but this is not validated.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRecord {
    pub subject: String,
    pub rater: String,
    pub spinal_level: u8,
    pub distance_from_pmj_start: f64,
    pub distance_from_pmj_end: f64,
    pub height: f64,
}

impl MeasurementRecord {
    /// Build a record from a raw CSV row, deriving identity from the row's
    /// `fname` column.
    pub fn from_raw(raw: &RawRow) -> Result<Self, PipelineError> {
        let identity = SourceIdentity::parse(&raw.fname)?;
        Ok(MeasurementRecord {
            subject: identity.subject,
            rater: identity.rater,
            spinal_level: raw.spinal_level.round() as u8,
            distance_from_pmj_start: raw.distance_from_pmj_start,
            distance_from_pmj_end: raw.distance_from_pmj_end,
            height: raw.height,
        })
    }

    /// Distance from the PMJ to the middle of the level.
    pub fn midpoint(&self) -> f64 {
        self.distance_from_pmj_end + self.height / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_takes_first_and_last_token() {
        let id =
            SourceIdentity::parse("sub-amu02_T2w_label-rootlet_rater3.nii.gz").unwrap();
        assert_eq!(id.subject, "sub-amu02");
        assert_eq!(id.rater, "rater3");
    }

    #[test]
    fn identity_strips_path_prefix() {
        let id = SourceIdentity::parse("derivatives/sub-007_rater1.nii.gz").unwrap();
        assert_eq!(id.subject, "sub-007");
        assert_eq!(id.rater, "rater1");
    }

    #[test]
    fn identity_rejects_single_token() {
        assert!(matches!(
            SourceIdentity::parse("nounderscore.csv"),
            Err(crate::error::PipelineError::MalformedFilename(_))
        ));
    }

    #[test]
    fn identity_rejects_empty_tokens() {
        assert!(SourceIdentity::parse("_rater1.csv").is_err());
        assert!(SourceIdentity::parse("sub-007_.csv").is_err());
    }

    #[test]
    fn midpoint_is_end_plus_half_height() {
        let rec = MeasurementRecord {
            subject: "sub-007".into(),
            rater: "rater1".into(),
            spinal_level: 4,
            distance_from_pmj_start: 60.0,
            distance_from_pmj_end: 50.0,
            height: 10.0,
        };
        assert_eq!(rec.midpoint(), 55.0);
    }
}
