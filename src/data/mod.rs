/// Data layer: record types, loading, and level filtering.
///
/// ```text
///  *label-rootlet*_pmj_distance.csv (one per subject+rater)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  discover + parse → Vec<MeasurementRecord>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  keep cervical levels 2..=8
///   └──────────┘
/// ```
pub mod filter;
pub mod loader;
pub mod model;
