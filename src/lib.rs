//! Inter-rater variability of spinal level positions relative to the
//! pontomedullary junction (PMJ).
//!
//! Pipeline:
//! ```text
//!  per-subject/rater CSVs (*label-rootlet*_pmj_distance.csv)
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  discover + parse → Vec<MeasurementRecord>
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  keep cervical levels (2..=8)
//!   └──────────┘
//!        │
//!        ├──────────────────────────────┐
//!        ▼                              ▼
//!   ┌──────────┐                   ┌──────────┐
//!   │  stats    │  midpoints + COV │  figure   │  rectangles per
//!   │           │  → CSV table     │           │  subject/rater/level → PNG
//!   └──────────┘                   └──────────┘
//! ```
//!
//! The table and the figure are independent projections of the same filtered
//! record set; neither feeds the other.

pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod figure;
pub mod stats;
