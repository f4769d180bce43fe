use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Roster – who annotated what, and how each identity is drawn
// ---------------------------------------------------------------------------

/// RGB triple used for rater colors (kept backend-agnostic; the figure
/// module converts to its own color type).
pub type Rgb = (u8, u8, u8);

/// The fixed subject/rater roster plus the layout attributes derived from it.
///
/// Aggregation and rendering iterate the roster, not the values observed in
/// the data, so the output table keeps a stable shape even when some
/// subject/rater/level combinations are unannotated.
#[derive(Debug, Clone)]
pub struct Roster {
    /// Subjects in axis order; subject `i` sits at axis position `i + 1`.
    pub subject_order: Vec<String>,
    /// Display-label overrides for the figure's x-axis ticks. Subjects not
    /// present here are labeled with their identifier.
    pub subject_label: BTreeMap<String, String>,
    /// Raters in column order.
    pub rater_order: Vec<String>,
    /// Horizontal offset of each rater's rectangle relative to the subject's
    /// axis position. Offsets are disjoint so rectangles never overlap.
    pub rater_offset: BTreeMap<String, f64>,
    /// Fixed rater colors. Raters without an entry get a generated hue
    /// (see [`crate::color::ColorMap`]).
    pub rater_color: BTreeMap<String, Rgb>,
}

impl Default for Roster {
    /// The study roster: five subjects, four raters.
    fn default() -> Self {
        let subject_order = [
            "sub-barcelona01",
            "sub-brnoUhb03",
            "sub-amu02",
            "sub-007",
            "sub-010",
        ]
        .map(String::from)
        .to_vec();

        let subject_label = BTreeMap::from([
            ("sub-007".to_string(), "sub-007_ses-headNormal".to_string()),
            ("sub-010".to_string(), "sub-010_ses-headUp".to_string()),
        ]);

        let rater_order = ["rater1", "rater2", "rater3", "rater4"]
            .map(String::from)
            .to_vec();

        let rater_offset = BTreeMap::from([
            ("rater1".to_string(), -0.275),
            ("rater2".to_string(), -0.125),
            ("rater3".to_string(), 0.025),
            ("rater4".to_string(), 0.175),
        ]);

        let rater_color = BTreeMap::from([
            ("rater1".to_string(), (255, 0, 0)),
            ("rater2".to_string(), (0, 128, 0)),
            ("rater3".to_string(), (0, 0, 255)),
            ("rater4".to_string(), (255, 165, 0)),
        ]);

        Roster {
            subject_order,
            subject_label,
            rater_order,
            rater_offset,
            rater_color,
        }
    }
}

impl Roster {
    /// Axis position of a subject (1-based), or `None` if the subject is not
    /// on the roster.
    pub fn axis_position(&self, subject: &str) -> Option<f64> {
        self.subject_order
            .iter()
            .position(|s| s == subject)
            .map(|i| (i + 1) as f64)
    }

    /// Display label for a subject's x-axis tick.
    pub fn display_label(&self, subject: &str) -> String {
        self.subject_label
            .get(subject)
            .cloned()
            .unwrap_or_else(|| subject.to_string())
    }

    /// Horizontal rectangle offset for a rater (0.0 for unknown raters).
    pub fn offset_for(&self, rater: &str) -> f64 {
        self.rater_offset.get(rater).copied().unwrap_or(0.0)
    }
}
