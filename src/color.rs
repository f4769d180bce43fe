use std::collections::BTreeMap;

use palette::{Hsl, IntoColor, Srgb};

use crate::config::{Rgb, Roster};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colors using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Rgb> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            (
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: rater identity → Rgb
// ---------------------------------------------------------------------------

/// Maps rater identities to distinct colors.
///
/// Raters with a configured color in the roster keep it; any remaining
/// roster raters get evenly spaced generated hues, so extending the rater
/// roster without picking new colors still renders distinguishably.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Rgb>,
    default_color: Rgb,
}

impl ColorMap {
    /// Build the rater color map for a roster.
    pub fn from_roster(roster: &Roster) -> Self {
        let unconfigured = roster
            .rater_order
            .iter()
            .filter(|r| !roster.rater_color.contains_key(*r))
            .count();
        let mut fallback = generate_palette(unconfigured).into_iter();

        let mapping: BTreeMap<String, Rgb> = roster
            .rater_order
            .iter()
            .map(|rater| {
                let color = roster
                    .rater_color
                    .get(rater)
                    .copied()
                    .or_else(|| fallback.next())
                    .unwrap_or((128, 128, 128));
                (rater.clone(), color)
            })
            .collect();

        ColorMap {
            mapping,
            default_color: (128, 128, 128),
        }
    }

    /// Look up the color for a rater.
    pub fn color_for(&self, rater: &str) -> Rgb {
        self.mapping
            .get(rater)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Legend entries (rater → color) in map order.
    pub fn legend_entries(&self) -> Vec<(String, Rgb)> {
        self.mapping
            .iter()
            .map(|(r, c)| (r.clone(), *c))
            .collect()
    }
}
