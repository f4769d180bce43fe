use std::path::Path;

use anyhow::Result;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::color::ColorMap;
use crate::config::Roster;
use crate::data::model::MeasurementRecord;

/// File name of the output figure, written into the input directory.
pub const FIGURE_FILE: &str = "figure_inter_rater_variability.png";

/// 11 x 6 inches at 300 dpi.
const FIGURE_SIZE: (u32, u32) = (3300, 1800);

/// Width of one rater's rectangle on the subject axis.
const RECT_WIDTH: f64 = 0.1;

/// Distance grid step in millimeters.
const GRID_STEP_MM: f64 = 10.0;

/// Vertical range used when the filtered record set is empty; covers the
/// cervical distances seen in practice so the empty figure still has sane
/// axes.
const EMPTY_RANGE_MM: (f64, f64) = (40.0, 160.0);

/// Vertical extent of the data: min/max over both boundary distances,
/// padded by -10% / +5%.
fn padded_extent(records: &[MeasurementRecord]) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for r in records {
        lo = lo.min(r.distance_from_pmj_start).min(r.distance_from_pmj_end);
        hi = hi.max(r.distance_from_pmj_start).max(r.distance_from_pmj_end);
    }
    if records.is_empty() {
        (EMPTY_RANGE_MM.0, EMPTY_RANGE_MM.1)
    } else {
        (lo * 0.9, hi * 1.05)
    }
}

/// Render the inter-rater variability figure.
///
/// One rectangle per (subject, rater, level) record: x = subject axis
/// position + rater offset, y spans `[end, end + height]`, filled with the
/// rater color at 50% alpha, labeled with the level number and crossed by a
/// tick at its vertical midpoint. The distance axis is inverted so rostral
/// levels sit at the top. Purely a projection of `records`; nothing here
/// feeds back into the statistics.
pub fn render(
    records: &[MeasurementRecord],
    roster: &Roster,
    colors: &ColorMap,
    path: &Path,
) -> Result<()> {
    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let n_subjects = roster.subject_order.len();
    let x_range = 0.5..(n_subjects as f64 + 0.5);
    let (y_lo, y_hi) = padded_extent(records);

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Spinal Level Inter-Rater Variability - Distance from PMJ",
            ("sans-serif", 48),
        )
        .margin(30)
        .x_label_area_size(70)
        .y_label_area_size(110)
        // Inverted y range: smaller distances (more rostral) at the top.
        .build_cartesian_2d(x_range, y_hi..y_lo)?;

    let subject_tick = |x: &f64| -> String {
        let nearest = x.round();
        if (x - nearest).abs() > 1e-6 || nearest < 1.0 {
            return String::new();
        }
        roster
            .subject_order
            .get(nearest as usize - 1)
            .map(|s| roster.display_label(s))
            .unwrap_or_default()
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(n_subjects + 2)
        .x_label_formatter(&subject_tick)
        .y_label_formatter(&|y| format!("{y:.0}"))
        .x_desc("Subject")
        .y_desc("Distance from PMJ [mm]")
        .axis_desc_style(("sans-serif", 36))
        .label_style(("sans-serif", 28))
        .draw()?;

    // Horizontal grid every GRID_STEP_MM, independent of the data range.
    let mut grid = Vec::new();
    let mut tick = (y_lo.min(y_hi) / GRID_STEP_MM).ceil() * GRID_STEP_MM;
    while tick <= y_lo.max(y_hi) {
        grid.push(PathElement::new(
            vec![(0.5, tick), (n_subjects as f64 + 0.5, tick)],
            BLACK.mix(0.15),
        ));
        tick += GRID_STEP_MM;
    }
    chart.draw_series(grid)?;

    // One series per roster rater so the legend carries the color mapping
    // even when a rater has no surviving records.
    for rater in &roster.rater_order {
        let (r, g, b) = colors.color_for(rater);
        let fill = RGBColor(r, g, b).mix(0.5).filled();
        let offset = roster.offset_for(rater);

        let rects: Vec<Rectangle<(f64, f64)>> = records
            .iter()
            .filter(|rec| rec.rater == *rater)
            .filter_map(|rec| {
                let x0 = roster.axis_position(&rec.subject)? + offset;
                let y0 = rec.distance_from_pmj_end;
                Some(Rectangle::new(
                    [(x0, y0), (x0 + RECT_WIDTH, y0 + rec.height)],
                    fill,
                ))
            })
            .collect();

        chart
            .draw_series(rects)?
            .label(rater.clone())
            .legend(move |(x, y)| Rectangle::new([(x, y - 8), (x + 20, y + 8)], fill));
    }

    // Level numbers at the upper edge of each rectangle and a tick across
    // its vertical midpoint.
    let label_style = ("sans-serif", 24)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    let mut labels = Vec::new();
    let mut ticks = Vec::new();
    for rec in records {
        let Some(axis) = roster.axis_position(&rec.subject) else {
            continue;
        };
        if !roster.rater_order.contains(&rec.rater) {
            continue;
        }
        let x0 = axis + roster.offset_for(&rec.rater);
        labels.push(Text::new(
            rec.spinal_level.to_string(),
            (x0 + RECT_WIDTH / 2.0, rec.distance_from_pmj_end),
            label_style.clone(),
        ));
        ticks.push(PathElement::new(
            vec![(x0, rec.midpoint()), (x0 + RECT_WIDTH, rec.midpoint())],
            BLACK.mix(0.5),
        ));
    }
    chart.draw_series(ticks)?;
    chart.draw_series(labels)?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK.mix(0.4))
        .label_font(("sans-serif", 28))
        .draw()?;

    root.present()?;
    log::info!("Figure saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(subject: &str, start: f64, end: f64) -> MeasurementRecord {
        MeasurementRecord {
            subject: subject.into(),
            rater: "rater1".into(),
            spinal_level: 3,
            distance_from_pmj_start: start,
            distance_from_pmj_end: end,
            height: start - end,
        }
    }

    #[test]
    fn extent_pads_min_and_max() {
        let records = vec![record("sub-007", 100.0, 50.0), record("sub-010", 120.0, 60.0)];
        let (lo, hi) = padded_extent(&records);
        assert!((lo - 45.0).abs() < 1e-12);
        assert!((hi - 126.0).abs() < 1e-12);
    }

    #[test]
    fn empty_extent_uses_fallback_range() {
        assert_eq!(padded_extent(&[]), EMPTY_RANGE_MM);
    }
}
