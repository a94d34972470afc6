//! Static SVG charts via Plotters.
//!
//! Categories sit on a segmented x axis (one slot per label); bar, line, and
//! scatter marks are centered in their slot. All series and bounds come from
//! `ChartData`, so drawing has no data logic beyond the y bounds.

use std::path::Path;

use plotters::prelude::*;

use crate::charts::{ChartData, ChartKind, ChartSpec};
use crate::error::AppError;

/// Write `spec` as an SVG file of `size` pixels.
pub fn write_chart_svg(spec: &ChartSpec, data: &ChartData, path: &Path, size: (u32, u32)) -> Result<(), AppError> {
    draw_chart(spec, data, path, size)
        .map_err(|e| AppError::new(4, format!("Failed to render chart '{}' to '{}': {e}", spec.id, path.display())))
}

fn draw_chart(
    spec: &ChartSpec,
    data: &ChartData,
    path: &Path,
    size: (u32, u32),
) -> Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let slots = data.labels.len().max(1) as i32;
    let (y0, y1) = y_bounds(spec, data);

    let mut chart = ChartBuilder::on(&root)
        .caption(&spec.title, ("sans-serif", 22))
        .margin(12)
        .x_label_area_size(48)
        .y_label_area_size(64)
        .build_cartesian_2d((0..slots).into_segmented(), y0..y1)?;

    let labels = &data.labels;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len().max(1))
        .x_label_formatter(&|v| segment_label(v, labels))
        .x_desc(spec.x.as_str())
        .y_desc(spec.series.join(", "))
        .draw()?;

    for (idx, series) in data.series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        let points: Vec<(i32, f64)> = series
            .values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i as i32, v)))
            .collect();

        let anno = match spec.kind {
            ChartKind::Bar => chart.draw_series(
                Histogram::vertical(&chart)
                    .style(color.filled())
                    .margin(6)
                    .data(points.iter().copied()),
            )?,
            ChartKind::Line => chart.draw_series(LineSeries::new(
                points.iter().map(|&(i, v)| (SegmentValue::CenterOf(i), v)),
                color.stroke_width(2),
            ))?,
            ChartKind::Scatter => chart.draw_series(
                points
                    .iter()
                    .map(|&(i, v)| Circle::new((SegmentValue::CenterOf(i), v), 4, color.filled())),
            )?,
        };
        anno.label(series.name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));

        if spec.show_values {
            chart.draw_series(points.iter().map(|&(i, v)| {
                Text::new(
                    format_value(v),
                    (SegmentValue::CenterOf(i), v),
                    ("sans-serif", 12).into_font().color(&BLACK),
                )
            }))?;
        }
    }

    if data.series.len() > 1 {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

fn segment_label(v: &SegmentValue<i32>, labels: &[String]) -> String {
    match v {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => usize::try_from(*i)
            .ok()
            .and_then(|i| labels.get(i))
            .cloned()
            .unwrap_or_default(),
        SegmentValue::Last => String::new(),
    }
}

/// Fixed range when the chart has one; otherwise zero-based with 10% headroom.
fn y_bounds(spec: &ChartSpec, data: &ChartData) -> (f64, f64) {
    if let Some((lo, hi)) = spec.y_range {
        if hi > lo {
            return (lo, hi);
        }
    }
    let (lo, hi) = data.value_range().unwrap_or((0.0, 1.0));
    let lo = lo.min(0.0);
    let hi = hi.max(0.0);
    let span = (hi - lo).max(1e-9);
    (lo - if lo < 0.0 { span * 0.1 } else { 0.0 }, hi + span * 0.1)
}

fn format_value(v: f64) -> String {
    if v.fract() == 0.0 { format!("{v:.0}") } else { format!("{v:.1}") }
}
