//! ASCII charts for terminal output.
//!
//! This is intentionally "dumb" (one text row per category), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Marks per chart kind:
//! - bar: `#` run from zero
//! - line: `-` run capped with `*`
//! - scatter: a single `o`
//!
//! Missing values print as `-` in the value column with no mark.

use crate::charts::{ChartData, ChartKind, ChartSpec};

const MAX_LABEL: usize = 24;
const MIN_PLOT_WIDTH: usize = 5;

/// Render one chart.
pub fn render_ascii_chart(spec: &ChartSpec, data: &ChartData, width: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} [{}]\n", spec.title, spec.section));

    let label_w = data
        .labels
        .iter()
        .map(|l| l.chars().count().min(MAX_LABEL))
        .max()
        .unwrap_or(0);
    let value_w = data
        .series
        .iter()
        .flat_map(|s| s.values.iter())
        .map(|v| format_value(*v).len())
        .max()
        .unwrap_or(1);
    let plot_w = width.saturating_sub(label_w + value_w + 3).max(MIN_PLOT_WIDTH);

    let (lo, hi) = scale_range(spec, data);

    for series in &data.series {
        if data.series.len() > 1 {
            out.push_str(&format!("  {}\n", series.name));
        }
        for (label, value) in data.labels.iter().zip(series.values.iter()) {
            let label = truncate(label, MAX_LABEL);
            let mark = value
                .map(|v| draw_mark(spec.kind, map_x(v, lo, hi, plot_w), plot_w))
                .unwrap_or_else(|| " ".repeat(plot_w));
            let line = format!(
                "{label:<label_w$} |{mark} {:>value_w$}",
                format_value(*value)
            );
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }

    out
}

/// Bars start at zero unless the chart fixes its own range.
fn scale_range(spec: &ChartSpec, data: &ChartData) -> (f64, f64) {
    if let Some((lo, hi)) = spec.y_range {
        if hi > lo {
            return (lo, hi);
        }
    }
    let (lo, hi) = data.value_range().unwrap_or((0.0, 1.0));
    let lo = lo.min(0.0);
    let hi = hi.max(0.0);
    if hi > lo { (lo, hi) } else { (lo, lo + 1.0) }
}

/// Number of cells from the left edge that `v` reaches.
fn map_x(v: f64, lo: f64, hi: f64, width: usize) -> usize {
    let u = ((v - lo) / (hi - lo)).clamp(0.0, 1.0);
    (u * width as f64).round() as usize
}

fn draw_mark(kind: ChartKind, cells: usize, width: usize) -> String {
    let cells = cells.min(width);
    let mut row = match kind {
        ChartKind::Bar => "#".repeat(cells),
        ChartKind::Line => {
            if cells == 0 {
                "*".to_string()
            } else {
                format!("{}*", "-".repeat(cells - 1))
            }
        }
        ChartKind::Scatter => {
            format!("{}o", " ".repeat(cells.saturating_sub(1)))
        }
    };
    let used = row.chars().count();
    row.push_str(&" ".repeat(width.saturating_sub(used)));
    row
}

fn format_value(v: Option<f64>) -> String {
    match v {
        None => "-".to_string(),
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{v:.0}"),
        Some(v) => format!("{v:.2}"),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut t: String = s.chars().take(max - 1).collect();
        t.push('~');
        t
    }
}
