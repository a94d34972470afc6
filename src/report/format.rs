//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the normalization code stays free of presentation
//! - output changes are localized (important for snapshot tests)

use crate::error::PipelineError;
use crate::pipeline::NormalizedTable;
use crate::recipes::Recipe;

/// Per-table results of one run, plus failures.
pub fn format_run_summary(tables: &[NormalizedTable], failures: &[PipelineError], chart_count: usize) -> String {
    let mut out = String::new();

    out.push_str("=== dash - market tables ===\n");
    out.push_str(&format!(
        "Tables: {} ok, {} failed | Charts: {chart_count}\n\n",
        tables.len(),
        failures.len()
    ));

    out.push_str(
        format!(
            "{:<18} {:<10} {:>6} {:>5} {}\n",
            "table", "state", "rows", "cols", "export"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<18} {:-<10} {:-<6} {:-<5} {:-<6}\n",
            "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for t in tables {
        let export = t
            .exported_to
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:<18} {:<10} {:>6} {:>5} {export}\n",
            t.name,
            t.state.label(),
            t.table.len(),
            t.table.width(),
        ));
    }

    if !failures.is_empty() {
        out.push_str("\nFailed:\n");
        for f in failures {
            out.push_str(&format!("- {f}\n"));
        }
    }

    out
}

/// Step lists of every recipe, with the table state after each step.
pub fn format_steps(recipes: &[Recipe]) -> String {
    let mut out = String::new();
    for (i, recipe) in recipes.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("{} ({})\n", recipe.name(), recipe.input));
        for (n, (step, state)) in recipe.pipeline.plan().into_iter().enumerate() {
            out.push_str(&format!(
                "  {}. {:<20} {} => {state}\n",
                n + 1,
                step.name(),
                step.describe()
            ));
        }
    }
    out
}
