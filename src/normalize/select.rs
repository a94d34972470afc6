//! Column/row selection helpers used by the recipes and the chart layer.

use std::cmp::Ordering;

use crate::domain::{Table, Value};
use crate::error::NormalizeError;

/// Remove the named columns. Every name must exist.
pub fn drop_columns(mut table: Table, names: &[String]) -> Result<Table, NormalizeError> {
    let mut idx = names
        .iter()
        .map(|n| table.require_column(n))
        .collect::<Result<Vec<usize>, _>>()?;
    idx.sort_unstable();
    idx.dedup();

    for &i in idx.iter().rev() {
        table.columns.remove(i);
        for row in &mut table.rows {
            row.remove(i);
        }
    }
    Ok(table)
}

/// Remove every row that has at least one null cell.
pub fn drop_incomplete_rows(mut table: Table) -> Table {
    table.rows.retain(|row| row.iter().all(|v| !v.is_null()));
    table
}

/// Stable sort by one column. Nulls always sort last.
///
/// Two cells that both read as numbers (`Value::as_f64`) compare numerically;
/// otherwise their text forms compare.
pub fn sort_by(mut table: Table, column: &str, ascending: bool) -> Result<Table, NormalizeError> {
    let col = table.require_column(column)?;
    table.rows.sort_by(|a, b| {
        let (x, y) = (&a[col], &b[col]);
        match (x.is_null(), y.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let ord = compare_cells(x, y);
                if ascending { ord } else { ord.reverse() }
            }
        }
    });
    Ok(table)
}

/// Keep rows whose `column` text is one of `allowed`.
pub fn filter_in(mut table: Table, column: &str, allowed: &[String]) -> Result<Table, NormalizeError> {
    let col = table.require_column(column)?;
    table
        .rows
        .retain(|row| !row[col].is_null() && allowed.iter().any(|a| *a == row[col].text()));
    Ok(table)
}

fn compare_cells(x: &Value, y: &Value) -> Ordering {
    match (x.as_f64(), y.as_f64()) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        _ => x.text().cmp(&y.text()),
    }
}
