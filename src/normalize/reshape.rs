//! Melt (wide → long) and pivot (long → wide).
//!
//! Pivot tie-break: two long rows that land on the same `(index, column)` cell
//! are rejected with `NormalizeError::Ambiguity`. No value is ever picked over
//! another.

use std::collections::HashMap;

use crate::domain::{Table, Value};
use crate::error::NormalizeError;

/// Melt every non-id column into `(var_name, value_name)` pairs.
///
/// Output columns: `id_vars..., var_name, value_name`. Rows are emitted in
/// original row order, then original column order.
pub fn melt(table: &Table, id_vars: &[String], var_name: &str, value_name: &str) -> Result<Table, NormalizeError> {
    let id_idx = id_vars
        .iter()
        .map(|c| table.require_column(c))
        .collect::<Result<Vec<usize>, _>>()?;

    let value_idx: Vec<usize> = (0..table.width()).filter(|i| !id_idx.contains(i)).collect();

    let mut columns = id_vars.to_vec();
    columns.push(var_name.to_string());
    columns.push(value_name.to_string());
    let mut out = Table::new(columns)?;
    out.rows.reserve(table.len() * value_idx.len());

    for row in &table.rows {
        for &vi in &value_idx {
            let mut cells: Vec<Value> = id_idx.iter().map(|&i| row[i].clone()).collect();
            cells.push(Value::Str(table.columns[vi].clone()));
            cells.push(row[vi].clone());
            out.rows.push(cells);
        }
    }

    Ok(out)
}

/// Pivot a long table: one row per distinct `index` value, one column per
/// distinct `columns` value (both in first-seen order).
///
/// The index column keeps its name and comes first. Output column names are
/// the text form of the `columns` values. Cells with no long entry are null.
/// Columns other than the three named are ignored.
pub fn pivot(table: &Table, index: &str, columns: &str, values: &str) -> Result<Table, NormalizeError> {
    let ii = table.require_column(index)?;
    let ci = table.require_column(columns)?;
    let vi = table.require_column(values)?;

    let mut index_keys: Vec<&Value> = Vec::new();
    let mut index_pos: HashMap<String, usize> = HashMap::new();
    let mut column_names: Vec<String> = Vec::new();
    let mut column_pos: HashMap<String, usize> = HashMap::new();
    let mut grid: Vec<Vec<Option<Value>>> = Vec::new();

    for row in &table.rows {
        let col_value = &row[ci];
        if col_value.is_null() {
            return Err(NormalizeError::schema(format!(
                "pivot column `{columns}` contains a null value"
            )));
        }

        let r = *index_pos.entry(cell_key(&row[ii])).or_insert_with(|| {
            index_keys.push(&row[ii]);
            grid.push(vec![None; column_names.len()]);
            index_keys.len() - 1
        });
        let c = *column_pos.entry(cell_key(col_value)).or_insert_with(|| {
            column_names.push(col_value.text());
            for cells in grid.iter_mut() {
                cells.push(None);
            }
            column_names.len() - 1
        });

        let slot = &mut grid[r][c];
        if slot.is_some() {
            return Err(NormalizeError::Ambiguity {
                index: row[ii].text(),
                column: col_value.text(),
            });
        }
        *slot = Some(row[vi].clone());
    }

    let mut header = Vec::with_capacity(column_names.len() + 1);
    header.push(index.to_string());
    header.extend(column_names);
    let mut out = Table::new(header)?;

    for (key, cells) in index_keys.into_iter().zip(grid) {
        let mut row = Vec::with_capacity(cells.len() + 1);
        row.push(key.clone());
        row.extend(cells.into_iter().map(|c| c.unwrap_or(Value::Null)));
        out.rows.push(row);
    }

    Ok(out)
}

// Keys distinguish kinds so that `Num(2020)` and `Str("2020")` stay separate.
fn cell_key(v: &Value) -> String {
    format!("{v:?}")
}
