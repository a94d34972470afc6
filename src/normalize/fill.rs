//! Missing-value fill and point patches.
//!
//! `fill_missing` is a blunt fallback: every null cell receives the same fixed
//! string. It is not an estimate of the missing figure. It applies table-wide
//! unless scoped with `fill_missing_in`.
//!
//! `patch_cell` corrects one known cell and runs before the fill, so a patched
//! value is never replaced by the fallback.

use crate::domain::{Table, Value};
use crate::error::NormalizeError;

/// Replace every null cell with `default`. Non-null cells are untouched.
pub fn fill_missing(mut table: Table, default: &str) -> Table {
    for cell in table.rows.iter_mut().flatten() {
        if cell.is_null() {
            *cell = Value::Str(default.to_string());
        }
    }
    table
}

/// Like `fill_missing`, restricted to `columns`.
pub fn fill_missing_in(mut table: Table, default: &str, columns: &[String]) -> Result<Table, NormalizeError> {
    let targets = columns
        .iter()
        .map(|c| table.require_column(c))
        .collect::<Result<Vec<usize>, _>>()?;

    for row in &mut table.rows {
        for &idx in &targets {
            if row[idx].is_null() {
                row[idx] = Value::Str(default.to_string());
            }
        }
    }
    Ok(table)
}

/// Overwrite a single cell addressed by row index and column name.
pub fn patch_cell(mut table: Table, row: usize, column: &str, value: Value) -> Result<Table, NormalizeError> {
    let col = table.require_column(column)?;
    let len = table.len();
    let cells = table
        .rows
        .get_mut(row)
        .ok_or(NormalizeError::Index { row, len })?;
    cells[col] = value;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::column_names;

    fn outsourcing() -> Table {
        Table::from_rows(
            column_names(&["area", "insource", "outsource"]),
            vec![
                vec![Value::from("Gauteng"), Value::from("30%"), Value::from("70%")],
                vec![Value::from("Western Cape"), Value::Null, Value::from("64%")],
                vec![Value::from("KwaZulu-Natal"), Value::Null, Value::from("77%")],
                vec![Value::from("Eastern Cape"), Value::from("41%"), Value::Null],
            ],
        )
        .unwrap()
    }

    #[test]
    fn fill_touches_only_nulls() {
        let before = outsourcing();
        let after = fill_missing(before.clone(), "77%");

        assert_eq!(after.null_count(), 0);
        for (r, (old, new)) in before.rows.iter().zip(after.rows.iter()).enumerate() {
            for (c, (o, n)) in old.iter().zip(new.iter()).enumerate() {
                if o.is_null() {
                    assert_eq!(n, &Value::from("77%"), "row {r} col {c}");
                } else {
                    assert_eq!(o, n, "row {r} col {c}");
                }
            }
        }
    }

    #[test]
    fn patch_then_fill_keeps_patch() {
        let t = patch_cell(outsourcing(), 2, "insource", Value::from("23%")).unwrap();
        let t = fill_missing(t, "77%");

        assert_eq!(t.cell(2, "insource"), Some(&Value::from("23%")));
        assert_eq!(t.cell(1, "insource"), Some(&Value::from("77%")));
        assert_eq!(t.cell(3, "outsource"), Some(&Value::from("77%")));
    }

    #[test]
    fn patch_out_of_range_is_index_error() {
        let err = patch_cell(outsourcing(), 4, "insource", Value::from("1%")).unwrap_err();
        assert_eq!(err, NormalizeError::Index { row: 4, len: 4 });
    }

    #[test]
    fn patch_unknown_column_is_schema_error() {
        let err = patch_cell(outsourcing(), 0, "insourced", Value::from("1%")).unwrap_err();
        assert!(matches!(err, NormalizeError::Schema(_)));
    }

    #[test]
    fn scoped_fill_leaves_other_columns_null() {
        let t = fill_missing_in(outsourcing(), "n/a", &["insource".to_string()]).unwrap();
        assert_eq!(t.cell(1, "insource"), Some(&Value::from("n/a")));
        assert_eq!(t.cell(3, "outsource"), Some(&Value::Null));
    }

    #[test]
    fn scoped_fill_unknown_column_is_schema_error() {
        let err = fill_missing_in(outsourcing(), "n/a", &["onsource".to_string()]).unwrap_err();
        assert!(matches!(err, NormalizeError::Schema(_)));
    }
}
