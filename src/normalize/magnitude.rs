//! Money magnitudes with unit suffixes.
//!
//! Investment figures arrive as strings like `"750m"` or `"2.5b"`. Everything
//! is normalized to millions.

use crate::domain::{Table, Value};
use crate::error::NormalizeError;

const MILLION_SUFFIX: char = 'm';
const BILLION_SUFFIX: char = 'b';
const MILLIONS_PER_BILLION: f64 = 1000.0;

/// Parse a magnitude string into millions.
///
/// - `"750m"` → `750.0`
/// - `"2.5b"` → `2500.0`
/// - `"42"`   → `42.0`
///
/// Any other suffix, an empty string, a negative amount, or a non-finite
/// number is a parse error.
pub fn convert_magnitude(value: &str) -> Result<f64, NormalizeError> {
    let s = value.trim();
    if s.is_empty() {
        return Err(NormalizeError::parse(value, "empty value"));
    }

    let (body, scale) = if let Some(body) = s.strip_suffix(MILLION_SUFFIX) {
        (body, 1.0)
    } else if let Some(body) = s.strip_suffix(BILLION_SUFFIX) {
        (body, MILLIONS_PER_BILLION)
    } else {
        (s, 1.0)
    };

    let n = body.trim_end().parse::<f64>().map_err(|_| {
        NormalizeError::parse(value, "expected a number with an optional 'm' or 'b' suffix")
    })?;
    if !n.is_finite() {
        return Err(NormalizeError::parse(value, "number is not finite"));
    }
    if n.is_sign_negative() {
        return Err(NormalizeError::parse(value, "magnitude must not be negative"));
    }

    Ok(n * scale)
}

/// Convert a magnitude cell. Numeric cells are already in millions.
pub fn convert_magnitude_cell(cell: &Value) -> Result<f64, NormalizeError> {
    match cell {
        Value::Num(v) => Ok(*v),
        Value::Str(s) => convert_magnitude(s),
        Value::Null => Err(NormalizeError::parse("", "missing value")),
    }
}

/// Build `target` from `source` via `convert_magnitude`, then drop `source`.
///
/// The new column is appended after the remaining columns. The first bad cell
/// fails the whole conversion and the input table is discarded.
pub fn convert_column(mut table: Table, source: &str, target: &str) -> Result<Table, NormalizeError> {
    let src = table.require_column(source)?;
    if target != source && table.column_index(target).is_some() {
        return Err(NormalizeError::schema(format!(
            "conversion target `{target}` already exists"
        )));
    }

    let converted = table
        .rows
        .iter()
        .map(|row| convert_magnitude_cell(&row[src]))
        .collect::<Result<Vec<f64>, _>>()?;

    table.columns.remove(src);
    table.columns.push(target.to_string());
    for (row, v) in table.rows.iter_mut().zip(converted) {
        row.remove(src);
        row.push(Value::Num(v));
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::column_names;

    #[test]
    fn suffixes_scale_to_millions() {
        assert_eq!(convert_magnitude("2.5b").unwrap(), 2500.0);
        assert_eq!(convert_magnitude("750m").unwrap(), 750.0);
        assert_eq!(convert_magnitude("12").unwrap(), 12.0);
        assert_eq!(convert_magnitude(" 3b ").unwrap(), 3000.0);
    }

    #[test]
    fn billions_outrank_same_magnitude_millions() {
        for n in ["0.5", "1", "7.25", "999"] {
            let m = convert_magnitude(&format!("{n}m")).unwrap();
            let b = convert_magnitude(&format!("{n}b")).unwrap();
            assert!(b > m, "{n}: {b} <= {m}");
            assert_eq!(b, m * 1000.0);
        }
    }

    #[test]
    fn unknown_suffixes_are_rejected() {
        for bad in ["3k", "2.5B", "", "b", "abc", "1.2.3m", "infm", "NaN", "-2b", "-1m", "-0m"] {
            let err = convert_magnitude(bad).unwrap_err();
            assert!(matches!(err, NormalizeError::Parse { .. }), "{bad}");
        }
    }

    #[test]
    fn negative_amounts_name_the_reason() {
        let err = convert_magnitude("-2b").unwrap_err();
        assert_eq!(err, NormalizeError::parse("-2b", "magnitude must not be negative"));
    }

    #[test]
    fn column_conversion_appends_and_drops_source() {
        let t = Table::from_rows(
            column_names(&["year", "total_investment", "note"]),
            vec![
                vec![Value::from(2019.0), Value::from("750m"), Value::from("a")],
                vec![Value::from(2020.0), Value::from("2.5b"), Value::from("b")],
                vec![Value::from(2021.0), Value::from(900.0), Value::from("c")],
            ],
        )
        .unwrap();

        let t = convert_column(t, "total_investment", "total_investment(in Millions)").unwrap();
        assert_eq!(t.columns(), &["year", "note", "total_investment(in Millions)"]);
        let values: Vec<f64> = t
            .column_values("total_investment(in Millions)")
            .unwrap()
            .into_iter()
            .map(|v| v.as_f64().unwrap())
            .collect();
        assert_eq!(values, vec![750.0, 2500.0, 900.0]);
    }

    #[test]
    fn column_conversion_fails_on_null() {
        let t = Table::from_rows(
            column_names(&["total_investment"]),
            vec![vec![Value::from("1m")], vec![Value::Null]],
        )
        .unwrap();
        assert!(matches!(
            convert_column(t, "total_investment", "out"),
            Err(NormalizeError::Parse { .. })
        ));
    }
}
