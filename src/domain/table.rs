//! In-memory record sets.
//!
//! A `Table` is an ordered list of unique column names plus row-major cells.
//! Rows are exposed read-only as `Row` views (name → value, column order),
//! which is the interface the chart layer consumes.

use std::collections::HashSet;
use std::fmt;

use crate::error::NormalizeError;

/// A single scalar cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Num(f64),
    Null,
}

impl Value {
    /// Interpret a raw CSV field.
    ///
    /// Empty (after trimming) → `Null`, finite float → `Num`, otherwise `Str`.
    pub fn from_field(field: &str) -> Self {
        let s = field.trim();
        if s.is_empty() {
            return Value::Null;
        }
        match s.parse::<f64>() {
            Ok(v) if v.is_finite() => Value::Num(v),
            _ => Value::Str(s.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric reading for charting.
    ///
    /// Accepts numbers, numeric strings, and percentages (`"23%"` → `23.0`).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Num(v) => Some(*v),
            Value::Str(s) => {
                let s = s.trim();
                let s = s.strip_suffix('%').unwrap_or(s).trim_end();
                s.parse::<f64>().ok().filter(|v| v.is_finite())
            }
            Value::Null => None,
        }
    }

    /// Text form used for CSV export, pivot column names, and labels.
    /// `Null` renders as the empty string.
    pub fn text(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            Value::Num(v) => v.to_string(),
            Value::Null => String::new(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            other => write!(f, "{}", other.text()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Num(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// An ordered record set with unique column names.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub(crate) columns: Vec<String>,
    pub(crate) rows: Vec<Vec<Value>>,
}

impl Table {
    /// Empty table with the given header.
    pub fn new(columns: Vec<String>) -> Result<Self, NormalizeError> {
        ensure_unique(&columns)?;
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Build a table, checking that every row has one cell per column.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self, NormalizeError> {
        let mut table = Self::new(columns)?;
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> Result<(), NormalizeError> {
        if row.len() != self.columns.len() {
            return Err(NormalizeError::schema(format!(
                "row {} has {} cells, expected {}",
                self.rows.len(),
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Like `column_index`, but a missing column is a schema error.
    pub fn require_column(&self, name: &str) -> Result<usize, NormalizeError> {
        self.column_index(name)
            .ok_or_else(|| NormalizeError::schema(format!("missing column `{name}`")))
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[col])
    }

    pub fn row(&self, idx: usize) -> Option<Row<'_>> {
        self.rows.get(idx).map(|cells| Row {
            columns: &self.columns,
            cells,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|cells| Row {
            columns: &self.columns,
            cells,
        })
    }

    /// All cells of one column, top to bottom.
    pub fn column_values(&self, name: &str) -> Result<Vec<&Value>, NormalizeError> {
        let col = self.require_column(name)?;
        Ok(self.rows.iter().map(|r| &r[col]).collect())
    }

    pub fn null_count(&self) -> usize {
        self.rows.iter().flatten().filter(|v| v.is_null()).count()
    }
}

/// Read-only view of one row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [String],
    cells: &'a [Value],
}

impl<'a> Row<'a> {
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.cells.get(idx)
    }

    /// `(column, value)` pairs in column order.
    pub fn iter(self) -> impl Iterator<Item = (&'a str, &'a Value)> + 'a {
        let cells: &'a [Value] = self.cells;
        self.columns.iter().map(String::as_str).zip(cells.iter())
    }

    pub fn values(&self) -> &'a [Value] {
        self.cells
    }
}

pub(crate) fn ensure_unique(names: &[String]) -> Result<(), NormalizeError> {
    let mut seen = HashSet::with_capacity(names.len());
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(NormalizeError::schema(format!("duplicate column name `{name}`")));
        }
    }
    Ok(())
}

/// Shorthand for building headers in code and tests.
pub fn column_names(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_field_classifies_cells() {
        assert_eq!(Value::from_field(""), Value::Null);
        assert_eq!(Value::from_field("  "), Value::Null);
        assert_eq!(Value::from_field("12.5"), Value::Num(12.5));
        assert_eq!(Value::from_field("2.5b"), Value::Str("2.5b".to_string()));
        assert_eq!(Value::from_field("23%"), Value::Str("23%".to_string()));
        assert_eq!(Value::from_field("NaN"), Value::Str("NaN".to_string()));
    }

    #[test]
    fn as_f64_reads_percentages() {
        assert_eq!(Value::from("23%").as_f64(), Some(23.0));
        assert_eq!(Value::from(" 7.5 % ").as_f64(), Some(7.5));
        assert_eq!(Value::from("abc").as_f64(), None);
        assert_eq!(Value::Null.as_f64(), None);
    }

    #[test]
    fn duplicate_header_is_rejected() {
        let err = Table::new(column_names(&["a", "b", "a"])).unwrap_err();
        assert!(matches!(err, NormalizeError::Schema(_)));
    }

    #[test]
    fn ragged_row_is_rejected() {
        let mut t = Table::new(column_names(&["a", "b"])).unwrap();
        assert!(t.push_row(vec![Value::from(1.0)]).is_err());
        assert!(t.is_empty());
    }

    #[test]
    fn row_view_maps_names_to_values() {
        let t = Table::from_rows(
            column_names(&["area", "insource"]),
            vec![vec![Value::from("Gauteng"), Value::Null]],
        )
        .unwrap();
        let row = t.row(0).unwrap();
        assert_eq!(row.get("area"), Some(&Value::from("Gauteng")));
        assert_eq!(row.get("insource"), Some(&Value::Null));
        assert_eq!(row.get("missing"), None);
        let names: Vec<&str> = row.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["area", "insource"]);
    }
}
