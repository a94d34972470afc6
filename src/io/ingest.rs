//! CSV ingest into raw tables.
//!
//! Header text is kept as-is apart from whitespace trimming and a leading BOM;
//! renaming is a pipeline step, not an ingest concern. Cells are classified by
//! `Value::from_field`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{Table, Value};
use crate::error::AppError;

/// Load one dataset file.
pub fn read_table_csv(path: &Path) -> Result<Table, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_table(file, &path.display().to_string())
}

/// Parse CSV from any reader. `source` is only used in error messages.
pub fn read_table<R: Read>(reader: R, source: &str) -> Result<Table, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers in '{source}': {e}")))?
        .clone();

    let mut table = Table::new(header_names(&headers))
        .map_err(|e| AppError::new(2, format!("Invalid header in '{source}': {e}")))?;

    for (idx, result) in reader.records().enumerate() {
        // +2: records start after the header and lines are 1-based.
        let line = idx + 2;
        let record =
            result.map_err(|e| AppError::new(2, format!("CSV parse error in '{source}' line {line}: {e}")))?;

        // A trailing blank line parses as a single empty field.
        if record.len() == 1 && record.get(0).is_some_and(str::is_empty) && table.width() > 1 {
            continue;
        }

        let cells: Vec<Value> = record.iter().map(Value::from_field).collect();
        table
            .push_row(cells)
            .map_err(|e| AppError::new(2, format!("Bad row in '{source}' line {line}: {e}")))?;
    }

    Ok(table)
}

fn header_names(headers: &StringRecord) -> Vec<String> {
    headers
        .iter()
        .map(|name| name.trim().trim_start_matches('\u{feff}').to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_values_and_nulls() {
        let csv = "\u{feff}Area,Insource,Outsource\nGauteng,30%,70%\nWestern Cape,,64%\n";
        let t = read_table(csv.as_bytes(), "test").unwrap();
        assert_eq!(t.columns(), &["Area", "Insource", "Outsource"]);
        assert_eq!(t.len(), 2);
        assert_eq!(t.cell(1, "Insource"), Some(&Value::Null));
        assert_eq!(t.cell(0, "Outsource"), Some(&Value::from("70%")));
    }

    #[test]
    fn numeric_cells_become_numbers() {
        let csv = "year,total_investment\n2020,2.5b\n2021,800\n";
        let t = read_table(csv.as_bytes(), "test").unwrap();
        assert_eq!(t.cell(0, "year"), Some(&Value::Num(2020.0)));
        assert_eq!(t.cell(0, "total_investment"), Some(&Value::from("2.5b")));
        assert_eq!(t.cell(1, "total_investment"), Some(&Value::Num(800.0)));
    }

    #[test]
    fn ragged_row_reports_line() {
        let csv = "a,b\n1,2\n3\n";
        let err = read_table(csv.as_bytes(), "ragged.csv").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("line 3"), "{err}");
    }

    #[test]
    fn duplicate_headers_are_rejected() {
        let err = read_table("a,a\n1,2\n".as_bytes(), "dup.csv").unwrap_err();
        assert!(err.to_string().contains("duplicate column"), "{err}");
    }
}
