//! Export normalized tables to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts:
//! one header row, nulls as empty cells. The table is only borrowed.

use std::fs::create_dir_all;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::domain::Table;
use crate::error::AppError;

/// Write a table to `path`, creating parent directories as needed.
///
/// Rows go to a temporary file next to `path`, which replaces `path` only
/// after every row is flushed. A failed write leaves the destination as it was.
pub fn write_table_csv(path: &Path, table: &Table) -> Result<(), AppError> {
    write_staged(path, |file| write_table(file, table))
}

pub(crate) fn write_staged<E, F>(path: &Path, write: F) -> Result<(), AppError>
where
    E: std::fmt::Display,
    F: FnOnce(&mut NamedTempFile) -> Result<(), E>,
{
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            create_dir_all(parent).map_err(|e| {
                AppError::new(2, format!("Failed to create output dir '{}': {e}", parent.display()))
            })?;
            parent
        }
        None => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir)
        .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", path.display())))?;

    write(&mut staged).map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", path.display())))?;
    staged
        .as_file()
        .sync_all()
        .map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", path.display())))?;

    staged
        .persist(path)
        .map_err(|e| AppError::new(2, format!("Failed to replace '{}': {}", path.display(), e.error)))?;
    Ok(())
}

/// Serialize a table as CSV into any writer.
pub fn write_table<W: Write>(writer: W, table: &Table) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(table.columns())?;
    for row in table.rows() {
        out.write_record(row.values().iter().map(|v| v.text()))?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Value, column_names};

    #[test]
    fn writes_header_and_empty_nulls() {
        let t = Table::from_rows(
            column_names(&["area", "insource", "total_investment(in Millions)"]),
            vec![
                vec![Value::from("Gauteng, North"), Value::Null, Value::from(2500.0)],
                vec![Value::from("Limpopo"), Value::from("23%"), Value::from(0.5)],
            ],
        )
        .unwrap();

        let mut buf = Vec::new();
        write_table(&mut buf, &t).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "area,insource,total_investment(in Millions)\n\"Gauteng, North\",,2500\nLimpopo,23%,0.5\n"
        );
    }

    #[test]
    fn export_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");
        let t = Table::from_rows(column_names(&["a"]), vec![vec![Value::from(1.0)]]).unwrap();
        write_table_csv(&path, &t).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\n1\n");
    }

    #[test]
    fn failed_write_leaves_no_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixed_outsourcing.csv");

        let err = write_staged(&path, |file: &mut NamedTempFile| -> Result<(), csv::Error> {
            file.write_all(b"area,insource\nGauteng,")?;
            Err(csv::Error::from(std::io::Error::other("no space left on device")))
        })
        .unwrap_err();

        assert_eq!(err.exit_code(), 2);
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn failed_write_keeps_previous_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "a\n1\n").unwrap();

        write_staged(&path, |_| Err("disk full")).unwrap_err();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\n1\n");
    }
}
