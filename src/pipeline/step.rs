//! Named pipeline steps.

use std::path::{Path, PathBuf};

use crate::domain::{Table, TableState, Value};
use crate::error::StepError;
use crate::normalize::{self, ColumnRename};

/// One operation in a table pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Rename(ColumnRename),
    ConvertMagnitude { source: String, target: String },
    DropColumns(Vec<String>),
    DropIncompleteRows,
    PatchCell { row: usize, column: String, value: Value },
    /// `columns: None` fills the whole table.
    FillMissing { default: String, columns: Option<Vec<String>> },
    Melt { id_vars: Vec<String>, var_name: String, value_name: String },
    Pivot { index: String, columns: String, values: String },
    /// Write the table to `file` inside the run's output directory.
    Export { file: String },
}

impl Step {
    /// Stable kebab-case name used in logs, errors, and the manifest.
    pub fn name(&self) -> &'static str {
        match self {
            Step::Rename(_) => "rename",
            Step::ConvertMagnitude { .. } => "convert-magnitude",
            Step::DropColumns(_) => "drop-columns",
            Step::DropIncompleteRows => "drop-incomplete-rows",
            Step::PatchCell { .. } => "patch-cell",
            Step::FillMissing { .. } => "fill-missing",
            Step::Melt { .. } => "melt",
            Step::Pivot { .. } => "pivot",
            Step::Export { .. } => "export",
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Step::Rename(r) => r.describe(),
            Step::ConvertMagnitude { source, target } => format!("{source} -> {target} (millions)"),
            Step::DropColumns(cols) => cols.join(", "),
            Step::DropIncompleteRows => "rows with any null".to_string(),
            Step::PatchCell { row, column, value } => format!("row {row}, {column} = {value}"),
            Step::FillMissing { default, columns } => match columns {
                Some(cols) => format!("'{default}' in {}", cols.join(", ")),
                None => format!("'{default}' everywhere"),
            },
            Step::Melt {
                id_vars,
                var_name,
                value_name,
            } => format!("id [{}] -> {var_name}/{value_name}", id_vars.join(", ")),
            Step::Pivot { index, columns, values } => {
                format!("index {index}, columns {columns}, values {values}")
            }
            Step::Export { file } => file.clone(),
        }
    }

    /// Lifecycle state a table is in after this step (never lowered; see `is_ordered`).
    pub fn stage(&self) -> TableState {
        match self {
            Step::Rename(_) => TableState::Renamed,
            Step::ConvertMagnitude { .. } => TableState::Converted,
            Step::DropColumns(_) | Step::DropIncompleteRows => TableState::Raw,
            Step::PatchCell { .. } | Step::FillMissing { .. } => TableState::Filled,
            Step::Melt { .. } => TableState::Reshaped,
            Step::Pivot { .. } => TableState::Pivoted,
            Step::Export { .. } => TableState::Exported,
        }
    }

    /// Ordered steps must not run once the table has passed their stage.
    ///
    /// Header and selection steps (rename, drops) are not ordered: they may
    /// follow a reshape, and they leave the state where it is.
    pub fn is_ordered(&self) -> bool {
        !matches!(
            self,
            Step::Rename(_) | Step::DropColumns(_) | Step::DropIncompleteRows
        )
    }

    /// Apply the step. Returns the new table and the export path, if any.
    pub(crate) fn apply(&self, table: Table, out_dir: &Path) -> Result<(Table, Option<PathBuf>), StepError> {
        let table = match self {
            Step::Rename(r) => normalize::rename_columns(table, r)?,
            Step::ConvertMagnitude { source, target } => normalize::convert_column(table, source, target)?,
            Step::DropColumns(cols) => normalize::drop_columns(table, cols)?,
            Step::DropIncompleteRows => normalize::drop_incomplete_rows(table),
            Step::PatchCell { row, column, value } => normalize::patch_cell(table, *row, column, value.clone())?,
            Step::FillMissing { default, columns } => match columns {
                Some(cols) => normalize::fill_missing_in(table, default, cols)?,
                None => normalize::fill_missing(table, default),
            },
            Step::Melt {
                id_vars,
                var_name,
                value_name,
            } => normalize::melt(&table, id_vars, var_name, value_name)?,
            Step::Pivot { index, columns, values } => normalize::pivot(&table, index, columns, values)?,
            Step::Export { file } => {
                let path = out_dir.join(file);
                crate::io::export::write_table_csv(&path, &table)?;
                return Ok((table, Some(path)));
            }
        };
        Ok((table, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::NameTransform;

    #[test]
    fn names_are_kebab_case() {
        let steps = [
            Step::Rename(ColumnRename::Transform(vec![NameTransform::Lowercase])),
            Step::DropIncompleteRows,
            Step::FillMissing {
                default: "77%".to_string(),
                columns: None,
            },
        ];
        let names: Vec<&str> = steps.iter().map(Step::name).collect();
        assert_eq!(names, vec!["rename", "drop-incomplete-rows", "fill-missing"]);
    }

    #[test]
    fn selection_steps_are_unordered() {
        assert!(!Step::DropColumns(vec!["Area".to_string()]).is_ordered());
        assert!(Step::Export { file: "x.csv".to_string() }.is_ordered());
    }

    #[test]
    fn describe_patch() {
        let step = Step::PatchCell {
            row: 2,
            column: "insource".to_string(),
            value: Value::from("23%"),
        };
        assert_eq!(step.describe(), "row 2, insource = 23%");
    }
}
