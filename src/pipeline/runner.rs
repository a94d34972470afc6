//! Pipeline runner.
//!
//! A `Pipeline` is validated once at construction:
//!
//! - ordered steps never move a table back to an earlier state
//! - at most one `Export`, and only as the final step
//!
//! `run` applies the steps to an owned table and stops at the first failure.
//! Export is the last step, so a failed table never reaches the filesystem.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::domain::{Table, TableState};
use crate::error::{NormalizeError, PipelineError};
use crate::pipeline::step::Step;

/// An ordered, validated list of steps for one named table.
#[derive(Debug, Clone)]
pub struct Pipeline {
    name: String,
    steps: Vec<Step>,
}

/// Output of a successful pipeline run.
#[derive(Debug, Clone)]
pub struct NormalizedTable {
    pub name: String,
    pub table: Table,
    pub state: TableState,
    /// Names of the steps that ran, in order.
    pub applied: Vec<String>,
    pub exported_to: Option<PathBuf>,
}

impl Pipeline {
    pub fn new(name: impl Into<String>, steps: Vec<Step>) -> Result<Self, NormalizeError> {
        let name = name.into();
        let mut state = TableState::Raw;

        for (i, step) in steps.iter().enumerate() {
            if state == TableState::Exported {
                return Err(NormalizeError::StepOrder(format!(
                    "`{name}`: step {i} ({}) follows the export",
                    step.name()
                )));
            }
            if step.is_ordered() && step.stage() < state {
                return Err(NormalizeError::StepOrder(format!(
                    "`{name}`: step {i} ({}) would move the table from {state} back to {}",
                    step.name(),
                    step.stage()
                )));
            }
            state = state.max(step.stage());
        }

        Ok(Self { name, steps })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Each step paired with the table state after it runs.
    pub fn plan(&self) -> Vec<(&Step, TableState)> {
        let mut state = TableState::Raw;
        self.steps
            .iter()
            .map(|step| {
                state = state.max(step.stage());
                (step, state)
            })
            .collect()
    }

    pub fn exports(&self) -> bool {
        matches!(self.steps.last(), Some(Step::Export { .. }))
    }

    /// Run every step on `table`. Exports land in `out_dir`.
    pub fn run(&self, table: Table, out_dir: &Path) -> Result<NormalizedTable, PipelineError> {
        let mut table = table;
        let mut state = TableState::Raw;
        let mut applied = Vec::with_capacity(self.steps.len());
        let mut exported_to = None;

        for step in &self.steps {
            let (next, path) = step.apply(table, out_dir).map_err(|source| PipelineError {
                table: self.name.clone(),
                step: step.name().to_string(),
                source,
            })?;
            table = next;
            state = state.max(step.stage());
            applied.push(step.name().to_string());

            debug!(
                table = %self.name,
                step = step.name(),
                rows = table.len(),
                columns = table.width(),
                %state,
                "applied step"
            );

            if let Some(path) = path {
                info!(table = %self.name, path = %path.display(), rows = table.len(), "exported table");
                exported_to = Some(path);
            }
        }

        Ok(NormalizedTable {
            name: self.name.clone(),
            table,
            state,
            applied,
            exported_to,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Value, column_names};
    use crate::error::StepError;
    use crate::normalize::{ColumnRename, NameTransform};

    fn lower() -> Step {
        Step::Rename(ColumnRename::Transform(vec![NameTransform::Lowercase]))
    }

    fn raw_outsourcing() -> Table {
        Table::from_rows(
            column_names(&["Area", "Insource", "Outsource"]),
            vec![
                vec![Value::from("A"), Value::from("10%"), Value::from("90%")],
                vec![Value::from("B"), Value::Null, Value::from("64%")],
                vec![Value::from("C"), Value::Null, Value::Null],
            ],
        )
        .unwrap()
    }

    #[test]
    fn fill_before_convert_is_rejected() {
        let err = Pipeline::new(
            "t",
            vec![
                Step::FillMissing {
                    default: "0".to_string(),
                    columns: None,
                },
                Step::ConvertMagnitude {
                    source: "a".to_string(),
                    target: "b".to_string(),
                },
            ],
        )
        .unwrap_err();
        assert!(matches!(err, NormalizeError::StepOrder(_)));
    }

    #[test]
    fn nothing_may_follow_export() {
        let err = Pipeline::new(
            "t",
            vec![Step::Export { file: "t.csv".to_string() }, lower()],
        )
        .unwrap_err();
        assert!(matches!(err, NormalizeError::StepOrder(msg) if msg.contains("follows the export")));
    }

    #[test]
    fn rename_after_pivot_keeps_pivoted_state() {
        let p = Pipeline::new(
            "t",
            vec![
                lower(),
                Step::Melt {
                    id_vars: column_names(&["area"]),
                    var_name: "years".to_string(),
                    value_name: "values".to_string(),
                },
                Step::Pivot {
                    index: "years".to_string(),
                    columns: "area".to_string(),
                    values: "values".to_string(),
                },
                lower(),
            ],
        )
        .unwrap();
        let states: Vec<TableState> = p.plan().into_iter().map(|(_, s)| s).collect();
        assert_eq!(
            states,
            vec![
                TableState::Renamed,
                TableState::Reshaped,
                TableState::Pivoted,
                TableState::Pivoted
            ]
        );
    }

    #[test]
    fn run_patches_fills_and_exports() {
        let dir = tempfile::tempdir().unwrap();
        let p = Pipeline::new(
            "outsourcing",
            vec![
                lower(),
                Step::PatchCell {
                    row: 2,
                    column: "insource".to_string(),
                    value: Value::from("23%"),
                },
                Step::FillMissing {
                    default: "77%".to_string(),
                    columns: None,
                },
                Step::Export {
                    file: "fixed_outsourcing.csv".to_string(),
                },
            ],
        )
        .unwrap();

        let out = p.run(raw_outsourcing(), dir.path()).unwrap();
        assert_eq!(out.state, TableState::Exported);
        assert_eq!(out.applied, vec!["rename", "patch-cell", "fill-missing", "export"]);
        assert_eq!(out.table.cell(2, "insource"), Some(&Value::from("23%")));
        assert_eq!(out.table.cell(1, "insource"), Some(&Value::from("77%")));
        assert_eq!(out.table.cell(2, "outsource"), Some(&Value::from("77%")));

        let written = std::fs::read_to_string(dir.path().join("fixed_outsourcing.csv")).unwrap();
        assert_eq!(written, "area,insource,outsource\nA,10%,90%\nB,77%,64%\nC,23%,77%\n");
    }

    #[test]
    fn failure_halts_before_export() {
        let dir = tempfile::tempdir().unwrap();
        let p = Pipeline::new(
            "outsourcing",
            vec![
                lower(),
                Step::PatchCell {
                    row: 9,
                    column: "insource".to_string(),
                    value: Value::from("23%"),
                },
                Step::Export {
                    file: "fixed_outsourcing.csv".to_string(),
                },
            ],
        )
        .unwrap();

        let err = p.run(raw_outsourcing(), dir.path()).unwrap_err();
        assert_eq!(err.table, "outsourcing");
        assert_eq!(err.step, "patch-cell");
        assert!(matches!(
            err.source,
            StepError::Normalize(NormalizeError::Index { row: 9, len: 3 })
        ));
        assert!(!dir.path().join("fixed_outsourcing.csv").exists());
    }
}
