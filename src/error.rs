//! Error types.
//!
//! - `NormalizeError`: typed failures of the table operations
//! - `PipelineError`: a step failure tagged with its table and step
//! - `AppError`: what the binary reports (message + process exit code)

use thiserror::Error;

/// Failure of a single table operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    /// Column collisions, missing expected columns, width mismatches.
    #[error("schema error: {0}")]
    Schema(String),

    /// A cell did not match an accepted unit/number format.
    #[error("parse error: cannot convert '{value}': {reason}")]
    Parse { value: String, reason: String },

    /// A point patch addressed a row that does not exist.
    #[error("index error: row {row} is out of range (table has {len} rows)")]
    Index { row: usize, len: usize },

    /// A pivot found more than one value for one output cell.
    #[error("ambiguity error: more than one value for index '{index}', column '{column}'")]
    Ambiguity { index: String, column: String },

    /// A pipeline lists steps that would move a table back to an earlier state.
    #[error("step order error: {0}")]
    StepOrder(String),
}

impl NormalizeError {
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    pub fn parse(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Why a pipeline step failed.
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    /// Reading the source file or writing the export.
    #[error(transparent)]
    Io(#[from] AppError),
}

/// A failed table pipeline. The table is discarded; nothing is exported.
#[derive(Debug, Error)]
#[error("table `{table}` failed at step `{step}`: {source}")]
pub struct PipelineError {
    pub table: String,
    pub step: String,
    #[source]
    pub source: StepError,
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<NormalizeError> for AppError {
    fn from(err: NormalizeError) -> Self {
        AppError::new(3, err.to_string())
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        let exit_code = match &err.source {
            StepError::Normalize(_) => 3,
            StepError::Io(e) => e.exit_code(),
        };
        AppError::new(exit_code, err.to_string())
    }
}
