//! Run manifest written next to the exported tables.
//!
//! The manifest records, per table, which file was written, its shape, and
//! the steps that produced it. Failed tables are listed with their error so
//! a partial run is visible without reading logs.

use std::path::Path;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::domain::TableState;
use crate::error::AppError;
use crate::io::export::write_staged;

pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, Serialize)]
pub struct RunManifest {
    pub tool: String,
    pub generated_at: DateTime<Local>,
    pub tables: Vec<ManifestTable>,
    pub failed: Vec<ManifestFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManifestTable {
    pub name: String,
    /// Exported file name, relative to the output directory.
    pub file: Option<String>,
    pub state: TableState,
    pub rows: usize,
    pub columns: Vec<String>,
    pub steps: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManifestFailure {
    pub name: String,
    pub step: String,
    pub error: String,
}

/// Write the manifest as pretty JSON, replacing any previous manifest whole.
pub fn write_manifest_json(path: &Path, manifest: &RunManifest) -> Result<(), AppError> {
    write_staged(path, |file| serde_json::to_writer_pretty(file, manifest))
}
