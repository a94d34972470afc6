//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be
//! written into the run manifest alongside the exported tables.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a table moving through its pipeline.
///
/// The derived ordering is the lifecycle order; a pipeline may only move a
/// table forward (or stay in the same state for repeated steps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableState {
    Raw,
    Renamed,
    Converted,
    Filled,
    Reshaped,
    Pivoted,
    Exported,
}

impl TableState {
    pub fn label(self) -> &'static str {
        match self {
            TableState::Raw => "raw",
            TableState::Renamed => "renamed",
            TableState::Converted => "converted",
            TableState::Filled => "filled",
            TableState::Reshaped => "reshaped",
            TableState::Pivoted => "pivoted",
            TableState::Exported => "exported",
        }
    }
}

impl fmt::Display for TableState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fully resolved settings for one `dash run`.
#[derive(Debug, Clone)]
pub struct DashConfig {
    /// Directory holding the raw dataset CSVs.
    pub data_dir: PathBuf,
    /// Directory receiving exported tables and `manifest.json`.
    pub out_dir: PathBuf,
    /// Directory receiving SVG charts; `None` disables SVG output.
    pub charts_dir: Option<PathBuf>,
    /// Print ASCII charts to stdout.
    pub plot: bool,
    pub plot_width: usize,
    /// Worker threads for running independent table pipelines (0 = rayon default).
    pub jobs: usize,
    pub svg_width: u32,
    pub svg_height: u32,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            out_dir: PathBuf::from("data"),
            charts_dir: Some(PathBuf::from("charts")),
            plot: false,
            plot_width: 60,
            jobs: 0,
            svg_width: 900,
            svg_height: 480,
        }
    }
}
