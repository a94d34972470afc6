//! Command-line parsing for the market dashboard table builder.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the normalization code.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "dash", version, about = "IT outsourcing & AI market tables: normalize, export, chart")]
pub struct Cli {
    /// Increase log verbosity (`-v` debug, `-vv` trace). `RUST_LOG` overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Normalize every dataset, export the cleaned tables, and render charts.
    Run(RunArgs),
    /// Print each dataset's ordered step list without touching any file.
    Steps,
}

/// Options for a full run.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// Directory holding the raw dataset CSVs.
    #[arg(long, env = "DASH_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Directory for exported tables and `manifest.json` (defaults to the data dir).
    #[arg(long, env = "DASH_OUT_DIR")]
    pub out_dir: Option<PathBuf>,

    /// Directory for SVG charts.
    #[arg(long, env = "DASH_CHARTS_DIR", default_value = "charts")]
    pub charts_dir: PathBuf,

    /// Skip SVG chart rendering.
    #[arg(long)]
    pub no_charts: bool,

    /// Print ASCII charts to stdout.
    #[arg(long)]
    pub plot: bool,

    /// ASCII chart width (columns).
    #[arg(long, default_value_t = 60)]
    pub width: usize,

    /// SVG width (pixels).
    #[arg(long, default_value_t = 900)]
    pub svg_width: u32,

    /// SVG height (pixels).
    #[arg(long, default_value_t = 480)]
    pub svg_height: u32,

    /// Worker threads for table pipelines (0 = one per core).
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,
}

