//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - runs every dataset pipeline
//! - prints the summary and optional ASCII charts

use clap::Parser;
use tracing::error;

use crate::cli::{Command, RunArgs};
use crate::domain::DashConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `dash` binary.
pub fn run() -> Result<(), AppError> {
    // `.env` is optional; real environment variables take precedence.
    dotenvy::dotenv().ok();

    // `dash` and `dash --plot` behave like `dash run ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    crate::logging::init_logging(cli.verbose);

    match cli.command {
        Command::Run(args) => handle_run(&args),
        Command::Steps => handle_steps(),
    }
}

fn handle_run(args: &RunArgs) -> Result<(), AppError> {
    let config = config_from_args(args);
    let run = pipeline::run_all(&config)?;

    if config.plot {
        let mut section = "";
        for spec in &run.charts {
            let Ok(data) = spec.data() else { continue };
            if spec.section != section {
                section = spec.section;
                println!("## {section}\n");
            }
            println!("{}", crate::plot::render_ascii_chart(spec, &data, config.plot_width));
        }
    }

    println!(
        "{}",
        crate::report::format_run_summary(&run.tables, &run.failures, run.charts.len())
    );

    if run.failures.is_empty() {
        return Ok(());
    }
    for f in &run.failures {
        error!(table = %f.table, step = %f.step, error = %f.source, "table failed");
    }
    Err(AppError::new(
        3,
        format!(
            "{} of {} tables failed",
            run.failures.len(),
            run.failures.len() + run.tables.len()
        ),
    ))
}

fn handle_steps() -> Result<(), AppError> {
    let recipes = crate::recipes::all()?;
    print!("{}", crate::report::format_steps(&recipes));
    Ok(())
}

pub fn config_from_args(args: &RunArgs) -> DashConfig {
    DashConfig {
        data_dir: args.data_dir.clone(),
        out_dir: args.out_dir.clone().unwrap_or_else(|| args.data_dir.clone()),
        charts_dir: (!args.no_charts).then(|| args.charts_dir.clone()),
        plot: args.plot,
        plot_width: args.width,
        jobs: args.jobs,
        svg_width: args.svg_width,
        svg_height: args.svg_height,
    }
}

/// Rewrite argv so `dash` defaults to `dash run`.
///
/// Rules:
/// - `dash`                      -> `dash run`
/// - `dash --plot ...`           -> `dash run --plot ...`
/// - `dash -v steps`             -> unchanged
/// - `dash --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = |a: &str| matches!(a, "run" | "steps");
    if is_subcommand(arg1.as_str()) {
        return argv;
    }

    // Global flags may precede the subcommand (`dash -v steps`).
    if arg1.starts_with('-') && !argv[2..].iter().any(|a| is_subcommand(a.as_str())) {
        argv.insert(1, "run".to_string());
        return argv;
    }

    argv
}
