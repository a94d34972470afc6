//! The shared "normalize everything" workflow behind `dash run`.
//!
//! read raw CSV -> recipe pipeline -> export -> charts -> manifest
//!
//! Tables are independent, so their pipelines run in parallel; one table
//! failing never stops the others.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::charts::{ChartSpec, derive_charts};
use crate::domain::{DashConfig, Table};
use crate::error::{AppError, PipelineError, StepError};
use crate::io::manifest::{MANIFEST_FILE, ManifestFailure, ManifestTable, RunManifest, write_manifest_json};
use crate::pipeline::NormalizedTable;
use crate::recipes::Recipe;

/// All outputs of a single `dash run`.
#[derive(Debug)]
pub struct RunOutput {
    /// Successful tables, in recipe order.
    pub tables: Vec<NormalizedTable>,
    pub failures: Vec<PipelineError>,
    pub charts: Vec<ChartSpec>,
    /// SVG files written this run.
    pub chart_files: Vec<PathBuf>,
    pub manifest_path: PathBuf,
}

/// Run every recipe, write exports, charts, and the manifest.
pub fn run_all(config: &DashConfig) -> Result<RunOutput, AppError> {
    let recipes = crate::recipes::all()?;

    fs::create_dir_all(&config.out_dir).map_err(|e| {
        AppError::new(2, format!("Failed to create output dir '{}': {e}", config.out_dir.display()))
    })?;

    let results = if config.jobs > 0 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.jobs)
            .build()
            .map_err(|e| AppError::new(2, format!("Failed to start worker pool: {e}")))?;
        pool.install(|| run_recipes(&recipes, config))
    } else {
        run_recipes(&recipes, config)
    };

    let mut tables = Vec::new();
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(t) => tables.push(t),
            Err(e) => failures.push(e),
        }
    }

    let by_name: HashMap<&str, &Table> = tables.iter().map(|t| (t.name.as_str(), &t.table)).collect();
    let charts = derive_charts(&by_name);

    let chart_files = match &config.charts_dir {
        Some(dir) => write_charts(&charts, dir, (config.svg_width, config.svg_height))?,
        None => Vec::new(),
    };

    let manifest_path = config.out_dir.join(MANIFEST_FILE);
    write_manifest_json(&manifest_path, &build_manifest(&tables, &failures))?;
    info!(
        ok = tables.len(),
        failed = failures.len(),
        charts = charts.len(),
        manifest = %manifest_path.display(),
        "run complete"
    );

    Ok(RunOutput {
        tables,
        failures,
        charts,
        chart_files,
        manifest_path,
    })
}

fn run_recipes(recipes: &[Recipe], config: &DashConfig) -> Vec<Result<NormalizedTable, PipelineError>> {
    recipes.par_iter().map(|r| run_recipe(r, config)).collect()
}

fn run_recipe(recipe: &Recipe, config: &DashConfig) -> Result<NormalizedTable, PipelineError> {
    let input = config.data_dir.join(recipe.input);
    let raw = crate::io::ingest::read_table_csv(&input).map_err(|e| PipelineError {
        table: recipe.name().to_string(),
        step: "ingest".to_string(),
        source: StepError::Io(e),
    })?;
    info!(table = recipe.name(), rows = raw.len(), cols = raw.width(), "loaded");

    recipe.pipeline.run(raw, &config.out_dir)
}

fn write_charts(charts: &[ChartSpec], dir: &Path, size: (u32, u32)) -> Result<Vec<PathBuf>, AppError> {
    fs::create_dir_all(dir)
        .map_err(|e| AppError::new(2, format!("Failed to create charts dir '{}': {e}", dir.display())))?;

    let mut written = Vec::with_capacity(charts.len());
    for spec in charts {
        let data = match spec.data() {
            Ok(d) => d,
            Err(e) => {
                warn!(chart = %spec.id, error = %e, "skipping chart");
                continue;
            }
        };
        let path = dir.join(format!("{}.svg", spec.id));
        crate::plot::write_chart_svg(spec, &data, &path, size)?;
        written.push(path);
    }
    Ok(written)
}

fn build_manifest(tables: &[NormalizedTable], failures: &[PipelineError]) -> RunManifest {
    RunManifest {
        tool: concat!("dash ", env!("CARGO_PKG_VERSION")).to_string(),
        generated_at: Local::now(),
        tables: tables
            .iter()
            .map(|t| ManifestTable {
                name: t.name.clone(),
                file: t
                    .exported_to
                    .as_ref()
                    .and_then(|p| p.file_name())
                    .map(|f| f.to_string_lossy().into_owned()),
                state: t.state,
                rows: t.table.len(),
                columns: t.table.columns().to_vec(),
                steps: t.applied.clone(),
            })
            .collect(),
        failed: failures
            .iter()
            .map(|f| ManifestFailure {
                name: f.table.clone(),
                step: f.step.clone(),
                error: f.source.to_string(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TableState;

    const RAW_FILES: [(&str, &str); 6] = [
        (
            "company_shares_in_south_africa.csv",
            "Brand,Share,Market\nAcme,40,it services\nTextCo,35,generative AI(text)\n",
        ),
        ("global_investments.csv", "year,total_investment\n2019,750m\n2020,2.5b\n"),
        (
            "outsourcing_it.csv",
            "Area,Insource,Outsource\nGauteng,30%,70%\nLimpopo,25%,75%\nWestern Cape,,\n",
        ),
        ("market_size_forecasting_generative_ai.csv", "Area,2020,2021\nWorld,10,20\n"),
        (
            "revenue_forecast_it_south_africa.csv",
            "Area,2022,2023\nIT Administration Outsourcing,10,11\nIT Application Outsourcing,20,21\n\
             IT-Other IT Outsourcing,30,31\nIT Web Hosting,40,41\n",
        ),
        (
            "top_ai_companies.csv",
            "Company,Market Cap(as of March 2024),Country\nMicrosoft,3.1T,US\nUnknown,,US\n",
        ),
    ];

    fn workspace(skip: Option<&str>) -> (tempfile::TempDir, DashConfig) {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        fs::create_dir_all(&data).unwrap();
        for (file, body) in RAW_FILES {
            if Some(file) != skip {
                fs::write(data.join(file), body).unwrap();
            }
        }
        let config = DashConfig {
            data_dir: data,
            out_dir: dir.path().join("out"),
            charts_dir: Some(dir.path().join("charts")),
            jobs: 2,
            ..DashConfig::default()
        };
        (dir, config)
    }

    #[test]
    fn full_run_exports_tables_charts_and_manifest() {
        let (_dir, config) = workspace(None);
        let run = run_all(&config).unwrap();

        assert!(run.failures.is_empty(), "{:?}", run.failures);
        let names: Vec<&str> = run.tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["account_share", "investment", "outsourcing", "forecasting_ai", "revenue_forecast", "top_companies"]
        );

        let fixed = fs::read_to_string(config.out_dir.join("fixed_outsourcing.csv")).unwrap();
        assert_eq!(
            fixed,
            "area,insource,outsource\nGauteng,30%,70%\nLimpopo,25%,75%\nWestern Cape,23%,77%\n"
        );
        assert!(config.out_dir.join("simplified_global_investment.csv").exists());
        assert!(config.out_dir.join("cleaned_topcompanies.csv").exists());

        let revenue = run.tables.iter().find(|t| t.name == "revenue_forecast").unwrap();
        assert_eq!(revenue.state, TableState::Pivoted);
        assert!(revenue.exported_to.is_none());

        assert!(!run.charts.is_empty());
        assert_eq!(run.chart_files.len(), run.charts.len());
        assert!(config.charts_dir.as_ref().unwrap().join("investment-by-year.svg").exists());

        let manifest = fs::read_to_string(&run.manifest_path).unwrap();
        assert!(manifest.contains("\"fixed_outsourcing.csv\""));
        assert!(manifest.contains("\"state\": \"exported\""));
    }

    #[test]
    fn missing_input_fails_only_that_table() {
        let (_dir, config) = workspace(Some("top_ai_companies.csv"));
        let run = run_all(&config).unwrap();

        assert_eq!(run.tables.len(), 5);
        assert_eq!(run.failures.len(), 1);
        assert_eq!(run.failures[0].table, "top_companies");
        assert_eq!(run.failures[0].step, "ingest");
        assert!(!config.out_dir.join("cleaned_topcompanies.csv").exists());

        let manifest = fs::read_to_string(&run.manifest_path).unwrap();
        assert!(manifest.contains("\"step\": \"ingest\""));
    }

    #[test]
    fn charts_can_be_disabled() {
        let (dir, mut config) = workspace(None);
        config.charts_dir = None;
        let run = run_all(&config).unwrap();
        assert!(run.chart_files.is_empty());
        assert!(!dir.path().join("charts").exists());
    }
}
