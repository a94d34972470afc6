//! Dataset recipes: which file feeds which pipeline.
//!
//! Each recipe is the full, ordered cleanup for one source dataset. The step
//! lists are data, so `dash steps` can print them and tests can run them on
//! in-memory tables.

use crate::domain::{Value, column_names};
use crate::error::NormalizeError;
use crate::normalize::{ColumnRename, NameTransform};
use crate::pipeline::{Pipeline, Step};

pub const ACCOUNT_SHARE: &str = "account_share";
pub const INVESTMENT: &str = "investment";
pub const OUTSOURCING: &str = "outsourcing";
pub const FORECASTING_AI: &str = "forecasting_ai";
pub const REVENUE_FORECAST: &str = "revenue_forecast";
pub const TOP_COMPANIES: &str = "top_companies";

/// Converted investment column (millions).
pub const INVESTMENT_MILLIONS: &str = "total_investment(in Millions)";
pub const GENAI_VALUE: &str = "GenAI Value";

/// Fallback for outsourcing cells nobody reported. A fixed figure carried over
/// from the published dashboard, not an estimate.
pub const OUTSOURCING_FILL: &str = "77%";

#[derive(Debug, Clone)]
pub struct Recipe {
    /// Raw CSV file name inside the data directory.
    pub input: &'static str,
    pub pipeline: Pipeline,
}

impl Recipe {
    pub fn name(&self) -> &str {
        self.pipeline.name()
    }
}

/// All dataset recipes, in dashboard order.
pub fn all() -> Result<Vec<Recipe>, NormalizeError> {
    Ok(vec![
        account_share()?,
        investment()?,
        outsourcing()?,
        forecasting_ai()?,
        revenue_forecast()?,
        top_companies()?,
    ])
}

pub fn account_share() -> Result<Recipe, NormalizeError> {
    Ok(Recipe {
        input: "company_shares_in_south_africa.csv",
        pipeline: Pipeline::new(
            ACCOUNT_SHARE,
            vec![Step::Rename(ColumnRename::positional(&[
                "brand",
                "sharepercentage",
                "market",
            ]))],
        )?,
    })
}

pub fn investment() -> Result<Recipe, NormalizeError> {
    Ok(Recipe {
        input: "global_investments.csv",
        pipeline: Pipeline::new(
            INVESTMENT,
            vec![
                Step::ConvertMagnitude {
                    source: "total_investment".to_string(),
                    target: INVESTMENT_MILLIONS.to_string(),
                },
                Step::Export {
                    file: "simplified_global_investment.csv".to_string(),
                },
            ],
        )?,
    })
}

pub fn outsourcing() -> Result<Recipe, NormalizeError> {
    Ok(Recipe {
        input: "outsourcing_it.csv",
        pipeline: Pipeline::new(
            OUTSOURCING,
            vec![
                lowercase(),
                // Known-bad source cell: the survey figure for this area is 23%.
                Step::PatchCell {
                    row: 2,
                    column: "insource".to_string(),
                    value: Value::from("23%"),
                },
                Step::FillMissing {
                    default: OUTSOURCING_FILL.to_string(),
                    columns: None,
                },
                Step::Export {
                    file: "fixed_outsourcing.csv".to_string(),
                },
            ],
        )?,
    })
}

pub fn forecasting_ai() -> Result<Recipe, NormalizeError> {
    Ok(Recipe {
        input: "market_size_forecasting_generative_ai.csv",
        pipeline: Pipeline::new(
            FORECASTING_AI,
            vec![
                Step::Melt {
                    id_vars: column_names(&["Area"]),
                    var_name: "Year".to_string(),
                    value_name: GENAI_VALUE.to_string(),
                },
                Step::DropColumns(column_names(&["Area"])),
            ],
        )?,
    })
}

pub fn revenue_forecast() -> Result<Recipe, NormalizeError> {
    Ok(Recipe {
        input: "revenue_forecast_it_south_africa.csv",
        pipeline: Pipeline::new(
            REVENUE_FORECAST,
            vec![
                lowercase(),
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
                Step::Rename(ColumnRename::Transform(vec![
                    NameTransform::Lowercase,
                    NameTransform::StripSpaces,
                    NameTransform::StripHyphens,
                ])),
            ],
        )?,
    })
}

pub fn top_companies() -> Result<Recipe, NormalizeError> {
    Ok(Recipe {
        input: "top_ai_companies.csv",
        pipeline: Pipeline::new(
            TOP_COMPANIES,
            vec![
                Step::Rename(ColumnRename::Transform(vec![
                    NameTransform::Lowercase,
                    NameTransform::SpacesToUnderscores,
                ])),
                Step::Rename(ColumnRename::map(&[(
                    "market_cap(as_of_march_2024)",
                    "market_cap_march2024",
                )])),
                Step::DropIncompleteRows,
                Step::Export {
                    file: "cleaned_topcompanies.csv".to_string(),
                },
            ],
        )?,
    })
}

fn lowercase() -> Step {
    Step::Rename(ColumnRename::Transform(vec![NameTransform::Lowercase]))
}
