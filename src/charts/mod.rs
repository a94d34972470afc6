//! Chart-ready views over the normalized tables.
//!
//! A `ChartSpec` owns the (possibly sorted/filtered) table it plots plus the
//! names of its x column and y series. Renderers only see `ChartData`, the
//! numeric extraction of a spec.

use std::collections::HashMap;

use tracing::warn;

use crate::domain::Table;
use crate::error::NormalizeError;
use crate::normalize::{filter_in, sort_by};
use crate::recipes::{
    ACCOUNT_SHARE, FORECASTING_AI, GENAI_VALUE, INVESTMENT, INVESTMENT_MILLIONS, OUTSOURCING,
    REVENUE_FORECAST,
};

/// Dashboard sections, in page order.
pub const SECTIONS: [&str; 5] = [
    "Top AI Companies",
    "Market Share",
    "Generative AI Forecast",
    "Outsourcing",
    "Revenue Forecast",
];

const SHARE_RANGE: (f64, f64) = (0.0, 80.0);
const AI_MARKETS: &[&str] = &["generative AI(text)", "generative AI(image)"];
const REVENUE_AREAS: [(&str, &str); 4] = [
    ("itadministrationoutsourcing", "IT Administration Outsourcing forecast"),
    ("itapplicationoutsourcing", "IT Application Outsourcing forecast"),
    ("itotheritoutsourcing", "Other IT Outsourcing forecast"),
    ("itwebhosting", "IT Web Hosting forecast"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
    Scatter,
}

#[derive(Debug, Clone)]
pub struct ChartSpec {
    /// File-safe identifier (`<id>.svg`).
    pub id: String,
    pub section: &'static str,
    pub title: String,
    pub kind: ChartKind,
    pub x: String,
    pub series: Vec<String>,
    pub table: Table,
    /// Fixed y-axis range; auto-scaled when `None`.
    pub y_range: Option<(f64, f64)>,
    /// Print each value next to its mark.
    pub show_values: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Category labels plus one numeric vector per series.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

impl ChartData {
    /// Min/max over all present values.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for v in self.series.iter().flat_map(|s| s.values.iter().flatten()) {
            lo = lo.min(*v);
            hi = hi.max(*v);
        }
        if lo.is_finite() && hi.is_finite() { Some((lo, hi)) } else { None }
    }
}

impl ChartSpec {
    /// Extract labels and numbers. Cells that do not read as numbers are gaps.
    pub fn data(&self) -> Result<ChartData, NormalizeError> {
        let labels = self
            .table
            .column_values(&self.x)?
            .into_iter()
            .map(|v| v.text())
            .collect();

        let series = self
            .series
            .iter()
            .map(|name| {
                let values = self
                    .table
                    .column_values(name)?
                    .into_iter()
                    .map(|v| v.as_f64())
                    .collect();
                Ok(Series {
                    name: name.clone(),
                    values,
                })
            })
            .collect::<Result<Vec<_>, NormalizeError>>()?;

        Ok(ChartData { labels, series })
    }
}

/// Declarative chart definition; resolved against the tables by `derive_charts`.
struct ChartDef {
    id: &'static str,
    section: &'static str,
    title: &'static str,
    kind: ChartKind,
    source: &'static str,
    x: &'static str,
    series: Vec<&'static str>,
    sort: Option<(&'static str, bool)>,
    filter: Option<(&'static str, &'static [&'static str])>,
    y_range: Option<(f64, f64)>,
    show_values: bool,
}

impl ChartDef {
    fn bar(
        id: &'static str,
        section: &'static str,
        title: &'static str,
        source: &'static str,
        x: &'static str,
        y: &'static str,
    ) -> Self {
        Self {
            id,
            section,
            title,
            kind: ChartKind::Bar,
            source,
            x,
            series: vec![y],
            sort: None,
            filter: None,
            y_range: None,
            show_values: false,
        }
    }

    fn resolve(&self, table: &Table) -> Result<ChartSpec, NormalizeError> {
        let mut table = table.clone();
        if let Some((column, allowed)) = self.filter {
            let allowed: Vec<String> = allowed.iter().map(|s| s.to_string()).collect();
            table = filter_in(table, column, &allowed)?;
        }
        if let Some((column, ascending)) = self.sort {
            table = sort_by(table, column, ascending)?;
        }

        table.require_column(self.x)?;
        for s in &self.series {
            table.require_column(s)?;
        }

        Ok(ChartSpec {
            id: self.id.to_string(),
            section: self.section,
            title: self.title.to_string(),
            kind: self.kind,
            x: self.x.to_string(),
            series: self.series.iter().map(|s| s.to_string()).collect(),
            table,
            y_range: self.y_range,
            show_values: self.show_values,
        })
    }
}

fn definitions() -> Vec<ChartDef> {
    let mut defs = vec![
        ChartDef {
            show_values: true,
            ..ChartDef::bar(
                "investment-by-year",
                SECTIONS[0],
                "Total Investment each year (in millions)",
                INVESTMENT,
                "year",
                INVESTMENT_MILLIONS,
            )
        },
        ChartDef {
            y_range: Some(SHARE_RANGE),
            show_values: true,
            ..ChartDef::bar(
                "brand-share",
                SECTIONS[0],
                "Percentage Share of brands in South Africa",
                ACCOUNT_SHARE,
                "brand",
                "sharepercentage",
            )
        },
        ChartDef {
            filter: Some(("market", AI_MARKETS)),
            y_range: Some(SHARE_RANGE),
            show_values: true,
            ..ChartDef::bar(
                "ai-brand-share",
                SECTIONS[1],
                "Share Percentage of Brands that are working with AI in South Africa",
                ACCOUNT_SHARE,
                "brand",
                "sharepercentage",
            )
        },
        ChartDef {
            show_values: true,
            ..ChartDef::bar(
                "genai-forecast",
                SECTIONS[2],
                "Generative AI market size forecast",
                FORECASTING_AI,
                "Year",
                GENAI_VALUE,
            )
        },
        ChartDef::bar(
            "insourcing-by-area",
            SECTIONS[3],
            "Insourcing in each area",
            OUTSOURCING,
            "area",
            "insource",
        ),
        ChartDef {
            sort: Some(("outsource", true)),
            ..ChartDef::bar(
                "outsourcing-by-area",
                SECTIONS[3],
                "Outsourcing in each area",
                OUTSOURCING,
                "area",
                "outsource",
            )
        },
        ChartDef {
            kind: ChartKind::Line,
            series: vec!["insource", "outsource"],
            ..ChartDef::bar(
                "sourcing-mix",
                SECTIONS[3],
                "Insourcing and Outsourcing in each area",
                OUTSOURCING,
                "area",
                "insource",
            )
        },
    ];

    for (column, title) in REVENUE_AREAS {
        defs.push(ChartDef {
            show_values: true,
            ..ChartDef::bar(column, SECTIONS[4], title, REVENUE_FORECAST, "years", column)
        });
    }
    defs.push(ChartDef {
        kind: ChartKind::Scatter,
        series: REVENUE_AREAS.iter().map(|(c, _)| *c).collect(),
        ..ChartDef::bar(
            "revenue-by-area",
            SECTIONS[4],
            "IT outsourcing revenue forecast by area",
            REVENUE_FORECAST,
            "years",
            REVENUE_AREAS[0].0,
        )
    });

    defs
}

/// Build every chart whose source table is available.
///
/// A missing table (its pipeline failed) or a schema mismatch skips that chart
/// with a warning; the remaining charts are still produced.
pub fn derive_charts(tables: &HashMap<&str, &Table>) -> Vec<ChartSpec> {
    let mut out = Vec::new();
    for def in definitions() {
        let Some(table) = tables.get(def.source) else {
            warn!(chart = def.id, table = def.source, "skipping chart: table unavailable");
            continue;
        };
        match def.resolve(table) {
            Ok(spec) => out.push(spec),
            Err(e) => warn!(chart = def.id, table = def.source, error = %e, "skipping chart"),
        }
    }
    out
}
