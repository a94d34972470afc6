//! Column renaming.
//!
//! A rename is total: every input column maps to exactly one output name
//! (columns an explicit mapping does not mention keep their name). The result
//! must still have unique names.

use std::collections::HashMap;

use crate::domain::{Table, table::ensure_unique};
use crate::error::NormalizeError;

/// Pure per-name transforms, applied left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameTransform {
    Lowercase,
    /// Remove every `' '`.
    StripSpaces,
    /// Replace every `' '` with `'_'`.
    SpacesToUnderscores,
    /// Remove every `'-'`.
    StripHyphens,
}

impl NameTransform {
    pub fn apply(self, name: &str) -> String {
        match self {
            NameTransform::Lowercase => name.to_lowercase(),
            NameTransform::StripSpaces => name.replace(' ', ""),
            NameTransform::SpacesToUnderscores => name.replace(' ', "_"),
            NameTransform::StripHyphens => name.replace('-', ""),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NameTransform::Lowercase => "lowercase",
            NameTransform::StripSpaces => "strip spaces",
            NameTransform::SpacesToUnderscores => "spaces to underscores",
            NameTransform::StripHyphens => "strip hyphens",
        }
    }
}

/// How to derive new column names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRename {
    /// Explicit `old → new` pairs. Every `old` must exist.
    Map(Vec<(String, String)>),
    /// One new name per column, in column order.
    Positional(Vec<String>),
    /// Transform chain applied to every name.
    Transform(Vec<NameTransform>),
}

impl ColumnRename {
    pub fn map(pairs: &[(&str, &str)]) -> Self {
        ColumnRename::Map(
            pairs
                .iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect(),
        )
    }

    pub fn positional(names: &[&str]) -> Self {
        ColumnRename::Positional(names.iter().map(|s| s.to_string()).collect())
    }

    pub fn describe(&self) -> String {
        match self {
            ColumnRename::Map(pairs) => pairs
                .iter()
                .map(|(a, b)| format!("{a} -> {b}"))
                .collect::<Vec<_>>()
                .join(", "),
            ColumnRename::Positional(names) => format!("set columns [{}]", names.join(", ")),
            ColumnRename::Transform(ts) => ts
                .iter()
                .map(|t| t.label())
                .collect::<Vec<_>>()
                .join(" + "),
        }
    }
}

/// Compute the renamed header without touching any table.
pub fn renamed_columns(columns: &[String], rename: &ColumnRename) -> Result<Vec<String>, NormalizeError> {
    let out: Vec<String> = match rename {
        ColumnRename::Map(pairs) => {
            let mut lookup = HashMap::with_capacity(pairs.len());
            for (old, new) in pairs {
                if !columns.iter().any(|c| c == old) {
                    return Err(NormalizeError::schema(format!(
                        "cannot rename missing column `{old}`"
                    )));
                }
                if lookup.insert(old.as_str(), new.as_str()).is_some() {
                    return Err(NormalizeError::schema(format!(
                        "column `{old}` is renamed more than once"
                    )));
                }
            }
            columns
                .iter()
                .map(|c| lookup.get(c.as_str()).map_or_else(|| c.clone(), |n| n.to_string()))
                .collect()
        }
        ColumnRename::Positional(names) => {
            if names.len() != columns.len() {
                return Err(NormalizeError::schema(format!(
                    "positional rename supplies {} names for {} columns",
                    names.len(),
                    columns.len()
                )));
            }
            names.clone()
        }
        ColumnRename::Transform(transforms) => columns
            .iter()
            .map(|c| transforms.iter().fold(c.clone(), |name, t| t.apply(&name)))
            .collect(),
    };

    ensure_unique(&out)?;
    Ok(out)
}

/// Rename the columns of `table`. Cells are untouched.
pub fn rename_columns(mut table: Table, rename: &ColumnRename) -> Result<Table, NormalizeError> {
    table.columns = renamed_columns(&table.columns, rename)?;
    Ok(table)
}
