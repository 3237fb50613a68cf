//! Duplicate row counting over a key subset.

use crate::dataset::{kind_column, require_column};
use crate::error::Result;
use crate::pipeline::check::{Check, CheckReport, record};
use polars::prelude::*;
use serde_json::Value;
use std::collections::HashSet;

const GROUP_SIZE: &str = "__tabcheck_group_size";

/// Counts every row that shares its key with at least one other row.
///
/// All members of a repeated group are counted, so three identical rows
/// contribute three. An empty key list compares whole rows. Nulls compare
/// equal to each other; values of different JSON types never do. A column
/// named twice in the key list counts once.
#[derive(Debug, Clone, Default)]
pub struct DuplicateRowsCheck {
    columns: Vec<String>,
}

impl DuplicateRowsCheck {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        let mut seen = HashSet::new();
        Self {
            columns: columns
                .into_iter()
                .map(Into::into)
                .filter(|column: &String| seen.insert(column.clone()))
                .collect(),
        }
    }

    /// Decode `["col", ...]`. Absent or `null` compares whole rows.
    pub fn from_config(config: Option<&Value>) -> std::result::Result<Self, String> {
        match config {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(value) => serde_json::from_value::<Vec<String>>(value.clone())
                .map(Self::new)
                .map_err(|e| format!("expected a list of column names: {e}")),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows belonging to a key group of size two or more.
    pub fn count_duplicates(&self, df: &DataFrame) -> Result<u64> {
        let keys: Vec<Expr> = if self.columns.is_empty() {
            df.get_column_names()
                .into_iter()
                .map(|name| col(name.as_str()))
                .collect()
        } else {
            let mut keys = Vec::with_capacity(self.columns.len());
            for name in &self.columns {
                require_column(df, self.name(), name)?;
                keys.push(col(name.as_str()));

                let kind = kind_column(name);
                if df.column(&kind).is_ok() {
                    keys.push(col(kind.as_str()));
                }
            }
            keys
        };

        if keys.is_empty() || df.height() < 2 {
            return Ok(0);
        }

        let sizes = df
            .clone()
            .lazy()
            .group_by(keys)
            .agg([len().alias(GROUP_SIZE)])
            .filter(col(GROUP_SIZE).gt(lit(1)))
            .select([col(GROUP_SIZE).cast(DataType::UInt64).sum()])
            .collect()?;

        Ok(sizes
            .column(GROUP_SIZE)?
            .as_materialized_series()
            .get(0)?
            .extract::<u64>()
            .unwrap_or(0))
    }
}

impl Check for DuplicateRowsCheck {
    fn name(&self) -> &'static str {
        super::DUPLICATE_ROWS
    }

    fn run(&self, df: DataFrame) -> Result<(DataFrame, CheckReport)> {
        let total = self.count_duplicates(&df)?;
        let report = CheckReport::new(vec![record([(
            "Total Duplicate Rows",
            Value::from(total),
        )])]);
        Ok((df, report))
    }
}
