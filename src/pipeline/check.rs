//! The check contract and its report type.

use crate::error::Result;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// One validation rule over a dataset.
///
/// A check owns its configuration and nothing else. `run` takes the dataset by
/// value and hands it back, so a check that transforms data returns the new
/// frame while read-only checks return the input untouched.
pub trait Check: fmt::Debug + Send + Sync {
    /// Canonical name of the check kind, used in error reports.
    fn name(&self) -> &'static str;

    /// Evaluate the rule, returning the (possibly transformed) dataset and a report.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::MissingColumn`](crate::error::PipelineError::MissingColumn)
    /// when a required column is absent, or a data error from polars.
    fn run(&self, df: DataFrame) -> Result<(DataFrame, CheckReport)>;
}

/// A flat report record: field name to scalar value.
pub type ReportRecord = Map<String, Value>;

/// Ordered, homogeneous records produced by one check invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckReport {
    records: Vec<ReportRecord>,
}

impl CheckReport {
    pub fn new(records: Vec<ReportRecord>) -> Self {
        Self { records }
    }

    pub fn push(&mut self, record: ReportRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[ReportRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The report as a JSON array.
    pub fn to_value(&self) -> Value {
        Value::Array(self.records.iter().cloned().map(Value::Object).collect())
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

/// Build a report record from field/value pairs, keeping their order.
pub fn record<const N: usize>(fields: [(&str, Value); N]) -> ReportRecord {
    fields
        .into_iter()
        .map(|(name, value)| (name.to_owned(), value))
        .collect()
}
