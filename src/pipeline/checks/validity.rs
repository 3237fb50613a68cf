//! Shared Valid / Invalid / Missing tallying for single-column string checks.

use crate::dataset::{require_column, text_cells};
use crate::error::Result;
use crate::pipeline::check::{CheckReport, record};
use polars::prelude::DataFrame;
use serde_json::Value;

/// Classification of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Validity {
    Valid,
    Invalid,
    Missing,
}

impl Validity {
    /// Report order.
    pub const ALL: [Self; 3] = [Self::Valid, Self::Invalid, Self::Missing];

    pub fn label(self) -> &'static str {
        match self {
            Self::Valid => "Valid",
            Self::Invalid => "Invalid",
            Self::Missing => "Missing",
        }
    }

    /// Null and empty cells are missing; everything else is judged by `is_valid`.
    pub fn classify(cell: Option<&str>, is_valid: impl Fn(&str) -> bool) -> Self {
        match cell {
            None | Some("") => Self::Missing,
            Some(value) if is_valid(value) => Self::Valid,
            Some(_) => Self::Invalid,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidityCounts {
    pub valid: u64,
    pub invalid: u64,
    pub missing: u64,
}

impl ValidityCounts {
    pub fn tally<'a>(
        cells: impl IntoIterator<Item = Option<&'a str>>,
        is_valid: impl Fn(&str) -> bool,
    ) -> Self {
        cells.into_iter().fold(Self::default(), |mut counts, cell| {
            match Validity::classify(cell, &is_valid) {
                Validity::Valid => counts.valid += 1,
                Validity::Invalid => counts.invalid += 1,
                Validity::Missing => counts.missing += 1,
            }
            counts
        })
    }

    pub fn get(&self, category: Validity) -> u64 {
        match category {
            Validity::Valid => self.valid,
            Validity::Invalid => self.invalid,
            Validity::Missing => self.missing,
        }
    }

    pub fn total(&self) -> u64 {
        self.valid + self.invalid + self.missing
    }

    /// One `{Category, Count}` record per category, zero counts included.
    pub fn to_report(&self) -> CheckReport {
        CheckReport::new(
            Validity::ALL
                .into_iter()
                .map(|category| {
                    record([
                        ("Category", Value::from(category.label())),
                        ("Count", Value::from(self.get(category))),
                    ])
                })
                .collect(),
        )
    }
}

/// Tally a required column of `df`.
pub(crate) fn tally_column(
    df: &DataFrame,
    check: &str,
    column: &str,
    is_valid: impl Fn(&str) -> bool,
) -> Result<ValidityCounts> {
    let cells = text_cells(require_column(df, check, column)?)?;
    Ok(ValidityCounts::tally(
        cells.iter().map(Option::as_deref),
        is_valid,
    ))
}
