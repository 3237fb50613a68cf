//! Email address format check.

use super::validity::tally_column;
use crate::error::Result;
use crate::pipeline::check::{Check, CheckReport};
use polars::prelude::DataFrame;
use regex::Regex;
use std::sync::LazyLock;

/// Column the check reads.
pub const EMAIL_COLUMN: &str = "Email";

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9.-]+$")
        .expect("email pattern is a valid regex")
});

/// Whether `value` is a well-formed address. The whole value must match.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Counts valid, invalid and missing addresses in the `Email` column.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailValidityCheck;

impl Check for EmailValidityCheck {
    fn name(&self) -> &'static str {
        super::EMAIL_VALIDITY
    }

    fn run(&self, df: DataFrame) -> Result<(DataFrame, CheckReport)> {
        let counts = tally_column(&df, self.name(), EMAIL_COLUMN, is_valid_email)?;
        Ok((df, counts.to_report()))
    }
}
