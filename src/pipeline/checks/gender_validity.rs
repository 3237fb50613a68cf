//! Gender code check.

use super::validity::tally_column;
use crate::error::Result;
use crate::pipeline::check::{Check, CheckReport};
use polars::prelude::DataFrame;

/// Column the check reads.
pub const GENDER_COLUMN: &str = "Gender";

/// Counts `M`/`F` codes as valid in the `Gender` column.
///
/// Matching is exact: no trimming or case folding, so `"m"` and `" M"` are invalid.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenderValidityCheck;

fn is_valid_gender(value: &str) -> bool {
    matches!(value, "M" | "F")
}

impl Check for GenderValidityCheck {
    fn name(&self) -> &'static str {
        super::GENDER_VALIDITY
    }

    fn run(&self, df: DataFrame) -> Result<(DataFrame, CheckReport)> {
        let counts = tally_column(&df, self.name(), GENDER_COLUMN, is_valid_gender)?;
        Ok((df, counts.to_report()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::frame;
    use crate::error::PipelineError;
    use serde_json::json;

    #[test]
    fn test_exact_codes_only() -> Result<()> {
        let df = frame(json!([
            {"Gender": "M"},
            {"Gender": "F"},
            {"Gender": "m"},
            {"Gender": " M"},
            {"Gender": "Female"},
            {"Gender": ""},
            {"Gender": null}
        ]));
        let (_, report) = GenderValidityCheck.run(df)?;

        assert_eq!(
            report.to_value(),
            json!([
                {"Category": "Valid", "Count": 2},
                {"Category": "Invalid", "Count": 3},
                {"Category": "Missing", "Count": 2}
            ])
        );
        Ok(())
    }

    #[test]
    fn test_running_twice_gives_the_same_report() -> Result<()> {
        let df = frame(json!([{"Gender": "F"}, {"Gender": "X"}]));
        let (df, first) = GenderValidityCheck.run(df)?;
        let (_, second) = GenderValidityCheck.run(df)?;

        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_missing_gender_column_is_an_error() {
        let err = GenderValidityCheck.run(frame(json!([{"ID": 1}]))).unwrap_err();
        assert_eq!(err.status(), 400);
        assert!(matches!(err, PipelineError::MissingColumn { .. }));
    }
}
