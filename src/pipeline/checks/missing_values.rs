//! Per-column missing-value percentage against a tolerance.

use crate::error::Result;
use crate::pipeline::check::{Check, CheckReport, record};
use polars::prelude::DataFrame;
use serde_json::{Number, Value};
use tracing::warn;

/// Tolerable missing percentage for one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Tolerance {
    pub column: String,
    /// Echoed verbatim into the report.
    pub tolerable_percent: Number,
}

impl Tolerance {
    fn limit(&self) -> f64 {
        self.tolerable_percent.as_f64().unwrap_or(f64::INFINITY)
    }
}

/// Flags columns whose share of missing cells exceeds their tolerance.
///
/// Only configured columns are inspected. A configured column that the
/// dataset lacks is skipped with a warning. Empty strings are values, not
/// missing cells.
#[derive(Debug, Clone, Default)]
pub struct MissingValuesCheck {
    tolerances: Vec<Tolerance>,
}

impl MissingValuesCheck {
    pub fn new<S: Into<String>>(tolerances: impl IntoIterator<Item = (S, i64)>) -> Self {
        Self {
            tolerances: tolerances
                .into_iter()
                .map(|(column, pct)| Tolerance {
                    column: column.into(),
                    tolerable_percent: Number::from(pct),
                })
                .collect(),
        }
    }

    /// Decode `{"column": percent, ...}`. Absent or `null` means no columns.
    pub fn from_config(config: Option<&Value>) -> std::result::Result<Self, String> {
        let entries = match config {
            None | Some(Value::Null) => return Ok(Self::default()),
            Some(Value::Object(entries)) => entries,
            Some(other) => {
                return Err(format!(
                    "expected an object mapping column names to tolerable percentages, got {other}"
                ));
            }
        };

        let tolerances = entries
            .iter()
            .map(|(column, value)| match value {
                Value::Number(pct) => Ok(Tolerance {
                    column: column.clone(),
                    tolerable_percent: pct.clone(),
                }),
                other => Err(format!(
                    "tolerance for column '{column}' must be a number, got {other}"
                )),
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self { tolerances })
    }

    pub fn tolerances(&self) -> &[Tolerance] {
        &self.tolerances
    }
}

/// `round(100 * nulls / rows)`, rounding halves to even. An empty dataset is 0%.
pub fn null_percent(nulls: usize, rows: usize) -> u64 {
    if rows == 0 {
        return 0;
    }
    (nulls as f64 * 100.0 / rows as f64).round_ties_even() as u64
}

impl Check for MissingValuesCheck {
    fn name(&self) -> &'static str {
        super::MISSING_VALUES
    }

    fn run(&self, df: DataFrame) -> Result<(DataFrame, CheckReport)> {
        let rows = df.height();
        let mut report = CheckReport::default();

        for tolerance in &self.tolerances {
            let Ok(column) = df.column(&tolerance.column) else {
                warn!("Column '{}' not found in the dataset.", tolerance.column);
                continue;
            };

            let pct = null_percent(column.null_count(), rows);
            report.push(record([
                ("Column", Value::from(tolerance.column.as_str())),
                ("Null Tolerance (%)", Value::from(pct)),
                ("Tolerable (%)", Value::Number(tolerance.tolerable_percent.clone())),
                ("Exceeds Tolerance", Value::from(pct as f64 > tolerance.limit())),
            ]));
        }

        Ok((df, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::frame;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn ages(missing: usize, total: usize) -> DataFrame {
        let rows: Vec<Value> = (0..total)
            .map(|i| {
                if i < missing {
                    json!({"Age": null})
                } else {
                    json!({"Age": 30})
                }
            })
            .collect();
        frame(Value::Array(rows))
    }

    #[test]
    fn test_percentage_exceeds_tolerance() -> Result<()> {
        let check = MissingValuesCheck::new([("Age", 20)]);
        let (_, report) = check.run(ages(3, 10))?;

        assert_eq!(
            report.to_value(),
            json!([{
                "Column": "Age",
                "Null Tolerance (%)": 30,
                "Tolerable (%)": 20,
                "Exceeds Tolerance": true
            }])
        );
        Ok(())
    }

    #[test]
    fn test_equal_to_tolerance_does_not_exceed() -> Result<()> {
        let check = MissingValuesCheck::new([("Age", 30)]);
        let (_, report) = check.run(ages(3, 10))?;

        assert_eq!(report.records()[0]["Exceeds Tolerance"], json!(false));
        Ok(())
    }

    #[test]
    fn test_unknown_columns_are_skipped() -> Result<()> {
        let check = MissingValuesCheck::new([("Height", 5), ("Age", 0)]);
        let (_, report) = check.run(ages(0, 4))?;

        assert_eq!(report.len(), 1);
        assert_eq!(report.records()[0]["Column"], json!("Age"));
        Ok(())
    }

    #[test]
    fn test_report_follows_configured_column_order() -> Result<()> {
        let df = frame(json!([{"ID": 1, "Name": null, "Age": null}]));
        let config = json!({"Name": 3, "ID": 0, "Age": 2});
        let check = MissingValuesCheck::from_config(Some(&config)).expect("config");
        let (_, report) = check.run(df)?;

        let columns: Vec<&Value> = report.records().iter().map(|r| &r["Column"]).collect();
        assert_eq!(columns, [&json!("Name"), &json!("ID"), &json!("Age")]);
        Ok(())
    }

    #[test]
    fn test_empty_dataset_is_zero_percent() -> Result<()> {
        let df = frame(json!([{"Age": 1}])).head(Some(0));
        let check = MissingValuesCheck::new([("Age", 0)]);
        let (_, report) = check.run(df)?;

        assert_eq!(report.records()[0]["Null Tolerance (%)"], json!(0));
        assert_eq!(report.records()[0]["Exceeds Tolerance"], json!(false));
        Ok(())
    }

    #[test]
    fn test_rounding_halves_to_even() {
        assert_eq!(null_percent(1, 8), 12);
        assert_eq!(null_percent(3, 8), 38);
        assert_eq!(null_percent(1, 3), 33);
        assert_eq!(null_percent(2, 3), 67);
        assert_eq!(null_percent(0, 0), 0);
    }

    #[test]
    fn test_dataset_is_returned_unchanged() -> Result<()> {
        let df = ages(2, 5);
        let (out, _) = MissingValuesCheck::new([("Age", 10)]).run(df.clone())?;
        assert!(out.equals_missing(&df));
        Ok(())
    }

    #[test]
    fn test_fractional_tolerance_is_echoed() -> Result<()> {
        let config = json!({"Age": 29.5});
        let check = MissingValuesCheck::from_config(Some(&config)).expect("config");
        let (_, report) = check.run(ages(3, 10))?;

        assert_eq!(report.records()[0]["Tolerable (%)"], json!(29.5));
        assert_eq!(report.records()[0]["Exceeds Tolerance"], json!(true));
        Ok(())
    }

    #[test]
    fn test_malformed_config_is_rejected() {
        assert!(MissingValuesCheck::from_config(Some(&json!(["Age"]))).is_err());
        assert!(MissingValuesCheck::from_config(Some(&json!({"Age": "high"}))).is_err());
        assert!(MissingValuesCheck::from_config(None).is_ok());
    }
}
