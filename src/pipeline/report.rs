//! Report assembly for callers.
//!
//! The caller-facing shape is a list of single-key objects, `{task: report}`,
//! in execution order. A list rather than a map because the same task may run
//! more than once.

use super::check::CheckReport;
use super::executor::PipelineRun;
use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const SUCCESS_MESSAGE: &str = "Pipeline executed successfully";

/// One `{task_name: report}` entry.
pub type TaskReport = Map<String, Value>;

/// Turn `(task, report)` pairs into single-key objects, preserving order.
pub fn assemble<'a>(
    reports: impl IntoIterator<Item = &'a (String, CheckReport)>,
) -> Vec<TaskReport> {
    reports
        .into_iter()
        .map(|(task, report)| {
            let mut entry = Map::with_capacity(1);
            entry.insert(task.clone(), report.to_value());
            entry
        })
        .collect()
}

/// Success envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResponse {
    pub success: bool,
    pub message: String,
    pub reports: Vec<TaskReport>,
}

impl RunResponse {
    pub fn from_run(run: &PipelineRun) -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_owned(),
            reports: assemble(&run.reports),
        }
    }
}

/// Failure envelope. Internal faults carry only the generic message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl From<&PipelineError> for ErrorResponse {
    fn from(err: &PipelineError) -> Self {
        Self {
            success: false,
            error: err.public_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::check::record;
    use polars::prelude::DataFrame;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;

    fn report(total: u64) -> CheckReport {
        CheckReport::new(vec![record([("Total Duplicate Rows", json!(total))])])
    }

    #[test]
    fn test_assemble_keeps_order_and_repeats() {
        let pairs = vec![
            ("duplicate_rows".to_owned(), report(2)),
            ("email_validity".to_owned(), CheckReport::default()),
            ("duplicate_rows".to_owned(), report(0)),
        ];

        let assembled = serde_json::to_value(assemble(&pairs)).expect("serialize");
        assert_eq!(
            assembled,
            json!([
                {"duplicate_rows": [{"Total Duplicate Rows": 2}]},
                {"email_validity": []},
                {"duplicate_rows": [{"Total Duplicate Rows": 0}]}
            ])
        );
    }

    #[test]
    fn test_success_envelope() {
        let run = PipelineRun {
            dataset: DataFrame::empty(),
            reports: vec![("duplicate_rows".to_owned(), report(1))],
            duration: Duration::ZERO,
        };

        let body = serde_json::to_value(RunResponse::from_run(&run)).expect("serialize");
        assert_eq!(body["message"], json!(SUCCESS_MESSAGE));
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["reports"][0]["duplicate_rows"][0]["Total Duplicate Rows"], json!(1));
    }

    #[test]
    fn test_error_envelope_hides_internal_detail() {
        let err = PipelineError::InvalidConfig {
            task: "missing_values".to_owned(),
            reason: "secret detail".to_owned(),
        };
        let body = ErrorResponse::from(&err);

        assert!(!body.success);
        assert_eq!(body.error, "Internal Server Error");
    }
}
