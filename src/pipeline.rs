//! Validation pipeline engine.
//!
//! A pipeline is an ordered list of configured [`Check`]s. Each check consumes
//! the dataset, may hand back a transformed one, and emits a [`CheckReport`].
//!
//! # Overview
//!
//! - [`CheckRegistry`] maps task names to check factories
//! - [`Pipeline`] runs the resolved checks in caller order, failing fast
//! - [`report::assemble`] shapes the results as `[{task: report}, ...]`
//!
//! # Example
//!
//! ```no_run
//! use serde_json::json;
//! use tabcheck::dataset;
//! use tabcheck::pipeline::{CheckRegistry, Pipeline, RunResponse, TaskSpec, UnknownTaskPolicy};
//!
//! let df = dataset::from_json_document(br#"{"data": [{"Email": "a@b.com"}]}"#)?;
//! let tasks = [
//!     TaskSpec::new("email_validity"),
//!     TaskSpec::with_config("missing_values", json!({"Email": 0})),
//! ];
//!
//! let pipeline = Pipeline::from_tasks(&CheckRegistry::builtin(), &tasks, UnknownTaskPolicy::Reject)?;
//! let run = pipeline.run(df)?;
//! println!("{}", serde_json::to_string_pretty(&RunResponse::from_run(&run))?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod check;
pub mod checks;
pub mod executor;
pub mod registry;
pub mod report;
pub mod spec;

pub use check::{Check, CheckReport, ReportRecord};
pub use executor::{Pipeline, PipelineRun, UnknownTaskPolicy};
pub use registry::{CheckFactory, CheckRegistry};
pub use report::{ErrorResponse, RunResponse, TaskReport, assemble};
pub use spec::{PipelineSpec, SPEC_VERSION, TaskSpec};
