//! # tabcheck - tabular data-quality validation
//!
//! Runs a caller-chosen sequence of data-quality checks over an in-memory
//! table and returns one report per check, in the order requested.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::collections::HashMap;
//! use tabcheck::pipeline::{CheckRegistry, UnknownTaskPolicy};
//! use tabcheck::service::{self, RunRequest};
//!
//! let registry = CheckRegistry::builtin();
//! let fields = HashMap::from([
//!     ("tasks".to_owned(), r#"["duplicate_rows", "email_validity"]"#.to_owned()),
//!     ("columns_for_duplicates".to_owned(), r#"["ID"]"#.to_owned()),
//! ]);
//! let data: &[u8] = br#"{"data": [{"ID": 1, "Email": "a@b.com"}, {"ID": 1, "Email": "nope"}]}"#;
//!
//! let request = RunRequest::parse(Some(data), &fields, &registry)?;
//! let response = service::execute(request, &registry, UnknownTaskPolicy::Reject)?;
//! println!("{}", serde_json::to_string_pretty(&response)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Core Modules
//!
//! - [`dataset`]: building a polars `DataFrame` from a list of JSON records
//! - [`pipeline`]: the check trait, built-in checks, registry, executor, reports
//! - [`service`]: request parsing shared by the HTTP service and the CLI
//! - [`server`]: axum router for `POST /run_pipeline`
//! - [`error`]: error taxonomy and status mapping
//! - [`config`], [`logging`]: application configuration and tracing setup
//!
//! ## Built-in checks
//!
//! | Task | Configuration parameter | Report |
//! |------|-------------------------|--------|
//! | `missing_values` | `tolerance_dict` | one record per configured column |
//! | `duplicate_rows` | `columns_for_duplicates` | total rows in duplicate groups |
//! | `email_validity` | | Valid / Invalid / Missing counts of `Email` |
//! | `gender_string_validity` | | Valid / Invalid / Missing counts of `Gender` |

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod dataset;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod server;
pub mod service;
