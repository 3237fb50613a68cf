//! Pipeline specification data structures.
//!
//! A spec is the ordered list of tasks for one run, each with its own
//! configuration payload. It can be loaded from a JSON file:
//!
//! ```json
//! {
//!   "version": "0.1",
//!   "tasks": [
//!     { "name": "duplicate_rows", "config": ["ID", "Name"] },
//!     { "name": "missing_values", "config": { "Age": 20 } },
//!     { "name": "email_validity" }
//!   ]
//! }
//! ```

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Current pipeline spec version
pub const SPEC_VERSION: &str = "0.1";

/// Root pipeline specification structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSpec {
    /// Specification version for future migrations
    #[serde(default = "default_version")]
    pub version: String,

    /// Tasks in execution order
    pub tasks: Vec<TaskSpec>,
}

impl PipelineSpec {
    pub fn new(tasks: Vec<TaskSpec>) -> Self {
        Self {
            version: SPEC_VERSION.to_owned(),
            tasks,
        }
    }

    /// Load a pipeline spec from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read pipeline spec file")?;
        Self::from_json(&content)
    }

    /// Parse a pipeline spec from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let spec: Self = serde_json::from_str(json).context("Failed to parse pipeline spec JSON")?;
        if spec.version != SPEC_VERSION {
            anyhow::bail!(
                "Unsupported spec version '{}', expected '{SPEC_VERSION}'",
                spec.version
            );
        }
        Ok(spec)
    }

    /// Serialize pipeline spec to JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize pipeline spec")
    }
}

/// One requested task: a registry name plus its configuration payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
}

impl TaskSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: None,
        }
    }

    pub fn with_config(name: impl Into<String>, config: Value) -> Self {
        Self {
            name: name.into(),
            config: Some(config),
        }
    }
}

fn default_version() -> String {
    SPEC_VERSION.to_owned()
}
