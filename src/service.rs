//! Request boundary between a transport (HTTP, CLI) and the engine.
//!
//! A request carries the data document, a JSON-encoded task list, and one
//! JSON-encoded field per configuration parameter the registry knows about.
//! This module only parses and delegates: which parameter feeds which check
//! is the registry's business.

use crate::dataset;
use crate::error::{PipelineError, Result};
use crate::pipeline::{CheckRegistry, Pipeline, RunResponse, TaskSpec, UnknownTaskPolicy};
use polars::prelude::DataFrame;
use serde_json::Value;
use std::collections::HashMap;
use tracing::info;

/// Multipart part holding the data document.
pub const DATA_FIELD: &str = "file";

/// Form field holding the JSON task list.
pub const TASKS_FIELD: &str = "tasks";

const MISSING_DATA: &str = "Invalid input format. Expected a JSON file for data.";
const MISSING_TASKS: &str = "Invalid input format. Expected tasks in form-data.";

/// A parsed run request.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub dataset: DataFrame,
    pub tasks: Vec<String>,
    /// Decoded configuration payloads keyed by parameter name.
    pub params: HashMap<String, Value>,
}

impl RunRequest {
    /// Parse raw request parts.
    ///
    /// `data` is the uploaded document; `fields` are the remaining text fields.
    /// Fields the registry does not read are ignored.
    ///
    /// # Errors
    ///
    /// [`PipelineError::InputFormat`] for a missing or malformed data document
    /// or task list; [`PipelineError::InvalidConfig`] for a configuration field
    /// that is not JSON.
    pub fn parse(
        data: Option<&[u8]>,
        fields: &HashMap<String, String>,
        registry: &CheckRegistry,
    ) -> Result<Self> {
        let data = data.ok_or_else(|| PipelineError::InputFormat(MISSING_DATA.to_owned()))?;
        let dataset = dataset::from_json_document(data)?;

        let tasks = fields
            .get(TASKS_FIELD)
            .ok_or_else(|| PipelineError::InputFormat(MISSING_TASKS.to_owned()))?;
        let tasks = parse_task_list(tasks)?;

        let mut params = HashMap::new();
        for param in registry.config_params() {
            if let Some(raw) = fields.get(param) {
                let value = serde_json::from_str(raw).map_err(|e| PipelineError::InvalidConfig {
                    task: param.to_owned(),
                    reason: format!("'{param}' is not valid JSON: {e}"),
                })?;
                params.insert(param.to_owned(), value);
            }
        }

        Ok(Self {
            dataset,
            tasks,
            params,
        })
    }

    /// Pair each task with the configuration its registration reads.
    pub fn task_specs(&self, registry: &CheckRegistry) -> Vec<TaskSpec> {
        self.tasks
            .iter()
            .map(|name| TaskSpec {
                name: name.clone(),
                config: registry
                    .config_param(name)
                    .and_then(|param| self.params.get(param))
                    .cloned(),
            })
            .collect()
    }
}

fn parse_task_list(raw: &str) -> Result<Vec<String>> {
    serde_json::from_str(raw).map_err(|e| {
        PipelineError::InputFormat(format!(
            "Invalid input format. Tasks must be a JSON list of task names: {e}"
        ))
    })
}

/// Run a parsed request end to end.
pub fn execute(
    request: RunRequest,
    registry: &CheckRegistry,
    policy: UnknownTaskPolicy,
) -> Result<RunResponse> {
    let tasks = request.task_specs(registry);
    let pipeline = Pipeline::from_tasks(registry, &tasks, policy)?;
    let run = pipeline.run(request.dataset)?;
    info!("{}", run.summary());
    Ok(RunResponse::from_run(&run))
}
