//! Pipeline execution engine.
//!
//! Runs configured checks strictly in the caller's order, threading the
//! dataset from one step to the next and collecting each step's report. The
//! first failing step aborts the run.

use super::check::{Check, CheckReport};
use super::registry::CheckRegistry;
use super::spec::TaskSpec;
use crate::error::{PipelineError, Result};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// What to do with a task name the registry does not know.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownTaskPolicy {
    /// Fail the run before any step executes.
    #[default]
    Reject,

    /// Log a warning and leave the task out of the run.
    Skip,
}

impl std::str::FromStr for UnknownTaskPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "skip" => Ok(Self::Skip),
            other => Err(format!(
                "unknown task policy '{other}', expected 'reject' or 'skip'"
            )),
        }
    }
}

#[derive(Debug)]
struct Step {
    task: String,
    check: Box<dyn Check>,
}

/// Ordered sequence of configured checks.
#[derive(Debug, Default)]
pub struct Pipeline {
    steps: Vec<Step>,
}

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    /// Dataset as left by the last step
    pub dataset: DataFrame,

    /// `(task name, report)` in execution order
    pub reports: Vec<(String, CheckReport)>,

    /// Time taken for execution
    pub duration: Duration,
}

impl PipelineRun {
    /// Create a summary message
    pub fn summary(&self) -> String {
        format!(
            "Pipeline completed: {} steps, {} rows, {} columns, {:.3}s",
            self.reports.len(),
            self.dataset.height(),
            self.dataset.width(),
            self.duration.as_secs_f64()
        )
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an already configured check.
    pub fn push(&mut self, task: impl Into<String>, check: Box<dyn Check>) -> &mut Self {
        self.steps.push(Step {
            task: task.into(),
            check,
        });
        self
    }

    /// Resolve `tasks` through `registry`, keeping their order.
    ///
    /// # Errors
    ///
    /// [`PipelineError::UnknownTask`] for an unregistered name under
    /// [`UnknownTaskPolicy::Reject`], or [`PipelineError::InvalidConfig`] when a
    /// task's configuration does not decode.
    pub fn from_tasks(
        registry: &CheckRegistry,
        tasks: &[TaskSpec],
        policy: UnknownTaskPolicy,
    ) -> Result<Self> {
        let mut pipeline = Self::new();

        for task in tasks {
            match registry.resolve(&task.name, task.config.as_ref()) {
                Some(check) => {
                    pipeline.push(task.name.clone(), check?);
                }
                None if policy == UnknownTaskPolicy::Skip => {
                    warn!("Skipping unknown task '{}'", task.name);
                }
                None => return Err(PipelineError::UnknownTask(task.name.clone())),
            }
        }

        Ok(pipeline)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn task_names(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|step| step.task.as_str())
    }

    /// Execute every step in order against `df`.
    ///
    /// Step N+1 always receives the dataset returned by step N.
    ///
    /// # Errors
    ///
    /// The first failing step aborts the run with
    /// [`PipelineError::StepFailed`] wrapping the cause.
    pub fn run(&self, df: DataFrame) -> Result<PipelineRun> {
        let start = Instant::now();
        let mut dataset = df;
        let mut reports = Vec::with_capacity(self.steps.len());

        for (index, step) in self.steps.iter().enumerate() {
            debug!(step = index + 1, task = %step.task, check = step.check.name(), "Running check");

            let (next, report) =
                step.check
                    .run(dataset)
                    .map_err(|source| PipelineError::StepFailed {
                        index,
                        task: step.task.clone(),
                        source: Box::new(source),
                    })?;
            dataset = next;

            info!(
                "Task {}: {} executed with report: {}",
                index + 1,
                step.task,
                report
            );
            reports.push((step.task.clone(), report));
        }

        Ok(PipelineRun {
            dataset,
            reports,
            duration: start.elapsed(),
        })
    }
}
