//! Error taxonomy for pipeline runs.
//!
//! Every failure a caller can observe is a [`PipelineError`]. Each variant maps
//! onto an HTTP-equivalent status through [`PipelineError::status`]: caller
//! mistakes are `400` (`413` for an oversized upload), anything unexpected is
//! an opaque `500`.
//!
//! ```
//! use tabcheck::error::PipelineError;
//!
//! let err = PipelineError::MissingColumn {
//!     check: "email_validity".to_owned(),
//!     column: "Email".to_owned(),
//! };
//! assert_eq!(err.status(), 400);
//! assert!(!err.is_internal());
//! ```
//!
//! Helpers outside the engine (config files, logging setup) use
//! `anyhow::Result` with `.context(...)` instead.

use polars::error::PolarsError;

/// Message returned to callers in place of any internal fault detail.
pub const INTERNAL_FAULT_MESSAGE: &str = "Internal Server Error";

/// Main error type for pipeline operations.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Caller input is structurally invalid; the run never starts.
    #[error("{0}")]
    InputFormat(String),

    /// Request body exceeds the configured upload limit.
    #[error("{0}")]
    PayloadTooLarge(String),

    /// A column a check requires is absent from the dataset.
    #[error("Column '{column}' required by '{check}' not found in the dataset")]
    MissingColumn { check: String, column: String },

    /// A requested task has no registered check.
    #[error("Unknown task '{0}'")]
    UnknownTask(String),

    /// A task's configuration payload could not be decoded.
    #[error("Invalid configuration for task '{task}': {reason}")]
    InvalidConfig { task: String, reason: String },

    /// A step failed; carries its 0-based position and task name.
    #[error("Step {} ({task}) failed: {source}", .index + 1)]
    StepFailed {
        index: usize,
        task: String,
        #[source]
        source: Box<PipelineError>,
    },

    /// Dataframe engine failure.
    #[error("Data processing error: {0}")]
    Data(#[from] PolarsError),
}

impl PipelineError {
    /// HTTP-equivalent status code for this failure.
    pub fn status(&self) -> u16 {
        match self {
            Self::InputFormat(_) | Self::MissingColumn { .. } | Self::UnknownTask(_) => 400,
            Self::PayloadTooLarge(_) => 413,
            Self::StepFailed { source, .. } => source.status(),
            Self::InvalidConfig { .. } | Self::Data(_) => 500,
        }
    }

    /// Whether the failure is an internal fault rather than a caller error.
    pub fn is_internal(&self) -> bool {
        self.status() >= 500
    }

    /// Message safe to hand back to a caller.
    ///
    /// Internal faults are collapsed to [`INTERNAL_FAULT_MESSAGE`]; their detail
    /// only goes to the log.
    pub fn public_message(&self) -> String {
        if self.is_internal() {
            INTERNAL_FAULT_MESSAGE.to_owned()
        } else {
            self.to_string()
        }
    }

    /// The innermost error, looking through [`PipelineError::StepFailed`].
    pub fn root(&self) -> &Self {
        match self {
            Self::StepFailed { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
