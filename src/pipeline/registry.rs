//! Name → factory lookup for checks.
//!
//! The registry is the only place that knows which check a task name refers
//! to and where its configuration comes from. Adding a check kind means one
//! more [`CheckRegistry::register`] call; the pipeline and the request
//! boundary stay untouched.
//!
//! ```
//! use tabcheck::pipeline::CheckRegistry;
//!
//! let registry = CheckRegistry::builtin();
//! assert!(registry.resolve("email_validity", None).is_some());
//! assert!(registry.resolve("spellcheck", None).is_none());
//! ```

use super::check::Check;
use super::checks::{
    DUPLICATE_ROWS, DuplicateRowsCheck, EMAIL_VALIDITY, EmailValidityCheck, GENDER_VALIDITY,
    GenderValidityCheck, MISSING_VALUES, MissingValuesCheck,
};
use crate::error::{PipelineError, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Request parameter carrying the `missing_values` tolerance map.
pub const TOLERANCE_PARAM: &str = "tolerance_dict";

/// Request parameter carrying the `duplicate_rows` key columns.
pub const DUPLICATE_COLUMNS_PARAM: &str = "columns_for_duplicates";

/// Builds a configured check from its (optional) configuration payload.
pub type CheckFactory =
    Box<dyn Fn(Option<&Value>) -> std::result::Result<Box<dyn Check>, String> + Send + Sync>;

struct Registration {
    config_param: Option<&'static str>,
    factory: CheckFactory,
}

#[derive(Default)]
pub struct CheckRegistry {
    entries: BTreeMap<String, Registration>,
}

impl fmt::Debug for CheckRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckRegistry")
            .field("checks", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CheckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the four built-in checks.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry
            .register(MISSING_VALUES, Some(TOLERANCE_PARAM), |config| {
                MissingValuesCheck::from_config(config).map(|c| Box::new(c) as Box<dyn Check>)
            })
            .register(DUPLICATE_ROWS, Some(DUPLICATE_COLUMNS_PARAM), |config| {
                DuplicateRowsCheck::from_config(config).map(|c| Box::new(c) as Box<dyn Check>)
            })
            .register(EMAIL_VALIDITY, None, |_| Ok(Box::new(EmailValidityCheck)))
            .register(GENDER_VALIDITY, None, |_| Ok(Box::new(GenderValidityCheck)));
        registry
    }

    /// Register `factory` under `name`, replacing any previous entry.
    ///
    /// `config_param` names the request parameter whose value is handed to the
    /// factory; `None` for checks without configuration.
    pub fn register<F>(
        &mut self,
        name: impl Into<String>,
        config_param: Option<&'static str>,
        factory: F,
    ) -> &mut Self
    where
        F: Fn(Option<&Value>) -> std::result::Result<Box<dyn Check>, String>
            + Send
            + Sync
            + 'static,
    {
        self.entries.insert(
            name.into(),
            Registration {
                config_param,
                factory: Box::new(factory),
            },
        );
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered task names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Request parameter feeding the configuration of `name`.
    pub fn config_param(&self, name: &str) -> Option<&'static str> {
        self.entries.get(name).and_then(|entry| entry.config_param)
    }

    /// Every request parameter some registered check reads, deduplicated.
    pub fn config_params(&self) -> Vec<&'static str> {
        let mut params: Vec<&'static str> = self
            .entries
            .values()
            .filter_map(|entry| entry.config_param)
            .collect();
        params.sort_unstable();
        params.dedup();
        params
    }

    /// Instantiate the check registered as `name`.
    ///
    /// Returns `None` when nothing is registered under `name`, and
    /// `Some(Err(InvalidConfig))` when the payload does not decode.
    pub fn resolve(&self, name: &str, config: Option<&Value>) -> Option<Result<Box<dyn Check>>> {
        let entry = self.entries.get(name)?;
        Some(
            (entry.factory)(config).map_err(|reason| PipelineError::InvalidConfig {
                task: name.to_owned(),
                reason,
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::check::CheckReport;
    use polars::prelude::DataFrame;
    use serde_json::json;

    #[derive(Debug)]
    struct RowCount;

    impl Check for RowCount {
        fn name(&self) -> &'static str {
            "row_count"
        }

        fn run(&self, df: DataFrame) -> Result<(DataFrame, CheckReport)> {
            let report = CheckReport::new(vec![crate::pipeline::check::record([(
                "Rows",
                json!(df.height()),
            )])]);
            Ok((df, report))
        }
    }

    #[test]
    fn test_builtin_names() {
        let registry = CheckRegistry::builtin();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(
            names,
            [
                "duplicate_rows",
                "email_validity",
                "gender_string_validity",
                "missing_values"
            ]
        );
    }

    #[test]
    fn test_unknown_name_resolves_to_none() {
        assert!(CheckRegistry::builtin().resolve("typo_check", None).is_none());
    }

    #[test]
    fn test_bad_config_is_reported_with_task_name() {
        let registry = CheckRegistry::builtin();
        let resolved = registry
            .resolve("missing_values", Some(&json!("Age")))
            .expect("registered");

        match resolved {
            Err(PipelineError::InvalidConfig { task, .. }) => assert_eq!(task, "missing_values"),
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn test_config_params_come_from_registrations() {
        let registry = CheckRegistry::builtin();
        assert_eq!(
            registry.config_params(),
            [DUPLICATE_COLUMNS_PARAM, TOLERANCE_PARAM]
        );
        assert_eq!(registry.config_param("email_validity"), None);
        assert_eq!(
            registry.config_param("missing_values"),
            Some(TOLERANCE_PARAM)
        );
    }

    #[test]
    fn test_new_checks_register_without_other_changes() {
        let mut registry = CheckRegistry::builtin();
        registry.register("row_count", None, |_| Ok(Box::new(RowCount)));

        let check = registry
            .resolve("row_count", None)
            .expect("registered")
            .expect("configured");
        assert_eq!(check.name(), "row_count");
    }
}
