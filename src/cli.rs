use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tabcheck::config::AppConfig;
use tabcheck::error::PipelineError;
use tabcheck::pipeline::{
    CheckRegistry, ErrorResponse, Pipeline, PipelineSpec, RunResponse, UnknownTaskPolicy,
};
use tabcheck::pipeline::registry::{DUPLICATE_COLUMNS_PARAM, TOLERANCE_PARAM};
use tabcheck::{dataset, server, service};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "tabcheck", version, about = "Tabular data-quality validation pipeline")]
pub struct Cli {
    /// Path to a JSON configuration file
    #[arg(long, global = true, env = "TABCHECK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP service
    Serve {
        /// Listen address, overrides the config file
        #[arg(long)]
        bind: Option<String>,
    },
    /// Execute one pipeline run locally and print the JSON result
    Run {
        /// Data document, `{"data": [...]}`
        #[arg(short, long)]
        file: PathBuf,

        /// Task names as a JSON list, e.g. '["duplicate_rows", "email_validity"]'
        #[arg(short, long, conflicts_with = "spec")]
        tasks: Option<String>,

        /// Tolerable missing percentages as a JSON object, e.g. '{"Age": 20}'
        #[arg(long, conflicts_with = "spec")]
        tolerance: Option<String>,

        /// Key columns for duplicate detection as a JSON list
        #[arg(long, conflicts_with = "spec")]
        duplicate_columns: Option<String>,

        /// Pipeline spec file listing tasks with their configuration
        #[arg(long, required_unless_present = "tasks")]
        spec: Option<PathBuf>,

        /// Drop unknown task names instead of failing
        #[arg(long)]
        skip_unknown: bool,
    },
}

impl Cli {
    /// Apply command-line overrides on top of the loaded config.
    pub fn apply_to(&self, config: &mut AppConfig) {
        match &self.command {
            Commands::Serve {
                bind: Some(bind), ..
            } => config.bind_address.clone_from(bind),
            Commands::Run {
                skip_unknown: true, ..
            } => config.unknown_tasks = UnknownTaskPolicy::Skip,
            _ => {}
        }
    }
}

/// Outcome of a local run, printed as JSON on stdout.
pub enum RunOutcome {
    Success(RunResponse),
    Failure(ErrorResponse),
}

pub async fn serve(config: &AppConfig) -> Result<()> {
    server::serve(config).await
}

pub fn run_command(command: Commands, config: &AppConfig) -> Result<RunOutcome> {
    let Commands::Run {
        file,
        tasks,
        tolerance,
        duplicate_columns,
        spec,
        ..
    } = command
    else {
        anyhow::bail!("Only the run command executes locally");
    };

    let registry = CheckRegistry::builtin();
    let data = std::fs::read(&file)
        .with_context(|| format!("Failed to read data file: {}", file.display()))?;

    let result = match spec {
        Some(spec) => run_spec(&spec, &data, &registry, config.unknown_tasks)?,
        None => {
            let mut fields = HashMap::new();
            let params = [
                (service::TASKS_FIELD, tasks),
                (TOLERANCE_PARAM, tolerance),
                (DUPLICATE_COLUMNS_PARAM, duplicate_columns),
            ];
            for (name, value) in params {
                if let Some(value) = value {
                    fields.insert(name.to_owned(), value);
                }
            }
            service::RunRequest::parse(Some(data.as_slice()), &fields, &registry)
                .and_then(|request| service::execute(request, &registry, config.unknown_tasks))
        }
    };

    Ok(match result {
        Ok(response) => RunOutcome::Success(response),
        Err(err) => {
            if err.is_internal() {
                error!("Error in executing pipeline: {err}");
            }
            RunOutcome::Failure(ErrorResponse::from(&err))
        }
    })
}

/// Spec files are trusted local input, so a malformed spec is a command error
/// rather than a pipeline failure.
fn run_spec(
    path: &Path,
    data: &[u8],
    registry: &CheckRegistry,
    policy: UnknownTaskPolicy,
) -> Result<tabcheck::error::Result<RunResponse>> {
    let spec = PipelineSpec::from_file(path)
        .with_context(|| format!("Failed to load pipeline spec: {}", path.display()))?;
    info!("Loaded pipeline spec with {} tasks", spec.tasks.len());
    Ok(execute_spec(&spec, data, registry, policy))
}

fn execute_spec(
    spec: &PipelineSpec,
    data: &[u8],
    registry: &CheckRegistry,
    policy: UnknownTaskPolicy,
) -> Result<RunResponse, PipelineError> {
    let df = dataset::from_json_document(data)?;
    let pipeline = Pipeline::from_tasks(registry, &spec.tasks, policy)?;
    let run = pipeline.run(df)?;
    info!("{}", run.summary());
    Ok(RunResponse::from_run(&run))
}
