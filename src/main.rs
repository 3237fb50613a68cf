//! # tabcheck entry point
//!
//! ```text
//! main()
//!   ├─> Parse CLI arguments (clap)
//!   ├─> Load config file + environment overrides
//!   ├─> Install tracing subscriber
//!   └─> serve: Tokio runtime running the HTTP service
//!       run:   one local pipeline run, JSON envelope on stdout
//! ```
//!
//! `run` exits with status 1 when the pipeline fails, after printing the
//! error envelope.

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout)] // the run command's output is its JSON envelope

mod cli;

use anyhow::{Context as _, Result};
use clap::Parser as _;
use cli::{Cli, Commands, RunOutcome};
use std::process::ExitCode;
use tabcheck::config::AppConfig;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply_to(&mut config);
    tabcheck::logging::init(&config)?;

    match cli.command {
        Commands::Serve { .. } => {
            tokio::runtime::Runtime::new()
                .context("Failed to start Tokio runtime")?
                .block_on(cli::serve(&config))?;
            Ok(ExitCode::SUCCESS)
        }
        command @ Commands::Run { .. } => match cli::run_command(command, &config)? {
            RunOutcome::Success(response) => {
                println!("{}", serde_json::to_string_pretty(&response)?);
                Ok(ExitCode::SUCCESS)
            }
            RunOutcome::Failure(envelope) => {
                println!("{}", serde_json::to_string_pretty(&envelope)?);
                Ok(ExitCode::FAILURE)
            }
        },
    }
}
