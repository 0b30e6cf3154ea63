// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! `ripple` — fleet rollout orchestrator CLI.
//!
//! Single-node entry points over the bundled local runtime: `validate` a
//! request, `run` a fleet rollout with in-process per-server workers, or
//! `exec` the step pipeline for this machine only.

mod commands;
mod env;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Maps a failed command to its process exit code: 2 for a request
/// rejected before any work was dispatched, 1 for a rollout that ran
/// and failed. Commands return this instead of exiting themselves so
/// `main()` stays the only place that terminates the process.
#[derive(Debug)]
pub(crate) struct ExitError {
    pub(crate) code: i32,
    pub(crate) message: String,
}

impl ExitError {
    /// The request never made it past validation or parsing.
    pub(crate) fn rejected(message: impl Into<String>) -> Self {
        Self { code: 2, message: message.into() }
    }

    /// Work was dispatched and came back failed or aborted.
    pub(crate) fn failed(message: impl Into<String>) -> Self {
        Self { code: 1, message: message.into() }
    }
}

impl std::fmt::Display for ExitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ExitError {}

#[derive(Parser)]
#[command(name = "ripple", version, about = "Fleet rollout orchestrator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a rollout request without dispatching any work
    Validate {
        /// Path to an ExecutionRequest JSON file
        request: PathBuf,
    },
    /// Execute a rollout across all target servers (in-process workers)
    Run {
        /// Path to an ExecutionRequest JSON file
        request: PathBuf,
        /// Pretty-print the orchestration result
        #[arg(long)]
        pretty: bool,
    },
    /// Run the step pipeline for a single server on this machine
    Exec {
        /// Path to an ExecutionRequest JSON file (only the steps are used)
        request: PathBuf,
        /// Server identity (defaults to $SERVER_ID, then "dev-local")
        #[arg(long)]
        server: Option<String>,
        /// Pretty-print the execution result
        #[arg(long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Validate { request } => commands::validate::handle(&request),
        Command::Run { request, pretty } => commands::run::handle(&request, pretty).await,
        Command::Exec { request, server, pretty } => {
            commands::exec::handle(&request, server.as_deref(), pretty).await
        }
    };

    if let Err(err) = result {
        match err.downcast_ref::<ExitError>() {
            Some(exit) => {
                eprintln!("{}", exit.message);
                std::process::exit(exit.code);
            }
            None => {
                eprintln!("error: {err:#}");
                std::process::exit(1);
            }
        }
    }
}

/// Logging goes to stderr so stdout stays parseable JSON.
/// Filter precedence: RIPPLE_LOG > RUST_LOG > "warn".
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("RIPPLE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
