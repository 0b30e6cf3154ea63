// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ripple exec` — run a request's step pipeline on this machine only.
//!
//! The local-worker role: identity comes from `--server`, falling back
//! to `$SERVER_ID`.

use anyhow::Result;
use ripple_core::{ExecutionInput, ServerId};
use ripple_engine::LocalRuntime;
use ripple_steps::{validate_steps, HandlerRegistry};
use std::path::Path;
use std::sync::Arc;

use crate::ExitError;

pub async fn handle(path: &Path, server: Option<&str>, pretty: bool) -> Result<()> {
    let request = super::load_request(path)?;

    validate_steps(&request.steps)
        .map_err(|err| ExitError::rejected(format!("step validation failed: {err}")))?;

    let server_id = ServerId::new(match server {
        Some(server) => server.to_string(),
        None => crate::env::server_id(),
    });

    let runtime = LocalRuntime::new();
    runtime.register_server(&server_id, Arc::new(HandlerRegistry::with_builtins()));

    let result = runtime
        .run_execution(ExecutionInput { server_id, steps: request.steps })
        .await;
    super::print_json(&result, pretty)?;

    if result.success {
        Ok(())
    } else {
        let message = result.error.unwrap_or_else(|| "execution failed".to_string());
        Err(ExitError::failed(message).into())
    }
}
