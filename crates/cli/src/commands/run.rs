// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ripple run` — execute a fleet rollout with in-process workers.
//!
//! One worker per target server is registered on the local runtime, each
//! bound to the task queue named after its server, then the
//! orchestration workflow drives the rollout.

use anyhow::Result;
use ripple_core::OrchestrationResult;
use ripple_engine::{LocalRuntime, OrchestrationError};
use ripple_steps::HandlerRegistry;
use std::path::Path;
use std::sync::Arc;

use crate::ExitError;

pub async fn handle(path: &Path, pretty: bool) -> Result<()> {
    let request = super::load_request(path)?;

    let runtime = LocalRuntime::new();
    let registry = Arc::new(HandlerRegistry::with_builtins());
    for server in &request.servers {
        runtime.register_server(server, registry.clone());
    }

    match runtime.run_orchestration(request).await {
        Ok(result) => {
            super::print_json(&result, pretty)?;
            if result.success {
                Ok(())
            } else {
                Err(ExitError::failed("rollout completed with failures").into())
            }
        }
        Err(OrchestrationError::Validation(err)) => {
            Err(ExitError::rejected(format!("step validation failed: {err}")).into())
        }
        Err(OrchestrationError::FailureBudgetExceeded { failures, max_failures, results }) => {
            // surface the collected results alongside the abort
            super::print_json(&OrchestrationResult::tally(results), pretty)?;
            Err(ExitError::failed(format!(
                "rollout aborted: exceeded max failures: {failures} > {max_failures}"
            ))
            .into())
        }
        Err(err) => Err(err.into()),
    }
}
