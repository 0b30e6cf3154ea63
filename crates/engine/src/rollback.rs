// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-server rollback workflow: reverse-order compensation.

use ripple_core::{ActivityOptions, RollbackInput, RollbackStepArgs, ROLLBACK_STEP_ACTIVITY};

use crate::context::WorkflowContext;
use crate::runtime::RuntimeError;

/// Compensate previously executed steps, walking the executed list in
/// reverse. Rollback is best-effort: individual failures are logged and
/// the walk continues.
pub async fn server_rollback_workflow(ctx: &WorkflowContext, input: RollbackInput) {
    tracing::info!(
        server = %input.server_id,
        steps = input.executed_steps.len(),
        "starting rollback workflow"
    );

    for entry in input.executed_steps.iter().rev() {
        tracing::info!(step = %entry.step.name, "rolling back step");

        let args = RollbackStepArgs {
            server_id: input.server_id.clone(),
            step: entry.step.clone(),
            metadata: entry.metadata.clone(),
        };
        let outcome: Result<(), RuntimeError> = ctx
            .execute_activity(ROLLBACK_STEP_ACTIVITY, &args, ActivityOptions::default())
            .await;

        if let Err(err) = outcome {
            tracing::warn!(step = %entry.step.name, error = %err, "rollback step failed");
        }
    }

    tracing::info!(server = %input.server_id, "rollback workflow completed");
}

#[cfg(test)]
#[path = "rollback_tests.rs"]
mod tests;
