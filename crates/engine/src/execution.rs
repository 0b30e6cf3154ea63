// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-server execution workflow: the ordered step pipeline.

use ripple_core::{
    ActivityOptions, ExecuteStepArgs, ExecutionInput, ExecutionMetadata, ExecutionResult,
    StepResult, EXECUTE_STEP_ACTIVITY,
};

use crate::context::WorkflowContext;
use crate::runtime::RuntimeError;

/// Run the ordered step list on a single server.
///
/// Steps are strictly sequential. A failed step is absorbed unless it is
/// required and not marked continue-on-failure, in which case the
/// pipeline terminates with `success=false` and a truncated result list.
/// Rollback is never driven from here — the coordinator owns that policy
/// so it is uniform across failure modes.
pub async fn server_execution_workflow(
    ctx: &WorkflowContext,
    input: ExecutionInput,
) -> ExecutionResult {
    let mut result = ExecutionResult::pending(input.server_id.clone());
    tracing::info!(
        server = %input.server_id,
        steps = input.steps.len(),
        "starting execution workflow"
    );

    for (i, step) in input.steps.iter().enumerate() {
        tracing::info!(
            number = i + 1,
            step = %step.name,
            step_type = %step.step_type,
            "executing step"
        );

        let args = ExecuteStepArgs {
            server_id: input.server_id.clone(),
            step: step.clone(),
        };
        let outcome: Result<ExecutionMetadata, RuntimeError> = ctx
            .execute_activity(EXECUTE_STEP_ACTIVITY, &args, ActivityOptions::default())
            .await;

        match outcome {
            Ok(_metadata) => {
                result.steps_executed.push(StepResult::succeeded(&step.name));
            }
            Err(err) => {
                let cause = err.to_string();
                result.steps_executed.push(StepResult::failed(&step.name, &cause));

                if step.aborts_on_failure() {
                    tracing::error!(step = %step.name, error = %cause, "required step failed");
                    result.error =
                        Some(format!("Required step '{}' failed: {}", step.name, cause));
                    return result;
                }
                tracing::warn!(step = %step.name, "step failed but continuing");
            }
        }
    }

    result.success = true;
    tracing::info!(server = %input.server_id, "execution workflow completed");
    result
}

#[cfg(test)]
#[path = "execution_tests.rs"]
mod tests;
