// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Orchestration coordinator: strategy dispatch, failure budget, and
//! rollback fan-out.

use ripple_core::{
    ExecutedStep, ExecutionInput, ExecutionRequest, ExecutionResult, OrchestrationResult,
    RollbackInput, ServerId, StepDefinition, StrategyKind, WorkflowKind,
};
use ripple_steps::schema::{validate_steps, ValidationError};
use std::time::Duration;
use thiserror::Error;

use crate::context::WorkflowContext;
use crate::runtime::{ChildExecution, RuntimeError};

/// Terminal orchestration failures.
#[derive(Debug, Error)]
pub enum OrchestrationError {
    /// A malformed request; nothing was dispatched.
    #[error("step validation failed: {0}")]
    Validation(#[from] ValidationError),
    /// The failure budget was breached. Rollback has already fanned out
    /// to the succeeded servers; the collected results ride along.
    #[error("exceeded max failures: {failures} > {max_failures}")]
    FailureBudgetExceeded {
        failures: u32,
        max_failures: i32,
        results: Vec<ExecutionResult>,
    },
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Coordinate a rollout across the fleet.
///
/// All steps are validated before any child work is dispatched — this is
/// the single chokepoint that guarantees no server ever receives a
/// malformed step.
pub async fn orchestration_workflow(
    ctx: &WorkflowContext,
    req: ExecutionRequest,
) -> Result<OrchestrationResult, OrchestrationError> {
    tracing::info!(
        servers = req.servers.len(),
        strategy = %req.rollout_strategy.kind,
        "starting orchestration"
    );

    if let Err(err) = validate_steps(&req.steps) {
        tracing::error!(error = %err, "step validation failed");
        return Err(err.into());
    }
    tracing::info!("all steps validated successfully");

    let results = match req.rollout_strategy.kind {
        StrategyKind::Sequential => sequential_execution(ctx, &req).await?,
        StrategyKind::Rolling => rolling_execution(ctx, &req).await?,
        StrategyKind::Parallel => parallel_execution(ctx, &req).await?,
    };

    let result = OrchestrationResult::tally(results);
    tracing::info!(
        success = result.success,
        patched = result.servers_patched,
        failed = result.servers_failed,
        "orchestration complete"
    );
    Ok(result)
}

async fn parallel_execution(
    ctx: &WorkflowContext,
    req: &ExecutionRequest,
) -> Result<Vec<ExecutionResult>, OrchestrationError> {
    tracing::info!(servers = req.servers.len(), "starting parallel execution");

    let mut children = Vec::with_capacity(req.servers.len());
    for server in &req.servers {
        children.push(start_execution(ctx, server, &req.steps).await);
    }

    let mut results = Vec::with_capacity(children.len());
    let mut failures = 0u32;
    for (server, child) in req.servers.iter().zip(children) {
        let result = resolve_child(server, child).await;
        if !result.success {
            failures += 1;
        }
        results.push(result);
    }

    enforce_budget(ctx, req, failures, results).await
}

async fn sequential_execution(
    ctx: &WorkflowContext,
    req: &ExecutionRequest,
) -> Result<Vec<ExecutionResult>, OrchestrationError> {
    tracing::info!(servers = req.servers.len(), "starting sequential execution");

    let mut results = Vec::with_capacity(req.servers.len());
    let mut failures = 0u32;
    for server in &req.servers {
        let child = start_execution(ctx, server, &req.steps).await;
        let result = resolve_child(server, child).await;
        if !result.success {
            failures += 1;
        }
        results.push(result);

        if req.rollout_strategy.budget_exceeded(failures) {
            return enforce_budget(ctx, req, failures, results).await;
        }
    }

    Ok(results)
}

async fn rolling_execution(
    ctx: &WorkflowContext,
    req: &ExecutionRequest,
) -> Result<Vec<ExecutionResult>, OrchestrationError> {
    let batch_size = req.rollout_strategy.effective_batch_size();
    tracing::info!(
        servers = req.servers.len(),
        batch_size,
        "starting rolling execution"
    );

    let batches = req.servers.chunks(batch_size).count();
    let mut results = Vec::with_capacity(req.servers.len());
    let mut failures = 0u32;

    for (batch_index, batch) in req.servers.chunks(batch_size).enumerate() {
        tracing::info!(batch = batch_index + 1, servers = ?batch, "processing batch");

        let mut children = Vec::with_capacity(batch.len());
        for server in batch {
            children.push(start_execution(ctx, server, &req.steps).await);
        }
        for (server, child) in batch.iter().zip(children) {
            let result = resolve_child(server, child).await;
            if !result.success {
                failures += 1;
            }
            results.push(result);
        }

        if req.rollout_strategy.budget_exceeded(failures) {
            return enforce_budget(ctx, req, failures, results).await;
        }

        let more_remaining = batch_index + 1 < batches;
        if more_remaining && req.rollout_strategy.batch_delay_seconds > 0 {
            ctx.sleep(Duration::from_secs(req.rollout_strategy.batch_delay_seconds))
                .await;
        }
    }

    Ok(results)
}

/// Launch the execution pipeline child for one server, pinned to the
/// server's own task queue under the `exec-<serverId>` idempotency key.
async fn start_execution(
    ctx: &WorkflowContext,
    server: &ServerId,
    steps: &[StepDefinition],
) -> Result<ChildExecution, RuntimeError> {
    let input = ExecutionInput {
        server_id: server.clone(),
        steps: steps.to_vec(),
    };
    ctx.start_child(
        WorkflowKind::ServerExecution,
        server.execution_workflow_id(),
        server.task_queue(),
        &input,
    )
    .await
}

/// Fold a child outcome into an `ExecutionResult`. A runtime-level
/// failure (as opposed to a clean `success=false` completion) becomes a
/// synthetic failed result for that server.
async fn resolve_child(
    server: &ServerId,
    child: Result<ChildExecution, RuntimeError>,
) -> ExecutionResult {
    let outcome = match child {
        Ok(child) => child.join().await.and_then(|value| {
            serde_json::from_value::<ExecutionResult>(value).map_err(RuntimeError::from)
        }),
        Err(err) => Err(err),
    };

    match outcome {
        Ok(result) => result,
        Err(err) => {
            tracing::warn!(server = %server, error = %err, "server execution failed in the runtime");
            ExecutionResult::runtime_failure(server.clone(), err.to_string())
        }
    }
}

/// Check the failure budget; on breach, fan out rollback to every
/// succeeded server and return the terminal error carrying the results.
async fn enforce_budget(
    ctx: &WorkflowContext,
    req: &ExecutionRequest,
    failures: u32,
    results: Vec<ExecutionResult>,
) -> Result<Vec<ExecutionResult>, OrchestrationError> {
    if !req.rollout_strategy.budget_exceeded(failures) {
        return Ok(results);
    }

    let max_failures = req.rollout_strategy.max_failures;
    tracing::error!(failures, max_failures, "max failures exceeded, triggering rollback");

    for result in results.iter().filter(|r| r.success) {
        tracing::info!(server = %result.server_id, "triggering rollback for server");
        if let Err(err) = trigger_server_rollback(ctx, &req.steps, result).await {
            tracing::error!(
                server = %result.server_id,
                error = %err,
                "failed to trigger rollback"
            );
        }
    }

    Err(OrchestrationError::FailureBudgetExceeded { failures, max_failures, results })
}

/// Launch and await the rollback child for one succeeded server.
///
/// The executed-step list is rebuilt from step results by position;
/// metadata captured at execute time is not carried in the execution
/// result, so the rollback payload has none.
async fn trigger_server_rollback(
    ctx: &WorkflowContext,
    steps: &[StepDefinition],
    result: &ExecutionResult,
) -> Result<(), RuntimeError> {
    let executed_steps: Vec<ExecutedStep> = result
        .steps_executed
        .iter()
        .enumerate()
        .filter(|(i, step_result)| step_result.success && *i < steps.len())
        .map(|(i, _)| ExecutedStep { step: steps[i].clone(), metadata: None })
        .collect();

    let server = &result.server_id;
    tracing::info!(server = %server, steps = executed_steps.len(), "starting rollback workflow");

    let input = RollbackInput {
        server_id: server.clone(),
        executed_steps,
    };
    let child = ctx
        .start_child(
            WorkflowKind::ServerRollback,
            server.rollback_workflow_id(),
            server.task_queue(),
            &input,
        )
        .await?;
    child.join().await?;

    tracing::info!(server = %server, "rollback workflow completed");
    Ok(())
}

#[cfg(test)]
#[path = "orchestration_tests.rs"]
mod tests;
