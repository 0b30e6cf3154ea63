// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process runtime for single-node use.
//!
//! Implements the workflow-runtime contract with tokio tasks and timers:
//! per-server workers registered against the queue named after the
//! server, workflow-id dedup, and activity retries per policy. Nothing
//! is persisted — production deployments register the same workflows on
//! a durable runtime through the same trait.

use async_trait::async_trait;
use futures_util::FutureExt;
use parking_lot::Mutex;
use ripple_core::{
    ExecuteStepArgs, ExecutionInput, ExecutionRequest, ExecutionResult, OrchestrationResult,
    RollbackInput, RollbackStepArgs, ServerId, WorkflowKind, EXECUTE_STEP_ACTIVITY,
    ORCHESTRATOR_TASK_QUEUE, ROLLBACK_STEP_ACTIVITY,
};
use ripple_steps::{HandlerRegistry, StepActivities};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use crate::context::WorkflowContext;
use crate::execution::server_execution_workflow;
use crate::orchestration::{orchestration_workflow, OrchestrationError};
use crate::rollback::server_rollback_workflow;
use crate::runtime::{
    ActivityRequest, ChildExecution, ChildOptions, RuntimeError, WorkflowRuntime,
};

#[derive(Clone, Default)]
pub struct LocalRuntime {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    /// Task queue -> the worker's activity implementations.
    workers: Mutex<HashMap<String, Arc<StepActivities>>>,
    /// Workflow ids currently running (idempotency-key enforcement).
    active: Mutex<HashSet<String>>,
}

/// Decoded activity invocation.
enum ActivityCall {
    Execute(ExecuteStepArgs),
    Rollback(RollbackStepArgs),
}

impl LocalRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an in-process worker for a server: binds the task queue
    /// named after the server to activities over the given registry.
    pub fn register_server(&self, server_id: &ServerId, registry: Arc<HandlerRegistry>) {
        tracing::info!(server = %server_id, "registering worker");
        self.inner.workers.lock().insert(
            server_id.task_queue().to_string(),
            Arc::new(StepActivities::new(registry)),
        );
    }

    /// Run a fleet orchestration on the orchestrator queue.
    pub async fn run_orchestration(
        &self,
        request: ExecutionRequest,
    ) -> Result<OrchestrationResult, OrchestrationError> {
        let ctx = self.context(ORCHESTRATOR_TASK_QUEUE);
        orchestration_workflow(&ctx, request).await
    }

    /// Run a single server's execution pipeline directly.
    pub async fn run_execution(&self, input: ExecutionInput) -> ExecutionResult {
        let queue = input.server_id.task_queue().to_string();
        let ctx = self.context(&queue);
        server_execution_workflow(&ctx, input).await
    }

    fn context(&self, task_queue: &str) -> WorkflowContext {
        WorkflowContext::new(Arc::new(self.clone()), task_queue)
    }

    fn activities_for(&self, task_queue: &str) -> Result<Arc<StepActivities>, RuntimeError> {
        self.inner
            .workers
            .lock()
            .get(task_queue)
            .cloned()
            .ok_or_else(|| RuntimeError::NoWorker(task_queue.to_string()))
    }

    async fn run_activity_once(
        activities: &StepActivities,
        call: &ActivityCall,
    ) -> Result<Value, String> {
        match call {
            ActivityCall::Execute(args) => {
                let metadata = activities
                    .execute_step(&args.server_id, &args.step)
                    .await
                    .map_err(|err| err.to_string())?;
                serde_json::to_value(metadata).map_err(|err| err.to_string())
            }
            ActivityCall::Rollback(args) => {
                activities
                    .rollback_step(&args.server_id, &args.step, args.metadata.as_ref())
                    .await
                    .map_err(|err| err.to_string())?;
                Ok(Value::Null)
            }
        }
    }
}

#[async_trait]
impl WorkflowRuntime for LocalRuntime {
    async fn start_child(
        &self,
        opts: ChildOptions,
        input: Value,
    ) -> Result<ChildExecution, RuntimeError> {
        // Per-server workflows need a worker on the queue before launch.
        if self.inner.workers.lock().get(&opts.task_queue).is_none() {
            return Err(RuntimeError::NoWorker(opts.task_queue));
        }

        {
            let mut active = self.inner.active.lock();
            if !active.insert(opts.workflow_id.clone()) {
                return Err(RuntimeError::WorkflowAlreadyRunning(opts.workflow_id));
            }
        }

        let ctx = self.context(&opts.task_queue);
        let runtime = self.clone();
        let workflow_id = opts.workflow_id.clone();

        let spawn = |input: Value| -> Result<
            tokio::task::JoinHandle<Result<Value, RuntimeError>>,
            RuntimeError,
        > {
            match opts.workflow {
                WorkflowKind::ServerExecution => {
                    let input: ExecutionInput = serde_json::from_value(input)?;
                    Ok(tokio::spawn(async move {
                        let result = server_execution_workflow(&ctx, input).await;
                        runtime.inner.active.lock().remove(&workflow_id);
                        serde_json::to_value(result).map_err(RuntimeError::from)
                    }))
                }
                WorkflowKind::ServerRollback => {
                    let input: RollbackInput = serde_json::from_value(input)?;
                    Ok(tokio::spawn(async move {
                        server_rollback_workflow(&ctx, input).await;
                        runtime.inner.active.lock().remove(&workflow_id);
                        Ok(Value::Null)
                    }))
                }
                WorkflowKind::Orchestration => Err(RuntimeError::UnknownWorkflow(
                    "OrchestrationWorkflow cannot run as a child".to_string(),
                )),
            }
        };

        let handle = match spawn(input) {
            Ok(handle) => handle,
            Err(err) => {
                self.inner.active.lock().remove(&opts.workflow_id);
                return Err(err);
            }
        };

        let join_id = opts.workflow_id.clone();
        let result = async move {
            match handle.await {
                Ok(result) => result,
                Err(join_err) => Err(RuntimeError::ChildFailed {
                    workflow_id: join_id,
                    message: join_err.to_string(),
                }),
            }
        }
        .boxed();

        Ok(ChildExecution::new(opts.workflow_id, result))
    }

    async fn execute_activity(
        &self,
        request: ActivityRequest,
        args: Value,
    ) -> Result<Value, RuntimeError> {
        let activities = self.activities_for(&request.task_queue)?;

        // Decode once up front; malformed args are not retryable.
        let call = match request.activity.as_str() {
            EXECUTE_STEP_ACTIVITY => ActivityCall::Execute(serde_json::from_value(args)?),
            ROLLBACK_STEP_ACTIVITY => ActivityCall::Rollback(serde_json::from_value(args)?),
            other => return Err(RuntimeError::UnknownActivity(other.to_string())),
        };

        let policy = &request.options.retry;
        let attempts = policy.maximum_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            let outcome = tokio::time::timeout(
                request.options.start_to_close_timeout,
                Self::run_activity_once(&activities, &call),
            )
            .await;

            match outcome {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(message)) => last_error = message,
                Err(_elapsed) => {
                    last_error = format!(
                        "timed out after {:?}",
                        request.options.start_to_close_timeout
                    );
                }
            }

            tracing::warn!(
                activity = %request.activity,
                attempt,
                error = %last_error,
                "activity attempt failed"
            );
            if attempt < attempts {
                tokio::time::sleep(policy.backoff(attempt)).await;
            }
        }

        Err(RuntimeError::ActivityFailed {
            activity: request.activity,
            attempts,
            message: last_error,
        })
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
