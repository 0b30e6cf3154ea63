// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for the engine.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use async_trait::async_trait;
use futures_util::FutureExt;
use parking_lot::Mutex;
use ripple_core::{
    ExecuteStepArgs, ExecutionInput, ExecutionMetadata, RollbackInput, RollbackStepArgs, ServerId,
    WorkflowKind, EXECUTE_STEP_ACTIVITY, ROLLBACK_STEP_ACTIVITY,
};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use crate::context::WorkflowContext;
use crate::execution::server_execution_workflow;
use crate::rollback::server_rollback_workflow;
use crate::runtime::{
    ActivityRequest, ChildExecution, ChildOptions, RuntimeError, WorkflowRuntime,
};

/// One observed activity invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedActivity {
    pub task_queue: String,
    pub activity: String,
    pub server_id: ServerId,
    pub step_name: String,
    /// Metadata carried by a rollback invocation; `None` for executes.
    pub metadata: Option<ExecutionMetadata>,
}

/// Runtime double that records every activity invocation and timer, and
/// serves scripted step outcomes. Child workflows run for real (the
/// actual workflow functions, spawned as tasks); only the activity layer
/// is simulated. Sleeps are recorded, never awaited.
#[derive(Clone, Default)]
pub struct RecordingRuntime {
    inner: Arc<RecordingInner>,
}

#[derive(Default)]
struct RecordingInner {
    calls: Mutex<Vec<RecordedActivity>>,
    sleeps: Mutex<Vec<Duration>>,
    started: Mutex<Vec<String>>,
    active: Mutex<HashSet<String>>,
    /// (server id, step name) -> scripted execute failure message.
    failed_steps: Mutex<HashMap<(String, String), String>>,
    /// (server id, step name) -> scripted rollback failure message.
    failed_rollbacks: Mutex<HashMap<(String, String), String>>,
    /// Workflow ids scripted to fail at the runtime level.
    failed_children: Mutex<HashSet<String>>,
}

impl RecordingRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script `ExecuteStep` for (server, step) to fail with the message.
    pub fn fail_step(&self, server: &str, step: &str, error: &str) {
        self.inner
            .failed_steps
            .lock()
            .insert((server.to_string(), step.to_string()), error.to_string());
    }

    /// Script `RollbackStep` for (server, step) to fail with the message.
    pub fn fail_rollback(&self, server: &str, step: &str, error: &str) {
        self.inner
            .failed_rollbacks
            .lock()
            .insert((server.to_string(), step.to_string()), error.to_string());
    }

    /// Script a child workflow id to fail at the runtime level instead
    /// of completing with a result.
    pub fn fail_child(&self, workflow_id: &str) {
        self.inner.failed_children.lock().insert(workflow_id.to_string());
    }

    /// Context pinned to a queue, for driving a workflow directly.
    pub fn context(&self, task_queue: &str) -> WorkflowContext {
        WorkflowContext::new(Arc::new(self.clone()), task_queue)
    }

    pub fn calls(&self) -> Vec<RecordedActivity> {
        self.inner.calls.lock().clone()
    }

    pub fn execute_calls(&self) -> Vec<RecordedActivity> {
        self.calls_for(EXECUTE_STEP_ACTIVITY)
    }

    pub fn rollback_calls(&self) -> Vec<RecordedActivity> {
        self.calls_for(ROLLBACK_STEP_ACTIVITY)
    }

    fn calls_for(&self, activity: &str) -> Vec<RecordedActivity> {
        self.inner
            .calls
            .lock()
            .iter()
            .filter(|call| call.activity == activity)
            .cloned()
            .collect()
    }

    /// Durations passed to the runtime's durable timer, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.inner.sleeps.lock().clone()
    }

    /// Workflow ids in launch order.
    pub fn started_workflows(&self) -> Vec<String> {
        self.inner.started.lock().clone()
    }
}

#[async_trait]
impl WorkflowRuntime for RecordingRuntime {
    async fn start_child(
        &self,
        opts: ChildOptions,
        input: Value,
    ) -> Result<ChildExecution, RuntimeError> {
        {
            let mut active = self.inner.active.lock();
            if !active.insert(opts.workflow_id.clone()) {
                return Err(RuntimeError::WorkflowAlreadyRunning(opts.workflow_id));
            }
        }
        self.inner.started.lock().push(opts.workflow_id.clone());

        if self.inner.failed_children.lock().contains(&opts.workflow_id) {
            self.inner.active.lock().remove(&opts.workflow_id);
            let workflow_id = opts.workflow_id.clone();
            let result = async move {
                Err(RuntimeError::ChildFailed {
                    workflow_id,
                    message: "simulated runtime failure".to_string(),
                })
            }
            .boxed();
            return Ok(ChildExecution::new(opts.workflow_id, result));
        }

        let ctx = self.context(&opts.task_queue);
        let runtime = self.clone();
        let workflow_id = opts.workflow_id.clone();

        let handle = match opts.workflow {
            WorkflowKind::ServerExecution => {
                let input: ExecutionInput = serde_json::from_value(input)?;
                tokio::spawn(async move {
                    let result = server_execution_workflow(&ctx, input).await;
                    runtime.inner.active.lock().remove(&workflow_id);
                    serde_json::to_value(result).map_err(RuntimeError::from)
                })
            }
            WorkflowKind::ServerRollback => {
                let input: RollbackInput = serde_json::from_value(input)?;
                tokio::spawn(async move {
                    server_rollback_workflow(&ctx, input).await;
                    runtime.inner.active.lock().remove(&workflow_id);
                    Ok(Value::Null)
                })
            }
            WorkflowKind::Orchestration => {
                self.inner.active.lock().remove(&opts.workflow_id);
                return Err(RuntimeError::UnknownWorkflow(
                    "OrchestrationWorkflow cannot run as a child".to_string(),
                ));
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
        match request.activity.as_str() {
            EXECUTE_STEP_ACTIVITY => {
                let args: ExecuteStepArgs = serde_json::from_value(args)?;
                let key = (args.server_id.to_string(), args.step.name.clone());
                self.inner.calls.lock().push(RecordedActivity {
                    task_queue: request.task_queue,
                    activity: request.activity.clone(),
                    server_id: args.server_id,
                    step_name: args.step.name,
                    metadata: None,
                });

                if let Some(error) = self.inner.failed_steps.lock().get(&key) {
                    return Err(RuntimeError::ActivityFailed {
                        activity: request.activity,
                        attempts: request.options.retry.maximum_attempts,
                        message: error.clone(),
                    });
                }
                Ok(Value::Object(ExecutionMetadata::new()))
            }
            ROLLBACK_STEP_ACTIVITY => {
                let args: RollbackStepArgs = serde_json::from_value(args)?;
                let key = (args.server_id.to_string(), args.step.name.clone());
                self.inner.calls.lock().push(RecordedActivity {
                    task_queue: request.task_queue,
                    activity: request.activity.clone(),
                    server_id: args.server_id,
                    step_name: args.step.name,
                    metadata: args.metadata,
                });

                if let Some(error) = self.inner.failed_rollbacks.lock().get(&key) {
                    return Err(RuntimeError::ActivityFailed {
                        activity: request.activity,
                        attempts: request.options.retry.maximum_attempts,
                        message: error.clone(),
                    });
                }
                Ok(Value::Null)
            }
            other => Err(RuntimeError::UnknownActivity(other.to_string())),
        }
    }

    async fn sleep(&self, duration: Duration) {
        self.inner.sleeps.lock().push(duration);
    }
}
