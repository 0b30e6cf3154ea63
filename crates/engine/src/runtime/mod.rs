// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The contract the workflows assume from their durable runtime.
//!
//! Three primitives: launch a child workflow (returns a joinable
//! handle), run an activity to completion under a retry policy and
//! timeout, and a durable timer. Structured logging goes through
//! `tracing` directly.
//!
//! Deterministic replay, checkpointing, and task-queue delivery are the
//! implementing runtime's responsibility; the workflows only suspend at
//! these three points.

pub mod local;

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use ripple_core::{ActivityOptions, WorkflowKind};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by a runtime implementation.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The workflow id is already in use. Workflow ids are idempotency
    /// keys (`exec-<serverId>`, `rollback-<serverId>`).
    #[error("workflow {0} is already running")]
    WorkflowAlreadyRunning(String),
    #[error("no worker registered for task queue: {0}")]
    NoWorker(String),
    #[error("unknown workflow type: {0}")]
    UnknownWorkflow(String),
    #[error("unknown activity: {0}")]
    UnknownActivity(String),
    #[error("activity {activity} failed after {attempts} attempt(s): {message}")]
    ActivityFailed {
        activity: String,
        attempts: u32,
        message: String,
    },
    #[error("child workflow {workflow_id} failed: {message}")]
    ChildFailed {
        workflow_id: String,
        message: String,
    },
    #[error("serialization error: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Options for launching a child workflow.
#[derive(Debug, Clone)]
pub struct ChildOptions {
    pub workflow: WorkflowKind,
    pub workflow_id: String,
    pub task_queue: String,
}

/// One activity invocation: the activity name, the queue whose worker
/// must run it, and the retry/timeout options.
#[derive(Debug, Clone)]
pub struct ActivityRequest {
    pub activity: String,
    pub task_queue: String,
    pub options: ActivityOptions,
}

/// Handle to a launched child workflow.
///
/// The child is already running when the handle is returned; `join`
/// waits for its serialized result.
pub struct ChildExecution {
    workflow_id: String,
    result: BoxFuture<'static, Result<Value, RuntimeError>>,
}

impl std::fmt::Debug for ChildExecution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChildExecution")
            .field("workflow_id", &self.workflow_id)
            .finish_non_exhaustive()
    }
}

impl ChildExecution {
    pub fn new(
        workflow_id: impl Into<String>,
        result: BoxFuture<'static, Result<Value, RuntimeError>>,
    ) -> Self {
        Self { workflow_id: workflow_id.into(), result }
    }

    pub fn workflow_id(&self) -> &str {
        &self.workflow_id
    }

    pub async fn join(self) -> Result<Value, RuntimeError> {
        self.result.await
    }
}

/// The runtime contract consumed by the workflows.
#[async_trait]
pub trait WorkflowRuntime: Send + Sync {
    /// Launch a child workflow on the given task queue. Launching is
    /// eager: the child starts before the handle is joined.
    async fn start_child(
        &self,
        opts: ChildOptions,
        input: Value,
    ) -> Result<ChildExecution, RuntimeError>;

    /// Run an activity to completion, retrying per the request options.
    async fn execute_activity(
        &self,
        request: ActivityRequest,
        args: Value,
    ) -> Result<Value, RuntimeError>;

    /// Durable timer.
    async fn sleep(&self, duration: Duration);
}
