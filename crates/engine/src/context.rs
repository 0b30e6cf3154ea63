// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed convenience wrapper around the runtime contract.
//!
//! A context is pinned to one task queue: the orchestrator queue for the
//! coordinator, the server's own queue for per-server workflows. All
//! serde at the runtime boundary happens here.

use ripple_core::{ActivityOptions, WorkflowKind};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::runtime::{ActivityRequest, ChildExecution, ChildOptions, RuntimeError, WorkflowRuntime};

#[derive(Clone)]
pub struct WorkflowContext {
    runtime: Arc<dyn WorkflowRuntime>,
    task_queue: String,
}

impl WorkflowContext {
    pub fn new(runtime: Arc<dyn WorkflowRuntime>, task_queue: impl Into<String>) -> Self {
        Self { runtime, task_queue: task_queue.into() }
    }

    pub fn task_queue(&self) -> &str {
        &self.task_queue
    }

    /// Run an activity on this context's queue and decode its result.
    pub async fn execute_activity<A, R>(
        &self,
        activity: &str,
        args: &A,
        options: ActivityOptions,
    ) -> Result<R, RuntimeError>
    where
        A: Serialize + Sync,
        R: DeserializeOwned,
    {
        let request = ActivityRequest {
            activity: activity.to_string(),
            task_queue: self.task_queue.clone(),
            options,
        };
        let value = self
            .runtime
            .execute_activity(request, serde_json::to_value(args)?)
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Launch a child workflow on an arbitrary queue.
    pub async fn start_child<I: Serialize + Sync>(
        &self,
        workflow: WorkflowKind,
        workflow_id: String,
        task_queue: &str,
        input: &I,
    ) -> Result<ChildExecution, RuntimeError> {
        let opts = ChildOptions {
            workflow,
            workflow_id,
            task_queue: task_queue.to_string(),
        };
        self.runtime.start_child(opts, serde_json::to_value(input)?).await
    }

    pub async fn sleep(&self, duration: Duration) {
        self.runtime.sleep(duration).await;
    }
}
