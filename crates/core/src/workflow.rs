// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow and activity naming, plus the activity argument payloads.

use crate::server::ServerId;
use crate::step::{ExecutionMetadata, StepDefinition};
use serde::{Deserialize, Serialize};

/// Task queue the orchestration workflow runs on. Per-server workflows
/// run on the queue named after the server instead.
pub const ORCHESTRATOR_TASK_QUEUE: &str = "execution-orchestrator";

/// Activity that executes one step on a server.
pub const EXECUTE_STEP_ACTIVITY: &str = "ExecuteStep";

/// Activity that compensates one previously executed step.
pub const ROLLBACK_STEP_ACTIVITY: &str = "RollbackStep";

/// Workflow types exposed by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowKind {
    Orchestration,
    ServerExecution,
    ServerRollback,
}

impl WorkflowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowKind::Orchestration => "OrchestrationWorkflow",
            WorkflowKind::ServerExecution => "ServerExecutionWorkflow",
            WorkflowKind::ServerRollback => "ServerRollbackWorkflow",
        }
    }
}

impl std::fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arguments of the `ExecuteStep` activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteStepArgs {
    pub server_id: ServerId,
    pub step: StepDefinition,
}

/// Arguments of the `RollbackStep` activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollbackStepArgs {
    pub server_id: ServerId,
    pub step: StepDefinition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ExecutionMetadata>,
}
