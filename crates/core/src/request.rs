// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow inputs: the fleet-level request and the per-server payloads
//! derived from it.

use crate::server::ServerId;
use crate::step::{ExecutionMetadata, StepDefinition};
use crate::strategy::RolloutStrategy;
use serde::{Deserialize, Serialize};

/// A fleet rollout request, the input of the orchestration workflow.
///
/// Invariants: server identifiers are unique (the runtime's workflow-id
/// dedup enforces this at dispatch), every step type resolves in the
/// handler registry, and all params pass validation before any child
/// work is launched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRequest {
    pub servers: Vec<ServerId>,
    pub steps: Vec<StepDefinition>,
    pub rollout_strategy: RolloutStrategy,
}

/// Input of the per-server execution workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionInput {
    pub server_id: ServerId,
    pub steps: Vec<StepDefinition>,
}

/// One successfully executed step together with the metadata its
/// rollback needs.
///
/// Metadata is `None` when the coordinator rebuilds the executed list
/// from step results instead of the live `(step, metadata)` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutedStep {
    pub step: StepDefinition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ExecutionMetadata>,
}

/// Input of the per-server rollback workflow. `executed_steps` is in
/// execute order; the workflow walks it in reverse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollbackInput {
    pub server_id: ServerId,
    pub executed_steps: Vec<ExecutedStep>,
}
