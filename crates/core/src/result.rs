// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow outputs: per-step, per-server, and fleet-level results.

use crate::server::ServerId;
use serde::{Deserialize, Serialize};

/// Outcome of a single step. Ordering of a result list mirrors the step
/// sequence, truncated at the abort point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    pub name: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepResult {
    pub fn succeeded(name: impl Into<String>) -> Self {
        Self { name: name.into(), success: true, error: None }
    }

    pub fn failed(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self { name: name.into(), success: false, error: Some(error.into()) }
    }
}

/// Outcome of the step pipeline on one server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub server_id: ServerId,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub steps_executed: Vec<StepResult>,
}

impl ExecutionResult {
    /// Fresh result for a pipeline that has not finished yet.
    pub fn pending(server_id: ServerId) -> Self {
        Self { server_id, success: false, error: None, steps_executed: Vec::new() }
    }

    /// Synthetic result for a child that failed at the runtime level
    /// rather than completing with a clean failure.
    pub fn runtime_failure(server_id: ServerId, error: impl Into<String>) -> Self {
        Self {
            server_id,
            success: false,
            error: Some(error.into()),
            steps_executed: Vec::new(),
        }
    }
}

/// Fleet-level outcome of an orchestration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestrationResult {
    pub success: bool,
    pub servers_patched: u32,
    pub servers_failed: u32,
    pub results: Vec<ExecutionResult>,
}

impl OrchestrationResult {
    /// Tally per-server results into the fleet result.
    ///
    /// `success` holds exactly when no server failed.
    pub fn tally(results: Vec<ExecutionResult>) -> Self {
        let mut servers_patched = 0;
        let mut servers_failed = 0;
        for result in &results {
            if result.success {
                servers_patched += 1;
            } else {
                servers_failed += 1;
            }
        }
        Self {
            success: servers_failed == 0,
            servers_patched,
            servers_failed,
            results,
        }
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
