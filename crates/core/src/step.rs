// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step definitions and the metadata handed from execute to rollback.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Data captured by a handler's execute that its rollback may need later.
///
/// Opaque to the orchestrator. The only contract is that it round-trips
/// through the runtime's serialization; it is never handed between
/// execute and rollback in process memory.
pub type ExecutionMetadata = Map<String, Value>;

/// A single unit of work to run on a server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDefinition {
    /// Opaque label used in logs and results.
    pub name: String,
    /// Registry key selecting the handler.
    #[serde(rename = "type")]
    pub step_type: String,
    /// Handler parameters. `None` models an absent/null params object,
    /// which the validator rejects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,
    /// A failed required step aborts the server pipeline
    /// (unless `continue_on_failure` overrides it).
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub continue_on_failure: bool,
}

impl StepDefinition {
    pub fn new(name: impl Into<String>, step_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            step_type: step_type.into(),
            params: None,
            required: false,
            continue_on_failure: false,
        }
    }

    /// Whether a failure of this step must abort the server pipeline.
    pub fn aborts_on_failure(&self) -> bool {
        self.required && !self.continue_on_failure
    }
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
