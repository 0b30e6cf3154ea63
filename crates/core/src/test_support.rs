// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::request::ExecutionRequest;
use crate::server::ServerId;
use crate::step::StepDefinition;
use crate::strategy::RolloutStrategy;
use serde_json::{Map, Value};

/// Builder for step definitions with sensible test defaults.
pub struct StepBuilder {
    step: StepDefinition,
}

/// Start building a step of the given type.
pub fn step(name: &str, step_type: &str) -> StepBuilder {
    StepBuilder { step: StepDefinition::new(name, step_type) }
}

impl StepBuilder {
    pub fn param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.step
            .params
            .get_or_insert_with(Map::new)
            .insert(key.to_string(), value.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.step.required = true;
        self
    }

    pub fn continue_on_failure(mut self) -> Self {
        self.step.continue_on_failure = true;
        self
    }

    pub fn build(self) -> StepDefinition {
        self.step
    }
}

/// An echo step with a message param; required by default since most
/// scenarios exercise the abort path.
pub fn echo_step(name: &str) -> StepDefinition {
    step(name, "echo").param("message", "hi").required().build()
}

pub fn servers(ids: &[&str]) -> Vec<ServerId> {
    ids.iter().map(|id| ServerId::new(*id)).collect()
}

pub fn request(
    server_ids: &[&str],
    steps: Vec<StepDefinition>,
    strategy: RolloutStrategy,
) -> ExecutionRequest {
    ExecutionRequest {
        servers: servers(server_ids),
        steps,
        rollout_strategy: strategy,
    }
}
