// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Activity adapter: exposes execute/rollback of any registered handler
//! as units the workflow runtime can checkpoint and retry.
//!
//! The only params mutation in the whole system happens here: the target
//! server's id is injected under the reserved `server_id` key before the
//! handler runs.

use ripple_core::{ExecutionMetadata, ServerId, StepDefinition};
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

use crate::handler::{HandlerError, HandlerRegistry};
use crate::schema::SERVER_ID_PARAM;

#[derive(Debug, Error)]
pub enum ActivityError {
    #[error("no handler registered for step type: {0}")]
    UnknownHandler(String),
    #[error(transparent)]
    Handler(#[from] HandlerError),
}

/// Per-worker activity implementations backed by the handler registry.
pub struct StepActivities {
    registry: Arc<HandlerRegistry>,
}

impl StepActivities {
    pub fn new(registry: Arc<HandlerRegistry>) -> Self {
        Self { registry }
    }

    /// Execute a single step on this worker's server.
    pub async fn execute_step(
        &self,
        server_id: &ServerId,
        step: &StepDefinition,
    ) -> Result<ExecutionMetadata, ActivityError> {
        tracing::info!(
            server = %server_id,
            step = %step.name,
            step_type = %step.step_type,
            "executing step"
        );

        let handler = self
            .registry
            .get(&step.step_type)
            .ok_or_else(|| ActivityError::UnknownHandler(step.step_type.clone()))?;

        let params = with_server_id(step.params.as_ref(), server_id);
        Ok(handler.execute(&params).await?)
    }

    /// Roll back a previously executed step. Best-effort: a missing
    /// handler is logged and reported as success.
    pub async fn rollback_step(
        &self,
        server_id: &ServerId,
        step: &StepDefinition,
        metadata: Option<&ExecutionMetadata>,
    ) -> Result<(), ActivityError> {
        tracing::info!(
            server = %server_id,
            step = %step.name,
            step_type = %step.step_type,
            "rolling back step"
        );

        let Some(handler) = self.registry.get(&step.step_type) else {
            tracing::warn!(step_type = %step.step_type, "no handler for rollback");
            return Ok(());
        };

        let params = with_server_id(step.params.as_ref(), server_id);
        Ok(handler.rollback(&params, metadata).await?)
    }
}

fn with_server_id(params: Option<&Map<String, Value>>, server_id: &ServerId) -> Map<String, Value> {
    let mut params = params.cloned().unwrap_or_default();
    params.insert(
        SERVER_ID_PARAM.to_string(),
        Value::String(server_id.as_str().to_string()),
    );
    params
}

#[cfg(test)]
#[path = "activities_tests.rs"]
mod tests;
