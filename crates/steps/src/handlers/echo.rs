// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The simplest handler: emit a message. Useful as a smoke-test step.

use async_trait::async_trait;
use ripple_core::ExecutionMetadata;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::handler::{HandlerError, StepHandler};
use crate::schema::ECHO_SCHEMA;

#[derive(Debug, Clone, Deserialize)]
pub struct EchoParams {
    pub message: String,
}

pub struct EchoHandler;

#[async_trait]
impl StepHandler for EchoHandler {
    async fn execute(
        &self,
        params: &Map<String, Value>,
    ) -> Result<ExecutionMetadata, HandlerError> {
        let p: EchoParams = ECHO_SCHEMA.parse(params)?;
        tracing::info!(message = %p.message, "echo");
        println!("ECHO: {}", p.message);
        Ok(ExecutionMetadata::new())
    }

    async fn rollback(
        &self,
        _params: &Map<String, Value>,
        _metadata: Option<&ExecutionMetadata>,
    ) -> Result<(), HandlerError> {
        tracing::debug!("echo rollback - nothing to do");
        Ok(())
    }
}

#[cfg(test)]
#[path = "echo_tests.rs"]
mod tests;
