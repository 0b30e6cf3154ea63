// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pause the pipeline for a number of seconds.

use async_trait::async_trait;
use ripple_core::ExecutionMetadata;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;

use crate::handler::{HandlerError, StepHandler};
use crate::schema::SLEEP_SCHEMA;

#[derive(Debug, Clone, Deserialize)]
pub struct SleepParams {
    /// Seconds to sleep; fractional values are honored.
    pub duration: f64,
}

pub struct SleepHandler;

#[async_trait]
impl StepHandler for SleepHandler {
    async fn execute(
        &self,
        params: &Map<String, Value>,
    ) -> Result<ExecutionMetadata, HandlerError> {
        let p: SleepParams = SLEEP_SCHEMA.parse(params)?;
        if !p.duration.is_finite() || p.duration < 0.0 {
            return Err(HandlerError::failed("missing or invalid 'duration' parameter"));
        }

        let duration = Duration::from_secs_f64(p.duration);
        tracing::info!(duration_ms = duration.as_millis() as u64, "sleeping");
        tokio::time::sleep(duration).await;
        tracing::info!("sleep completed");

        Ok(ExecutionMetadata::new())
    }

    async fn rollback(
        &self,
        _params: &Map<String, Value>,
        _metadata: Option<&ExecutionMetadata>,
    ) -> Result<(), HandlerError> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "sleep_tests.rs"]
mod tests;
