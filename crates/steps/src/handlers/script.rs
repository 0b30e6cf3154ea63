// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run an arbitrary script; rollback runs the configured rollback script.

use async_trait::async_trait;
use ripple_core::ExecutionMetadata;
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::process::Command;

use crate::handler::{HandlerError, StepHandler};
use crate::schema::SCRIPT_SCHEMA;

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptParams {
    pub script: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub rollback_script: Option<String>,
}

pub struct ScriptHandler;

#[async_trait]
impl StepHandler for ScriptHandler {
    async fn execute(
        &self,
        params: &Map<String, Value>,
    ) -> Result<ExecutionMetadata, HandlerError> {
        let p: ScriptParams = SCRIPT_SCHEMA.parse(params)?;
        tracing::info!(script = %p.script, "running script");

        let output = Command::new(&p.script)
            .args(&p.args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|err| {
                HandlerError::failed(format!("script failed to start: {err}"))
            })?;

        let combined = combined_output(&output.stdout, &output.stderr);
        tracing::info!(script = %p.script, output = %combined, "script completed");

        if !output.status.success() {
            return Err(HandlerError::failed(format!(
                "script failed: {}, output: {}",
                output.status, combined
            )));
        }

        Ok(ExecutionMetadata::new())
    }

    async fn rollback(
        &self,
        params: &Map<String, Value>,
        _metadata: Option<&ExecutionMetadata>,
    ) -> Result<(), HandlerError> {
        let Ok(p) = SCRIPT_SCHEMA.parse::<ScriptParams>(params) else {
            return Ok(());
        };

        let Some(rollback_script) = p.rollback_script.filter(|s| !s.is_empty()) else {
            tracing::info!("no rollback script specified");
            return Ok(());
        };

        tracing::info!(script = %rollback_script, "running rollback script");
        let status = Command::new(&rollback_script)
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|err| {
                HandlerError::failed(format!("rollback script failed to start: {err}"))
            })?;

        if !status.success() {
            return Err(HandlerError::failed(format!("rollback script failed: {status}")));
        }
        Ok(())
    }
}

/// Stdout followed by stderr, lossily decoded.
fn combined_output(stdout: &[u8], stderr: &[u8]) -> String {
    let mut combined = String::from_utf8_lossy(stdout).into_owned();
    if !stderr.is_empty() {
        if !combined.is_empty() && !combined.ends_with('\n') {
            combined.push('\n');
        }
        combined.push_str(&String::from_utf8_lossy(stderr));
    }
    combined.trim_end().to_string()
}

#[cfg(test)]
#[path = "script_tests.rs"]
mod tests;
