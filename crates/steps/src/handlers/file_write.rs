// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write a file on the target server; rollback deletes it.

use async_trait::async_trait;
use ripple_core::ExecutionMetadata;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::handler::{HandlerError, StepHandler};
use crate::schema::FILE_WRITE_SCHEMA;

#[derive(Debug, Clone, Deserialize)]
pub struct FileWriteParams {
    pub path: String,
    pub content: String,
}

pub struct FileWriteHandler;

#[async_trait]
impl StepHandler for FileWriteHandler {
    async fn execute(
        &self,
        params: &Map<String, Value>,
    ) -> Result<ExecutionMetadata, HandlerError> {
        let p: FileWriteParams = FILE_WRITE_SCHEMA.parse(params)?;
        tracing::info!(path = %p.path, "writing file");

        tokio::fs::write(&p.path, &p.content).await?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&p.path, std::fs::Permissions::from_mode(0o644)).await?;
        }

        tracing::info!(path = %p.path, "file written");
        Ok(ExecutionMetadata::new())
    }

    async fn rollback(
        &self,
        params: &Map<String, Value>,
        _metadata: Option<&ExecutionMetadata>,
    ) -> Result<(), HandlerError> {
        // Unparseable params mean execute never wrote anything.
        let Ok(p) = FILE_WRITE_SCHEMA.parse::<FileWriteParams>(params) else {
            return Ok(());
        };

        tracing::info!(path = %p.path, "deleting file for rollback");
        tokio::fs::remove_file(&p.path).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "file_write_tests.rs"]
mod tests;
