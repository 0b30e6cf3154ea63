// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step handler trait and registry.

use async_trait::async_trait;
use ripple_core::ExecutionMetadata;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::schema::ParamError;

/// Errors produced by a handler's execute or rollback.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Params(#[from] ParamError),
    /// The side effect itself failed (non-zero exit, bad state, …).
    #[error("{0}")]
    Failed(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl HandlerError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Implementation of one step type.
///
/// `execute` performs the side effect and may capture metadata that only
/// the matching `rollback` understands. Rollback is best-effort
/// compensation; metadata is `None` when the caller has no snapshot to
/// offer (the coordinator's reconstructed rollback path).
#[async_trait]
pub trait StepHandler: Send + Sync {
    async fn execute(
        &self,
        params: &Map<String, Value>,
    ) -> Result<ExecutionMetadata, HandlerError>;

    async fn rollback(
        &self,
        params: &Map<String, Value>,
        metadata: Option<&ExecutionMetadata>,
    ) -> Result<(), HandlerError>;
}

/// Process-local map from step type to handler.
///
/// Populated once at worker startup and read-only afterwards; no
/// concurrent-registration discipline is needed.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn StepHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in handler catalogue.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(crate::handlers::ECHO, Arc::new(crate::handlers::EchoHandler));
        registry.register(crate::handlers::SLEEP, Arc::new(crate::handlers::SleepHandler));
        registry.register(
            crate::handlers::FILE_WRITE,
            Arc::new(crate::handlers::FileWriteHandler),
        );
        registry.register(crate::handlers::SCRIPT, Arc::new(crate::handlers::ScriptHandler));
        registry.register(
            crate::handlers::YUM_UPGRADE,
            Arc::new(crate::handlers::YumUpgradeHandler::default()),
        );
        registry
    }

    pub fn register(&mut self, step_type: impl Into<String>, handler: Arc<dyn StepHandler>) {
        self.handlers.insert(step_type.into(), handler);
    }

    pub fn get(&self, step_type: &str) -> Option<Arc<dyn StepHandler>> {
        self.handlers.get(step_type).cloned()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;
