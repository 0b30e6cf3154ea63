// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server identity and the names derived from it.
//!
//! A server is addressed by an operator-supplied identifier (typically a
//! hostname). The identifier doubles as the task-queue name its worker
//! binds to, and it derives the idempotency keys for the per-server
//! child workflows.

use serde::{Deserialize, Serialize};

/// Identifier for a target server.
///
/// Unlike generated ids, server ids are never random: they come in on the
/// rollout request and must match the identity the server's worker was
/// started with (`SERVER_ID`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerId(String);

impl ServerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Task queue this server's worker listens on.
    ///
    /// Per-server work is targeted by queue name, not network address.
    pub fn task_queue(&self) -> &str {
        &self.0
    }

    /// Workflow id for the execution pipeline on this server.
    pub fn execution_workflow_id(&self) -> String {
        format!("exec-{}", self.0)
    }

    /// Workflow id for the rollback pipeline on this server.
    pub fn rollback_workflow_id(&self) -> String {
        format!("rollback-{}", self.0)
    }
}

impl std::fmt::Display for ServerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ServerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ServerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for ServerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ServerId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ServerId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl std::borrow::Borrow<str> for ServerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
