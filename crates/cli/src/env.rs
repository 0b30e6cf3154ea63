// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.

/// Per-worker server identity. Defines the task queue a server worker
/// binds to and the identity `ripple exec` runs under.
pub fn server_id() -> String {
    std::env::var("SERVER_ID")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "dev-local".to_string())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
