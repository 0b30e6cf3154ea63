// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod exec;
pub mod run;
pub mod validate;

use anyhow::Context;
use ripple_core::ExecutionRequest;
use serde::Serialize;
use std::path::Path;

/// Load and parse an `ExecutionRequest` from a JSON file.
pub(crate) fn load_request(path: &Path) -> anyhow::Result<ExecutionRequest> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read request file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("invalid rollout request in {}", path.display()))
}

/// Render a result to stdout as JSON.
pub(crate) fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
