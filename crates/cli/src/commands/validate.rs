// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ripple validate` — check a rollout request without dispatching work.

use anyhow::Result;
use ripple_steps::validate_steps;
use std::path::Path;

use crate::ExitError;

pub fn handle(path: &Path) -> Result<()> {
    let request = super::load_request(path)?;

    validate_steps(&request.steps)
        .map_err(|err| ExitError::rejected(format!("step validation failed: {err}")))?;

    println!(
        "request OK: {} server(s), {} step(s), strategy {}",
        request.servers.len(),
        request.steps.len(),
        request.rollout_strategy.kind,
    );
    Ok(())
}
