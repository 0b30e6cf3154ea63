// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ripple-engine: the two-level rollout workflow engine.
//!
//! The orchestration workflow drives a fleet-wide rollout under a
//! strategy and a failure budget; per-server execution workflows run the
//! step pipeline on one machine; the rollback workflow compensates
//! already-succeeded servers when the rollout aborts.
//!
//! Workflows are written against the narrow [`runtime::WorkflowRuntime`]
//! contract (start a child workflow, run an activity, durable sleep) so
//! the durable runtime stays an external collaborator. [`LocalRuntime`]
//! is the bundled in-process implementation used by the CLI's
//! single-node mode and by tests; it applies the retry policy but does
//! not persist.

pub mod context;
pub mod execution;
pub mod orchestration;
pub mod rollback;
pub mod runtime;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use context::WorkflowContext;
pub use execution::server_execution_workflow;
pub use orchestration::{orchestration_workflow, OrchestrationError};
pub use rollback::server_rollback_workflow;
pub use runtime::local::LocalRuntime;
pub use runtime::{
    ActivityRequest, ChildExecution, ChildOptions, RuntimeError, WorkflowRuntime,
};
