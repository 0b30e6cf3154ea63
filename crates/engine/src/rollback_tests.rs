// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::RecordingRuntime;
use ripple_core::test_support::step;
use ripple_core::{ExecutedStep, ExecutionMetadata, ServerId};
use serde_json::Value;

fn executed(name: &str) -> ExecutedStep {
    ExecutedStep {
        step: step(name, "echo").param("message", "x").build(),
        metadata: None,
    }
}

fn rollback_input(server: &str, steps: Vec<ExecutedStep>) -> RollbackInput {
    RollbackInput { server_id: ServerId::new(server), executed_steps: steps }
}

#[tokio::test]
async fn rolls_back_in_reverse_execute_order() {
    let runtime = RecordingRuntime::new();
    let ctx = runtime.context("web-01");

    server_rollback_workflow(
        &ctx,
        rollback_input("web-01", vec![executed("one"), executed("two"), executed("three")]),
    )
    .await;

    let calls = runtime.rollback_calls();
    let order: Vec<&str> = calls.iter().map(|c| c.step_name.as_str()).collect();
    assert_eq!(order, ["three", "two", "one"]);
    assert!(calls.iter().all(|c| c.task_queue == "web-01"));
}

#[tokio::test]
async fn individual_failures_do_not_short_circuit() {
    let runtime = RecordingRuntime::new();
    runtime.fail_rollback("a", "two", "undo failed");
    let ctx = runtime.context("a");

    server_rollback_workflow(
        &ctx,
        rollback_input("a", vec![executed("one"), executed("two"), executed("three")]),
    )
    .await;

    // all three compensations are attempted despite the middle failure
    let order: Vec<String> = runtime
        .rollback_calls()
        .iter()
        .map(|c| c.step_name.clone())
        .collect();
    assert_eq!(order, ["three", "two", "one"]);
}

#[tokio::test]
async fn metadata_travels_with_each_entry() {
    let runtime = RecordingRuntime::new();
    let ctx = runtime.context("a");

    let mut metadata = ExecutionMetadata::new();
    metadata.insert("previous_version".to_string(), Value::String("1.18.0-1".into()));

    server_rollback_workflow(
        &ctx,
        rollback_input(
            "a",
            vec![
                executed("plain"),
                ExecutedStep {
                    step: step("upgrade", "yum_upgrade")
                        .param("package", "nginx")
                        .param("version", "1.20.0")
                        .build(),
                    metadata: Some(metadata),
                },
            ],
        ),
    )
    .await;

    let calls = runtime.rollback_calls();
    assert_eq!(calls[0].step_name, "upgrade");
    assert_eq!(
        calls[0].metadata.as_ref().unwrap()["previous_version"],
        "1.18.0-1"
    );
    assert_eq!(calls[1].step_name, "plain");
    assert!(calls[1].metadata.is_none());
}

#[tokio::test]
async fn empty_list_is_a_no_op() {
    let runtime = RecordingRuntime::new();
    let ctx = runtime.context("a");

    server_rollback_workflow(&ctx, rollback_input("a", vec![])).await;

    assert!(runtime.rollback_calls().is_empty());
}
