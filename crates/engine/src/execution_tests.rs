// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::RecordingRuntime;
use ripple_core::test_support::step;
use ripple_core::ServerId;

fn input(server: &str, steps: Vec<ripple_core::StepDefinition>) -> ExecutionInput {
    ExecutionInput { server_id: ServerId::new(server), steps }
}

#[tokio::test]
async fn executes_steps_in_definition_order() {
    let runtime = RecordingRuntime::new();
    let ctx = runtime.context("web-01");

    let result = server_execution_workflow(
        &ctx,
        input(
            "web-01",
            vec![
                step("first", "echo").param("message", "1").build(),
                step("second", "echo").param("message", "2").build(),
                step("third", "echo").param("message", "3").build(),
            ],
        ),
    )
    .await;

    assert!(result.success);
    assert!(result.error.is_none());

    let calls = runtime.execute_calls();
    let order: Vec<&str> = calls.iter().map(|c| c.step_name.as_str()).collect();
    assert_eq!(order, ["first", "second", "third"]);
    assert!(calls.iter().all(|c| c.task_queue == "web-01"));
    assert!(calls.iter().all(|c| c.server_id == "web-01"));
}

#[tokio::test]
async fn optional_step_failure_continues() {
    let runtime = RecordingRuntime::new();
    runtime.fail_step("a", "flaky", "exit 1");
    let ctx = runtime.context("a");

    let result = server_execution_workflow(
        &ctx,
        input(
            "a",
            vec![
                step("setup", "echo").param("message", "x").build(),
                step("flaky", "script").param("script", "/bin/false").build(),
                step("finish", "echo").param("message", "y").build(),
            ],
        ),
    )
    .await;

    assert!(result.success, "optional failure must not abort the pipeline");
    assert_eq!(result.steps_executed.len(), 3);
    assert!(result.steps_executed[0].success);
    assert!(!result.steps_executed[1].success);
    assert!(result.steps_executed[1].error.as_ref().unwrap().contains("exit 1"));
    assert!(result.steps_executed[2].success);
}

#[tokio::test]
async fn required_step_failure_aborts_the_pipeline() {
    let runtime = RecordingRuntime::new();
    runtime.fail_step("a", "deploy", "exit 7");
    let ctx = runtime.context("a");

    let result = server_execution_workflow(
        &ctx,
        input(
            "a",
            vec![
                step("setup", "echo").param("message", "x").required().build(),
                step("deploy", "script").param("script", "/bin/false").required().build(),
                step("never", "echo").param("message", "z").required().build(),
            ],
        ),
    )
    .await;

    assert!(!result.success);
    let error = result.error.unwrap();
    assert!(
        error.starts_with("Required step 'deploy' failed:"),
        "got: {error}"
    );
    // result list is truncated at the abort point
    assert_eq!(result.steps_executed.len(), 2);
    // the third step was never dispatched
    assert_eq!(runtime.execute_calls().len(), 2);
}

#[tokio::test]
async fn continue_on_failure_overrides_required() {
    let runtime = RecordingRuntime::new();
    runtime.fail_step("a", "deploy", "exit 7");
    let ctx = runtime.context("a");

    let result = server_execution_workflow(
        &ctx,
        input(
            "a",
            vec![
                step("deploy", "script")
                    .param("script", "/bin/false")
                    .required()
                    .continue_on_failure()
                    .build(),
                step("after", "echo").param("message", "x").build(),
            ],
        ),
    )
    .await;

    assert!(result.success);
    assert_eq!(result.steps_executed.len(), 2);
    assert_eq!(runtime.execute_calls().len(), 2);
}

#[tokio::test]
async fn empty_step_list_succeeds_trivially() {
    let runtime = RecordingRuntime::new();
    let ctx = runtime.context("a");

    let result = server_execution_workflow(&ctx, input("a", vec![])).await;

    assert!(result.success);
    assert!(result.steps_executed.is_empty());
    assert!(runtime.execute_calls().is_empty());
}
