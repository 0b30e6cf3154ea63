// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scenario tests for the coordinator: strategy drivers, the failure
//! budget, and rollback fan-out, observed through a recording runtime.

use super::*;
use crate::test_support::RecordingRuntime;
use ripple_core::test_support::{echo_step, request, step};
use ripple_core::{RolloutStrategy, ORCHESTRATOR_TASK_QUEUE};

async fn orchestrate(
    runtime: &RecordingRuntime,
    req: ExecutionRequest,
) -> Result<OrchestrationResult, OrchestrationError> {
    let ctx = runtime.context(ORCHESTRATOR_TASK_QUEUE);
    orchestration_workflow(&ctx, req).await
}

/// A step list whose second step fails (required) on the given server.
fn failing_script_steps(runtime: &RecordingRuntime, server: &str) -> Vec<StepDefinition> {
    runtime.fail_step(server, "breaks", "exit 1");
    vec![
        step("works", "script").param("script", "/bin/true").required().build(),
        step("breaks", "script").param("script", "/bin/false").required().build(),
    ]
}

#[tokio::test]
async fn happy_parallel_patches_every_server() {
    let runtime = RecordingRuntime::new();
    let req = request(&["a", "b", "c"], vec![echo_step("hi")], RolloutStrategy::parallel(0));

    let result = orchestrate(&runtime, req).await.unwrap();

    assert!(result.success);
    assert_eq!(result.servers_patched, 3);
    assert_eq!(result.servers_failed, 0);
    assert_eq!(result.results.len(), 3);

    // one execute per server, each pinned to the server's own queue
    let calls = runtime.execute_calls();
    assert_eq!(calls.len(), 3);
    for call in &calls {
        assert_eq!(call.task_queue, call.server_id.as_str());
    }
    assert!(runtime.rollback_calls().is_empty());
}

#[tokio::test]
async fn rolling_paces_between_batches() {
    let runtime = RecordingRuntime::new();
    let req = request(
        &["a", "b", "c", "d"],
        vec![echo_step("hi")],
        RolloutStrategy::rolling(2, 1, 1),
    );

    let result = orchestrate(&runtime, req).await.unwrap();

    assert!(result.success);
    assert_eq!(result.servers_patched, 4);
    // two batches of two, so exactly one inter-batch sleep
    assert_eq!(runtime.sleeps(), vec![std::time::Duration::from_secs(1)]);
    assert_eq!(runtime.execute_calls().len(), 4);
}

#[tokio::test]
async fn rolling_skips_the_sleep_after_the_last_batch() {
    let runtime = RecordingRuntime::new();
    let req = request(&["a", "b"], vec![echo_step("hi")], RolloutStrategy::rolling(2, 30, 0));

    orchestrate(&runtime, req).await.unwrap();

    assert!(runtime.sleeps().is_empty());
}

#[tokio::test]
async fn rolling_zero_batch_size_means_one() {
    let runtime = RecordingRuntime::new();
    let req = request(&["a", "b", "c"], vec![echo_step("hi")], RolloutStrategy::rolling(0, 1, 0));

    let result = orchestrate(&runtime, req).await.unwrap();

    assert!(result.success);
    // three singleton batches -> two inter-batch sleeps
    assert_eq!(runtime.sleeps().len(), 2);
}

#[tokio::test]
async fn validation_rejects_typo_before_any_dispatch() {
    let runtime = RecordingRuntime::new();
    let req = request(
        &["a", "b"],
        vec![step("upgrade", "yum_upgrade")
            .param("package", "nginx")
            .param("version", "1.20")
            .param("verison", "x")
            .build()],
        RolloutStrategy::parallel(0),
    );

    let err = orchestrate(&runtime, req).await.unwrap_err();

    assert!(matches!(err, OrchestrationError::Validation(_)));
    assert!(
        err.to_string().contains("unsupported parameters: verison"),
        "got: {err}"
    );
    // zero activities, zero children
    assert!(runtime.calls().is_empty());
    assert!(runtime.started_workflows().is_empty());
}

#[tokio::test]
async fn required_failure_within_budget_does_not_roll_back() {
    let runtime = RecordingRuntime::new();
    let steps = failing_script_steps(&runtime, "a");
    let req = request(&["a"], steps, RolloutStrategy::sequential(1));

    let result = orchestrate(&runtime, req).await.unwrap();

    assert!(!result.success);
    assert_eq!(result.servers_failed, 1);
    let server_result = &result.results[0];
    assert!(!server_result.success);
    assert!(server_result.error.as_ref().unwrap().starts_with("Required step 'breaks' failed:"));

    // 1 failure <= maxFailures 1: no rollback fan-out
    assert!(runtime.rollback_calls().is_empty());
}

#[tokio::test]
async fn budget_breach_rolls_back_succeeded_servers_only() {
    let runtime = RecordingRuntime::new();
    runtime.fail_step("c", "patch", "exit 1");
    let req = request(
        &["a", "b", "c"],
        vec![step("patch", "script").param("script", "/bin/x").required().build()],
        RolloutStrategy::parallel(0),
    );

    let err = orchestrate(&runtime, req).await.unwrap_err();

    let OrchestrationError::FailureBudgetExceeded { failures, max_failures, results } = err
    else {
        panic!("expected FailureBudgetExceeded, got: {err}");
    };
    assert_eq!(failures, 1);
    assert_eq!(max_failures, 0);
    assert_eq!(results.len(), 3);

    // rollback observed on a and b, never on the failed c
    let rollbacks = runtime.rollback_calls();
    let mut servers: Vec<&str> = rollbacks.iter().map(|c| c.server_id.as_str()).collect();
    servers.sort_unstable();
    assert_eq!(servers, ["a", "b"]);
    // each rollback pinned to that server's task queue
    for call in &rollbacks {
        assert_eq!(call.task_queue, call.server_id.as_str());
    }

    let started = runtime.started_workflows();
    assert!(started.contains(&"rollback-a".to_string()));
    assert!(started.contains(&"rollback-b".to_string()));
    assert!(!started.contains(&"rollback-c".to_string()));
}

#[tokio::test]
async fn budget_breach_error_message_format() {
    let runtime = RecordingRuntime::new();
    let steps = failing_script_steps(&runtime, "a");
    let req = request(&["a"], steps, RolloutStrategy::parallel(0));

    let err = orchestrate(&runtime, req).await.unwrap_err();
    assert_eq!(err.to_string(), "exceeded max failures: 1 > 0");
}

#[tokio::test]
async fn sequential_stops_launching_after_breach() {
    let runtime = RecordingRuntime::new();
    let steps = failing_script_steps(&runtime, "a");
    let req = request(&["a", "b", "c"], steps, RolloutStrategy::sequential(0));

    let err = orchestrate(&runtime, req).await.unwrap_err();
    assert!(matches!(err, OrchestrationError::FailureBudgetExceeded { .. }));

    // b and c were never launched once the budget broke on a
    assert_eq!(runtime.started_workflows(), vec!["exec-a".to_string()]);
}

#[tokio::test]
async fn rolling_stops_after_a_breaching_batch_and_rolls_back() {
    let runtime = RecordingRuntime::new();
    runtime.fail_step("b", "patch", "exit 1");
    let req = request(
        &["a", "b", "c", "d"],
        vec![step("patch", "script").param("script", "/bin/x").required().build()],
        RolloutStrategy::rolling(2, 5, 0),
    );

    let err = orchestrate(&runtime, req).await.unwrap_err();
    assert!(matches!(err, OrchestrationError::FailureBudgetExceeded { .. }));

    let started = runtime.started_workflows();
    assert!(started.contains(&"exec-a".to_string()));
    assert!(started.contains(&"exec-b".to_string()));
    assert!(!started.contains(&"exec-c".to_string()));
    assert!(!started.contains(&"exec-d".to_string()));
    assert!(started.contains(&"rollback-a".to_string()));
    // no pacing sleep once the rollout aborted
    assert!(runtime.sleeps().is_empty());
}

#[tokio::test]
async fn child_runtime_failure_becomes_a_synthetic_result() {
    let runtime = RecordingRuntime::new();
    runtime.fail_child("exec-b");
    let req = request(&["a", "b", "c"], vec![echo_step("hi")], RolloutStrategy::parallel(1));

    let result = orchestrate(&runtime, req).await.unwrap();

    assert!(!result.success);
    assert_eq!(result.servers_patched, 2);
    assert_eq!(result.servers_failed, 1);

    let b = result.results.iter().find(|r| r.server_id == "b").unwrap();
    assert!(!b.success);
    assert!(b.error.as_ref().unwrap().contains("simulated runtime failure"));
    assert!(b.steps_executed.is_empty());
}

#[tokio::test]
async fn negative_budget_disables_the_check() {
    let runtime = RecordingRuntime::new();
    runtime.fail_step("a", "patch", "exit 1");
    runtime.fail_step("b", "patch", "exit 1");
    let req = request(
        &["a", "b"],
        vec![step("patch", "script").param("script", "/bin/x").required().build()],
        RolloutStrategy::parallel(-1),
    );

    let result = orchestrate(&runtime, req).await.unwrap();

    assert!(!result.success);
    assert_eq!(result.servers_failed, 2);
    assert!(runtime.rollback_calls().is_empty());
}

#[tokio::test]
async fn unknown_strategy_tag_runs_as_parallel() {
    let runtime = RecordingRuntime::new();
    let strategy: RolloutStrategy =
        serde_json::from_str(r#"{"type": "BlueGreen", "maxFailures": 0}"#).unwrap();
    let req = request(&["a", "b"], vec![echo_step("hi")], strategy);

    let result = orchestrate(&runtime, req).await.unwrap();

    assert!(result.success);
    assert_eq!(result.servers_patched, 2);
}

#[tokio::test]
async fn result_accounting_always_adds_up() {
    let runtime = RecordingRuntime::new();
    runtime.fail_step("b", "patch", "exit 1");
    let req = request(
        &["a", "b", "c"],
        vec![step("patch", "script").param("script", "/bin/x").required().build()],
        RolloutStrategy::parallel(5),
    );

    let result = orchestrate(&runtime, req).await.unwrap();

    assert_eq!(
        result.servers_patched + result.servers_failed,
        result.results.len() as u32
    );
    assert_eq!(result.success, result.servers_failed == 0);
}
