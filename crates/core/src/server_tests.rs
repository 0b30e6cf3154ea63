// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn task_queue_is_the_server_id() {
    let id = ServerId::new("web-01");
    assert_eq!(id.task_queue(), "web-01");
}

#[test]
fn workflow_ids_carry_the_role_prefix() {
    let id = ServerId::new("web-01");
    assert_eq!(id.execution_workflow_id(), "exec-web-01");
    assert_eq!(id.rollback_workflow_id(), "rollback-web-01");
}

#[test]
fn serializes_as_plain_string() {
    let id = ServerId::new("db-2");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"db-2\"");
    let back: ServerId = serde_json::from_str("\"db-2\"").unwrap();
    assert_eq!(back, id);
}

#[test]
fn compares_against_str() {
    let id = ServerId::new("a");
    assert_eq!(id, "a");
    assert!(!id.is_empty());
    assert!(ServerId::new("").is_empty());
}
