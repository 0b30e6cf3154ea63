// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use ripple_core::StrategyKind;
use std::io::Write;

const REQUEST: &str = r#"{
    "servers": ["web-01", "web-02"],
    "steps": [
        {"name": "hello", "type": "echo", "params": {"message": "hi"}, "required": true}
    ],
    "rolloutStrategy": {"type": "Rolling", "batchSize": 1, "batchDelaySeconds": 5, "maxFailures": 0}
}"#;

#[test]
fn loads_a_request_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(REQUEST.as_bytes()).unwrap();

    let request = load_request(file.path()).unwrap();
    assert_eq!(request.servers.len(), 2);
    assert_eq!(request.steps[0].step_type, "echo");
    assert_eq!(request.rollout_strategy.kind, StrategyKind::Rolling);
    assert_eq!(request.rollout_strategy.batch_delay_seconds, 5);
}

#[test]
fn missing_file_reports_the_path() {
    let err = load_request(Path::new("/no/such/request.json")).unwrap_err();
    assert!(err.to_string().contains("/no/such/request.json"));
}

#[test]
fn malformed_json_reports_the_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"{not json").unwrap();

    let err = load_request(file.path()).unwrap_err();
    assert!(err.to_string().contains("invalid rollout request"));
}
