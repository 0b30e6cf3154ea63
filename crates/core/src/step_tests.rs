// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn deserializes_wire_field_names() {
    let step: StepDefinition = serde_json::from_str(
        r#"{
            "name": "upgrade nginx",
            "type": "yum_upgrade",
            "params": {"package": "nginx", "version": "1.20.0"},
            "required": true,
            "continueOnFailure": false
        }"#,
    )
    .unwrap();

    assert_eq!(step.name, "upgrade nginx");
    assert_eq!(step.step_type, "yum_upgrade");
    assert!(step.required);
    assert!(!step.continue_on_failure);
    let params = step.params.as_ref().unwrap();
    assert_eq!(params["package"], "nginx");
}

#[test]
fn optional_fields_default() {
    let step: StepDefinition =
        serde_json::from_str(r#"{"name": "n", "type": "echo"}"#).unwrap();
    assert!(step.params.is_none());
    assert!(!step.required);
    assert!(!step.continue_on_failure);
}

#[test]
fn aborts_on_failure_gate() {
    let mut step = StepDefinition::new("s", "echo");
    assert!(!step.aborts_on_failure());

    step.required = true;
    assert!(step.aborts_on_failure());

    step.continue_on_failure = true;
    assert!(!step.aborts_on_failure());
}

#[test]
fn serializes_camel_case() {
    let mut step = StepDefinition::new("s", "script");
    step.continue_on_failure = true;
    let json = serde_json::to_value(&step).unwrap();
    assert_eq!(json["continueOnFailure"], true);
    assert_eq!(json["type"], "script");
    // absent params are omitted, not null
    assert!(json.get("params").is_none());
}
