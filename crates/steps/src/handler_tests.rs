// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn builtins_cover_the_closed_catalogue() {
    let registry = HandlerRegistry::with_builtins();
    assert_eq!(registry.len(), 5);
    for step_type in ["echo", "sleep", "file_write", "script", "yum_upgrade"] {
        assert!(registry.get(step_type).is_some(), "missing handler for {step_type}");
    }
}

#[test]
fn lookup_misses_for_unregistered_types() {
    let registry = HandlerRegistry::with_builtins();
    assert!(registry.get("frobnicate").is_none());
}

#[test]
fn empty_registry() {
    let registry = HandlerRegistry::new();
    assert!(registry.is_empty());
    assert!(registry.get("echo").is_none());
}

#[test]
fn registration_replaces_existing_handler() {
    let mut registry = HandlerRegistry::new();
    registry.register("echo", Arc::new(crate::handlers::EchoHandler));
    registry.register("echo", Arc::new(crate::handlers::EchoHandler));
    assert_eq!(registry.len(), 1);
}
