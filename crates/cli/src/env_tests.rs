// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

// Env mutation is process-global, so both cases live in one test.
#[test]
fn server_id_env_override_and_default() {
    std::env::remove_var("SERVER_ID");
    assert_eq!(server_id(), "dev-local");

    std::env::set_var("SERVER_ID", "web-07");
    assert_eq!(server_id(), "web-07");

    // empty value falls back to the default
    std::env::set_var("SERVER_ID", "");
    assert_eq!(server_id(), "dev-local");

    std::env::remove_var("SERVER_ID");
}
