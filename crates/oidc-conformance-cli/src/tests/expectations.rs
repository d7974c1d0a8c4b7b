// crates/oidc-conformance-cli/src/tests/expectations.rs
// ============================================================================
// Module: Expected Outcome Tests
// Description: Unit tests for the client test plan outcome table.
// Purpose: Ensure the outcome table stays complete, unique, and in plan order.
// Dependencies: oidc-conformance-cli expectations module, oidc-conformance-client
// ============================================================================

//! ## Overview
//! Verifies the expected-outcome table covers the full client test plan,
//! keeps module names unique, and records the handful of modules that
//! legitimately end in failure, interruption, or no result at all.

use std::collections::BTreeSet;

use oidc_conformance_client::ModuleResult;
use oidc_conformance_client::ModuleStatus;

use crate::expectations::EXPECTED_OUTCOMES;
use crate::expectations::expected_outcome;

#[test]
fn table_covers_the_full_plan() {
    assert_eq!(EXPECTED_OUTCOMES.len(), 25, "outcome table must cover all plan modules");
}

#[test]
fn module_names_are_unique() {
    let mut seen = BTreeSet::new();
    for outcome in EXPECTED_OUTCOMES {
        assert!(seen.insert(outcome.module), "duplicate module entry: {}", outcome.module);
    }
}

#[test]
fn every_entry_names_statuses_and_results() {
    for outcome in EXPECTED_OUTCOMES {
        assert!(!outcome.statuses.is_empty(), "no target statuses for {}", outcome.module);
        assert!(!outcome.results.is_empty(), "no accepted results for {}", outcome.module);
    }
}

#[test]
fn table_preserves_plan_order() {
    assert_eq!(EXPECTED_OUTCOMES[0].module, "oidcc-client-test");
    assert_eq!(EXPECTED_OUTCOMES[1].module, "oidcc-client-test-nonce-invalid");
    assert_eq!(EXPECTED_OUTCOMES[16].module, "oidcc-client-test-userinfo-bearer-body");
    assert_eq!(EXPECTED_OUTCOMES[24].module, "oidcc-client-test-userinfo-signed");
}

#[test]
fn bearer_body_module_waits_without_result() {
    let outcome = expected_outcome("oidcc-client-test-userinfo-bearer-body")
        .expect("bearer-body module is part of the plan");
    assert_eq!(outcome.statuses, &[ModuleStatus::Waiting]);
    assert_eq!(outcome.results, &[None]);
}

#[test]
fn negative_modules_accept_interruption() {
    let negative = [
        "oidcc-client-test-client-secret-basic",
        "oidcc-client-test-scope-userinfo-claims",
        "oidcc-client-test-discovery-jwks-uri-keys",
        "oidcc-client-test-discovery-issuer-mismatch",
        "oidcc-client-test-signing-key-rotation-just-before-signing",
        "oidcc-client-test-signing-key-rotation",
    ];
    for module in negative {
        let outcome = expected_outcome(module).expect("negative module is part of the plan");
        assert!(
            outcome.statuses.contains(&ModuleStatus::Interrupted),
            "negative module {module} must tolerate interruption"
        );
        assert_eq!(
            outcome.results,
            &[Some(ModuleResult::Failed)],
            "negative module {module} is expected to fail"
        );
    }
}

#[test]
fn sig_none_module_is_expected_to_skip() {
    let outcome = expected_outcome("oidcc-client-test-idtoken-sig-none")
        .expect("sig-none module is part of the plan");
    assert_eq!(outcome.results, &[Some(ModuleResult::Skipped)]);
}

#[test]
fn lookup_misses_unknown_module() {
    assert!(expected_outcome("oidcc-client-test-unknown").is_none());
}
