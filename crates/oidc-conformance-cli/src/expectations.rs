// crates/oidc-conformance-cli/src/expectations.rs
// ============================================================================
// Module: Expected Module Outcomes
// Description: Terminal-status targets and accepted results for every module
//              of the relying-party client test plan.
// Purpose: Encode which suite outcomes count as a pass for each module.
// Dependencies: oidc-conformance-client
// ============================================================================

//! ## Overview
//! The client test plan exercises a relying party with both well-formed and
//! deliberately broken provider behavior, so a matching outcome is not always
//! `PASSED`: modules probing unsupported authentication schemes are expected
//! to end `FAILED`, the `none`-algorithm module is expected to be skipped,
//! and the form-encoded bearer-body module never leaves `WAITING` because
//! compliant clients refuse to respond to it.
//! Invariants:
//! - [`EXPECTED_OUTCOMES`] preserves the plan's published module order.
//! - Every entry names at least one target status and one accepted result.

// ============================================================================
// SECTION: Imports
// ============================================================================

use oidc_conformance_client::ModuleResult;
use oidc_conformance_client::ModuleStatus;

// ============================================================================
// SECTION: Outcome Type
// ============================================================================

/// Expected terminal condition for one module of the client test plan.
///
/// # Invariants
/// - `statuses` is the wait loop's target set; reaching any listed status
///   ends the wait for this module.
/// - `results` lists every result accepted as a match, where `None` covers
///   modules that legitimately finish without producing a result.
#[derive(Debug, Clone, Copy)]
pub struct ExpectedOutcome {
    /// Module name as published in the plan.
    pub module: &'static str,
    /// Statuses accepted as terminal for this module.
    pub statuses: &'static [ModuleStatus],
    /// Results that count as a matching outcome.
    pub results: &'static [Option<ModuleResult>],
}

// ============================================================================
// SECTION: Shared Sets
// ============================================================================

/// Modules that run to completion unconditionally.
const FINISHED: &[ModuleStatus] = &[ModuleStatus::Finished];
/// Modules the suite may cut short when the client declines the exchange.
const FINISHED_OR_INTERRUPTED: &[ModuleStatus] =
    &[ModuleStatus::Finished, ModuleStatus::Interrupted];
/// Modules that stall awaiting input a compliant client never sends.
const WAITING: &[ModuleStatus] = &[ModuleStatus::Waiting];

/// Accepted result: the module passed.
const PASSED: &[Option<ModuleResult>] = &[Some(ModuleResult::Passed)];
/// Accepted result: the module failed, and failing is the expectation.
const FAILED: &[Option<ModuleResult>] = &[Some(ModuleResult::Failed)];
/// Accepted result: the module was skipped.
const SKIPPED: &[Option<ModuleResult>] = &[Some(ModuleResult::Skipped)];
/// Accepted result: the module produced no result at all.
const NO_RESULT: &[Option<ModuleResult>] = &[None];

// ============================================================================
// SECTION: Outcome Table
// ============================================================================

/// Expected outcomes for every module of the client test plan, in plan order.
pub const EXPECTED_OUTCOMES: &[ExpectedOutcome] = &[
    ExpectedOutcome {
        module: "oidcc-client-test",
        statuses: FINISHED,
        results: PASSED,
    },
    ExpectedOutcome {
        module: "oidcc-client-test-nonce-invalid",
        statuses: FINISHED,
        results: PASSED,
    },
    ExpectedOutcome {
        module: "oidcc-client-test-client-secret-basic",
        statuses: FINISHED_OR_INTERRUPTED,
        results: FAILED,
    },
    ExpectedOutcome {
        module: "oidcc-client-test-scope-userinfo-claims",
        statuses: FINISHED_OR_INTERRUPTED,
        results: FAILED,
    },
    ExpectedOutcome {
        module: "oidcc-client-test-kid-absent-single-jwks",
        statuses: FINISHED,
        results: PASSED,
    },
    ExpectedOutcome {
        module: "oidcc-client-test-kid-absent-multiple-jwks",
        statuses: FINISHED,
        results: PASSED,
    },
    ExpectedOutcome {
        module: "oidcc-client-test-missing-iat",
        statuses: FINISHED,
        results: PASSED,
    },
    ExpectedOutcome {
        module: "oidcc-client-test-missing-aud",
        statuses: FINISHED,
        results: PASSED,
    },
    ExpectedOutcome {
        module: "oidcc-client-test-invalid-aud",
        statuses: FINISHED,
        results: PASSED,
    },
    ExpectedOutcome {
        module: "oidcc-client-test-idtoken-sig-none",
        statuses: FINISHED,
        results: SKIPPED,
    },
    ExpectedOutcome {
        module: "oidcc-client-test-idtoken-sig-rs256",
        statuses: FINISHED,
        results: PASSED,
    },
    ExpectedOutcome {
        module: "oidcc-client-test-missing-sub",
        statuses: FINISHED,
        results: PASSED,
    },
    ExpectedOutcome {
        module: "oidcc-client-test-invalid-sig-rs256",
        statuses: FINISHED,
        results: PASSED,
    },
    ExpectedOutcome {
        module: "oidcc-client-test-invalid-iss",
        statuses: FINISHED,
        results: PASSED,
    },
    ExpectedOutcome {
        module: "oidcc-client-test-userinfo-invalid-sub",
        statuses: FINISHED,
        results: PASSED,
    },
    ExpectedOutcome {
        module: "oidcc-client-test-userinfo-bearer-header",
        statuses: FINISHED,
        results: PASSED,
    },
    ExpectedOutcome {
        module: "oidcc-client-test-userinfo-bearer-body",
        statuses: WAITING,
        results: NO_RESULT,
    },
    ExpectedOutcome {
        module: "oidcc-client-test-invalid-sig-hs256",
        statuses: FINISHED,
        results: PASSED,
    },
    ExpectedOutcome {
        module: "oidcc-client-test-invalid-sig-es256",
        statuses: FINISHED,
        results: PASSED,
    },
    ExpectedOutcome {
        module: "oidcc-client-test-discovery-openid-config",
        statuses: FINISHED,
        results: PASSED,
    },
    ExpectedOutcome {
        module: "oidcc-client-test-discovery-jwks-uri-keys",
        statuses: FINISHED_OR_INTERRUPTED,
        results: FAILED,
    },
    ExpectedOutcome {
        module: "oidcc-client-test-discovery-issuer-mismatch",
        statuses: FINISHED_OR_INTERRUPTED,
        results: FAILED,
    },
    ExpectedOutcome {
        module: "oidcc-client-test-signing-key-rotation-just-before-signing",
        statuses: FINISHED_OR_INTERRUPTED,
        results: FAILED,
    },
    ExpectedOutcome {
        module: "oidcc-client-test-signing-key-rotation",
        statuses: FINISHED_OR_INTERRUPTED,
        results: FAILED,
    },
    ExpectedOutcome {
        module: "oidcc-client-test-userinfo-signed",
        statuses: FINISHED,
        results: PASSED,
    },
];

// ============================================================================
// SECTION: Lookup
// ============================================================================

/// Returns the expected outcome for `module`, if the plan covers it.
#[must_use]
pub fn expected_outcome(module: &str) -> Option<&'static ExpectedOutcome> {
    EXPECTED_OUTCOMES.iter().find(|outcome| outcome.module == module)
}
