// crates/oidc-conformance-cli/src/lib.rs
// ============================================================================
// Module: OIDC Conformance CLI Library
// Description: Run driver, expected outcomes, reporting, and i18n for the
//              conformance CLI.
// Purpose: Back the `oidc-conformance` binary with testable building blocks.
// Dependencies: oidc-conformance-client, serde, serde_jcs, thiserror, time
// ============================================================================

//! ## Overview
//! This crate carries everything the `oidc-conformance` binary needs beyond
//! argument parsing: the run driver that walks the client test plan module by
//! module, the expected-outcome table it checks results against, the run
//! report it accumulates, and the message catalog all output goes through.
//! Invariants:
//! - Every module of a run is recorded exactly once, as passed or failed.
//! - All user-facing strings are routed through the [`t!`](crate::t) macro.
//!
//! Security posture: module names, identifiers, and results all originate
//! from the remote suite and are treated as untrusted display data.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod expectations;
pub mod i18n;
pub mod output;
pub mod report;
pub mod runner;
