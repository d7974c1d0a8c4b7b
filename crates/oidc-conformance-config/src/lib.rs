// crates/oidc-conformance-config/src/lib.rs
// ============================================================================
// Module: OIDC Conformance Config Library
// Description: Canonical config model and validation for the harness.
// Purpose: Single source of truth for oidc-conformance.toml semantics.
// Dependencies: serde, toml, url
// ============================================================================

//! ## Overview
//! `oidc-conformance-config` defines the configuration model for the
//! conformance harness: where the suite lives, how to authenticate to it,
//! which test plan to run, and where artifacts land. Loading is strict and
//! fail-closed so a bad config never reaches the network.
//!
//! Security posture: config inputs are untrusted; size, length, and scheme
//! limits are enforced before any value is used.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
