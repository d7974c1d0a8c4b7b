// crates/oidc-conformance-client/src/lib.rs
// ============================================================================
// Module: OIDC Conformance Client Library
// Description: HTTP client, retry transport, and wait loop for the OpenID
//              conformance suite API.
// Purpose: Drive remote conformance test modules to terminal states.
// Dependencies: reqwest, serde, tokio, url, zip
// ============================================================================

//! ## Overview
//! This crate wraps the OpenID conformance suite's HTTP API: typed operations
//! for plans and test modules layered on a retrying transport, plus the
//! polling loop that drives one module instance to a terminal status.
//! Invariants:
//! - Every request is attempted at most [`transport::MAX_SEND_ATTEMPTS`] times.
//! - Response bodies are read through fail-closed size caps.
//! - Exported archives are integrity-checked before being reported as written.
//!
//! Security posture: the remote suite and the relying party under test are
//! external systems; treat their responses as untrusted input.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;
pub mod completion;
mod diag;
pub mod model;
pub mod transport;
pub mod waiter;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::ClientConfig;
pub use client::ClientError;
pub use client::ConformanceClient;
pub use client::MAX_ARCHIVE_BYTES;
pub use client::MAX_JSON_RESPONSE_BYTES;
pub use completion::CompletionError;
pub use completion::InteractionCompleter;
pub use completion::NoopCompleter;
pub use completion::RelyingPartyCompleter;
pub use model::AvailableModule;
pub use model::ModuleInfo;
pub use model::ModuleInstance;
pub use model::ModuleResult;
pub use model::ModuleStatus;
pub use model::PlanModule;
pub use model::TestPlan;
pub use model::display_result;
pub use transport::RetryPolicy;
pub use transport::TransportError;
pub use transport::TransportResponse;
pub use waiter::DEFAULT_WAIT_TIMEOUT;
pub use waiter::WaitConfig;
pub use waiter::WaitError;
pub use waiter::wait_for_status;
