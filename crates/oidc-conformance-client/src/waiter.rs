// crates/oidc-conformance-client/src/waiter.rs
// ============================================================================
// Module: Module Wait Loop
// Description: Polls a module instance until it reaches a target status.
// Purpose: Drive one module from creation to a terminal condition.
// Dependencies: tokio, oidc-conformance-client internals
// ============================================================================

//! ## Overview
//! Single-caller polling loop over [`ConformanceClient::module_info`]. Each
//! tick fetches the module's status, returns when the status lands in the
//! caller-supplied target set, dispatches the injected
//! [`InteractionCompleter`] on `WAITING`, tolerates the transient `CREATED`
//! and `RUNNING` states, and fails fast on anything else.
//!
//! ## Invariants
//! - The deadline is checked at the top of every tick, so unbounded `WAITING`
//!   excursions cannot extend the wall-clock budget.
//! - The target-set check precedes the `WAITING` branch; a caller awaiting
//!   `WAITING` observes it without triggering interaction completion.
//! - Status may move non-monotonically between ticks; only membership in the
//!   target set ends the loop successfully.
//!
//! Security posture: module identifiers are validated by the client layer
//! before entering request paths; this module adds no network surface.

use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;

use crate::client::ClientError;
use crate::client::ConformanceClient;
use crate::completion::CompletionError;
use crate::completion::InteractionCompleter;
use crate::diag;
use crate::model::ModuleResult;
use crate::model::ModuleStatus;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default wall-clock budget for one module's wait.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(240);
/// Default delay between status polls.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
/// Default settle time after an interactive step completes.
const DEFAULT_INTERACTION_DELAY: Duration = Duration::from_secs(5);

// ============================================================================
// SECTION: Wait Configuration
// ============================================================================

/// Timing knobs for the wait loop.
///
/// # Invariants
/// - `timeout` bounds the whole wait; the intervals only shape poll cadence.
#[derive(Debug, Clone, Copy)]
pub struct WaitConfig {
    /// Wall-clock budget for the whole wait.
    pub timeout: Duration,
    /// Delay between status polls.
    pub poll_interval: Duration,
    /// Settle time after invoking interaction completion.
    pub interaction_delay: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_WAIT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            interaction_delay: DEFAULT_INTERACTION_DELAY,
        }
    }
}

impl WaitConfig {
    /// Returns the default configuration with `timeout` overridden.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }
}

// ============================================================================
// SECTION: Wait Errors
// ============================================================================

/// Errors ending a wait without reaching the target set.
///
/// # Invariants
/// - Every variant names enough context to report the module without access
///   to the loop's internal state.
#[derive(Debug, Error)]
pub enum WaitError {
    /// The wall-clock budget elapsed before any target status was observed.
    #[error("timed out waiting for module {module_id} to reach one of: {targets}")]
    Timeout {
        /// Module being waited on.
        module_id: String,
        /// Formatted target status set.
        targets: String,
    },
    /// The module reached a status that is neither transient nor targeted.
    #[error("module {module_id} failed with status {status}")]
    ModuleFailed {
        /// Module being waited on.
        module_id: String,
        /// Status that ended the wait.
        status: ModuleStatus,
    },
    /// A status poll failed at the client layer.
    #[error(transparent)]
    Client(#[from] ClientError),
    /// Interaction completion failed.
    #[error(transparent)]
    Completion(#[from] CompletionError),
}

// ============================================================================
// SECTION: Wait Loop
// ============================================================================

/// Polls `module_id` until its status lands in `targets`.
///
/// Returns the terminal status together with the result observed on the same
/// poll. `CREATED` and `RUNNING` are tolerated indefinitely within the
/// timeout; `WAITING` dispatches `completer` and then settles before the next
/// poll; any other non-target status fails immediately.
///
/// # Errors
///
/// Returns [`WaitError::Timeout`] when the budget elapses,
/// [`WaitError::ModuleFailed`] on a non-transient non-target status, and the
/// wrapped client or completion error when a tick itself fails.
pub async fn wait_for_status(
    client: &ConformanceClient,
    completer: &dyn InteractionCompleter,
    module_id: &str,
    targets: &[ModuleStatus],
    config: &WaitConfig,
) -> Result<(ModuleStatus, Option<ModuleResult>), WaitError> {
    let deadline = Instant::now() + config.timeout;
    loop {
        if Instant::now() > deadline {
            return Err(WaitError::Timeout {
                module_id: module_id.to_string(),
                targets: format_status_set(targets),
            });
        }
        let info = client.module_info(module_id).await?;
        diag::stderr_line(&format!("module {module_id} status is {}", info.status));
        if targets.contains(&info.status) {
            return Ok((info.status, info.result));
        }
        match info.status {
            ModuleStatus::Waiting => {
                diag::stderr_line(&format!("module {module_id} completing interactive step"));
                completer.complete(module_id).await?;
                tokio::time::sleep(config.interaction_delay).await;
            }
            ModuleStatus::Created | ModuleStatus::Running => {}
            status => {
                return Err(WaitError::ModuleFailed {
                    module_id: module_id.to_string(),
                    status,
                });
            }
        }
        tokio::time::sleep(config.poll_interval).await;
    }
}

/// Formats a target status set for error messages.
fn format_status_set(targets: &[ModuleStatus]) -> String {
    let names: Vec<&str> = targets.iter().map(|status| status.as_str()).collect();
    names.join(", ")
}
