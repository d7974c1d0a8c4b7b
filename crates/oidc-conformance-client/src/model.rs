// crates/oidc-conformance-client/src/model.rs
// ============================================================================
// Module: Conformance Suite Data Model
// Description: Wire types for plans, module instances, and module state.
// Purpose: Give typed shape to the suite's JSON payloads.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Typed views over the conformance suite's JSON payloads. Only the fields the
//! driver consumes are modeled; unknown fields are ignored on deserialization.
//! Invariants:
//! - Status and result variants are stable for serialization and comparison.
//! - A plan's module list preserves the order returned by the suite.
//!
//! Security posture: all payloads originate from the remote suite and are
//! untrusted; identifiers embedded in them are validated before reuse in URLs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Module Status
// ============================================================================

/// Lifecycle status of a test module instance as tracked by the suite.
///
/// # Invariants
/// - Variants are stable for serialization and target-set matching.
/// - [`ModuleStatus::Interrupted`] and [`ModuleStatus::Finished`] are the only
///   statuses the suite treats as terminal; the wait loop's terminal set is
///   caller-supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModuleStatus {
    /// Object just created, not yet set up.
    NotYetCreated,
    /// Test has been instantiated.
    Created,
    /// Configuration files have been sent and set up.
    Configured,
    /// Test is executing.
    Running,
    /// Test is waiting for external input.
    Waiting,
    /// Test has been stopped before completion.
    Interrupted,
    /// Test has completed.
    Finished,
}

impl ModuleStatus {
    /// Returns the wire representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotYetCreated => "NOT_YET_CREATED",
            Self::Created => "CREATED",
            Self::Configured => "CONFIGURED",
            Self::Running => "RUNNING",
            Self::Waiting => "WAITING",
            Self::Interrupted => "INTERRUPTED",
            Self::Finished => "FINISHED",
        }
    }
}

impl fmt::Display for ModuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Module Result
// ============================================================================

/// Outcome of a finished or interrupted test module instance.
///
/// # Invariants
/// - Variants are stable for serialization and expected-outcome matching.
/// - A module that has not produced an outcome yet reports no result at all;
///   callers model that as `Option<ModuleResult>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModuleResult {
    /// Test has passed successfully.
    Passed,
    /// Test has failed.
    Failed,
    /// Test has warnings.
    Warning,
    /// Test requires manual review.
    Review,
    /// Test can not be completed.
    Skipped,
    /// Test results not yet known, probably still running.
    Unknown,
}

impl ModuleResult {
    /// Returns the wire representation of the result.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "PASSED",
            Self::Failed => "FAILED",
            Self::Warning => "WARNING",
            Self::Review => "REVIEW",
            Self::Skipped => "SKIPPED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ModuleResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formats an optional module result for display.
#[must_use]
pub fn display_result(result: Option<ModuleResult>) -> &'static str {
    result.map_or("none", ModuleResult::as_str)
}

// ============================================================================
// SECTION: Plan Types
// ============================================================================

/// A test plan created on the suite.
///
/// # Invariants
/// - `id` is issued by the suite and opaque to the driver.
/// - `modules` preserves the suite's ordering and is immutable once created.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TestPlan {
    /// Plan identifier issued by the suite.
    pub id: String,
    /// Module descriptors configured into this plan.
    #[serde(default)]
    pub modules: Vec<PlanModule>,
}

impl TestPlan {
    /// Returns the first plan module matching `name`, if any.
    #[must_use]
    pub fn module_named(&self, name: &str) -> Option<&PlanModule> {
        self.modules.iter().find(|module| module.test_module == name)
    }
}

/// One module slot inside a test plan.
///
/// # Invariants
/// - `variant` is opaque to the driver and passed back to the suite verbatim
///   when instantiating the module.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlanModule {
    /// Module name as configured into the plan.
    #[serde(rename = "testModule")]
    pub test_module: String,
    /// Opaque variant payload selecting the module's behavior.
    #[serde(default)]
    pub variant: Option<Value>,
}

// ============================================================================
// SECTION: Module Instance Types
// ============================================================================

/// A runnable module instance created from a plan or standalone.
///
/// # Invariants
/// - `id` is issued by the suite and read-only once created.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModuleInstance {
    /// Module instance identifier issued by the suite.
    pub id: String,
}

/// Observed state of a module instance.
///
/// # Invariants
/// - Mutated only by the suite; the driver observes it via polling.
/// - `result` is absent until the suite produces an outcome.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModuleInfo {
    /// Current lifecycle status.
    pub status: ModuleStatus,
    /// Current outcome, when the suite has produced one.
    #[serde(default)]
    pub result: Option<ModuleResult>,
}

// ============================================================================
// SECTION: Available Modules
// ============================================================================

/// One entry from the suite's available-module listing.
///
/// # Invariants
/// - Values are untrusted suite metadata used for display only.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AvailableModule {
    /// Module name accepted by the runner endpoints.
    #[serde(rename = "testName")]
    pub test_name: String,
    /// Conformance profile the module belongs to.
    #[serde(default)]
    pub profile: Option<String>,
    /// Human-readable module summary.
    #[serde(default)]
    pub summary: Option<String>,
}
