// crates/oidc-conformance-cli/src/report.rs
// ============================================================================
// Module: Run Report
// Description: Accumulated pass/fail record of one conformance run.
// Purpose: Track per-module outcomes and render them as canonical JSON.
// Dependencies: serde, serde_jcs, thiserror, time
// ============================================================================

//! ## Overview
//! A [`RunReport`] is created when the plan is instantiated and updated once
//! per module as the run driver walks the plan. The serialized form uses
//! canonical JSON (RFC 8785) so stored reports are byte-stable across runs
//! with identical outcomes.
//! Invariants:
//! - Each module is recorded exactly once, in either `passed` or `failed`.
//! - Timestamps are RFC 3339 strings in UTC.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Report Type
// ============================================================================

/// Summary of one conformance run over the client test plan.
///
/// # Invariants
/// - `passed` and `failed` preserve plan order and never share a module.
/// - `finished_at` is set exactly once, when the run completes.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Plan identifier issued by the suite.
    pub plan_id: String,
    /// Published plan name that was run.
    pub plan_name: String,
    /// RFC 3339 timestamp when the run started.
    pub started_at: String,
    /// RFC 3339 timestamp when the run finished, absent while running.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<String>,
    /// Modules whose outcome matched expectations.
    pub passed: Vec<String>,
    /// Modules that errored, went missing, or finished with the wrong result.
    pub failed: Vec<String>,
}

impl RunReport {
    /// Starts a report for a freshly created plan.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Timestamp`] when the start time cannot be
    /// formatted.
    pub fn begin(plan_id: &str, plan_name: &str) -> Result<Self, ReportError> {
        Ok(Self {
            plan_id: plan_id.to_string(),
            plan_name: plan_name.to_string(),
            started_at: now_rfc3339()?,
            finished_at: None,
            passed: Vec::new(),
            failed: Vec::new(),
        })
    }

    /// Records a module whose outcome matched expectations.
    pub fn record_passed(&mut self, module: &str) {
        self.passed.push(module.to_string());
    }

    /// Records a module whose outcome did not match expectations.
    pub fn record_failed(&mut self, module: &str) {
        self.failed.push(module.to_string());
    }

    /// Stamps the report with its completion time.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Timestamp`] when the finish time cannot be
    /// formatted.
    pub fn finish(&mut self) -> Result<(), ReportError> {
        self.finished_at = Some(now_rfc3339()?);
        Ok(())
    }

    /// Returns whether every recorded module matched expectations.
    #[must_use]
    pub fn all_matched(&self) -> bool {
        self.failed.is_empty()
    }

    /// Serializes the report as canonical JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Serialize`] when serialization fails.
    pub fn canonical_json(&self) -> Result<Vec<u8>, ReportError> {
        serde_jcs::to_vec(self).map_err(|err| ReportError::Serialize(err.to_string()))
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors produced while maintaining or rendering a run report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A timestamp could not be formatted as RFC 3339.
    #[error("failed to format report timestamp: {0}")]
    Timestamp(String),
    /// The report could not be serialized as canonical JSON.
    #[error("failed to serialize run report: {0}")]
    Serialize(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Formats the current UTC time as an RFC 3339 string.
fn now_rfc3339() -> Result<String, ReportError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|err| ReportError::Timestamp(err.to_string()))
}
