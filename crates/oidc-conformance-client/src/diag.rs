// crates/oidc-conformance-client/src/diag.rs
// ============================================================================
// Module: Diagnostics Output
// Description: Best-effort stderr line writer for retry and progress traces.
// Purpose: Keep stdout clean for callers while surfacing transient faults.
// Dependencies: Standard library I/O.
// ============================================================================

//! ## Overview
//! Retry attempts and wait-loop progress are reported as single stderr lines.
//! Writes are best effort; a failed diagnostic write never fails an operation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Writes a single diagnostic line to stderr, ignoring write failures.
pub(crate) fn stderr_line(message: &str) {
    let mut stderr = std::io::stderr();
    let _ = writeln!(&mut stderr, "{message}");
}
