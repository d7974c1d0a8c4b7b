// crates/oidc-conformance-cli/src/output.rs
// ============================================================================
// Module: Console Output Helpers
// Description: Line-oriented stdout/stderr writers with localized errors.
// Purpose: Give the run driver and the binary one fallible output path.
// Dependencies: Standard library I/O.
// ============================================================================

//! ## Overview
//! All console output goes through these helpers so write failures surface as
//! localized errors instead of panics. The helpers write through explicit
//! handles; callers decide how to react when a stream is gone.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;

use crate::t;

// ============================================================================
// SECTION: Writers
// ============================================================================

/// Writes a single line to stdout.
///
/// # Errors
///
/// Returns the underlying I/O error when the write fails.
pub fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
///
/// # Errors
///
/// Returns the underlying I/O error when the write fails.
pub fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

// ============================================================================
// SECTION: Error Formatting
// ============================================================================

/// Formats a localized output error message.
#[must_use]
pub fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}
