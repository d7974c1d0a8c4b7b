// crates/oidc-conformance-cli/src/runner.rs
// ============================================================================
// Module: Conformance Run Driver
// Description: Walks the client test plan module by module and records
//              outcomes against the expected-outcome table.
// Purpose: Turn one plan configuration into a complete, reported run.
// Dependencies: oidc-conformance-client, serde_json, thiserror, url
// ============================================================================

//! ## Overview
//! The driver creates the test plan, then drives each expected module in plan
//! order: instantiate it with the plan's variant, announce its detail URL,
//! wait for a target status, and compare the observed result against the
//! accepted set. A module that is missing from the plan, fails to
//! instantiate, errors while waiting, or finishes with an unexpected result
//! is recorded as failed; the run itself keeps going so one broken module
//! cannot hide the rest.
//! Invariants:
//! - Every expected module is recorded exactly once, as passed or failed.
//! - Only plan creation, report bookkeeping, and console failures abort a
//!   run early.

// ============================================================================
// SECTION: Imports
// ============================================================================

use oidc_conformance_client::ClientError;
use oidc_conformance_client::ConformanceClient;
use oidc_conformance_client::InteractionCompleter;
use oidc_conformance_client::ModuleResult;
use oidc_conformance_client::TestPlan;
use oidc_conformance_client::WaitConfig;
use oidc_conformance_client::display_result;
use oidc_conformance_client::wait_for_status;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::expectations::ExpectedOutcome;
use crate::output::output_error;
use crate::output::write_stdout_line;
use crate::report::ReportError;
use crate::report::RunReport;
use crate::t;

// ============================================================================
// SECTION: Run Settings
// ============================================================================

/// Inputs for one full conformance run.
///
/// # Invariants
/// - `configuration` and `variant` are submitted to the suite verbatim.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Published plan name to instantiate.
    pub plan_name: String,
    /// Plan configuration JSON submitted at creation.
    pub configuration: Value,
    /// Variant selection JSON submitted at creation.
    pub variant: Value,
    /// Timing for each module's wait loop.
    pub wait: WaitConfig,
}

// ============================================================================
// SECTION: Run Errors
// ============================================================================

/// Errors that abort a run before its summary is produced.
///
/// # Invariants
/// - Per-module failures are recorded in the report, never raised here.
#[derive(Debug, Error)]
pub enum RunError {
    /// The test plan could not be created.
    #[error(transparent)]
    Plan(#[from] ClientError),
    /// Report bookkeeping failed.
    #[error(transparent)]
    Report(#[from] ReportError),
    /// Console output could not be written.
    #[error("{0}")]
    Output(String),
}

// ============================================================================
// SECTION: Run Driver
// ============================================================================

/// Runs the full plan described by `settings` and returns its report.
///
/// Modules are driven in the order `outcomes` lists them. The returned report
/// is complete: its `passed` and `failed` sets together cover every entry of
/// `outcomes` exactly once.
///
/// # Errors
///
/// Returns [`RunError`] when plan creation, report bookkeeping, or console
/// output fails. Per-module failures do not abort the run.
pub async fn execute_run(
    client: &ConformanceClient,
    completer: &dyn InteractionCompleter,
    settings: &RunSettings,
    outcomes: &[ExpectedOutcome],
) -> Result<RunReport, RunError> {
    say(&t!("run.starting"))?;
    say("")?;
    let plan = client
        .create_test_plan(&settings.plan_name, &settings.configuration, Some(&settings.variant))
        .await?;
    let mut report = RunReport::begin(&plan.id, &settings.plan_name)?;
    say(&t!("run.plan_url", url = plan_detail_url(client.base_url(), &plan.id)))?;
    say("")?;

    for outcome in outcomes {
        run_module(client, completer, settings, &plan, outcome, &mut report).await?;
    }

    report.finish()?;
    say(&t!("run.complete"))?;
    say("")?;
    print_summary(&report, outcomes.len())?;
    Ok(report)
}

/// Drives a single expected module and records its outcome exactly once.
async fn run_module(
    client: &ConformanceClient,
    completer: &dyn InteractionCompleter,
    settings: &RunSettings,
    plan: &TestPlan,
    outcome: &ExpectedOutcome,
    report: &mut RunReport,
) -> Result<(), RunError> {
    let Some(planned) = plan.module_named(outcome.module) else {
        say(&t!("run.module_missing", module = outcome.module, plan = plan.id))?;
        say("")?;
        report.record_failed(outcome.module);
        return Ok(());
    };
    let instance = match client
        .create_test_from_plan(&plan.id, outcome.module, planned.variant.as_ref())
        .await
    {
        Ok(instance) => instance,
        Err(err) => {
            say(&t!("run.module_create_failed", module = outcome.module, error = err))?;
            say("")?;
            report.record_failed(outcome.module);
            return Ok(());
        }
    };
    say(&t!(
        "run.module_started",
        id = instance.id,
        module = outcome.module,
        url = log_detail_url(client.base_url(), &instance.id),
    ))?;

    match wait_for_status(client, completer, &instance.id, outcome.statuses, &settings.wait).await {
        Ok((status, result)) if outcome.results.contains(&result) => {
            say(&t!(
                "run.module_matched",
                id = instance.id,
                module = outcome.module,
                status = status,
                result = display_result(result),
                expected = format_expected(outcome.results),
            ))?;
            say("")?;
            report.record_passed(outcome.module);
        }
        Ok((status, result)) => {
            say(&t!(
                "run.module_mismatched",
                id = instance.id,
                module = outcome.module,
                status = status,
                result = display_result(result),
                expected = format_expected(outcome.results),
            ))?;
            say("")?;
            report.record_failed(outcome.module);
        }
        Err(err) => {
            say(&t!(
                "run.module_failed",
                id = instance.id,
                module = outcome.module,
                error = err,
            ))?;
            say("")?;
            report.record_failed(outcome.module);
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Summary
// ============================================================================

/// Prints the pass/fail summary lines for a finished run.
fn print_summary(report: &RunReport, total: usize) -> Result<(), RunError> {
    say(&t!("run.summary.passed", count = report.passed.len(), total = total))?;
    print_names(&report.passed)?;
    say(&t!("run.summary.failed", count = report.failed.len(), total = total))?;
    print_names(&report.failed)?;
    Ok(())
}

/// Prints one line per module name, or a placeholder for an empty set.
fn print_names(names: &[String]) -> Result<(), RunError> {
    if names.is_empty() {
        say(&t!("run.summary.none"))?;
        return Ok(());
    }
    for name in names {
        say(&t!("run.summary.entry", module = name))?;
    }
    Ok(())
}

// ============================================================================
// SECTION: Detail URLs
// ============================================================================

/// Builds the suite's plan-detail page URL for `plan_id`.
#[must_use]
pub fn plan_detail_url(base: &Url, plan_id: &str) -> String {
    format!("{base}plan-detail.html?plan={plan_id}")
}

/// Builds the suite's log-detail page URL for `module_id`.
#[must_use]
pub fn log_detail_url(base: &Url, module_id: &str) -> String {
    format!("{base}log-detail.html?log={module_id}")
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Writes one stdout line, mapping failures into [`RunError::Output`].
fn say(message: &str) -> Result<(), RunError> {
    write_stdout_line(message).map_err(|err| RunError::Output(output_error("stdout", &err)))
}

/// Formats an accepted result set for module completion lines.
fn format_expected(results: &[Option<ModuleResult>]) -> String {
    let names: Vec<&str> = results.iter().map(|result| display_result(*result)).collect();
    names.join(", ")
}
