// crates/oidc-conformance-client/tests/wait_loop.rs
// ============================================================================
// Module: Wait Loop Tests
// Description: Status-sequence driving of the module wait loop.
// Purpose: Prove target matching, interaction dispatch, fail-fast statuses,
//          and the wall-clock timeout against scripted status sequences.
// Dependencies: async-trait, tiny_http, tokio
// ============================================================================

//! ## Overview
//! Feeds the wait loop scripted status sequences and asserts the loop's
//! observable contract: the first target status ends the wait with its
//! result, `WAITING` dispatches the completer exactly as often as observed,
//! non-transient statuses fail immediately, and a stuck module times out.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use oidc_conformance_client::CompletionError;
use oidc_conformance_client::ConformanceClient;
use oidc_conformance_client::InteractionCompleter;
use oidc_conformance_client::ModuleResult;
use oidc_conformance_client::ModuleStatus;
use oidc_conformance_client::WaitConfig;
use oidc_conformance_client::WaitError;
use oidc_conformance_client::wait_for_status;

use crate::common::ScriptedResponse;
use crate::common::ScriptedServer;
use crate::common::fast_config;

/// Completer counting how often the loop dispatches it.
struct CountingCompleter {
    /// Number of dispatches observed.
    count: Arc<AtomicUsize>,
}

#[async_trait]
impl InteractionCompleter for CountingCompleter {
    async fn complete(&self, _module_id: &str) -> Result<(), CompletionError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Completer that always fails its interactive step.
struct FailingCompleter;

#[async_trait]
impl InteractionCompleter for FailingCompleter {
    async fn complete(&self, _module_id: &str) -> Result<(), CompletionError> {
        Err(CompletionError::Request {
            step: "auth-url",
            detail: "connection refused".to_string(),
        })
    }
}

/// Millisecond-scale timing so tests finish quickly.
fn fast_wait() -> WaitConfig {
    WaitConfig {
        timeout: Duration::from_secs(5),
        poll_interval: Duration::from_millis(10),
        interaction_delay: Duration::from_millis(10),
    }
}

/// Scripts one info reply per poll from status and optional result pairs.
fn info_sequence(states: &[(&str, Option<&str>)]) -> Vec<ScriptedResponse> {
    states
        .iter()
        .map(|(status, result)| {
            let body = result.map_or_else(
                || format!("{{\"status\":\"{status}\"}}"),
                |result| format!("{{\"status\":\"{status}\",\"result\":\"{result}\"}}"),
            );
            ScriptedResponse::json(200, &body)
        })
        .collect()
}

/// A full lifecycle reaches the target with one interactive dispatch.
#[tokio::test(flavor = "multi_thread")]
async fn lifecycle_reaches_target_with_one_interaction() {
    let server = ScriptedServer::start(info_sequence(&[
        ("CREATED", None),
        ("RUNNING", None),
        ("WAITING", None),
        ("RUNNING", None),
        ("FINISHED", Some("PASSED")),
    ]));
    let client = ConformanceClient::new(fast_config(&server.base_url)).unwrap();
    let count = Arc::new(AtomicUsize::new(0));
    let completer = CountingCompleter {
        count: Arc::clone(&count),
    };

    let (status, result) = wait_for_status(
        &client,
        &completer,
        "mod-1",
        &[ModuleStatus::Finished],
        &fast_wait(),
    )
    .await
    .unwrap();

    assert_eq!(status, ModuleStatus::Finished);
    assert_eq!(result, Some(ModuleResult::Passed));
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(server.join().len(), 5);
}

/// Any status in the target set ends the wait, not only FINISHED.
#[tokio::test(flavor = "multi_thread")]
async fn interrupted_inside_target_set_is_success() {
    let server = ScriptedServer::start(info_sequence(&[
        ("RUNNING", None),
        ("INTERRUPTED", Some("FAILED")),
    ]));
    let client = ConformanceClient::new(fast_config(&server.base_url)).unwrap();
    let count = Arc::new(AtomicUsize::new(0));
    let completer = CountingCompleter {
        count: Arc::clone(&count),
    };

    let (status, result) = wait_for_status(
        &client,
        &completer,
        "mod-1",
        &[ModuleStatus::Finished, ModuleStatus::Interrupted],
        &fast_wait(),
    )
    .await
    .unwrap();

    assert_eq!(status, ModuleStatus::Interrupted);
    assert_eq!(result, Some(ModuleResult::Failed));
    assert_eq!(server.join().len(), 2);
}

/// INTERRUPTED outside the target set fails on the spot.
#[tokio::test(flavor = "multi_thread")]
async fn interrupted_outside_target_set_fails_immediately() {
    let server = ScriptedServer::start(info_sequence(&[("INTERRUPTED", Some("FAILED"))]));
    let client = ConformanceClient::new(fast_config(&server.base_url)).unwrap();
    let count = Arc::new(AtomicUsize::new(0));
    let completer = CountingCompleter {
        count: Arc::clone(&count),
    };

    let error =
        wait_for_status(&client, &completer, "mod-1", &[ModuleStatus::Finished], &fast_wait())
            .await
            .unwrap_err();

    match error {
        WaitError::ModuleFailed {
            status, ..
        } => assert_eq!(status, ModuleStatus::Interrupted),
        other => panic!("expected module failure, got {other}"),
    }
    assert_eq!(server.join().len(), 1);
}

/// CONFIGURED is not a transient status and fails the wait.
#[tokio::test(flavor = "multi_thread")]
async fn configured_status_fails_the_wait() {
    let server = ScriptedServer::start(info_sequence(&[("CONFIGURED", None)]));
    let client = ConformanceClient::new(fast_config(&server.base_url)).unwrap();
    let count = Arc::new(AtomicUsize::new(0));
    let completer = CountingCompleter {
        count: Arc::clone(&count),
    };

    let error =
        wait_for_status(&client, &completer, "mod-1", &[ModuleStatus::Finished], &fast_wait())
            .await
            .unwrap_err();

    assert!(matches!(error, WaitError::ModuleFailed { .. }), "{error}");
}

/// WAITING inside the target set returns without dispatching the completer.
#[tokio::test(flavor = "multi_thread")]
async fn waiting_as_target_skips_interaction() {
    let server = ScriptedServer::start(info_sequence(&[("WAITING", None)]));
    let client = ConformanceClient::new(fast_config(&server.base_url)).unwrap();
    let count = Arc::new(AtomicUsize::new(0));
    let completer = CountingCompleter {
        count: Arc::clone(&count),
    };

    let (status, result) =
        wait_for_status(&client, &completer, "mod-1", &[ModuleStatus::Waiting], &fast_wait())
            .await
            .unwrap();

    assert_eq!(status, ModuleStatus::Waiting);
    assert_eq!(result, None);
    assert_eq!(count.load(Ordering::SeqCst), 0);
    assert_eq!(server.join().len(), 1);
}

/// A failing completer aborts the wait with its own error.
#[tokio::test(flavor = "multi_thread")]
async fn completer_failure_aborts_the_wait() {
    let server = ScriptedServer::start(info_sequence(&[("WAITING", None)]));
    let client = ConformanceClient::new(fast_config(&server.base_url)).unwrap();

    let error =
        wait_for_status(&client, &FailingCompleter, "mod-1", &[ModuleStatus::Finished], &fast_wait())
            .await
            .unwrap_err();

    assert!(matches!(error, WaitError::Completion(_)), "{error}");
    assert_eq!(server.join().len(), 1);
}

/// A module stuck in RUNNING times out at the wall-clock budget.
#[tokio::test(flavor = "multi_thread")]
async fn stuck_module_times_out() {
    let stuck: Vec<(&str, Option<&str>)> = vec![("RUNNING", None); 40];
    let server = ScriptedServer::start(info_sequence(&stuck));
    let client = ConformanceClient::new(fast_config(&server.base_url)).unwrap();
    let count = Arc::new(AtomicUsize::new(0));
    let completer = CountingCompleter {
        count: Arc::clone(&count),
    };
    let config = WaitConfig {
        timeout: Duration::from_millis(200),
        poll_interval: Duration::from_millis(50),
        interaction_delay: Duration::from_millis(10),
    };

    let error =
        wait_for_status(&client, &completer, "mod-9", &[ModuleStatus::Finished], &config)
            .await
            .unwrap_err();

    match error {
        WaitError::Timeout {
            module_id,
            targets,
        } => {
            assert_eq!(module_id, "mod-9");
            assert!(targets.contains("FINISHED"), "{targets}");
        }
        other => panic!("expected timeout, got {other}"),
    }
}
