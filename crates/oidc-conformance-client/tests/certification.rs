// crates/oidc-conformance-client/tests/certification.rs
// ============================================================================
// Module: Certification Package Tests
// Description: Multipart submission and package download checks.
// Purpose: Prove the certification upload carries both form parts without the
//          fixed JSON header and lands the produced archive locally.
// Dependencies: tempfile, tiny_http, tokio
// ============================================================================

//! ## Overview
//! Submits certification packages against a scripted server, asserting the
//! multipart form shape the suite would observe (both part names, per-part
//! filenames, negotiated boundary content type) and that the resulting
//! archive is written under its advertised name.

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

use std::fs;

use oidc_conformance_client::ClientError;
use oidc_conformance_client::ConformanceClient;

use crate::common::ScriptedResponse;
use crate::common::ScriptedServer;
use crate::common::fast_config;

/// Builds an authenticated client for the scripted server.
fn authed_client(server: &ScriptedServer) -> ConformanceClient {
    let mut config = fast_config(&server.base_url);
    config.bearer_token = Some("secret-token".to_string());
    ConformanceClient::new(config).unwrap()
}

/// Submitting without client logs sends an empty stand-in part.
#[tokio::test(flavor = "multi_thread")]
async fn submission_without_logs_uses_standin_part() {
    let server = ScriptedServer::start(vec![ScriptedResponse::attachment(
        "certification-package.zip",
        b"package-bytes",
    )]);
    let client = authed_client(&server);
    let dir = tempfile::tempdir().unwrap();
    let pdf_path = dir.path().join("signed.pdf");
    fs::write(&pdf_path, b"pdf-bytes").unwrap();

    let path = client
        .create_certification_package("plan-1", &pdf_path, None, dir.path())
        .await
        .unwrap();

    assert_eq!(path, dir.path().join("certification-package.zip"));
    assert_eq!(fs::read(&path).unwrap(), b"package-bytes");

    let requests = server.join();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.url, "/api/plan/plan-1/certificationpackage");
    assert_eq!(request.authorization.as_deref(), Some("Bearer secret-token"));

    let content_type = request.content_type.as_deref().unwrap();
    assert!(content_type.starts_with("multipart/form-data; boundary="), "{content_type}");

    let body = String::from_utf8_lossy(&request.body);
    assert!(body.contains("name=\"certificationOfConformancePdf\""), "{body}");
    assert!(body.contains("filename=\"signed.pdf\""), "{body}");
    assert!(body.contains("pdf-bytes"), "{body}");
    assert!(body.contains("name=\"clientSideData\""), "{body}");
    assert!(body.contains("filename=\"none\""), "{body}");
}

/// Submitting with client logs attaches their bytes under the archive name.
#[tokio::test(flavor = "multi_thread")]
async fn submission_with_logs_attaches_archive() {
    let server = ScriptedServer::start(vec![ScriptedResponse::attachment(
        "certification-package.zip",
        b"package-bytes",
    )]);
    let client = authed_client(&server);
    let dir = tempfile::tempdir().unwrap();
    let pdf_path = dir.path().join("signed.pdf");
    fs::write(&pdf_path, b"pdf-bytes").unwrap();
    let logs_path = dir.path().join("client-logs.zip");
    fs::write(&logs_path, b"logs-bytes").unwrap();

    client
        .create_certification_package("plan-1", &pdf_path, Some(&logs_path), dir.path())
        .await
        .unwrap();

    let requests = server.join();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("filename=\"client-logs.zip\""), "{body}");
    assert!(body.contains("logs-bytes"), "{body}");
}

/// A rejected submission surfaces the suite's status and body.
#[tokio::test(flavor = "multi_thread")]
async fn rejected_submission_surfaces_status() {
    let server =
        ScriptedServer::start(vec![ScriptedResponse::json(403, "{\"error\":\"not publishable\"}")]);
    let client = authed_client(&server);
    let dir = tempfile::tempdir().unwrap();
    let pdf_path = dir.path().join("signed.pdf");
    fs::write(&pdf_path, b"pdf-bytes").unwrap();

    let error = client
        .create_certification_package("plan-1", &pdf_path, None, dir.path())
        .await
        .unwrap_err();

    match error {
        ClientError::UnexpectedStatus {
            status,
            body_preview,
            ..
        } => {
            assert_eq!(status, 403);
            assert!(body_preview.contains("not publishable"), "{body_preview}");
        }
        other => panic!("expected status error, got {other}"),
    }
}

/// A missing PDF fails locally before any request is sent.
#[tokio::test(flavor = "multi_thread")]
async fn missing_pdf_fails_before_upload() {
    let server = ScriptedServer::start(vec![]);
    let client = authed_client(&server);
    let dir = tempfile::tempdir().unwrap();

    let error = client
        .create_certification_package("plan-1", &dir.path().join("absent.pdf"), None, dir.path())
        .await
        .unwrap_err();

    assert!(matches!(error, ClientError::Io { .. }), "{error}");
    assert_eq!(server.request_count(), 0);
}
