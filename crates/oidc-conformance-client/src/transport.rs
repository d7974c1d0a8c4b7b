// crates/oidc-conformance-client/src/transport.rs
// ============================================================================
// Module: Resilient HTTP Transport
// Description: Retrying request sender for the flaky conformance suite API.
// Purpose: Absorb transient network faults, 5xx responses, and truncated JSON.
// Dependencies: reqwest, serde_json, tokio
// ============================================================================

//! ## Overview
//! Wraps outbound requests with the suite driver's retry policy: a bounded
//! number of attempts, a short pause before later attempts, and a retry on
//! network errors, 5xx statuses, or responses that declare a JSON content
//! type but do not parse as JSON.
//! Invariants:
//! - At most [`MAX_SEND_ATTEMPTS`] attempts are made per request.
//! - No pause precedes the first two attempts; later attempts wait
//!   [`RetryPolicy::backoff`] first.
//! - On exhaustion the last response obtained is returned to the caller;
//!   [`TransportError`] is raised only when no attempt produced a response.
//! - Response bodies are read through a fail-closed byte cap.
//!
//! Security posture: responses are untrusted; bodies are size-capped and
//! error previews are truncated before display.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use reqwest::Client;
use reqwest::Request;
use reqwest::Response;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use reqwest::header::HeaderMap;
use thiserror::Error;
use url::Url;

use crate::diag;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum attempts the transport makes for a single request.
pub const MAX_SEND_ATTEMPTS: u32 = 5;
/// Pause inserted before the third and subsequent attempts.
pub const RETRY_BACKOFF: Duration = Duration::from_secs(1);
/// Number of leading attempts sent without a pause.
const UNPAUSED_ATTEMPTS: u32 = 2;
/// Maximum bytes of a response body embedded in error messages.
const MAX_BODY_PREVIEW_BYTES: usize = 2048;

// ============================================================================
// SECTION: Retry Policy
// ============================================================================

/// Retry policy applied to a request or to a whole operation.
///
/// # Invariants
/// - `max_attempts` is at least 1; a zero value would send nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts allowed, including the first.
    pub max_attempts: u32,
    /// Pause inserted before the third and subsequent attempts.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_SEND_ATTEMPTS,
            backoff: RETRY_BACKOFF,
        }
    }
}

// ============================================================================
// SECTION: Transport Errors
// ============================================================================

/// Errors raised by the retrying transport.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - `RetriesExhausted` is raised only when no attempt produced a response.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request body cannot be duplicated for a resend.
    #[error("request to {url} cannot be retried: body is not replayable")]
    UnreplayableRequest {
        /// Target URL of the request.
        url: String,
    },
    /// Every attempt failed without producing a response.
    #[error("request to {url} failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// Target URL of the request.
        url: String,
        /// Number of attempts made.
        attempts: u32,
        /// Message from the final failed attempt.
        last_error: String,
    },
    /// The response body exceeded the configured size cap.
    #[error("response from {url} exceeds size limit ({actual} > {limit})")]
    ResponseTooLarge {
        /// Target URL of the request.
        url: String,
        /// Observed size in bytes.
        actual: usize,
        /// Maximum size in bytes.
        limit: usize,
    },
}

// ============================================================================
// SECTION: Transport Response
// ============================================================================

/// A fully buffered response returned by the transport.
///
/// # Invariants
/// - `body` is at most the byte cap the caller passed to the send call.
#[derive(Debug)]
pub struct TransportResponse {
    /// HTTP status of the response.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Buffered response body.
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Produces a bounded UTF-8 preview of the body for error reporting.
    #[must_use]
    pub fn body_preview(&self) -> String {
        body_preview(&self.body)
    }
}

// ============================================================================
// SECTION: Classification
// ============================================================================

/// Returns whether a status code triggers a transport-level retry.
#[must_use]
pub fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error()
}

/// Returns whether the headers declare a JSON content type.
#[must_use]
pub fn declares_json(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(CONTENT_TYPE) else {
        return false;
    };
    let Ok(text) = value.to_str() else {
        return false;
    };
    let mime = text.split(';').next().unwrap_or("").trim();
    mime.eq_ignore_ascii_case("application/json")
}

/// Returns whether a buffered response triggers the non-JSON retry rule.
fn fails_json_validation(response: &TransportResponse) -> bool {
    declares_json(&response.headers)
        && serde_json::from_slice::<serde_json::Value>(&response.body).is_err()
}

// ============================================================================
// SECTION: Sending
// ============================================================================

/// Sends a request, buffering the body and retrying per the policy.
///
/// Retries consume one attempt each and are triggered by network errors, 5xx
/// statuses, and JSON-declared bodies that fail to parse. Any other response
/// is returned immediately; callers interpret status codes themselves.
///
/// # Errors
///
/// Returns [`TransportError`] when the request body is not replayable, when
/// the body exceeds `max_body_bytes`, or when every attempt failed without
/// producing a response.
pub async fn send_with_retry(
    client: &Client,
    request: Request,
    policy: &RetryPolicy,
    max_body_bytes: usize,
) -> Result<TransportResponse, TransportError> {
    let url = request.url().clone();
    let mut last_response: Option<TransportResponse> = None;
    let mut last_error = String::new();
    let mut attempt: u32 = 0;
    while attempt < policy.max_attempts {
        attempt = attempt.saturating_add(1);
        if attempt > UNPAUSED_ATTEMPTS {
            tokio::time::sleep(policy.backoff).await;
        }
        let cloned = request.try_clone().ok_or_else(|| TransportError::UnreplayableRequest {
            url: url.to_string(),
        })?;
        let response = match client.execute(cloned).await {
            Ok(response) => response,
            Err(err) => {
                log_retry(&url, &format!("transport error: {err}"));
                last_error = err.to_string();
                continue;
            }
        };
        let status = response.status();
        let headers = response.headers().clone();
        let body = match read_body_with_limit(response, max_body_bytes).await {
            Ok(body) => body,
            Err(BodyReadError::TooLarge {
                actual,
            }) => {
                return Err(TransportError::ResponseTooLarge {
                    url: url.to_string(),
                    actual,
                    limit: max_body_bytes,
                });
            }
            Err(BodyReadError::Network(message)) => {
                log_retry(&url, &format!("body read failed: {message}"));
                last_error = message;
                continue;
            }
        };
        let candidate = TransportResponse {
            status,
            headers,
            body,
        };
        if is_retryable_status(candidate.status) {
            log_retry(&url, &format!("{} response", candidate.status.as_u16()));
            last_response = Some(candidate);
            continue;
        }
        if fails_json_validation(&candidate) {
            log_retry(&url, "response not decodable as json");
            last_response = Some(candidate);
            continue;
        }
        return Ok(candidate);
    }
    match last_response {
        Some(response) => Ok(response),
        None => Err(TransportError::RetriesExhausted {
            url: url.to_string(),
            attempts: policy.max_attempts,
            last_error,
        }),
    }
}

/// Sends a request for streamed consumption, retrying per the policy.
///
/// Only network errors and 5xx statuses trigger retries here; the body is
/// left unread so the caller can stream it. On exhaustion the last 5xx
/// response obtained is returned for the caller to interpret.
///
/// # Errors
///
/// Returns [`TransportError`] when the request body is not replayable or when
/// every attempt failed without producing a response.
pub async fn send_streaming_with_retry(
    client: &Client,
    request: Request,
    policy: &RetryPolicy,
) -> Result<Response, TransportError> {
    let url = request.url().clone();
    let mut last_response: Option<Response> = None;
    let mut last_error = String::new();
    let mut attempt: u32 = 0;
    while attempt < policy.max_attempts {
        attempt = attempt.saturating_add(1);
        if attempt > UNPAUSED_ATTEMPTS {
            tokio::time::sleep(policy.backoff).await;
        }
        let cloned = request.try_clone().ok_or_else(|| TransportError::UnreplayableRequest {
            url: url.to_string(),
        })?;
        let response = match client.execute(cloned).await {
            Ok(response) => response,
            Err(err) => {
                log_retry(&url, &format!("transport error: {err}"));
                last_error = err.to_string();
                continue;
            }
        };
        if is_retryable_status(response.status()) {
            log_retry(&url, &format!("{} response", response.status().as_u16()));
            last_response = Some(response);
            continue;
        }
        return Ok(response);
    }
    match last_response {
        Some(response) => Ok(response),
        None => Err(TransportError::RetriesExhausted {
            url: url.to_string(),
            attempts: policy.max_attempts,
            last_error,
        }),
    }
}

// ============================================================================
// SECTION: Body Handling
// ============================================================================

/// Internal classification of body read failures.
enum BodyReadError {
    /// The body exceeded the byte cap.
    TooLarge {
        /// Observed size in bytes.
        actual: usize,
    },
    /// The connection failed mid-body.
    Network(String),
}

/// Reads a response body while enforcing a hard byte limit.
async fn read_body_with_limit(
    mut response: Response,
    limit: usize,
) -> Result<Vec<u8>, BodyReadError> {
    let mut body = Vec::new();
    let mut total: usize = 0;
    loop {
        let chunk = match response.chunk().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(err) => return Err(BodyReadError::Network(err.to_string())),
        };
        let next_total = total.checked_add(chunk.len()).ok_or(BodyReadError::TooLarge {
            actual: usize::MAX,
        })?;
        if next_total > limit {
            return Err(BodyReadError::TooLarge {
                actual: next_total,
            });
        }
        body.extend_from_slice(&chunk);
        total = next_total;
    }
    Ok(body)
}

/// Produces a bounded UTF-8 preview of response bytes for error reporting.
#[must_use]
pub fn body_preview(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return String::new();
    }
    let preview_len = bytes.len().min(MAX_BODY_PREVIEW_BYTES);
    let preview = String::from_utf8_lossy(&bytes[.. preview_len]);
    if bytes.len() > preview_len {
        let remaining = bytes.len() - preview_len;
        format!("{preview}...[truncated {remaining} bytes]")
    } else {
        preview.to_string()
    }
}

/// Logs one retry attempt with its target and cause.
fn log_retry(url: &Url, cause: &str) {
    diag::stderr_line(&format!("retrying {url}: {cause}"));
}
