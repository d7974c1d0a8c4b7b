// crates/oidc-conformance-cli/tests/common/mod.rs
// ============================================================================
// Module: CLI Test Helpers
// Description: Scripted HTTP server and client fixtures for CLI tests.
// Purpose: Drive the suite runner against deterministic response sequences.
// Dependencies: tiny_http, url
// ============================================================================

//! ## Overview
//! A `tiny_http` server that replies with a scripted response sequence while
//! recording every request, so runner tests can drive a whole conformance run
//! without a live suite deployment.

#![allow(
    dead_code,
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only helpers are shared across binaries with different usage subsets."
)]

use std::sync::Arc;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use oidc_conformance_client::ClientConfig;
use oidc_conformance_client::RetryPolicy;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;
use url::Url;

/// One scripted reply the server sends for the next request it receives.
pub struct ScriptedResponse {
    /// HTTP status code.
    pub status: u16,
    /// Content-Type header, when present.
    pub content_type: Option<&'static str>,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl ScriptedResponse {
    /// Builds a JSON reply with the given status.
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: Some("application/json"),
            body: body.as_bytes().to_vec(),
        }
    }
}

/// One request observed by the scripted server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request method.
    pub method: String,
    /// Path and query as received.
    pub url: String,
    /// Content-Type header, when sent.
    pub content_type: Option<String>,
    /// Authorization header, when sent.
    pub authorization: Option<String>,
    /// Request body bytes.
    pub body: Vec<u8>,
}

/// A `tiny_http` server answering a fixed response sequence.
pub struct ScriptedServer {
    /// Base URL of the server, with a trailing slash.
    pub base_url: String,
    /// Requests observed so far, in arrival order.
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    /// Server thread handle.
    handle: thread::JoinHandle<()>,
}

impl ScriptedServer {
    /// Starts a server that replies with `responses` in order, then stops.
    pub fn start(responses: Vec<ScriptedResponse>) -> Self {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);
        let handle = thread::spawn(move || {
            for scripted in responses {
                let Ok(mut request) = server.recv() else {
                    return;
                };
                let mut body = Vec::new();
                let _ = request.as_reader().read_to_end(&mut body);
                let record = RecordedRequest {
                    method: request.method().to_string(),
                    url: request.url().to_string(),
                    content_type: header_value(request.headers(), "Content-Type"),
                    authorization: header_value(request.headers(), "Authorization"),
                    body,
                };
                recorded.lock().unwrap().push(record);
                let mut response =
                    Response::from_data(scripted.body).with_status_code(scripted.status);
                if let Some(content_type) = scripted.content_type {
                    response = response.with_header(
                        Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes()).unwrap(),
                    );
                }
                let _ = request.respond(response);
            }
        });
        Self {
            base_url: format!("http://{addr}/"),
            requests,
            handle,
        }
    }

    /// Returns the number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Waits for the server to finish its script.
    pub fn join(self) -> Vec<RecordedRequest> {
        let _ = self.handle.join();
        let requests = self.requests.lock().unwrap();
        requests.clone()
    }
}

/// Extracts a header value by case-insensitive name.
fn header_value(headers: &[Header], name: &'static str) -> Option<String> {
    headers
        .iter()
        .find(|header| header.field.equiv(name))
        .map(|header| header.value.as_str().to_string())
}

/// Builds a client configuration with millisecond retry pacing.
pub fn fast_config(base_url: &str) -> ClientConfig {
    let mut config = ClientConfig::new(Url::parse(base_url).unwrap());
    config.timeout = Duration::from_secs(5);
    config.retry = RetryPolicy {
        max_attempts: 5,
        backoff: Duration::from_millis(10),
    };
    config.export_retry = RetryPolicy {
        max_attempts: 2,
        backoff: Duration::from_millis(10),
    };
    config
}
