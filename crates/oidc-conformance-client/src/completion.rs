// crates/oidc-conformance-client/src/completion.rs
// ============================================================================
// Module: Interaction Completion
// Description: Pluggable completion of interactive authentication steps.
// Purpose: Provide the seam the wait loop invokes when a module is WAITING.
// Dependencies: async-trait, reqwest, url
// ============================================================================

//! ## Overview
//! Client tests on the conformance suite periodically park in `WAITING` until
//! the relying party under test performs an authentication round trip. The
//! wait loop does not know how to do that; it invokes an
//! [`InteractionCompleter`] and resumes polling. Two implementations ship
//! here: a no-op for non-interactive runs and a relying-party helper driver
//! that walks the authorization redirect chain hop by hop.
//!
//! ## Invariants
//! - A completion failure aborts the wait for that module only; the caller
//!   records the module failed and the run continues.
//! - The helper chain never follows redirects; every hop's body names the
//!   next URL explicitly.
//! - Session continuity across hops relies on the client's cookie store.
//!
//! Security posture: hop URLs come from helper and suite response bodies and
//! are parsed before being fetched; opaque bodies are surfaced only as
//! bounded previews.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::redirect::Policy;
use thiserror::Error;
use url::Url;

use crate::diag;
use crate::transport;

/// Errors raised while completing an interactive step.
///
/// # Invariants
/// - `step` names the hop that failed within the chain.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Completer construction failed.
    #[error("completer configuration failed: {0}")]
    Config(String),
    /// A hop request failed at the network level.
    #[error("interaction step {step} failed: {detail}")]
    Request {
        /// Hop that failed.
        step: &'static str,
        /// Failure detail.
        detail: String,
    },
    /// A hop body did not contain a parseable next URL.
    #[error("interaction step {step} returned no usable url: {preview}")]
    InvalidStepUrl {
        /// Hop that failed.
        step: &'static str,
        /// Bounded preview of the offending body.
        preview: String,
    },
}

/// Capability invoked when a module is waiting on an interactive step.
#[async_trait]
pub trait InteractionCompleter: Send + Sync {
    /// Completes the pending interactive step for `module_id`.
    async fn complete(&self, module_id: &str) -> Result<(), CompletionError>;
}

/// No-op completer for runs without interactive steps.
///
/// # Invariants
/// - Always returns success without touching the network.
pub struct NoopCompleter;

#[async_trait]
impl InteractionCompleter for NoopCompleter {
    async fn complete(&self, _module_id: &str) -> Result<(), CompletionError> {
        Ok(())
    }
}

/// Drives a local relying-party helper through one authentication round trip.
///
/// The chain is: fetch `api/auth-url` from the helper, whose body is the
/// suite's authorization URL; fetch that, whose body is the helper callback
/// URL; fetch that, whose body is the post-login URL; fetch that. Each hop is
/// logged. Cookies persist across hops so the helper can correlate the
/// session it opened in the first hop.
pub struct RelyingPartyCompleter {
    /// HTTP client with a cookie store and redirects disabled.
    client: Client,
    /// Base URL of the relying-party helper.
    helper_url: Url,
}

impl RelyingPartyCompleter {
    /// Builds a completer for the helper at `helper_url`.
    ///
    /// # Errors
    ///
    /// Returns [`CompletionError::Config`] when the HTTP client cannot be
    /// constructed.
    pub fn new(
        helper_url: Url,
        verify_tls: bool,
        timeout: Duration,
    ) -> Result<Self, CompletionError> {
        let mut builder = Client::builder()
            .timeout(timeout)
            .redirect(Policy::none())
            .cookie_store(true);
        if !verify_tls {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let client = builder.build().map_err(|err| CompletionError::Config(err.to_string()))?;
        Ok(Self {
            client,
            helper_url,
        })
    }

    /// Fetches one hop and returns its body text.
    async fn fetch_step(&self, step: &'static str, url: Url) -> Result<String, CompletionError> {
        let response = self.client.get(url).send().await.map_err(|err| {
            CompletionError::Request {
                step,
                detail: err.to_string(),
            }
        })?;
        response.text().await.map_err(|err| CompletionError::Request {
            step,
            detail: err.to_string(),
        })
    }

    /// Fetches one hop and parses its body as the next hop's URL.
    async fn next_url(&self, step: &'static str, url: Url) -> Result<Url, CompletionError> {
        let body = self.fetch_step(step, url).await?;
        let trimmed = body.trim();
        Url::parse(trimmed).map_err(|_| CompletionError::InvalidStepUrl {
            step,
            preview: transport::body_preview(trimmed.as_bytes()),
        })
    }
}

#[async_trait]
impl InteractionCompleter for RelyingPartyCompleter {
    async fn complete(&self, module_id: &str) -> Result<(), CompletionError> {
        let start = self.helper_url.join("api/auth-url").map_err(|err| {
            CompletionError::Config(format!("invalid helper url: {err}"))
        })?;
        let auth_url = self.next_url("auth-url", start).await?;
        diag::stderr_line(&format!("module {module_id} authorization url: {auth_url}"));
        let callback_url = self.next_url("authorization", auth_url).await?;
        diag::stderr_line(&format!("module {module_id} callback url: {callback_url}"));
        let logged_in_url = self.next_url("callback", callback_url).await?;
        diag::stderr_line(&format!("module {module_id} logged-in url: {logged_in_url}"));
        let final_body = self.fetch_step("logged-in", logged_in_url).await?;
        diag::stderr_line(&format!(
            "module {module_id} interaction complete: {}",
            transport::body_preview(final_body.as_bytes())
        ));
        Ok(())
    }
}
