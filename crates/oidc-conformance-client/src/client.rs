// crates/oidc-conformance-client/src/client.rs
// ============================================================================
// Module: Conformance API Client
// Description: Typed operations over the conformance suite's HTTP API.
// Purpose: Create plans, instantiate modules, poll info, and export artifacts.
// Dependencies: reqwest, serde, serde_json, url, zip
// ============================================================================

//! ## Overview
//! One method per remote capability, layered on the retrying transport. Each
//! operation checks the status code the suite documents for it (200 for reads
//! and starts, 201 for creates) and surfaces anything else as
//! [`ClientError::UnexpectedStatus`] with a bounded body preview.
//! Invariants:
//! - The base URL always ends with a slash so endpoint joins are stable.
//! - Identifiers embedded into paths are validated before use.
//! - Exported archives are integrity-checked before their path is returned.
//! - The certification upload uses a dedicated client without the fixed JSON
//!   content type so the multipart boundary is negotiated by the HTTP stack.
//!
//! Security posture: suite responses are untrusted; downloads are size-capped
//! and artifact filenames are rejected unless they are plain file names.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::fs;
use std::fs::File;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Client;
use reqwest::Response;
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::header::CONTENT_TYPE;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use reqwest::multipart::Form;
use reqwest::multipart::Part;
use reqwest::redirect::Policy;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use url::Url;
use zip::ZipArchive;

use crate::diag;
use crate::model::AvailableModule;
use crate::model::ModuleInfo;
use crate::model::ModuleInstance;
use crate::model::TestPlan;
use crate::transport;
use crate::transport::RetryPolicy;
use crate::transport::TransportError;
use crate::transport::TransportResponse;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default per-request timeout for suite calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
/// Maximum JSON response body size accepted from the suite.
pub const MAX_JSON_RESPONSE_BYTES: usize = 4 * 1024 * 1024;
/// Maximum archive download size accepted from the suite.
pub const MAX_ARCHIVE_BYTES: usize = 256 * 1024 * 1024;
/// Maximum bytes read from an error body before building a preview.
const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;
/// Maximum length of a suite-issued identifier embedded into a path.
const MAX_IDENTIFIER_LENGTH: usize = 128;

// ============================================================================
// SECTION: Client Configuration
// ============================================================================

/// Conformance client configuration.
///
/// # Invariants
/// - `base_url` must be an http or https URL; a trailing slash is added when
///   missing so relative endpoint joins preserve the full path.
/// - `retry` governs single requests; `export_retry` governs the whole
///   fetch-and-validate export sequence. The two are independent.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the conformance suite.
    pub base_url: Url,
    /// Optional bearer token sent on every request.
    pub bearer_token: Option<String>,
    /// Whether TLS certificates are verified.
    pub verify_tls: bool,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Transport-level retry policy for single requests.
    pub retry: RetryPolicy,
    /// Operation-level retry policy for the report export sequence.
    pub export_retry: RetryPolicy,
}

impl ClientConfig {
    /// Builds a configuration with production defaults for `base_url`.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            bearer_token: None,
            verify_tls: true,
            timeout: DEFAULT_REQUEST_TIMEOUT,
            retry: RetryPolicy::default(),
            export_retry: RetryPolicy::default(),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .field("verify_tls", &self.verify_tls)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("export_retry", &self.export_retry)
            .finish()
    }
}

// ============================================================================
// SECTION: Client Errors
// ============================================================================

/// Errors raised by conformance API operations.
///
/// # Invariants
/// - Variants are stable for programmatic handling and tests.
/// - Body previews embedded in messages are truncated and may contain
///   untrusted suite text.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Client construction or header assembly failed.
    #[error("client configuration failed: {0}")]
    Config(String),
    /// Request construction or direct send failed.
    #[error("{operation} request failed: {detail}")]
    Request {
        /// Operation that failed.
        operation: &'static str,
        /// Failure detail.
        detail: String,
    },
    /// The retrying transport gave up without a response.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The suite answered with a status the operation does not expect.
    #[error("{operation} failed with http status {status}: {body_preview}")]
    UnexpectedStatus {
        /// Operation that failed.
        operation: &'static str,
        /// Observed HTTP status code.
        status: u16,
        /// Bounded preview of the raw response body.
        body_preview: String,
    },
    /// The response body did not decode into the expected shape.
    #[error("{operation} returned an undecodable body: {detail}")]
    Decode {
        /// Operation that failed.
        operation: &'static str,
        /// Decoding failure detail.
        detail: String,
    },
    /// The response carried no usable Content-Disposition filename.
    #[error("{operation} response carried no content-disposition filename")]
    MissingDisposition {
        /// Operation that failed.
        operation: &'static str,
    },
    /// The suite suggested an artifact filename that is not a plain name.
    #[error("refusing unsafe artifact filename: {filename}")]
    UnsafeFilename {
        /// Rejected filename.
        filename: String,
    },
    /// A suite-issued identifier is unusable in a request path.
    #[error("invalid {label}: {value}")]
    InvalidIdentifier {
        /// Which identifier was rejected.
        label: &'static str,
        /// Rejected value.
        value: String,
    },
    /// Local file I/O failed.
    #[error("file i/o failed at {path}: {detail}")]
    Io {
        /// Path involved in the failure.
        path: PathBuf,
        /// Failure detail.
        detail: String,
    },
    /// A downloaded archive failed integrity validation.
    #[error("archive failed integrity validation at {path}: {detail}")]
    CorruptArchive {
        /// Path of the rejected archive.
        path: PathBuf,
        /// Validation failure detail.
        detail: String,
    },
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Typed client for the conformance suite API.
///
/// # Invariants
/// - `base_url` ends with a slash.
/// - The shared `client` carries the JSON content type and bearer token as
///   default headers; the certification upload builds its own client.
pub struct ConformanceClient {
    /// Shared HTTP client with default JSON headers.
    client: Client,
    /// Normalized base URL of the suite.
    base_url: Url,
    /// Bearer token reused by the multipart client.
    bearer_token: Option<String>,
    /// Whether TLS certificates are verified.
    verify_tls: bool,
    /// Per-request timeout.
    timeout: Duration,
    /// Transport-level retry policy.
    retry: RetryPolicy,
    /// Export-operation retry policy.
    export_retry: RetryPolicy,
}

impl ConformanceClient {
    /// Builds a client from the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] when the bearer token is not a valid
    /// header value or the HTTP client cannot be constructed.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let base_url = normalize_base_url(config.base_url);
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = &config.bearer_token {
            headers.insert(AUTHORIZATION, bearer_header(token)?);
        }
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .redirect(Policy::none())
            .default_headers(headers);
        if !config.verify_tls {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let client = builder.build().map_err(|err| ClientError::Config(err.to_string()))?;
        Ok(Self {
            client,
            base_url,
            bearer_token: config.bearer_token,
            verify_tls: config.verify_tls,
            timeout: config.timeout,
            retry: config.retry,
            export_retry: config.export_retry,
        })
    }

    /// Returns the normalized base URL of the suite.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Lists the test modules the suite can instantiate.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the request fails or the suite answers
    /// with a status other than 200.
    pub async fn available_modules(&self) -> Result<Vec<AvailableModule>, ClientError> {
        const OPERATION: &str = "available_modules";
        let url = self.endpoint("api/runner/available")?;
        let request = self
            .client
            .get(url)
            .build()
            .map_err(|err| request_error(OPERATION, &err))?;
        let response = self.send(request).await?;
        check_status(OPERATION, StatusCode::OK, &response)?;
        decode(OPERATION, &response)
    }

    /// Creates a test plan from a name, a configuration, and an optional
    /// variant selection.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the request fails or the suite answers
    /// with a status other than 201.
    pub async fn create_test_plan(
        &self,
        name: &str,
        configuration: &Value,
        variant: Option<&Value>,
    ) -> Result<TestPlan, ClientError> {
        const OPERATION: &str = "create_test_plan";
        let url = self.endpoint("api/plan")?;
        let mut builder = self.client.post(url).query(&[("planName", name)]);
        if let Some(variant) = variant {
            builder = builder.query(&[("variant", encode_variant(OPERATION, variant)?)]);
        }
        let request = builder
            .json(configuration)
            .build()
            .map_err(|err| request_error(OPERATION, &err))?;
        let response = self.send(request).await?;
        check_status(OPERATION, StatusCode::CREATED, &response)?;
        decode(OPERATION, &response)
    }

    /// Creates a standalone module instance outside any plan.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the request fails or the suite answers
    /// with a status other than 201.
    pub async fn create_test(
        &self,
        test_name: &str,
        configuration: &Value,
    ) -> Result<ModuleInstance, ClientError> {
        const OPERATION: &str = "create_test";
        let url = self.endpoint("api/runner")?;
        let request = self
            .client
            .post(url)
            .query(&[("test", test_name)])
            .json(configuration)
            .build()
            .map_err(|err| request_error(OPERATION, &err))?;
        let response = self.send(request).await?;
        check_status(OPERATION, StatusCode::CREATED, &response)?;
        decode(OPERATION, &response)
    }

    /// Creates a module instance from a plan, optionally pinning a variant.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the request fails or the suite answers
    /// with a status other than 201.
    pub async fn create_test_from_plan(
        &self,
        plan_id: &str,
        test_name: &str,
        variant: Option<&Value>,
    ) -> Result<ModuleInstance, ClientError> {
        const OPERATION: &str = "create_test_from_plan";
        validate_identifier("plan id", plan_id)?;
        let url = self.endpoint("api/runner")?;
        let mut builder =
            self.client.post(url).query(&[("test", test_name), ("plan", plan_id)]);
        if let Some(variant) = variant {
            builder = builder.query(&[("variant", encode_variant(OPERATION, variant)?)]);
        }
        let request = builder.build().map_err(|err| request_error(OPERATION, &err))?;
        let response = self.send(request).await?;
        check_status(OPERATION, StatusCode::CREATED, &response)?;
        decode(OPERATION, &response)
    }

    /// Fetches the current status and result of a module instance.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the request fails or the suite answers
    /// with a status other than 200.
    pub async fn module_info(&self, module_id: &str) -> Result<ModuleInfo, ClientError> {
        const OPERATION: &str = "module_info";
        validate_identifier("module id", module_id)?;
        let url = self.endpoint(&format!("api/info/{module_id}"))?;
        let request = self
            .client
            .get(url)
            .build()
            .map_err(|err| request_error(OPERATION, &err))?;
        let response = self.send(request).await?;
        check_status(OPERATION, StatusCode::OK, &response)?;
        decode(OPERATION, &response)
    }

    /// Fetches the raw JSON log of a module instance.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the request fails or the suite answers
    /// with a status other than 200.
    pub async fn module_log(&self, module_id: &str) -> Result<Value, ClientError> {
        const OPERATION: &str = "module_log";
        validate_identifier("module id", module_id)?;
        let url = self.endpoint(&format!("api/log/{module_id}"))?;
        let request = self
            .client
            .get(url)
            .build()
            .map_err(|err| request_error(OPERATION, &err))?;
        let response = self.send(request).await?;
        check_status(OPERATION, StatusCode::OK, &response)?;
        decode(OPERATION, &response)
    }

    /// Starts a module instance.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the request fails or the suite answers
    /// with a status other than 200.
    pub async fn start_module(&self, module_id: &str) -> Result<Value, ClientError> {
        const OPERATION: &str = "start_module";
        validate_identifier("module id", module_id)?;
        let url = self.endpoint(&format!("api/runner/{module_id}"))?;
        let request = self
            .client
            .post(url)
            .build()
            .map_err(|err| request_error(OPERATION, &err))?;
        let response = self.send(request).await?;
        check_status(OPERATION, StatusCode::OK, &response)?;
        decode(OPERATION, &response)
    }

    /// Exports the plan's HTML report archive into `directory`.
    ///
    /// The whole fetch-and-validate sequence retries per the export policy,
    /// independently of the transport retries inside each attempt. The file
    /// is named from the response's Content-Disposition header and its
    /// internal checksum table must validate cleanly.
    ///
    /// # Errors
    ///
    /// Returns the final attempt's [`ClientError`] once the export policy is
    /// exhausted, including [`ClientError::CorruptArchive`] when the download
    /// repeatedly fails integrity validation.
    pub async fn export_plan_report(
        &self,
        plan_id: &str,
        directory: &Path,
    ) -> Result<PathBuf, ClientError> {
        validate_identifier("plan id", plan_id)?;
        let url = self.endpoint(&format!("api/plan/exporthtml/{plan_id}"))?;
        let mut last_error: Option<ClientError> = None;
        for attempt in 1 ..= self.export_retry.max_attempts {
            if attempt > 1 {
                tokio::time::sleep(self.export_retry.backoff).await;
            }
            match self.export_attempt(&url, directory).await {
                Ok(path) => return Ok(path),
                Err(err) => {
                    diag::stderr_line(&format!(
                        "export attempt {attempt} failed for plan {plan_id}: {err}"
                    ));
                    last_error = Some(err);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| ClientError::Request {
            operation: "export_plan_report",
            detail: "export policy allowed no attempts".to_string(),
        }))
    }

    /// Runs one export attempt: fetch, stream to disk, validate.
    async fn export_attempt(&self, url: &Url, directory: &Path) -> Result<PathBuf, ClientError> {
        const OPERATION: &str = "export_plan_report";
        let request = self
            .client
            .get(url.clone())
            .build()
            .map_err(|err| request_error(OPERATION, &err))?;
        let response =
            transport::send_streaming_with_retry(&self.client, request, &self.retry).await?;
        let path = self.receive_artifact(OPERATION, response, directory).await?;
        validate_archive(&path)?;
        Ok(path)
    }

    /// Assembles and submits the certification package for a plan.
    ///
    /// Uploads the signed conformance PDF and the client-side data archive as
    /// a multipart form (an empty part stands in when no client logs are
    /// provided), then downloads the produced package into `output_dir`.
    /// Submitting also publishes the plan and marks it immutable on the
    /// suite side.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when reading the inputs fails, the upload
    /// fails, or the suite answers with a status other than 200.
    pub async fn create_certification_package(
        &self,
        plan_id: &str,
        conformance_pdf: &Path,
        client_logs: Option<&Path>,
        output_dir: &Path,
    ) -> Result<PathBuf, ClientError> {
        const OPERATION: &str = "create_certification_package";
        validate_identifier("plan id", plan_id)?;
        let url = self.endpoint(&format!("api/plan/{plan_id}/certificationpackage"))?;
        let pdf_part = file_part(conformance_pdf, "application/pdf")?;
        let logs_part = match client_logs {
            Some(path) => file_part(path, "application/zip")?,
            None => empty_part()?,
        };
        let form = Form::new()
            .part("certificationOfConformancePdf", pdf_part)
            .part("clientSideData", logs_part);
        let response = self
            .multipart_client()?
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|err| request_error(OPERATION, &err))?;
        self.receive_artifact(OPERATION, response, output_dir).await
    }

    /// Builds the dedicated multipart client without the JSON content type.
    fn multipart_client(&self) -> Result<Client, ClientError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.bearer_token {
            headers.insert(AUTHORIZATION, bearer_header(token)?);
        }
        let mut builder = Client::builder()
            .timeout(self.timeout)
            .redirect(Policy::none())
            .default_headers(headers);
        if !self.verify_tls {
            builder = builder.danger_accept_invalid_certs(true);
        }
        builder.build().map_err(|err| ClientError::Config(err.to_string()))
    }

    /// Downloads a streamed artifact named from Content-Disposition.
    async fn receive_artifact(
        &self,
        operation: &'static str,
        response: Response,
        directory: &Path,
    ) -> Result<PathBuf, ClientError> {
        let status = response.status();
        if status != StatusCode::OK {
            let body_preview = read_error_preview(response).await;
            return Err(ClientError::UnexpectedStatus {
                operation,
                status: status.as_u16(),
                body_preview,
            });
        }
        let filename = filename_from_disposition(response.headers())
            .ok_or(ClientError::MissingDisposition {
                operation,
            })?;
        if !is_safe_artifact_name(&filename) {
            return Err(ClientError::UnsafeFilename {
                filename,
            });
        }
        let path = directory.join(&filename);
        stream_to_file(response, &path, MAX_ARCHIVE_BYTES).await?;
        Ok(path)
    }

    /// Sends a request through the buffering retry transport.
    async fn send(&self, request: reqwest::Request) -> Result<TransportResponse, ClientError> {
        Ok(transport::send_with_retry(
            &self.client,
            request,
            &self.retry,
            MAX_JSON_RESPONSE_BYTES,
        )
        .await?)
    }

    /// Joins a relative endpoint path onto the base URL.
    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::Config(format!("invalid endpoint {path}: {err}")))
    }
}

// ============================================================================
// SECTION: Request Helpers
// ============================================================================

/// Ensures the base URL ends with a slash so joins keep the full path.
fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Builds the bearer Authorization header value.
fn bearer_header(token: &str) -> Result<HeaderValue, ClientError> {
    let value = format!("Bearer {token}");
    HeaderValue::from_str(&value)
        .map_err(|_| ClientError::Config("invalid bearer token header".to_string()))
}

/// Encodes a variant selection into its JSON query form.
fn encode_variant(operation: &'static str, variant: &Value) -> Result<String, ClientError> {
    serde_json::to_string(variant).map_err(|err| ClientError::Request {
        operation,
        detail: format!("variant encoding failed: {err}"),
    })
}

/// Maps a reqwest failure into a request error for `operation`.
fn request_error(operation: &'static str, err: &reqwest::Error) -> ClientError {
    ClientError::Request {
        operation,
        detail: err.to_string(),
    }
}

/// Validates a suite-issued identifier before embedding it into a path.
fn validate_identifier(label: &'static str, value: &str) -> Result<(), ClientError> {
    let acceptable = !value.is_empty()
        && value.len() <= MAX_IDENTIFIER_LENGTH
        && value.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
    if acceptable {
        Ok(())
    } else {
        Err(ClientError::InvalidIdentifier {
            label,
            value: value.to_string(),
        })
    }
}

// ============================================================================
// SECTION: Response Helpers
// ============================================================================

/// Checks the buffered response against the operation's expected status.
fn check_status(
    operation: &'static str,
    expected: StatusCode,
    response: &TransportResponse,
) -> Result<(), ClientError> {
    if response.status == expected {
        Ok(())
    } else {
        Err(ClientError::UnexpectedStatus {
            operation,
            status: response.status.as_u16(),
            body_preview: response.body_preview(),
        })
    }
}

/// Decodes a buffered JSON response body.
fn decode<T: DeserializeOwned>(
    operation: &'static str,
    response: &TransportResponse,
) -> Result<T, ClientError> {
    serde_json::from_slice(&response.body).map_err(|err| ClientError::Decode {
        operation,
        detail: err.to_string(),
    })
}

/// Reads a bounded preview of an error body from a streamed response.
async fn read_error_preview(mut response: Response) -> String {
    let mut body = Vec::new();
    while body.len() < MAX_ERROR_BODY_BYTES {
        match response.chunk().await {
            Ok(Some(chunk)) => body.extend_from_slice(&chunk),
            Ok(None) | Err(_) => break,
        }
    }
    transport::body_preview(&body)
}

/// Extracts the quoted filename parameter from Content-Disposition.
fn filename_from_disposition(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(CONTENT_DISPOSITION)?.to_str().ok()?;
    let (_, tail) = value.split_once("filename=\"")?;
    let (filename, _) = tail.rsplit_once('"')?;
    if filename.is_empty() {
        None
    } else {
        Some(filename.to_string())
    }
}

/// Returns whether a suggested artifact filename is a plain file name.
fn is_safe_artifact_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}

// ============================================================================
// SECTION: Artifact Handling
// ============================================================================

/// Streams a response body into `path` while enforcing a byte cap.
async fn stream_to_file(
    mut response: Response,
    path: &Path,
    limit: usize,
) -> Result<(), ClientError> {
    let mut file = File::create(path).map_err(|err| io_error(path, &err))?;
    let mut total: usize = 0;
    loop {
        let chunk = match response.chunk().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(err) => {
                return Err(ClientError::Request {
                    operation: "artifact_download",
                    detail: err.to_string(),
                });
            }
        };
        total = total.saturating_add(chunk.len());
        if total > limit {
            return Err(TransportError::ResponseTooLarge {
                url: response.url().to_string(),
                actual: total,
                limit,
            }
            .into());
        }
        file.write_all(&chunk).map_err(|err| io_error(path, &err))?;
    }
    file.flush().map_err(|err| io_error(path, &err))?;
    Ok(())
}

/// Validates a downloaded archive by walking every entry's checksum.
fn validate_archive(path: &Path) -> Result<(), ClientError> {
    let file = File::open(path).map_err(|err| io_error(path, &err))?;
    let mut archive = ZipArchive::new(file).map_err(|err| ClientError::CorruptArchive {
        path: path.to_path_buf(),
        detail: err.to_string(),
    })?;
    for index in 0 .. archive.len() {
        let mut entry = archive.by_index(index).map_err(|err| ClientError::CorruptArchive {
            path: path.to_path_buf(),
            detail: err.to_string(),
        })?;
        // Draining the entry forces the reader's checksum verification.
        if let Err(err) = io::copy(&mut entry, &mut io::sink()) {
            return Err(ClientError::CorruptArchive {
                path: path.to_path_buf(),
                detail: err.to_string(),
            });
        }
    }
    Ok(())
}

/// Builds a multipart file part from the bytes at `path`.
fn file_part(path: &Path, mime: &str) -> Result<Part, ClientError> {
    let bytes = fs::read(path).map_err(|err| io_error(path, &err))?;
    let name = path
        .file_name()
        .map_or_else(|| "artifact".to_string(), |name| name.to_string_lossy().into_owned());
    Part::bytes(bytes)
        .file_name(name)
        .mime_str(mime)
        .map_err(|err| ClientError::Config(format!("invalid multipart mime: {err}")))
}

/// Builds the empty stand-in part used when no client logs are provided.
fn empty_part() -> Result<Part, ClientError> {
    Part::bytes(Vec::new())
        .file_name("none")
        .mime_str("application/octet-stream")
        .map_err(|err| ClientError::Config(format!("invalid multipart mime: {err}")))
}

/// Maps an I/O failure at `path` into a client error.
fn io_error(path: &Path, err: &std::io::Error) -> ClientError {
    ClientError::Io {
        path: path.to_path_buf(),
        detail: err.to_string(),
    }
}
