// crates/oidc-conformance-config/src/config.rs
// ============================================================================
// Module: Harness Configuration
// Description: Configuration loading and validation for the harness.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Missing or invalid configuration fails closed before any network call.
//! Invariants:
//! - The explicit path argument wins over [`CONFIG_ENV_VAR`], which wins over
//!   the default file name.
//! - [`TOKEN_ENV_VAR`] overrides the configured `server.token` when set and
//!   non-blank.
//! - Plan defaults reproduce the published relying-party client test plan.
//!
//! Security posture: config inputs are untrusted; every field is validated
//! before use and secrets never appear in error messages.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "oidc-conformance.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "OIDC_CONFORMANCE_CONFIG";
/// Environment variable that overrides the configured bearer token.
pub const TOKEN_ENV_VAR: &str = "OIDC_CONFORMANCE_TOKEN";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of the server bearer token.
pub(crate) const MAX_TOKEN_LENGTH: usize = 512;
/// Maximum length of the plan name and alias fields.
pub(crate) const MAX_PLAN_NAME_LENGTH: usize = 256;
/// Maximum length of the plan description field.
pub(crate) const MAX_DESCRIPTION_LENGTH: usize = 1024;
/// Maximum number of variant entries in a plan.
pub(crate) const MAX_VARIANT_ENTRIES: usize = 32;
/// Maximum length of a variant key or value.
pub(crate) const MAX_VARIANT_FIELD_LENGTH: usize = 256;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Conformance harness configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ConformanceConfig {
    /// Conformance service connection settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Test plan definition submitted to the service.
    #[serde(default)]
    pub plan: PlanConfig,
    /// Relying-party helper driven through interactive steps.
    #[serde(default)]
    pub relying_party: RelyingPartyConfig,
    /// Artifact output settings.
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
}

impl ConformanceConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.plan.validate()?;
        self.relying_party.validate()?;
        self.artifacts.validate()?;
        Ok(())
    }
}

/// Conformance service connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the conformance service.
    #[serde(default)]
    pub url: String,
    /// Bearer token for the service API, overridden by [`TOKEN_ENV_VAR`].
    #[serde(default)]
    pub token: Option<String>,
    /// Whether TLS certificates are verified.
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            token: None,
            verify_tls: default_verify_tls(),
        }
    }
}

impl ServerConfig {
    /// Validates server connection settings.
    fn validate(&self) -> Result<(), ConfigError> {
        parse_http_url("server.url", &self.url)?;
        if let Some(token) = &self.token {
            if token.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "server.token must be non-empty when set".to_string(),
                ));
            }
            if token.len() > MAX_TOKEN_LENGTH {
                return Err(ConfigError::Invalid("server.token exceeds max length".to_string()));
            }
        }
        Ok(())
    }

    /// Returns the parsed service base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the URL is missing or malformed.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        parse_http_url("server.url", &self.url)
    }

    /// Returns the effective bearer token, preferring [`TOKEN_ENV_VAR`].
    #[must_use]
    pub fn bearer_token(&self) -> Option<String> {
        select_token(env::var(TOKEN_ENV_VAR).ok(), self.token.as_deref())
    }
}

/// Test plan definition submitted to the service.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanConfig {
    /// Published name of the test plan to run.
    #[serde(default = "default_plan_name")]
    pub name: String,
    /// Optional alias under which the suite exposes test URLs.
    #[serde(default)]
    pub alias: Option<String>,
    /// Optional human-readable description for the plan.
    #[serde(default)]
    pub description: Option<String>,
    /// Variant selections encoded into the `variant` query parameter.
    #[serde(default = "default_variant")]
    pub variant: BTreeMap<String, String>,
    /// Static client registration the suite tests against.
    #[serde(default)]
    pub client: ClientRegistration,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            name: default_plan_name(),
            alias: None,
            description: None,
            variant: default_variant(),
            client: ClientRegistration::default(),
        }
    }
}

impl PlanConfig {
    /// Validates the plan definition.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("plan.name must be non-empty".to_string()));
        }
        if self.name.len() > MAX_PLAN_NAME_LENGTH {
            return Err(ConfigError::Invalid("plan.name exceeds max length".to_string()));
        }
        if let Some(alias) = &self.alias {
            if alias.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "plan.alias must be non-empty when set".to_string(),
                ));
            }
            if alias.len() > MAX_PLAN_NAME_LENGTH {
                return Err(ConfigError::Invalid("plan.alias exceeds max length".to_string()));
            }
        }
        if let Some(description) = &self.description {
            if description.len() > MAX_DESCRIPTION_LENGTH {
                return Err(ConfigError::Invalid(
                    "plan.description exceeds max length".to_string(),
                ));
            }
        }
        if self.variant.len() > MAX_VARIANT_ENTRIES {
            return Err(ConfigError::Invalid("plan.variant exceeds entry limit".to_string()));
        }
        for (key, value) in &self.variant {
            if key.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "plan.variant keys must be non-empty".to_string(),
                ));
            }
            if key.len() > MAX_VARIANT_FIELD_LENGTH || value.len() > MAX_VARIANT_FIELD_LENGTH {
                return Err(ConfigError::Invalid("plan.variant entry too long".to_string()));
            }
        }
        self.client.validate()
    }

    /// Returns the variant map as a JSON object for the `variant` parameter.
    #[must_use]
    pub fn variant_value(&self) -> Value {
        let mut object = Map::new();
        for (key, value) in &self.variant {
            object.insert(key.clone(), Value::String(value.clone()));
        }
        Value::Object(object)
    }

    /// Returns the plan configuration body submitted on plan creation.
    ///
    /// The body always carries an empty `consent` object and the client
    /// registration; alias and description appear only when configured.
    #[must_use]
    pub fn configuration(&self) -> Value {
        let mut object = Map::new();
        object.insert("consent".to_string(), Value::Object(Map::new()));
        if let Some(alias) = &self.alias {
            object.insert("alias".to_string(), Value::String(alias.clone()));
        }
        if let Some(description) = &self.description {
            object.insert("description".to_string(), Value::String(description.clone()));
        }
        object.insert("client".to_string(), self.client.registration_value());
        Value::Object(object)
    }
}

/// Static client registration the suite tests against.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientRegistration {
    /// OAuth client identifier registered with the suite.
    #[serde(default)]
    pub client_id: String,
    /// OAuth client secret registered with the suite.
    #[serde(default)]
    pub client_secret: String,
    /// Redirect URI the suite sends the browser back to.
    #[serde(default)]
    pub redirect_uri: String,
}

impl ClientRegistration {
    /// Validates the client registration block.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.client_id.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "plan.client.client_id must be non-empty".to_string(),
            ));
        }
        if self.client_secret.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "plan.client.client_secret must be non-empty".to_string(),
            ));
        }
        parse_http_url("plan.client.redirect_uri", &self.redirect_uri)?;
        Ok(())
    }

    /// Returns the registration as the JSON object the suite expects.
    fn registration_value(&self) -> Value {
        let mut object = Map::new();
        object.insert("client_id".to_string(), Value::String(self.client_id.clone()));
        object.insert("client_secret".to_string(), Value::String(self.client_secret.clone()));
        object.insert("redirect_uri".to_string(), Value::String(self.redirect_uri.clone()));
        Value::Object(object)
    }
}

/// Relying-party helper settings for interactive completion.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelyingPartyConfig {
    /// Base URL of the local relying-party helper.
    #[serde(default)]
    pub helper_url: String,
}

impl RelyingPartyConfig {
    /// Validates the relying-party helper settings.
    fn validate(&self) -> Result<(), ConfigError> {
        parse_http_url("relying_party.helper_url", &self.helper_url)?;
        Ok(())
    }

    /// Returns the parsed helper base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the URL is missing or malformed.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        parse_http_url("relying_party.helper_url", &self.helper_url)
    }
}

/// Artifact output settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactsConfig {
    /// Directory receiving exported archives and certification packages.
    #[serde(default = "default_artifacts_directory")]
    pub directory: PathBuf,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            directory: default_artifacts_directory(),
        }
    }
}

impl ArtifactsConfig {
    /// Validates the artifact output settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("artifacts.directory", &self.directory.to_string_lossy())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    let path = Path::new(trimmed);
    for component in path.components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Parses a config field as an absolute http or https URL.
fn parse_http_url(field: &str, value: &str) -> Result<Url, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    let url = Url::parse(trimmed)
        .map_err(|_| ConfigError::Invalid(format!("{field} must be a valid url")))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Invalid(format!("{field} must use http or https")));
    }
    Ok(url)
}

/// Selects the effective bearer token from environment and config values.
fn select_token(env_token: Option<String>, configured: Option<&str>) -> Option<String> {
    if let Some(token) = env_token {
        let trimmed = token.trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
    }
    configured.map(ToString::to_string)
}

/// Default TLS verification setting.
pub(crate) const fn default_verify_tls() -> bool {
    true
}

/// Default plan name targeting the relying-party client tests.
pub(crate) fn default_plan_name() -> String {
    "oidcc-client-test-plan".to_string()
}

/// Default variant selections for the relying-party client tests.
pub(crate) fn default_variant() -> BTreeMap<String, String> {
    let mut variant = BTreeMap::new();
    variant.insert("client_auth_type".to_string(), "client_secret_post".to_string());
    variant.insert("request_type".to_string(), "plain_http_request".to_string());
    variant.insert("response_type".to_string(), "code".to_string());
    variant.insert("client_registration".to_string(), "static_client".to_string());
    variant.insert("response_mode".to_string(), "default".to_string());
    variant
}

/// Default artifact output directory.
pub(crate) fn default_artifacts_directory() -> PathBuf {
    PathBuf::from(".")
}

// ============================================================================
// SECTION: Tests
// ============================================================================
