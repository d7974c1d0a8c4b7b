// crates/oidc-conformance-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Provides message catalog and translation utilities for the CLI.
// Purpose: Centralize user-facing strings for future localization support.
// Dependencies: Standard library collections and formatting utilities.
// ============================================================================

//! ## Overview
//! The conformance CLI stores user-facing strings in a small translation
//! catalog to enforce consistent messaging and to prepare for future locales.
//! All runtime output should be routed through the [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to English and then to the key itself.
//! - Placeholder substitutions preserve deterministic order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Supported CLI locales.
///
/// # Invariants
/// - Variants are stable for CLI parsing and catalog lookup.
/// - [`Locale::En`] is the default fallback locale.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Locale {
    /// English (default).
    En,
    /// Catalan.
    Ca,
}

impl Locale {
    /// Returns the canonical locale label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ca => "ca",
        }
    }

    /// Attempts to parse a locale value (case-insensitive, tolerant of region tags).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        let normalized = value.to_ascii_lowercase();
        let lang = normalized.split(['-', '_']).next().unwrap_or("");
        match lang {
            "en" => Some(Self::En),
            "ca" => Some(Self::Ca),
            _ => None,
        }
    }
}

/// Ordered list of supported CLI locales.
///
/// # Invariants
/// - Ordering is stable for deterministic presentation.
pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::En, Locale::Ca];

/// A formatted message argument captured by the [`macro@crate::t`] macro.
///
/// # Invariants
/// - `key` matches a placeholder name without braces (for example, `path`).
/// - `value` is preformatted and should be safe for display.
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Locale Selection
// ============================================================================

/// Global locale selection for CLI output.
static CURRENT_LOCALE: OnceLock<Locale> = OnceLock::new();

/// Sets the CLI locale. Only the first call wins.
pub fn set_locale(locale: Locale) {
    let _ = CURRENT_LOCALE.set(locale);
}

/// Returns the current CLI locale (defaults to English).
#[must_use]
pub fn current_locale() -> Locale {
    CURRENT_LOCALE.get().copied().unwrap_or(Locale::En)
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static English catalog entries loaded into the localized message bundle.
const CATALOG_EN: &[(&str, &str)] = &[
    ("main.version", "oidc-conformance {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("client.init_failed", "Failed to initialize suite client: {error}"),
    ("run.starting", "Starting the Conformance tests..."),
    ("run.plan_url", "Plan URL: {url}"),
    ("run.module_missing", "Test module {module} is not part of plan {plan}"),
    ("run.module_create_failed", "Failed to create test module {module}: {error}"),
    ("run.module_started", "[id: {id}] Starting test module: {module} (Test URL: {url})"),
    (
        "run.module_failed",
        "[id: {id}] Test module {module} failed with message {error} and did not complete",
    ),
    (
        "run.module_matched",
        "[id: {id}] Test module {module} complete with matching results! (State: {status}; \
         Result: {result}; Expected results: {expected})",
    ),
    (
        "run.module_mismatched",
        "[id: {id}] Test module {module} complete with non-matching results! (State: {status}; \
         Result: {result}; Expected results: {expected})",
    ),
    ("run.complete", "Conformance suite has been completed successfully!"),
    ("run.summary.passed", "Passed modules: {count} / {total}"),
    ("run.summary.failed", "Failed modules: {count} / {total}"),
    ("run.summary.entry", "- {module}"),
    ("run.summary.none", "- none"),
    ("run.completer_failed", "Failed to initialize relying-party completer: {error}"),
    ("run.failed", "Conformance run failed: {error}"),
    ("run.report_serialize_failed", "Failed to serialize run report: {error}"),
    ("run.report_write_failed", "Failed to write run report to {path}: {error}"),
    ("run.report_written", "Run report written to {path}"),
    ("modules.header", "Available test modules:"),
    ("modules.entry", "- {module} ({profile})"),
    ("modules.profile.unknown", "unknown"),
    ("modules.list_failed", "Failed to list test modules: {error}"),
    ("artifacts.dir_failed", "Failed to create artifacts directory {path}: {error}"),
    ("export.failed", "Failed to export report for plan id {plan}: {error}"),
    ("export.ok", "Plan report archive for plan id {plan} written to {path}"),
    ("certify.failed", "Failed to build certification package for plan id {plan}: {error}"),
    ("certify.ok", "Certification package zip for plan id {plan} written to {path}"),
    ("log.fetch_failed", "Failed to fetch log for module {module}: {error}"),
    ("log.render_failed", "Failed to render JSON output: {error}"),
    ("log.write_failed", "Failed to write module log to {path}: {error}"),
    ("log.written", "Module log for {module} written to {path}"),
    ("i18n.lang.invalid_env", "Invalid value for {env}: {value}. Expected 'en' or 'ca'."),
    (
        "i18n.disclaimer.machine_translated",
        "Note: non-English output is machine-translated and may be inaccurate.",
    ),
];

/// Static Catalan catalog entries loaded into the localized message bundle.
const CATALOG_CA: &[(&str, &str)] = &[
    ("main.version", "oidc-conformance {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "sortida"),
    ("output.write_failed", "No s'ha pogut escriure a {stream}: {error}"),
    ("config.load_failed", "No s'ha pogut carregar la configuració: {error}"),
    ("client.init_failed", "No s'ha pogut inicialitzar el client de la suite: {error}"),
    ("run.starting", "S'estan iniciant les proves de conformança..."),
    ("run.plan_url", "URL del pla: {url}"),
    ("run.module_missing", "El mòdul de prova {module} no forma part del pla {plan}"),
    ("run.module_create_failed", "No s'ha pogut crear el mòdul de prova {module}: {error}"),
    (
        "run.module_started",
        "[id: {id}] S'està iniciant el mòdul de prova: {module} (URL de la prova: {url})",
    ),
    (
        "run.module_failed",
        "[id: {id}] El mòdul de prova {module} ha fallat amb el missatge {error} i no s'ha \
         completat",
    ),
    (
        "run.module_matched",
        "[id: {id}] El mòdul de prova {module} ha acabat amb resultats coincidents! (Estat: \
         {status}; Resultat: {result}; Resultats esperats: {expected})",
    ),
    (
        "run.module_mismatched",
        "[id: {id}] El mòdul de prova {module} ha acabat amb resultats no coincidents! (Estat: \
         {status}; Resultat: {result}; Resultats esperats: {expected})",
    ),
    ("run.complete", "La suite de conformança s'ha completat correctament!"),
    ("run.summary.passed", "Mòduls aprovats: {count} / {total}"),
    ("run.summary.failed", "Mòduls fallats: {count} / {total}"),
    ("run.summary.entry", "- {module}"),
    ("run.summary.none", "- cap"),
    (
        "run.completer_failed",
        "No s'ha pogut inicialitzar el completador del relying party: {error}",
    ),
    ("run.failed", "L'execució de conformança ha fallat: {error}"),
    ("run.report_serialize_failed", "No s'ha pogut serialitzar l'informe d'execució: {error}"),
    ("run.report_write_failed", "No s'ha pogut escriure l'informe d'execució a {path}: {error}"),
    ("run.report_written", "Informe d'execució escrit a {path}"),
    ("modules.header", "Mòduls de prova disponibles:"),
    ("modules.entry", "- {module} ({profile})"),
    ("modules.profile.unknown", "desconegut"),
    ("modules.list_failed", "No s'han pogut llistar els mòduls de prova: {error}"),
    ("artifacts.dir_failed", "No s'ha pogut crear el directori d'artefactes {path}: {error}"),
    ("export.failed", "No s'ha pogut exportar l'informe per al pla amb id {plan}: {error}"),
    ("export.ok", "Arxiu de l'informe del pla amb id {plan} escrit a {path}"),
    (
        "certify.failed",
        "No s'ha pogut construir el paquet de certificació per al pla amb id {plan}: {error}",
    ),
    ("certify.ok", "Zip del paquet de certificació per al pla amb id {plan} escrit a {path}"),
    ("log.fetch_failed", "No s'ha pogut obtenir el registre del mòdul {module}: {error}"),
    ("log.render_failed", "No s'ha pogut renderitzar la sortida JSON: {error}"),
    ("log.write_failed", "No s'ha pogut escriure el registre del mòdul a {path}: {error}"),
    ("log.written", "Registre del mòdul {module} escrit a {path}"),
    ("i18n.lang.invalid_env", "Valor no vàlid per a {env}: {value}. S'esperava 'en' o 'ca'."),
    (
        "i18n.disclaimer.machine_translated",
        "Nota: la sortida que no és en anglès està traduïda automàticament i pot ser inexacta.",
    ),
];

/// Returns the raw catalog entries for the requested locale.
pub(crate) const fn catalog_entries_for(
    locale: Locale,
) -> &'static [(&'static str, &'static str)] {
    match locale {
        Locale::En => CATALOG_EN,
        Locale::Ca => CATALOG_CA,
    }
}

/// Returns the message catalog for the requested locale.
pub(crate) fn catalog_for(locale: Locale) -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_EN_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    static CATALOG_CA_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    let map = match locale {
        Locale::En => &CATALOG_EN_MAP,
        Locale::Ca => &CATALOG_CA_MAP,
    };
    map.get_or_init(|| catalog_entries_for(locale).iter().copied().collect())
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` using the selected locale while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let locale = current_locale();
    let template = catalog_for(locale)
        .get(key)
        .copied()
        .or_else(|| catalog_for(Locale::En).get(key).copied())
        .unwrap_or(key);
    if args.is_empty() {
        return template.to_string();
    }

    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a localized message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
///
/// # Returns
///
/// A localized [`String`] with placeholders substituted.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
