// crates/oidc-conformance-cli/src/main.rs
// ============================================================================
// Module: OIDC Conformance CLI Entry Point
// Description: Command dispatcher for conformance runs and suite utilities.
// Purpose: Provide a localized CLI over the conformance suite's HTTP API.
// Dependencies: clap, oidc-conformance-client, oidc-conformance-config, tokio
// ============================================================================

//! ## Overview
//! The conformance CLI drives a relying party through the OpenID client test
//! plan and exposes the surrounding suite workflows: listing modules,
//! exporting plan reports, assembling certification packages, and fetching
//! module logs. All user-facing strings are routed through the i18n catalog
//! to prepare for future localization. Security posture: configuration files
//! and every suite response are untrusted inputs.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use oidc_conformance_cli::expectations::EXPECTED_OUTCOMES;
use oidc_conformance_cli::i18n::Locale;
use oidc_conformance_cli::i18n::set_locale;
use oidc_conformance_cli::output::output_error;
use oidc_conformance_cli::output::write_stderr_line;
use oidc_conformance_cli::output::write_stdout_line;
use oidc_conformance_cli::report::RunReport;
use oidc_conformance_cli::runner::RunSettings;
use oidc_conformance_cli::runner::execute_run;
use oidc_conformance_cli::t;
use oidc_conformance_client::ClientConfig;
use oidc_conformance_client::ConformanceClient;
use oidc_conformance_client::RelyingPartyCompleter;
use oidc_conformance_client::WaitConfig;
use oidc_conformance_client::client::DEFAULT_REQUEST_TIMEOUT;
use oidc_conformance_config as config;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable for CLI locale selection.
const LANG_ENV: &str = "OIDC_CONFORMANCE_LANG";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "oidc-conformance", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Preferred output language (overrides `OIDC_CONFORMANCE_LANG`).
    #[arg(long, value_enum, value_name = "LANG", global = true)]
    lang: Option<LangArg>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the full client test plan against the relying party.
    Run(RunCommand),
    /// List the test modules available on the suite.
    Modules(ModulesCommand),
    /// Export the HTML report archive for a finished plan.
    Export(ExportCommand),
    /// Assemble a certification package for a finished plan.
    Certify(CertifyCommand),
    /// Fetch the raw event log of a module instance.
    Log(LogCommand),
}

/// Arguments for the `run` command.
#[derive(Args, Debug)]
struct RunCommand {
    /// Path to the harness config file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Per-module wait budget in seconds.
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,
    /// Optional output path for the canonical JSON run report.
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
}

/// Arguments for the `modules` command.
#[derive(Args, Debug)]
struct ModulesCommand {
    /// Path to the harness config file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for the `export` command.
#[derive(Args, Debug)]
struct ExportCommand {
    /// Path to the harness config file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Plan identifier to export.
    #[arg(long, value_name = "ID")]
    plan: String,
}

/// Arguments for the `certify` command.
#[derive(Args, Debug)]
struct CertifyCommand {
    /// Path to the harness config file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Plan identifier to certify.
    #[arg(long, value_name = "ID")]
    plan: String,
    /// Path to the signed certification request PDF.
    #[arg(long, value_name = "PATH")]
    pdf: PathBuf,
    /// Optional path to a client-side log archive to include.
    #[arg(long, value_name = "PATH")]
    client_logs: Option<PathBuf>,
}

/// Arguments for the `log` command.
#[derive(Args, Debug)]
struct LogCommand {
    /// Path to the harness config file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Module instance identifier to fetch.
    #[arg(long, value_name = "ID")]
    module: String,
    /// Optional output path (defaults to stdout).
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

/// Supported CLI language selections.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum LangArg {
    /// English.
    En,
    /// Catalan.
    Ca,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let env_lang = std::env::var(LANG_ENV).ok();
    let locale = resolve_locale(cli.lang, env_lang.as_deref())?;
    set_locale(locale);
    if locale != Locale::En {
        write_stderr_line(&t!("i18n.disclaimer.machine_translated"))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Run(command) => command_run(command).await,
        Commands::Modules(command) => command_modules(command).await,
        Commands::Export(command) => command_export(command).await,
        Commands::Certify(command) => command_certify(command).await,
        Commands::Log(command) => command_log(command).await,
    }
}

// ============================================================================
// SECTION: Run Command
// ============================================================================

/// Executes the `run` command.
async fn command_run(command: RunCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let client = build_client(&config)?;
    let helper_url = config
        .relying_party
        .base_url()
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    let completer =
        RelyingPartyCompleter::new(helper_url, config.server.verify_tls, DEFAULT_REQUEST_TIMEOUT)
            .map_err(|err| CliError::new(t!("run.completer_failed", error = err)))?;
    let wait = command.timeout.map_or_else(WaitConfig::default, |seconds| {
        WaitConfig::with_timeout(Duration::from_secs(seconds))
    });
    let settings = RunSettings {
        plan_name: config.plan.name.clone(),
        configuration: config.plan.configuration(),
        variant: config.plan.variant_value(),
        wait,
    };

    let report = execute_run(&client, &completer, &settings, EXPECTED_OUTCOMES)
        .await
        .map_err(|err| CliError::new(t!("run.failed", error = err)))?;
    if let Some(path) = command.report.as_deref() {
        write_report(&report, path)?;
    }

    if report.all_matched() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Writes the canonical run report JSON to `path`.
fn write_report(report: &RunReport, path: &Path) -> CliResult<()> {
    let bytes = report
        .canonical_json()
        .map_err(|err| CliError::new(t!("run.report_serialize_failed", error = err)))?;
    fs::write(path, bytes).map_err(|err| {
        CliError::new(t!("run.report_write_failed", path = path.display(), error = err))
    })?;
    write_stdout_line(&t!("run.report_written", path = path.display()))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Modules Command
// ============================================================================

/// Executes the `modules` command.
async fn command_modules(command: ModulesCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let client = build_client(&config)?;
    let modules = client
        .available_modules()
        .await
        .map_err(|err| CliError::new(t!("modules.list_failed", error = err)))?;

    write_stdout_line(&t!("modules.header"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    for module in modules {
        let profile = module.profile.unwrap_or_else(|| t!("modules.profile.unknown"));
        write_stdout_line(&t!("modules.entry", module = module.test_name, profile = profile))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Export Command
// ============================================================================

/// Executes the `export` command.
async fn command_export(command: ExportCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let client = build_client(&config)?;
    let directory = config.artifacts.directory.as_path();
    ensure_artifacts_dir(directory)?;
    let path = client
        .export_plan_report(&command.plan, directory)
        .await
        .map_err(|err| CliError::new(t!("export.failed", plan = command.plan, error = err)))?;
    write_stdout_line(&t!("export.ok", plan = command.plan, path = path.display()))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Certify Command
// ============================================================================

/// Executes the `certify` command.
async fn command_certify(command: CertifyCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let client = build_client(&config)?;
    let directory = config.artifacts.directory.as_path();
    ensure_artifacts_dir(directory)?;
    let path = client
        .create_certification_package(
            &command.plan,
            &command.pdf,
            command.client_logs.as_deref(),
            directory,
        )
        .await
        .map_err(|err| CliError::new(t!("certify.failed", plan = command.plan, error = err)))?;
    write_stdout_line(&t!("certify.ok", plan = command.plan, path = path.display()))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Log Command
// ============================================================================

/// Executes the `log` command.
async fn command_log(command: LogCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let client = build_client(&config)?;
    let log = client.module_log(&command.module).await.map_err(|err| {
        CliError::new(t!("log.fetch_failed", module = command.module, error = err))
    })?;
    let rendered = serde_json::to_string_pretty(&log)
        .map_err(|err| CliError::new(t!("log.render_failed", error = err)))?;

    match command.output {
        Some(path) => {
            fs::write(&path, rendered.as_bytes()).map_err(|err| {
                CliError::new(t!("log.write_failed", path = path.display(), error = err))
            })?;
            write_stdout_line(&t!("log.written", module = command.module, path = path.display()))
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
        None => {
            write_stdout_line(&rendered)
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Helpers
// ============================================================================

/// Loads harness configuration for a command.
fn load_config(path: Option<&Path>) -> CliResult<config::ConformanceConfig> {
    config::ConformanceConfig::load(path)
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))
}

/// Builds the suite API client from configuration.
fn build_client(config: &config::ConformanceConfig) -> CliResult<ConformanceClient> {
    let base_url = config
        .server
        .base_url()
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    let mut client_config = ClientConfig::new(base_url);
    client_config.bearer_token = config.server.bearer_token();
    client_config.verify_tls = config.server.verify_tls;
    ConformanceClient::new(client_config)
        .map_err(|err| CliError::new(t!("client.init_failed", error = err)))
}

/// Creates the artifacts directory when it does not exist yet.
fn ensure_artifacts_dir(directory: &Path) -> CliResult<()> {
    fs::create_dir_all(directory).map_err(|err| {
        CliError::new(t!("artifacts.dir_failed", path = directory.display(), error = err))
    })
}

// ============================================================================
// SECTION: Locale Helpers
// ============================================================================

/// Resolves the CLI locale from flags or environment.
fn resolve_locale(lang: Option<LangArg>, env_lang: Option<&str>) -> CliResult<Locale> {
    if let Some(lang) = lang {
        return Ok(lang.into());
    }
    if let Some(value) = env_lang {
        return Locale::parse(value).ok_or_else(|| {
            CliError::new(t!("i18n.lang.invalid_env", env = LANG_ENV, value = value))
        });
    }
    Ok(Locale::En)
}

impl From<LangArg> for Locale {
    fn from(value: LangArg) -> Self {
        match value {
            LangArg::En => Self::En,
            LangArg::Ca => Self::Ca,
        }
    }
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Emits the top-level help message for the CLI.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
