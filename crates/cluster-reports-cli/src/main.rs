// crates/cluster-reports-cli/src/main.rs
// ============================================================================
// Module: Cluster Reports CLI Entry Point
// Description: Command dispatcher for the report server and report client.
// Purpose: Run the HTTP server and drive the report API from a shell.
// Dependencies: clap, cluster-reports-{client, config, core, server}, tokio.
// ============================================================================

//! ## Overview
//! The `cluster-reports` binary has two halves. `serve` and `config validate`
//! operate on a local TOML configuration; the `report` subcommands are a thin
//! shell over [`ReportClient`] and print the API's JSON to stdout. Failures go
//! to stderr with a non-zero exit code.
//!
//! Credentials are read from `--token` or `CLUSTER_REPORTS_TOKEN` and are
//! never echoed back.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use cluster_reports_client::API_URL_ENV_VAR;
use cluster_reports_client::BearerToken;
use cluster_reports_client::ClientConfig;
use cluster_reports_client::PROXY_ENV_VAR;
use cluster_reports_client::ReportClient;
use cluster_reports_config::ClusterReportsConfig;
use cluster_reports_core::ClusterId;
use cluster_reports_core::ReportData;
use cluster_reports_core::ReportId;
use cluster_reports_core::ReportList;
use cluster_reports_server::ReportServer;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum raw payload read from `--data-file`.
///
/// Base64 grows input by a third, so this encodes to the server's default
/// 8 MiB data limit.
const MAX_DATA_FILE_BYTES: usize = 6 * 1024 * 1024;
/// Default client timeout in milliseconds.
const DEFAULT_TIMEOUT_MS: u64 = 30_000;
/// Environment variable holding the bearer token for client commands.
const TOKEN_ENV_VAR: &str = "CLUSTER_REPORTS_TOKEN";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "cluster-reports", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the report HTTP server.
    Serve(ServeCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Report API client commands.
    Report {
        /// Selected report subcommand.
        #[command(subcommand)]
        command: ReportCommand,
    },
}

/// Configuration for the `serve` command.
#[derive(Args, Debug)]
struct ServeCommand {
    /// Optional config file path (defaults to cluster-reports.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate a config file.
    Validate(ConfigValidateCommand),
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to cluster-reports.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Report client subcommands.
#[derive(Subcommand, Debug)]
enum ReportCommand {
    /// Create a report for a cluster.
    Create(ReportCreateCommand),
    /// Fetch one report by id.
    Get(ReportGetCommand),
    /// List a cluster's reports in creation order.
    List(ReportListCommand),
}

/// Connection settings shared by the report client commands.
#[derive(Args, Debug, Clone)]
struct ClientArgs {
    /// API base URL (defaults to `CLUSTER_REPORTS_API_URL`).
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,
    /// Bearer token (defaults to `CLUSTER_REPORTS_TOKEN`).
    #[arg(long, value_name = "TOKEN")]
    token: Option<String>,
    /// Forward proxy URL (defaults to `CLUSTER_REPORTS_PROXY`).
    #[arg(long, value_name = "URL")]
    proxy: Option<String>,
    /// Request timeout in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,
}

/// Arguments for `report create`.
#[derive(Args, Debug)]
struct ReportCreateCommand {
    /// Client connection settings.
    #[command(flatten)]
    client: ClientArgs,
    /// Cluster identifier.
    #[arg(long, value_name = "ID")]
    cluster: String,
    /// Human-readable summary.
    #[arg(long, value_name = "TEXT")]
    summary: String,
    /// File whose raw bytes become the report payload.
    #[arg(
        long,
        value_name = "PATH",
        conflicts_with = "data_json",
        required_unless_present = "data_json"
    )]
    data_file: Option<PathBuf>,
    /// Inline JSON document used as the report payload.
    #[arg(long, value_name = "JSON")]
    data_json: Option<String>,
}

/// Arguments for `report get`.
#[derive(Args, Debug)]
struct ReportGetCommand {
    /// Client connection settings.
    #[command(flatten)]
    client: ClientArgs,
    /// Cluster identifier.
    #[arg(long, value_name = "ID")]
    cluster: String,
    /// Report identifier.
    #[arg(long = "report", value_name = "ID")]
    report_id: String,
}

/// Arguments for `report list`.
#[derive(Args, Debug)]
struct ReportListCommand {
    /// Client connection settings.
    #[command(flatten)]
    client: ClientArgs,
    /// Cluster identifier.
    #[arg(long, value_name = "ID")]
    cluster: String,
    /// Return only the N most recent reports.
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    last: Option<i64>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a user-facing message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
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

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("cluster-reports {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Serve(command) => command_serve(command).await,
        Commands::Config {
            command,
        } => command_config(command),
        Commands::Report {
            command,
        } => command_report(command).await,
    }
}

/// Prints top-level help.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Serve Command
// ============================================================================

/// Executes the `serve` command.
async fn command_serve(command: ServeCommand) -> CliResult<ExitCode> {
    let config = ClusterReportsConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;

    let server = tokio::task::spawn_blocking(move || ReportServer::from_config(config))
        .await
        .map_err(|err| CliError::new(format!("server init failed: init join failed: {err}")))?
        .map_err(|err| CliError::new(format!("server init failed: {err}")))?;
    let bound =
        server.bind().await.map_err(|err| CliError::new(format!("server init failed: {err}")))?;
    let addr =
        bound.local_addr().map_err(|err| CliError::new(format!("server init failed: {err}")))?;
    write_stderr_line(&format!("cluster-reports listening on http://{addr}"))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;

    bound
        .serve_with_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .map_err(|err| CliError::new(format!("server failed: {err}")))?;

    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(&command),
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let _config = ClusterReportsConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    write_stdout_line("config ok").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Report Commands
// ============================================================================

/// Dispatches report client subcommands.
async fn command_report(command: ReportCommand) -> CliResult<ExitCode> {
    match command {
        ReportCommand::Create(command) => command_report_create(command).await,
        ReportCommand::Get(command) => command_report_get(command).await,
        ReportCommand::List(command) => command_report_list(command).await,
    }
}

/// Executes `report create`.
async fn command_report_create(command: ReportCreateCommand) -> CliResult<ExitCode> {
    let data = resolve_report_data(command.data_file.as_deref(), command.data_json.as_deref())?;
    let (client, token) = connect(&command.client)?;
    let report = client
        .create_report(&token, &ClusterId::new(command.cluster), &command.summary, &data)
        .await
        .map_err(|err| CliError::new(format!("create report failed: {err}")))?;
    write_json(&report)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `report get`.
async fn command_report_get(command: ReportGetCommand) -> CliResult<ExitCode> {
    let (client, token) = connect(&command.client)?;
    let report = client
        .get_report(&token, &ClusterId::new(command.cluster), &ReportId::new(command.report_id))
        .await
        .map_err(|err| CliError::new(format!("get report failed: {err}")))?;
    write_json(&report)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `report list`.
async fn command_report_list(command: ReportListCommand) -> CliResult<ExitCode> {
    let (client, token) = connect(&command.client)?;
    let reports = client
        .list_reports(&token, &ClusterId::new(command.cluster), command.last)
        .await
        .map_err(|err| CliError::new(format!("list reports failed: {err}")))?;
    write_json(&ReportList {
        reports,
    })?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Client Helpers
// ============================================================================

/// Builds a client and credential from flags and the process environment.
fn connect(args: &ClientArgs) -> CliResult<(ReportClient, BearerToken)> {
    let lookup = |key: &str| std::env::var(key).ok();
    let config = resolve_client_config(args, lookup)?;
    let token = resolve_token(args.token.as_deref(), lookup)?;
    let client =
        ReportClient::new(config).map_err(|err| CliError::new(format!("invalid client: {err}")))?;
    Ok((client, token))
}

/// Resolves the client configuration, preferring flags over environment values.
fn resolve_client_config(
    args: &ClientArgs,
    lookup: impl Fn(&str) -> Option<String>,
) -> CliResult<ClientConfig> {
    let mut config = match args.endpoint.as_deref() {
        Some(endpoint) => {
            let mut config = ClientConfig::new(endpoint.trim());
            config.proxy = lookup(PROXY_ENV_VAR).filter(|value| !value.trim().is_empty());
            config
        }
        None => ClientConfig::from_lookup(&lookup).map_err(|_| {
            CliError::new(format!("--endpoint or {API_URL_ENV_VAR} is required"))
        })?,
    };
    if let Some(proxy) = args.proxy.as_deref() {
        config = config.with_proxy(proxy.trim());
    }
    if args.timeout_ms == 0 {
        return Err(CliError::new("--timeout-ms must be greater than zero".to_string()));
    }
    Ok(config.with_timeout(Duration::from_millis(args.timeout_ms)))
}

/// Resolves the bearer token from `--token` or [`TOKEN_ENV_VAR`].
fn resolve_token(
    flag: Option<&str>,
    lookup: impl Fn(&str) -> Option<String>,
) -> CliResult<BearerToken> {
    let raw = flag
        .map(str::to_string)
        .or_else(|| lookup(TOKEN_ENV_VAR))
        .ok_or_else(|| CliError::new(format!("--token or {TOKEN_ENV_VAR} is required")))?;
    BearerToken::new(raw.trim()).map_err(|err| CliError::new(err.to_string()))
}

/// Builds the report payload from exactly one data source.
fn resolve_report_data(data_file: Option<&Path>, data_json: Option<&str>) -> CliResult<ReportData> {
    match (data_file, data_json) {
        (Some(path), None) => {
            let bytes = read_bytes_with_limit(path, MAX_DATA_FILE_BYTES).map_err(|err| match err {
                ReadLimitError::Io(err) => {
                    CliError::new(format!("failed to read {}: {err}", path.display()))
                }
                ReadLimitError::TooLarge {
                    size,
                    limit,
                } => CliError::new(format!(
                    "{} is {size} bytes, exceeding the {limit} byte limit",
                    path.display()
                )),
            })?;
            Ok(ReportData::encode(bytes))
        }
        (None, Some(json)) => {
            serde_json::from_str::<serde_json::Value>(json)
                .map_err(|err| CliError::new(format!("--data-json is not valid JSON: {err}")))?;
            Ok(ReportData::encode(json.as_bytes()))
        }
        _ => {
            Err(CliError::new("exactly one of --data-file or --data-json is required".to_string()))
        }
    }
}

// ============================================================================
// SECTION: File Helpers
// ============================================================================

/// Errors returned by bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// File I/O failure.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let size = file.metadata().map_err(ReadLimitError::Io)?.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1)).read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        return Err(ReadLimitError::TooLarge {
            size: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a value as pretty JSON to stdout.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::new(format!("failed to render output: {err}")))?;
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
