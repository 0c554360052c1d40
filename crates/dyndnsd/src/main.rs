// # dyndnsd - Dynamic DNS update client
//
// Thin integration shell over `dyndns-core`: configuration, logging, and
// the choice between one-shot and daemon mode live here; all reconciliation
// logic lives in the library.
//
// ## Configuration
//
// Either a JSON configuration file (`--config`), CLI flags, or both; flags
// override file values. `--create-config PATH` writes a ready-to-edit
// sample file.
//
// ## Modes
//
// - one-shot (default): one retry-wrapped reconciliation, summary on
//   stdout, exit code 0 on success (updated or unchanged), 2 on failure
// - daemon (`--daemon`): periodic reconciliation until SIGINT
//
// ## Exit codes
//
// - 0: success (IP unchanged or updated; clean daemon shutdown)
// - 1: configuration error
// - 2: update failure after retries

use anyhow::{Context, Result};
use clap::Parser;
use dyndns_core::{ClientConfig, Daemon, Reconciler, RetryPolicy, parse_dotted_quad};
use dyndns_ip_http::HttpIpResolver;
use dyndns_registry_http::HttpRegistry;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{Level, info, warn};
use tracing_subscriber::prelude::*;

/// Default registry URL when neither config file nor flag supplies one
const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

#[derive(Parser, Debug)]
#[command(name = "dyndnsd", version, about = "Dynamic DNS update client")]
struct Args {
    /// DDNS hostname label (without the parent domain)
    #[arg(long)]
    hostname: Option<String>,

    /// API token for the registry
    #[arg(long)]
    token: Option<String>,

    /// Base URL of the DDNS registry service
    #[arg(long, value_name = "URL")]
    server_url: Option<String>,

    /// Force a specific IP address instead of detecting it
    #[arg(long, value_name = "ADDR")]
    ip: Option<String>,

    /// JSON configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Run as a periodic daemon instead of one-shot
    #[arg(long)]
    daemon: bool,

    /// Daemon check interval in seconds
    #[arg(long, value_name = "SECS")]
    interval: Option<u64>,

    /// Log file, in addition to console output
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Write a sample configuration file and exit
    #[arg(long, value_name = "PATH")]
    create_config: Option<PathBuf>,
}

/// Exit codes for the one-shot and daemon paths
#[derive(Debug, Clone, Copy)]
enum DyndnsExitCode {
    Success = 0,
    ConfigError = 1,
    UpdateFailed = 2,
}

impl From<DyndnsExitCode> for ExitCode {
    fn from(code: DyndnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Build the effective configuration: file values first, CLI flags on top
fn load_config(args: &Args) -> Result<ClientConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read config file {}", path.display()))?;
            ClientConfig::from_json_str(&raw)
                .with_context(|| format!("invalid JSON in config file {}", path.display()))?
        }
        None => {
            let hostname = args
                .hostname
                .clone()
                .context("either --config or both --hostname and --token are required")?;
            let token = args
                .token
                .clone()
                .context("either --config or both --hostname and --token are required")?;

            serde_json::from_value(serde_json::json!({
                "hostname": hostname,
                "token": token,
                "server_url": DEFAULT_SERVER_URL,
            }))?
        }
    };

    // CLI flags win over file values
    if let Some(hostname) = &args.hostname {
        config.hostname = hostname.clone();
    }
    if let Some(token) = &args.token {
        config.token = token.clone();
    }
    if let Some(server_url) = &args.server_url {
        config.server_url = server_url.clone();
    }
    if let Some(interval) = args.interval {
        config.check_interval_secs = interval;
    }
    if let Some(log_file) = &args.log_file {
        config.log_file = Some(log_file.clone());
    }

    config.validate()?;
    Ok(config)
}

/// Write a sample configuration file for the user to edit
fn create_sample_config(path: &PathBuf) -> Result<()> {
    let sample = serde_json::to_string_pretty(&ClientConfig::sample())?;
    std::fs::write(path, sample)
        .with_context(|| format!("cannot write {}", path.display()))?;
    println!("Sample configuration created: {}", path.display());
    println!("Edit the file and fill in your hostname and API token.");
    Ok(())
}

/// Initialize tracing: console always, plus a log file when configured
fn init_logging(level_name: &str, log_file: Option<&PathBuf>) -> Result<()> {
    let level = match level_name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        other => anyhow::bail!("invalid log level '{}' (trace, debug, info, warn, error)", other),
    };

    let filter = tracing_subscriber::filter::LevelFilter::from_level(level);
    let console = tracing_subscriber::fmt::layer().with_target(false);

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            let file_layer = tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file));

            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .with(file_layer)
                .init();
        }
        None => {
            tracing_subscriber::registry().with(filter).with(console).init();
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(path) = &args.create_config {
        return match create_sample_config(path) {
            Ok(()) => DyndnsExitCode::Success.into(),
            Err(e) => {
                eprintln!("Error: {:#}", e);
                DyndnsExitCode::ConfigError.into()
            }
        };
    }

    let config = match load_config(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return DyndnsExitCode::ConfigError.into();
        }
    };

    if let Err(e) = init_logging(&args.log_level, config.log_file.as_ref()) {
        eprintln!("Configuration error: {:#}", e);
        return DyndnsExitCode::ConfigError.into();
    }

    // The forced IP is validated here, before it ever reaches the
    // reconciler.
    let forced_ip = match &args.ip {
        Some(raw) => match parse_dotted_quad(raw) {
            Ok(ip) => Some(ip),
            Err(e) => {
                eprintln!("Configuration error: {}", e);
                return DyndnsExitCode::ConfigError.into();
            }
        },
        None => None,
    };

    let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to create tokio runtime: {}", e);
            return DyndnsExitCode::ConfigError.into();
        }
    };

    rt.block_on(run(config, forced_ip, args.daemon)).into()
}

async fn run(config: ClientConfig, forced_ip: Option<Ipv4Addr>, daemon_mode: bool) -> DyndnsExitCode {
    let display_name = config.display_name();

    let reconciler = match build_reconciler(&config) {
        Ok(reconciler) => reconciler,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return DyndnsExitCode::ConfigError;
        }
    };

    if daemon_mode {
        if forced_ip.is_some() {
            warn!("--ip is ignored in daemon mode; each cycle detects the current IP");
        }

        info!(
            hostname = %display_name,
            interval_secs = config.check_interval_secs,
            "running in daemon mode"
        );
        Daemon::new(reconciler, Duration::from_secs(config.check_interval_secs))
            .run()
            .await;
        return DyndnsExitCode::Success;
    }

    let policy = RetryPolicy::new(
        config.max_attempts,
        Duration::from_secs(config.retry_delay_secs),
    );

    match policy.run(|| reconciler.reconcile(forced_ip)).await {
        Ok(dyndns_core::Reconciliation::Unchanged { ip }) => {
            println!("{}: IP unchanged ({}), no update needed", display_name, ip);
            DyndnsExitCode::Success
        }
        Ok(dyndns_core::Reconciliation::Updated {
            previous_ip,
            new_ip,
        }) => {
            println!("{}: updated {} -> {}", display_name, previous_ip, new_ip);
            DyndnsExitCode::Success
        }
        Err(e) => {
            eprintln!("{}: update failed: {}", display_name, e);
            DyndnsExitCode::UpdateFailed
        }
    }
}

fn build_reconciler(config: &ClientConfig) -> dyndns_core::Result<Reconciler> {
    let resolver = HttpIpResolver::new(config.ip_services.clone())?;
    let registry = HttpRegistry::new(config.server_url.clone(), config.token.clone())?;

    Ok(Reconciler::new(
        Box::new(resolver),
        Box::new(registry),
        config.hostname.clone(),
    ))
}
