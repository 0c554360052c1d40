//! Client configuration
//!
//! The configuration is an explicit, immutable object constructed once and
//! handed to the components that need it; there is no process-wide state.
//! It can be loaded from a JSON file, built from CLI flags, or both (the
//! binary merges them, CLI winning).

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default public IP echo services, tried in order
pub const DEFAULT_IP_SERVICES: &[&str] = &[
    "https://api.ipify.org",
    "https://ifconfig.me/ip",
    "https://icanhazip.com",
];

/// Default parent domain, used for display/logging only
pub const DEFAULT_DOMAIN: &str = "dm1lx.de";

/// Client configuration for one managed hostname
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// The managed hostname label (without the parent domain)
    pub hostname: String,

    /// API token presented on every registry call.
    /// Never logged; the `Debug` impl redacts it.
    pub token: String,

    /// Base URL of the DDNS registry service
    pub server_url: String,

    /// Parent domain, combined with `hostname` for log lines only.
    /// The registry is the source of truth for the full name.
    #[serde(default = "default_domain")]
    pub domain: String,

    /// Ordered list of public IP echo services to try
    #[serde(default = "default_ip_services")]
    pub ip_services: Vec<String>,

    /// Daemon check interval in seconds
    #[serde(default = "default_check_interval_secs")]
    pub check_interval_secs: u64,

    /// Total attempt budget for one-shot retry-wrapped runs
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    /// Fixed delay between retry attempts in seconds
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,

    /// Optional log file, in addition to console output
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl ClientConfig {
    /// The full display name, e.g. `myhome.dm1lx.de`
    pub fn display_name(&self) -> String {
        format!("{}.{}", self.hostname, self.domain)
    }

    /// Validate the configuration.
    ///
    /// Must pass before any component is constructed: a reconciler is never
    /// built from a config with a missing hostname or credential.
    pub fn validate(&self) -> Result<()> {
        if self.hostname.is_empty() {
            return Err(Error::config("hostname is required"));
        }
        validate_hostname_label(&self.hostname)?;

        if self.token.is_empty() {
            return Err(Error::config("API token is required"));
        }

        if !self.server_url.starts_with("http://") && !self.server_url.starts_with("https://") {
            return Err(Error::config(format!(
                "server_url must use http or https, got: {}",
                self.server_url
            )));
        }

        if self.ip_services.is_empty() {
            return Err(Error::config("at least one IP detection service is required"));
        }

        if self.check_interval_secs == 0 {
            return Err(Error::config("check_interval_secs must be > 0"));
        }

        if self.max_attempts == 0 {
            return Err(Error::config("max_attempts must be >= 1"));
        }

        Ok(())
    }

    /// Parse a configuration from its JSON representation.
    ///
    /// Malformed input surfaces as [`Error::Json`]; the result is not yet
    /// validated, callers run [`ClientConfig::validate`] after merging any
    /// overrides.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// A ready-to-edit sample configuration, written by `--create-config`
    pub fn sample() -> Self {
        Self {
            hostname: "myhome".to_string(),
            token: "your_api_token_here".to_string(),
            server_url: "http://localhost:3000".to_string(),
            domain: default_domain(),
            ip_services: default_ip_services(),
            check_interval_secs: default_check_interval_secs(),
            max_attempts: default_max_attempts(),
            retry_delay_secs: default_retry_delay_secs(),
            log_file: Some(PathBuf::from("/var/log/dyndns.log")),
        }
    }
}

// Hand-written so the token can never leak through `{:?}` formatting.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("hostname", &self.hostname)
            .field("token", &"<REDACTED>")
            .field("server_url", &self.server_url)
            .field("domain", &self.domain)
            .field("ip_services", &self.ip_services)
            .field("check_interval_secs", &self.check_interval_secs)
            .field("max_attempts", &self.max_attempts)
            .field("retry_delay_secs", &self.retry_delay_secs)
            .field("log_file", &self.log_file)
            .finish()
    }
}

/// Validate a single DNS label per RFC 1035: alphanumeric and hyphen,
/// at most 63 characters, no leading or trailing hyphen.
fn validate_hostname_label(label: &str) -> Result<()> {
    if label.len() > 63 {
        return Err(Error::config(format!(
            "hostname too long: {} chars (max 63)",
            label.len()
        )));
    }

    if label.contains('.') {
        return Err(Error::config(format!(
            "hostname must be a bare label without the parent domain: '{}'",
            label
        )));
    }

    if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(Error::config(format!(
            "hostname contains invalid characters: '{}' (alphanumeric and hyphen only)",
            label
        )));
    }

    if label.starts_with('-') || label.ends_with('-') {
        return Err(Error::config(format!(
            "hostname cannot start or end with a hyphen: '{}'",
            label
        )));
    }

    Ok(())
}

fn default_domain() -> String {
    DEFAULT_DOMAIN.to_string()
}

fn default_ip_services() -> Vec<String> {
    DEFAULT_IP_SERVICES.iter().map(|s| s.to_string()).collect()
}

fn default_check_interval_secs() -> u64 {
    300
}

fn default_max_attempts() -> usize {
    3
}

fn default_retry_delay_secs() -> u64 {
    5
}
