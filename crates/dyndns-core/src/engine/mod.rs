//! Update reconciliation engine
//!
//! The [`Reconciler`] is the decision core of the client: given the caller's
//! current public address and the registry's last-known address for a
//! hostname, it decides no-op vs. update and drives the registry client
//! accordingly.
//!
//! ## Flow
//!
//! ```text
//! ┌─────────────┐  resolve()   ┌──────────────┐  fetch_record / submit_update
//! │ IpResolver  │─────────────▶│  Reconciler  │──────────────────────────────▶ Registry
//! └─────────────┘              └──────────────┘
//!        wrapped by RetryPolicy (one-shot) or driven by Daemon (periodic)
//! ```
//!
//! The ordering is always read-before-write: the registry record is fetched
//! and compared before any update is submitted, so the registry is never
//! blindly overwritten and "no change needed" stays distinguishable from
//! "update succeeded".

pub mod daemon;
pub mod retry;

pub use daemon::Daemon;
pub use retry::RetryPolicy;

use crate::error::Result;
use crate::traits::{IpResolver, Registry};
use crate::types::Reconciliation;
use std::net::Ipv4Addr;
use tracing::{debug, info};

/// The reconciliation engine for a single hostname.
///
/// Holds its collaborators behind trait objects and no other state: the
/// client is stateless between reconciliation attempts, the registry is the
/// only source of truth. Constructed once from a validated configuration;
/// the credential lives inside the registry client and is immutable for the
/// reconciler's lifetime.
pub struct Reconciler {
    /// Detects the caller's current public address
    resolver: Box<dyn IpResolver>,

    /// Speaks to the remote DDNS registry
    registry: Box<dyn Registry>,

    /// The managed hostname label
    hostname: String,
}

impl Reconciler {
    /// Create a new reconciler for `hostname`
    pub fn new(
        resolver: Box<dyn IpResolver>,
        registry: Box<dyn Registry>,
        hostname: impl Into<String>,
    ) -> Self {
        Self {
            resolver,
            registry,
            hostname: hostname.into(),
        }
    }

    /// The hostname this reconciler manages
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Run one reconciliation attempt.
    ///
    /// When `forced_ip` is supplied it is used verbatim and the resolver is
    /// not consulted; the caller carries the validation burden (the binary
    /// validates `--ip` at parse time).
    ///
    /// Steps:
    /// 1. Determine the candidate address (forced or resolved).
    /// 2. Fetch the registry record; any failure, including `NotFound`,
    ///    propagates without attempting a write.
    /// 3. Equal addresses -> [`Reconciliation::Unchanged`], a success.
    /// 4. Otherwise submit exactly one update.
    pub async fn reconcile(&self, forced_ip: Option<Ipv4Addr>) -> Result<Reconciliation> {
        let candidate = match forced_ip {
            Some(ip) => {
                info!(hostname = %self.hostname, ip = %ip, "using forced IP");
                ip
            }
            None => self.resolver.resolve().await?,
        };

        let record = self.registry.fetch_record(&self.hostname).await?;

        if record.ip == candidate {
            debug!(
                hostname = %self.hostname,
                ip = %candidate,
                "IP unchanged, no update needed"
            );
            return Ok(Reconciliation::Unchanged { ip: candidate });
        }

        info!(
            hostname = %self.hostname,
            old_ip = %record.ip,
            new_ip = %candidate,
            "IP changed, updating registry"
        );

        let ack = self.registry.submit_update(&self.hostname, candidate).await?;
        debug!(hostname = %ack.hostname, ip = %ack.ip, "registry acknowledged update");

        Ok(Reconciliation::Updated {
            previous_ip: record.ip,
            new_ip: candidate,
        })
    }
}
