// # Registry Trait
//
// Defines the client contract against the remote DDNS registry service,
// which holds the authoritative hostname -> IP mapping.
//
// ## Implementations
//
// - HTTP REST client with bearer authentication: `dyndns-registry-http`
//
// Registry clients are single-shot: one call maps to one network operation,
// with a bounded timeout and no internal retries. Retrying is the
// `RetryPolicy`'s responsibility, so the retry rate stays under explicit,
// central control. Clients hold no local persistent state; the registry is
// the only source of truth for a `HostnameRecord`.

use crate::types::{HostnameRecord, UpdateAck};
use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Trait for DDNS registry client implementations
///
/// Error mapping required of implementations, for both operations:
/// - 401 -> `Error::Unauthorized` (invalid or missing credential)
/// - 403 -> `Error::Forbidden` (credential does not own the hostname)
/// - 404 -> `Error::NotFound` (hostname unknown to the registry)
/// - other non-2xx or malformed body -> `Error::RegistryServer`
/// - transport failure -> `Error::Network`
#[async_trait]
pub trait Registry: Send + Sync {
    /// Fetch the registry's current record for a hostname.
    ///
    /// A missing hostname is `Error::NotFound`, distinct from transport
    /// errors, so callers can tell "the registry answered and does not know
    /// this name" from "the registry was unreachable".
    async fn fetch_record(&self, hostname: &str) -> Result<HostnameRecord, crate::Error>;

    /// Propose a new address for a hostname.
    ///
    /// Implementations must submit exactly one write per call and return the
    /// registry's acknowledgement. Callers are expected to have compared
    /// against `fetch_record` first; this method itself performs no
    /// read-before-write.
    async fn submit_update(
        &self,
        hostname: &str,
        ip: Ipv4Addr,
    ) -> Result<UpdateAck, crate::Error>;
}
