//! Domain types shared across the dyndns client
//!
//! Only IPv4 dotted-quad addresses are modeled. Every address that reaches
//! the reconciler has already passed [`parse_dotted_quad`]; the registry
//! client and the IP resolver validate at their boundaries.

use crate::error::{Error, Result};
use std::net::Ipv4Addr;

/// Parse a dotted-quad IPv4 address string.
///
/// Valid iff the input has exactly four dot-separated components, each
/// parseable as an integer in [0, 255]. This is the single validation
/// authority for addresses entering the system; raw `Ipv4Addr::from_str`
/// is not used at the boundaries so that the accepted grammar stays in
/// one place.
pub fn parse_dotted_quad(input: &str) -> Result<Ipv4Addr> {
    let mut octets = [0u8; 4];
    let mut parts = input.split('.');

    for octet in octets.iter_mut() {
        let part = parts
            .next()
            .ok_or_else(|| Error::InvalidIp(input.to_string()))?;
        *octet = part
            .parse::<u8>()
            .map_err(|_| Error::InvalidIp(input.to_string()))?;
    }

    if parts.next().is_some() {
        return Err(Error::InvalidIp(input.to_string()));
    }

    Ok(Ipv4Addr::from(octets))
}

/// The registry's view of a hostname.
///
/// Owned and mutated exclusively by the registry service; the client only
/// reads it and proposes changes through `Registry::submit_update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostnameRecord {
    /// The short hostname label (without the parent domain)
    pub hostname: String,
    /// The currently registered address
    pub ip: Ipv4Addr,
    /// Last update timestamp as reported by the registry, if any
    pub last_updated: Option<String>,
}

/// Acknowledgement returned by the registry for a successful update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateAck {
    /// The hostname that was updated
    pub hostname: String,
    /// The address the registry now holds
    pub ip: Ipv4Addr,
}

/// Outcome of one successful reconciliation attempt.
///
/// Failures are carried by `Result<Reconciliation, Error>`: a `NoopUnchanged`
/// is a success outcome, not an error, and stays distinguishable from an
/// actual write for idempotent daemon operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// The registry already holds the resolved address; nothing was written
    Unchanged {
        /// The address both sides agree on
        ip: Ipv4Addr,
    },
    /// The registry accepted a new address
    Updated {
        /// The address the registry held before the write
        previous_ip: Ipv4Addr,
        /// The address that was submitted
        new_ip: Ipv4Addr,
    },
}
