// # IP Resolver Trait
//
// Defines the interface for determining the caller's current public IPv4
// address.
//
// ## Implementations
//
// - HTTP fallback chain over external echo services: `dyndns-ip-http` crate
// - Future: router/UPnP queries, STUN
//
// Resolvers are observers, not decision-makers: they must not talk to the
// registry, must not retry a whole resolution (trying the next configured
// service is part of a single resolution, not a retry), and must not decide
// whether an update is needed. That coordination is owned by the
// `Reconciler` and `RetryPolicy`.

use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Trait for public-IP detection implementations
///
/// Implementations must be thread-safe and usable across async tasks, and
/// must bound every network operation with a timeout so a stalled external
/// service delays but never hangs the caller.
#[async_trait]
pub trait IpResolver: Send + Sync {
    /// Determine the current public IPv4 address.
    ///
    /// Returns the first syntactically valid address obtained, or
    /// `Error::IpResolution` once every avenue is exhausted. The returned
    /// address has already passed the dotted-quad check.
    async fn resolve(&self) -> Result<Ipv4Addr, crate::Error>;
}
