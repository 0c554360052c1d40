//! Core trait definitions
//!
//! These traits are the seams between the reconciliation engine and the
//! outside world: [`IpResolver`] detects the caller's public address,
//! [`Registry`] speaks to the remote DDNS registry service.

mod ip_resolver;
mod registry;

pub use ip_resolver::IpResolver;
pub use registry::Registry;
