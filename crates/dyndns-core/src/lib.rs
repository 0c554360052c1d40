// # dyndns-core
//
// Core library for the dyndns update client.
//
// This library provides the update reconciliation engine for a dynamic DNS
// client:
// - **IpResolver**: Trait for detecting the caller's public IPv4 address
// - **Registry**: Trait for the client contract against the DDNS registry
// - **Reconciler**: Decision core: no-op vs. update, always read-before-write
// - **RetryPolicy**: Bounded fixed-delay retry around one attempt
// - **Daemon**: Periodic loop that isolates per-cycle failures
//
// ## Design Principles
//
// 1. **Typed outcomes**: expected failures are `Error` values, never
//    control-flow exceptions; `Unchanged` is a success distinct from `Updated`
// 2. **Single-shot collaborators**: resolvers and registry clients make one
//    network operation per call; retries belong to `RetryPolicy` alone
// 3. **Stateless client**: the registry owns the record; nothing is cached
//    between cycles
// 4. **Library-first**: the binary is a thin shell over these types

pub mod config;
pub mod engine;
pub mod error;
pub mod traits;
pub mod types;

// Re-export core types for convenience
pub use config::ClientConfig;
pub use engine::{Daemon, Reconciler, RetryPolicy};
pub use error::{Error, Result};
pub use traits::{IpResolver, Registry};
pub use types::{HostnameRecord, Reconciliation, UpdateAck, parse_dotted_quad};
