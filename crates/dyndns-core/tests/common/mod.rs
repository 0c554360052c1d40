//! Test doubles for engine contract tests
//!
//! Counting mock implementations of the core traits. Counters are shared
//! through `Arc` so tests keep handles after the mock moves into a
//! `Reconciler`.

use async_trait::async_trait;
use dyndns_core::error::{Error, Result};
use dyndns_core::traits::{IpResolver, Registry};
use dyndns_core::types::{HostnameRecord, UpdateAck};
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// How a mock operation should fail, if at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    None,
    Unauthorized,
    Forbidden,
    NotFound,
    ServerError,
    Network,
}

impl FailureMode {
    fn make_error(self, hostname: &str) -> Option<Error> {
        match self {
            FailureMode::None => None,
            FailureMode::Unauthorized => Some(Error::Unauthorized),
            FailureMode::Forbidden => Some(Error::forbidden(hostname)),
            FailureMode::NotFound => Some(Error::not_found(hostname)),
            FailureMode::ServerError => Some(Error::registry_server(500, "internal error")),
            FailureMode::Network => Some(Error::network("connection refused")),
        }
    }
}

/// A resolver that always answers with a fixed address, or always fails
pub struct MockResolver {
    response: Option<Ipv4Addr>,
    calls: Arc<AtomicUsize>,
}

impl MockResolver {
    pub fn answering(ip: Ipv4Addr) -> Self {
        Self {
            response: Some(ip),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            response: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Handle to the resolve() call counter, valid after the mock is boxed
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl IpResolver for MockResolver {
    async fn resolve(&self) -> Result<Ipv4Addr> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response
            .ok_or_else(|| Error::ip_resolution("all detection services failed"))
    }
}

/// A registry mock holding one record, with scriptable failures.
///
/// `submit_update` mutates the held record, so consecutive reconciles
/// observe the write exactly as the real registry would.
pub struct MockRegistry {
    record_ip: Arc<Mutex<Ipv4Addr>>,
    fetch_failure: FailureMode,
    submit_failure: FailureMode,
    fetch_calls: Arc<AtomicUsize>,
    submit_calls: Arc<AtomicUsize>,
    submitted: Arc<Mutex<Vec<Ipv4Addr>>>,
}

impl MockRegistry {
    pub fn holding(ip: Ipv4Addr) -> Self {
        Self {
            record_ip: Arc::new(Mutex::new(ip)),
            fetch_failure: FailureMode::None,
            submit_failure: FailureMode::None,
            fetch_calls: Arc::new(AtomicUsize::new(0)),
            submit_calls: Arc::new(AtomicUsize::new(0)),
            submitted: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_fetch_failure(mut self, mode: FailureMode) -> Self {
        self.fetch_failure = mode;
        self
    }

    pub fn with_submit_failure(mut self, mode: FailureMode) -> Self {
        self.submit_failure = mode;
        self
    }

    pub fn fetch_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.fetch_calls)
    }

    pub fn submit_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.submit_calls)
    }

    /// Handle to the list of addresses passed to submit_update
    pub fn submitted_ips(&self) -> Arc<Mutex<Vec<Ipv4Addr>>> {
        Arc::clone(&self.submitted)
    }
}

#[async_trait]
impl Registry for MockRegistry {
    async fn fetch_record(&self, hostname: &str) -> Result<HostnameRecord> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(err) = self.fetch_failure.make_error(hostname) {
            return Err(err);
        }

        Ok(HostnameRecord {
            hostname: hostname.to_string(),
            ip: *self.record_ip.lock().unwrap(),
            last_updated: None,
        })
    }

    async fn submit_update(&self, hostname: &str, ip: Ipv4Addr) -> Result<UpdateAck> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.submitted.lock().unwrap().push(ip);

        if let Some(err) = self.submit_failure.make_error(hostname) {
            return Err(err);
        }

        *self.record_ip.lock().unwrap() = ip;

        Ok(UpdateAck {
            hostname: hostname.to_string(),
            ip,
        })
    }
}
