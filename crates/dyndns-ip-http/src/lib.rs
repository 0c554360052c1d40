// # HTTP IP Resolver
//
// HTTP-based implementation of the `IpResolver` trait.
//
// ## Fallback Order
//
// The resolver holds an ordered list of independent IP echo services (any
// GET endpoint returning the caller's address as plain text). Services are
// tried in order with a bounded per-request timeout; a transport error, a
// non-success status, or a body failing the dotted-quad check moves on to
// the next service. The first valid answer wins and no later service is
// contacted. Only when every service is exhausted does the resolution fail.
//
// Single resolution != retry: walking the fallback list is one resolve()
// call. Re-running a failed resolution is the retry policy's job.

use async_trait::async_trait;
use dyndns_core::config::DEFAULT_IP_SERVICES;
use dyndns_core::traits::IpResolver;
use dyndns_core::{Error, Result, parse_dotted_quad};
use std::net::Ipv4Addr;
use std::time::Duration;
use tracing::{debug, warn};

/// Per-service request timeout
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Public-IP resolver backed by a fallback chain of HTTP echo services
#[derive(Debug)]
pub struct HttpIpResolver {
    services: Vec<String>,
    client: reqwest::Client,
}

impl HttpIpResolver {
    /// Create a resolver over an ordered list of service URLs
    pub fn new(services: Vec<String>) -> Result<Self> {
        if services.is_empty() {
            return Err(Error::config("IP resolver needs at least one service URL"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { services, client })
    }

    /// Create a resolver over the default service list
    pub fn with_defaults() -> Result<Self> {
        Self::new(DEFAULT_IP_SERVICES.iter().map(|s| s.to_string()).collect())
    }

    /// Ask one service for the caller's address
    async fn query_service(&self, url: &str) -> Result<Ipv4Addr> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::network(format!("request to {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(Error::network(format!(
                "{} answered with status {}",
                url,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::network(format!("failed to read body from {}: {}", url, e)))?;

        // The HTTP call succeeding is not enough: the body must still pass
        // the dotted-quad check.
        parse_dotted_quad(body.trim())
    }
}

#[async_trait]
impl IpResolver for HttpIpResolver {
    async fn resolve(&self) -> Result<Ipv4Addr> {
        for url in &self.services {
            match self.query_service(url).await {
                Ok(ip) => {
                    debug!(service = %url, ip = %ip, "resolved public IP");
                    return Ok(ip);
                }
                Err(err) => {
                    warn!(service = %url, error = %err, "IP detection service failed, trying next");
                }
            }
        }

        Err(Error::ip_resolution(format!(
            "all {} detection services exhausted",
            self.services.len()
        )))
    }
}
