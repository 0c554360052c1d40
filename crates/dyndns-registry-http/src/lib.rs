// # HTTP Registry Client
//
// REST implementation of the `Registry` trait against the DDNS registry
// service:
//
// - `GET  {server}/info/{hostname}`  -> current record, 404 if unknown
// - `POST {server}/update`           -> JSON body `{hostname, ip}`, bearer
//                                       Authorization header
//
// Status mapping, identical for both calls:
// 401 -> Unauthorized, 403 -> Forbidden, 404 -> NotFound,
// any other non-2xx -> RegistryServer; transport failures -> Network.
//
// Single-shot by contract: one call, one request, bounded timeout, no
// internal retries and no local state. The legacy `/api/ddns/update`
// body-embedded-key endpoint is deprecated and not spoken here.
//
// ## Security
//
// The API token never appears in logs; the `Debug` impl redacts it.

use async_trait::async_trait;
use dyndns_core::traits::Registry;
use dyndns_core::types::{HostnameRecord, UpdateAck};
use dyndns_core::{Error, Result, parse_dotted_quad};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use std::time::Duration;
use tracing::debug;

/// Request timeout for registry calls
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// User-Agent presented to the registry
const USER_AGENT: &str = concat!("dyndnsd/", env!("CARGO_PKG_VERSION"));

/// Wire shape of `GET /info/{hostname}`
#[derive(Debug, Deserialize)]
struct InfoResponse {
    ip: String,
    #[serde(rename = "lastUpdated")]
    last_updated: Option<String>,
}

/// Wire shape of the `POST /update` request body
#[derive(Debug, Serialize)]
struct UpdateRequest<'a> {
    hostname: &'a str,
    ip: String,
}

/// Wire shape of the `POST /update` acknowledgement
#[derive(Debug, Deserialize)]
struct UpdateResponse {
    hostname: String,
    ip: String,
}

/// Registry client over the service's REST API.
///
/// The credential is taken at construction and is immutable for the
/// client's lifetime.
pub struct HttpRegistry {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for HttpRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRegistry")
            .field("base_url", &self.base_url)
            .field("token", &"<REDACTED>")
            .finish()
    }
}

impl HttpRegistry {
    /// Create a client for the registry at `base_url`, authenticating
    /// every call with `token`.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(Error::config("registry API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            client,
        })
    }

    /// Map a non-success registry response to the error taxonomy.
    ///
    /// A well-formed error response is distinct from a transport failure:
    /// the registry answered, it just said no.
    async fn error_from_response(hostname: &str, response: reqwest::Response) -> Error {
        let status = response.status().as_u16();
        match status {
            401 => Error::Unauthorized,
            403 => Error::forbidden(hostname),
            404 => Error::not_found(hostname),
            _ => {
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "unable to read error response".to_string());
                Error::registry_server(status, message)
            }
        }
    }
}

#[async_trait]
impl Registry for HttpRegistry {
    async fn fetch_record(&self, hostname: &str) -> Result<HostnameRecord> {
        let url = format!("{}/info/{}", self.base_url, hostname);
        debug!(%url, "fetching hostname record");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| Error::network(format!("registry request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(hostname, response).await);
        }

        let status = response.status().as_u16();
        let info: InfoResponse = response
            .json()
            .await
            .map_err(|e| Error::registry_server(status, format!("malformed info response: {}", e)))?;

        let ip = parse_dotted_quad(&info.ip)
            .map_err(|_| Error::registry_server(status, format!("registry returned invalid IP: {}", info.ip)))?;

        Ok(HostnameRecord {
            hostname: hostname.to_string(),
            ip,
            last_updated: info.last_updated,
        })
    }

    async fn submit_update(&self, hostname: &str, ip: Ipv4Addr) -> Result<UpdateAck> {
        let url = format!("{}/update", self.base_url);
        debug!(%url, %hostname, %ip, "submitting update");

        let payload = UpdateRequest {
            hostname,
            ip: ip.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::network(format!("registry request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(hostname, response).await);
        }

        let status = response.status().as_u16();
        let ack: UpdateResponse = response
            .json()
            .await
            .map_err(|e| Error::registry_server(status, format!("malformed update ack: {}", e)))?;

        let acked_ip = parse_dotted_quad(&ack.ip)
            .map_err(|_| Error::registry_server(status, format!("registry acked invalid IP: {}", ack.ip)))?;

        Ok(UpdateAck {
            hostname: ack.hostname,
            ip: acked_ip,
        })
    }
}
