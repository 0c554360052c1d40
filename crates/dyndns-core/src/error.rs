//! Error types for the dyndns client
//!
//! Every expected failure class travels as a typed `Error` value; only
//! programming errors may panic.

use thiserror::Error;

/// Result type alias for dyndns operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the dyndns client
#[derive(Error, Debug)]
pub enum Error {
    /// All IP detection services were exhausted without a valid answer
    #[error("IP resolution failed: {0}")]
    IpResolution(String),

    /// The registry rejected the credential (HTTP 401)
    #[error("registry rejected credential (check your API token)")]
    Unauthorized,

    /// The credential is valid but does not own this hostname (HTTP 403)
    #[error("access denied: hostname '{hostname}' does not belong to this credential")]
    Forbidden {
        /// The hostname the update was attempted for
        hostname: String,
    },

    /// The hostname is unknown to the registry (HTTP 404)
    #[error("hostname '{hostname}' not found in registry")]
    NotFound {
        /// The hostname that was looked up
        hostname: String,
    },

    /// Non-2xx registry response outside the mapped classes, or a malformed body
    #[error("registry server error (status {status}): {message}")]
    RegistryServer {
        /// HTTP status code, 0 when the body was malformed
        status: u16,
        /// Response text or parse error description
        message: String,
    },

    /// Transport-level failure, distinct from a well-formed error response
    #[error("network error: {0}")]
    Network(String),

    /// A string failed the dotted-quad address check
    #[error("invalid IPv4 address: '{0}'")]
    InvalidIp(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an IP resolution error
    pub fn ip_resolution(msg: impl Into<String>) -> Self {
        Self::IpResolution(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a "hostname not found" error
    pub fn not_found(hostname: impl Into<String>) -> Self {
        Self::NotFound {
            hostname: hostname.into(),
        }
    }

    /// Create a "credential does not own hostname" error
    pub fn forbidden(hostname: impl Into<String>) -> Self {
        Self::Forbidden {
            hostname: hostname.into(),
        }
    }

    /// Create a registry server error
    pub fn registry_server(status: u16, message: impl Into<String>) -> Self {
        Self::RegistryServer {
            status,
            message: message.into(),
        }
    }

    /// Whether retrying the failed operation could plausibly succeed.
    ///
    /// `RetryPolicy` short-circuits on non-transient failures: an invalid
    /// credential or an unknown hostname will not change between attempts.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::IpResolution(_) | Self::RegistryServer { .. } | Self::Network(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(Error::network("connection reset").is_transient());
        assert!(Error::registry_server(502, "bad gateway").is_transient());
        assert!(Error::ip_resolution("all services failed").is_transient());

        assert!(!Error::Unauthorized.is_transient());
        assert!(!Error::forbidden("myhome").is_transient());
        assert!(!Error::not_found("myhome").is_transient());
        assert!(!Error::config("missing token").is_transient());
        assert!(!Error::InvalidIp("1.2.3".into()).is_transient());
    }

    #[test]
    fn display_does_not_leak_internals() {
        let err = Error::forbidden("myhome");
        assert_eq!(
            err.to_string(),
            "access denied: hostname 'myhome' does not belong to this credential"
        );
    }
}
