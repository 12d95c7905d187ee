//! Transport port.
//!
//! The engine talks to the network through this trait; the concrete
//! adapter (reqwest) lives in `attest-infrastructure`. Tests substitute
//! mock transports.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use attest_domain::{Headers, HttpMethod};

/// A fully assembled request, ready to put on the wire.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute URL including query string.
    pub url: Url,
    /// All headers, defaults already merged.
    pub headers: Headers,
    /// JSON body, if any.
    pub body: Option<serde_json::Value>,
}

/// A raw response from the transport. Timing is measured by the
/// executor, not the transport.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body bytes.
    pub body: Vec<u8>,
}

/// Network-level failures, classified for distinct reporting.
///
/// These are never assertion failures: the assertion engine reports a
/// transport failure as its own category, not as a wrong status code.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// DNS resolution failed.
    #[error("dns resolution failed for {host}: {message}")]
    Dns {
        /// Host that could not be resolved.
        host: String,
        /// Resolver detail.
        message: String,
    },

    /// The remote host refused the connection.
    #[error("connection refused by {host}")]
    ConnectionRefused {
        /// Host that refused.
        host: String,
    },

    /// TLS negotiation failed.
    #[error("tls failure: {0}")]
    Tls(String),

    /// The transport's own timeout fired.
    #[error("request timed out")]
    Timeout,

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

/// Port for sending one HTTP request and receiving its response.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends the request and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] on network-level failure. A non-2xx
    /// status code is a successful send, not an error.
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}
