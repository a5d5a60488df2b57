//! Probe trait and error types for outbound HEAD requests.

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// Transport-level probe failure (DNS, connect, TLS, malformed response).
///
/// Timeouts are not represented here: the resolver races every probe against
/// its own timer and drops the probe future when the timer wins, so a probe
/// can never report a timeout of its own.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("{0}")]
    Transport(String),
}

/// What the resolver needs from one probe: the status line and, for
/// redirects, where the server points next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
    /// Verbatim `Location` header value, if the response carried one.
    pub location: Option<String>,
}

/// Trait for issuing a single HTTP HEAD probe.
///
/// Implementations must not follow redirects themselves; the resolver walks
/// the chain hop by hop so it can enforce cycle and hop limits and cache
/// every intermediate URL.
///
/// # Implementations
///
/// - [`crate::infrastructure::http::ReqwestProber`] - production client
/// - `MockHttpProber` (tests) - scripted responses without network I/O
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpProber: Send + Sync {
    /// Issues one HEAD request to `target` with `referer` identifying the
    /// previous hop.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Transport`] for any failure to obtain a status
    /// line from the server.
    async fn head(&self, target: &Url, referer: &str) -> Result<ProbeResponse, ProbeError>;
}
