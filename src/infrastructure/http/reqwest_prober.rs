//! Production HEAD prober backed by `reqwest`.

use async_trait::async_trait;
use reqwest::header;
use reqwest::redirect::Policy;
use tracing::debug;
use url::Url;

use super::prober::{HttpProber, ProbeError, ProbeResponse};

/// HTTP prober that issues real HEAD requests.
///
/// The underlying client has redirect following disabled: 301/302 responses
/// are returned to the resolver as data, not chased by the transport. No
/// client-level timeout is configured either, since the resolver owns the
/// per-hop timeout race.
pub struct ReqwestProber {
    client: reqwest::Client,
}

impl ReqwestProber {
    /// Builds the shared client.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .user_agent(concat!("url-resolver/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpProber for ReqwestProber {
    async fn head(&self, target: &Url, referer: &str) -> Result<ProbeResponse, ProbeError> {
        let response = self
            .client
            .head(target.clone())
            .header(header::REFERER, referer)
            .header(header::ACCEPT, "*/*")
            .send()
            .await
            .map_err(|e| ProbeError::Transport(e.without_url().to_string()))?;

        let status = response.status().as_u16();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        debug!("HEAD {} -> {} (location: {:?})", target, status, location);

        Ok(ProbeResponse { status, location })
    }
}
