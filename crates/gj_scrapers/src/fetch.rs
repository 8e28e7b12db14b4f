use async_trait::async_trait;
use gj_core::{PageFetcher, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Browser-like identification sent with every listing request
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Plain GET fetcher. No retries; a non-2xx response is logged and its body
/// is still handed to the parser.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("⚠️ {} answered {}", url, status);
        }
        Ok(response.text().await?)
    }
}
