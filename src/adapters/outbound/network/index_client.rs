use crate::ports::outbound::PackageIndexClient;
use crate::shared::Result;
use async_trait::async_trait;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RETRIES: u32 = 2;

/// HttpPackageIndexClient adapter fetching the release-package index over HTTP
///
/// Each attempt is bounded by the client timeout; failed attempts are retried
/// with a short linear backoff before the error is handed to the caller.
pub struct HttpPackageIndexClient {
    client: reqwest::Client,
    max_retries: u32,
}

impl HttpPackageIndexClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let user_agent = format!("sbom-ledger/{}", env!("CARGO_PKG_VERSION"));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    async fn fetch_once(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("Package index returned status code {}", response.status());
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl PackageIndexClient for HttpPackageIndexClient {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        let mut attempt = 1;
        loop {
            match self.fetch_once(url).await {
                Ok(body) => return Ok(body),
                Err(e) if attempt >= self.max_retries => {
                    return Err(e.context(format!("Failed to fetch {}", url)))
                }
                Err(_) => {
                    tokio::time::sleep(Duration::from_millis(200 * attempt as u64)).await;
                    attempt += 1;
                }
            }
        }
    }
}
