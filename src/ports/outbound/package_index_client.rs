use crate::shared::Result;
use async_trait::async_trait;

/// PackageIndexClient port for the remote release-package index
///
/// Implementations must be `Send + Sync` so they can be shared between
/// batch runs.
#[async_trait]
pub trait PackageIndexClient: Send + Sync {
    /// Fetches the HTML page at `url`
    ///
    /// # Errors
    /// Returns an error if the request fails, times out or the server
    /// answers with a non-success status
    async fn fetch_page(&self, url: &str) -> Result<String>;
}

#[async_trait]
impl<T: PackageIndexClient + ?Sized> PackageIndexClient for &T {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        (**self).fetch_page(url).await
    }
}
