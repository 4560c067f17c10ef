use crate::ports::outbound::PackageIndexClient;
use crate::shared::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// CachingPackageIndexClient decorates a PackageIndexClient with an in-process page cache.
///
/// A batch run generating several projects against the same release fetches
/// each index URL once. Failures are not cached.
pub struct CachingPackageIndexClient<C: PackageIndexClient> {
    inner: C,
    cache: Arc<DashMap<String, String>>,
}

impl<C: PackageIndexClient> CachingPackageIndexClient<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            cache: Arc::new(DashMap::new()),
        }
    }

    #[cfg(test)]
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[async_trait]
impl<C: PackageIndexClient> PackageIndexClient for CachingPackageIndexClient<C> {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        if let Some(cached) = self.cache.get(url) {
            return Ok(cached.clone());
        }

        let page = self.inner.fetch_page(url).await?;
        self.cache.insert(url.to_string(), page.clone());
        Ok(page)
    }
}
