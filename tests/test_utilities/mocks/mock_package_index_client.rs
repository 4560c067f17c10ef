use async_trait::async_trait;
use sbom_ledger::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock PackageIndexClient serving one fixed page, or failing every fetch
pub struct MockPackageIndexClient {
    page: Option<String>,
    calls: AtomicUsize,
}

impl MockPackageIndexClient {
    pub fn serving(page: &str) -> Self {
        Self {
            page: Some(page.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            page: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PackageIndexClient for MockPackageIndexClient {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.page {
            Some(page) => Ok(page.clone()),
            None => anyhow::bail!("Failed to fetch {}: network unreachable", url),
        }
    }
}
