/// Network adapters for the remote package index
mod caching_index_client;
mod index_client;

pub use caching_index_client::CachingPackageIndexClient;
pub use index_client::{HttpPackageIndexClient, DEFAULT_TIMEOUT_SECS};
