/// Mock implementations for testing
mod mock_package_index_client;
mod mock_progress_reporter;
mod mock_source_files;
mod mock_version_store;

pub use mock_package_index_client::MockPackageIndexClient;
pub use mock_progress_reporter::MockProgressReporter;
pub use mock_source_files::MockSourceFiles;
pub use mock_version_store::InMemoryVersionStore;
