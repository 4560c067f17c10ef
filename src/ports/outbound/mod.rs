/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (file system, network, console, etc.).
pub mod formatter;
pub mod output_presenter;
pub mod package_index_client;
pub mod progress_reporter;
pub mod run_log;
pub mod source_files;
pub mod version_store;

pub use formatter::SbomFormatter;
pub use output_presenter::OutputPresenter;
pub use package_index_client::PackageIndexClient;
pub use progress_reporter::ProgressReporter;
pub use run_log::{RunLog, RunLogSnapshot};
pub use source_files::SourceFiles;
pub use version_store::{CandidateArtifacts, StoredArtifacts, VersionStore};
