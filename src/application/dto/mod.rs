/// Data Transfer Objects for application layer
///
/// DTOs are used to transfer data between the application layer
/// and adapters, keeping the domain layer isolated.
mod batch_report;
mod catalog_entry;
mod project_profile;
mod publish_outcome;
mod sbom_response;

pub use batch_report::{BatchItem, BatchReport, BatchStatus};
pub use catalog_entry::{CatalogEntry, ProjectCatalog, ProjectSummary};
pub use project_profile::{
    BuildLogInput, InterpreterPromotion, ManifestScan, PackageIndexInput, ProjectProfile,
    SecondaryLookup, TreeScan,
};
pub use publish_outcome::PublishOutcome;
pub use sbom_response::SbomResponse;
