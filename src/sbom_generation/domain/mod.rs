pub mod build_info;
pub mod dependency;
pub mod sbom_metadata;
pub mod signature;
pub mod version_number;

pub use build_info::{BuildInfo, ReleaseInfo};
pub use dependency::{Dependency, DependencySet, UNDEFINED_VERSION, UNKNOWN_VERSION};
pub use sbom_metadata::SbomMetadata;
pub use signature::Signature;
pub use version_number::VersionNumber;
