use crate::sbom_generation::domain::{BuildInfo, DependencySet, SbomMetadata};

/// Result of collecting one project's dependencies
#[derive(Debug, Clone)]
pub struct SbomResponse {
    pub dependencies: DependencySet,
    pub build_info: BuildInfo,
    pub metadata: SbomMetadata,
}

impl SbomResponse {
    pub fn new(dependencies: DependencySet, build_info: BuildInfo, metadata: SbomMetadata) -> Self {
        Self {
            dependencies,
            build_info,
            metadata,
        }
    }
}
