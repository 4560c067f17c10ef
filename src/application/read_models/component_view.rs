//! Component view for read model

use crate::sbom_generation::domain::Dependency;

/// One dependency record as rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentView {
    pub name: String,
    /// The version, or the project's placeholder label when undetermined
    pub version: String,
    pub version_known: bool,
    /// Provenance tag
    pub source: String,
    pub file_path: Option<String>,
}

impl ComponentView {
    pub fn from_dependency(dependency: &Dependency, unknown_version_label: &str) -> Self {
        Self {
            name: dependency.name().to_string(),
            version: dependency.display_version(unknown_version_label).to_string(),
            version_known: dependency.is_version_known(),
            source: dependency.source().to_string(),
            file_path: dependency
                .file_path()
                .map(|p| p.to_string_lossy().into_owned()),
        }
    }
}
