//! SBOM read model for rendering
//!
//! Everything a formatter needs, already sorted and with placeholders
//! applied, so formatters stay free of domain rules.

use super::component_view::ComponentView;

/// Main read model for one generation run
#[derive(Debug, Clone)]
pub struct SbomReadModel {
    /// Report title, usually the project display name
    pub title: String,
    pub metadata: SbomMetadataView,
    /// All components, sorted case-insensitively by name
    pub components: Vec<ComponentView>,
    /// `(label, value)` rows; empty when no build information was found
    pub build_info: Vec<(String, String)>,
    /// Per-provenance tables, when requested
    pub source_groups: Option<Vec<SourceGroupView>>,
    /// Known-vs-unknown version summary, when requested
    pub version_analysis: Option<VersionAnalysisView>,
    /// Whether manifest components carry `source`/`file_path` properties
    pub include_provenance: bool,
}

/// View representation of manifest metadata
#[derive(Debug, Clone)]
pub struct SbomMetadataView {
    /// RFC 3339, UTC
    pub timestamp: String,
    /// `YYYY-MM-DD HH:MM:SS`, UTC, for the narrative
    pub generated_on: String,
    pub tool_name: String,
    pub tool_version: String,
    pub serial_number: String,
    pub properties: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct SourceGroupView {
    pub source: String,
    pub components: Vec<ComponentView>,
}

#[derive(Debug, Clone)]
pub struct VersionAnalysisView {
    pub known: usize,
    pub unknown: usize,
    /// Every record without a determined version, sorted by name
    pub unresolved: Vec<ComponentView>,
}
