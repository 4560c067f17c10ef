//! Builder for constructing SbomReadModel from domain objects

use super::component_view::ComponentView;
use super::sbom_read_model::{
    SbomMetadataView, SbomReadModel, SourceGroupView, VersionAnalysisView,
};
use crate::sbom_generation::domain::{BuildInfo, DependencySet, SbomMetadata, UNDEFINED_VERSION};

/// Project-level switches for what gets rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub title: String,
    pub unknown_version_label: String,
    pub group_by_source: bool,
    pub version_analysis: bool,
    pub component_provenance: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: "Project".to_string(),
            unknown_version_label: UNDEFINED_VERSION.to_string(),
            group_by_source: false,
            version_analysis: false,
            component_provenance: true,
        }
    }
}

/// Builder for constructing SbomReadModel from domain objects
pub struct SbomReadModelBuilder;

impl SbomReadModelBuilder {
    pub fn build(
        dependencies: &DependencySet,
        metadata: &SbomMetadata,
        build_info: &BuildInfo,
        options: &RenderOptions,
    ) -> SbomReadModel {
        let label = options.unknown_version_label.as_str();
        let components: Vec<ComponentView> = dependencies
            .sorted_for_display()
            .into_iter()
            .map(|d| ComponentView::from_dependency(d, label))
            .collect();

        let source_groups = options.group_by_source.then(|| {
            dependencies
                .grouped_by_source()
                .into_iter()
                .map(|(source, deps)| {
                    SourceGroupView {
                        source: source.to_string(),
                        components: deps
                            .into_iter()
                            .map(|d| ComponentView::from_dependency(d, label))
                            .collect(),
                    }
                })
                .collect()
        });

        let version_analysis = options.version_analysis.then(|| {
            let unresolved: Vec<ComponentView> = components
                .iter()
                .filter(|c| !c.version_known)
                .cloned()
                .collect();
            VersionAnalysisView {
                known: components.len() - unresolved.len(),
                unknown: unresolved.len(),
                unresolved,
            }
        });

        SbomReadModel {
            title: options.title.clone(),
            metadata: Self::build_metadata(metadata),
            components,
            build_info: build_info.table_rows(),
            source_groups,
            version_analysis,
            include_provenance: options.component_provenance,
        }
    }

    fn build_metadata(metadata: &SbomMetadata) -> SbomMetadataView {
        SbomMetadataView {
            timestamp: metadata.timestamp(),
            generated_on: metadata
                .generated_at()
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            tool_name: metadata.tool_name().to_string(),
            tool_version: metadata.tool_version().to_string(),
            serial_number: metadata.serial_number().to_string(),
            properties: metadata.properties().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sbom_generation::domain::{Dependency, ReleaseInfo};
    use chrono::{TimeZone, Utc};

    fn metadata() -> SbomMetadata {
        SbomMetadata::new(
            Utc.with_ymd_and_hms(2026, 3, 1, 2, 0, 0).unwrap(),
            "sbom-ledger".to_string(),
            "0.1.0".to_string(),
            "urn:uuid:00000000-0000-0000-0000-000000000000".to_string(),
        )
        .with_properties(vec![("Athena".to_string(), "24.0".to_string())])
    }

    fn dependencies() -> DependencySet {
        [
            ("zlib", Some("1.3"), "LCG Website"),
            ("Boost", Some("1.82.0"), "LCG Website"),
            ("lwtnn", None, "AtlasExternals"),
            ("boost", Some("1.84.0"), "cppDep.txt"),
        ]
        .into_iter()
        .map(|(n, v, s)| Dependency::new(n, v.map(str::to_string), s).unwrap())
        .collect()
    }

    #[test]
    fn test_build_minimal() {
        let model = SbomReadModelBuilder::build(
            &dependencies(),
            &metadata(),
            &BuildInfo::default(),
            &RenderOptions::default(),
        );

        let names: Vec<&str> = model.components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Boost", "boost", "lwtnn", "zlib"]);
        assert_eq!(model.components[2].version, "undefined");
        assert_eq!(model.metadata.timestamp, "2026-03-01T02:00:00Z");
        assert_eq!(model.metadata.generated_on, "2026-03-01 02:00:00");
        assert!(model.build_info.is_empty());
        assert!(model.source_groups.is_none());
        assert!(model.version_analysis.is_none());
    }

    #[test]
    fn test_build_with_all_sections() {
        let options = RenderOptions {
            title: "Athena".to_string(),
            unknown_version_label: "unknown".to_string(),
            group_by_source: true,
            version_analysis: true,
            component_provenance: false,
        };
        let build_info = BuildInfo {
            platform: Some("x86_64-el9-gcc13-opt".to_string()),
            release: Some(ReleaseInfo {
                product: "LCG".to_string(),
                version: "104d_ATLAS_8".to_string(),
                platform: "x86_64-el9-gcc13-opt".to_string(),
            }),
            ..BuildInfo::default()
        };

        let model = SbomReadModelBuilder::build(&dependencies(), &metadata(), &build_info, &options);

        assert_eq!(model.build_info.len(), 2);
        let groups = model.source_groups.unwrap();
        let sources: Vec<&str> = groups.iter().map(|g| g.source.as_str()).collect();
        assert_eq!(sources, vec!["AtlasExternals", "LCG Website", "cppDep.txt"]);
        assert_eq!(groups[1].components[0].name, "Boost");

        let analysis = model.version_analysis.unwrap();
        assert_eq!(analysis.known, 3);
        assert_eq!(analysis.unknown, 1);
        assert_eq!(analysis.unresolved[0].version, "unknown");
        assert!(!model.include_provenance);
    }
}
