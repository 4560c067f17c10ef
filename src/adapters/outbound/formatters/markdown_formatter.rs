use crate::application::read_models::{
    ComponentView, SbomReadModel, SourceGroupView, VersionAnalysisView,
};
use crate::ports::outbound::SbomFormatter;
use crate::sbom_generation::parsers::BUILD_INFO_HEADING;
use crate::shared::Result;

const BUILD_INFO_TABLE_HEADER: &str = "| Component | Version/Specification |\n";
const BUILD_INFO_TABLE_SEPARATOR: &str = "|-----------|-----------------------|\n";

const SOURCE_TABLE_HEADER: &str = "| Source | Version |\n";
const SOURCE_TABLE_SEPARATOR: &str = "|--------|---------|\n";

const TABLE_HEADER: &str = "| Package | Version |\n";
const TABLE_SEPARATOR: &str = "|---------|---------|\n";

const PROVENANCE_TABLE_HEADER: &str = "| Package | Version | File Path |\n";
const PROVENANCE_TABLE_SEPARATOR: &str = "|---------|---------|-----------|\n";

/// MarkdownFormatter adapter for the human-readable narrative report
///
/// The build-information table is read back when the next run computes
/// the stored version's signature, so its layout must stay parseable by
/// `parsers::narrative`.
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Escapes pipe characters and newlines for safe Markdown table rendering
    fn escape_markdown_table_cell(text: &str) -> String {
        text.replace('|', "\\|").replace('\n', " ")
    }

    fn render_header(&self, output: &mut String, model: &SbomReadModel) {
        output.push_str(&format!("# {} SBOM Report\n\n", model.title));
        output.push_str(&format!(
            "**Generated on:** {}\n",
            model.metadata.generated_on
        ));
        output.push_str(&format!(
            "**Total dependencies:** {}\n\n",
            model.components.len()
        ));
    }

    fn render_build_info(&self, output: &mut String, rows: &[(String, String)]) {
        if rows.is_empty() {
            return;
        }
        output.push_str(BUILD_INFO_HEADING);
        output.push_str("\n\n");
        output.push_str(BUILD_INFO_TABLE_HEADER);
        output.push_str(BUILD_INFO_TABLE_SEPARATOR);
        for (label, value) in rows {
            output.push_str(&format!(
                "| {} | {} |\n",
                Self::escape_markdown_table_cell(label),
                Self::escape_markdown_table_cell(value)
            ));
        }
        output.push('\n');
    }

    fn render_source_versions(&self, output: &mut String, properties: &[(String, String)]) {
        if properties.is_empty() {
            return;
        }
        output.push_str("## Source Versions\n\n");
        output.push_str(SOURCE_TABLE_HEADER);
        output.push_str(SOURCE_TABLE_SEPARATOR);
        for (name, value) in properties {
            output.push_str(&format!(
                "| {} | {} |\n",
                Self::escape_markdown_table_cell(name),
                Self::escape_markdown_table_cell(value)
            ));
        }
        output.push('\n');
    }

    fn render_all_dependencies(&self, output: &mut String, components: &[ComponentView]) {
        if components.is_empty() {
            return;
        }
        output.push_str("## All Dependencies\n\n");
        output.push_str(TABLE_HEADER);
        output.push_str(TABLE_SEPARATOR);
        for c in components {
            output.push_str(&format!(
                "| {} | {} |\n",
                Self::escape_markdown_table_cell(&c.name),
                Self::escape_markdown_table_cell(&c.version)
            ));
        }
        output.push('\n');
    }

    fn render_source_groups(&self, output: &mut String, groups: &[SourceGroupView]) {
        for group in groups {
            output.push_str(&format!(
                "## {} Dependencies ({})\n\n",
                group.source,
                group.components.len()
            ));
            output.push_str(PROVENANCE_TABLE_HEADER);
            output.push_str(PROVENANCE_TABLE_SEPARATOR);
            for c in &group.components {
                output.push_str(&format!(
                    "| {} | {} | {} |\n",
                    Self::escape_markdown_table_cell(&c.name),
                    Self::escape_markdown_table_cell(&c.version),
                    Self::escape_markdown_table_cell(c.file_path.as_deref().unwrap_or("N/A"))
                ));
            }
            output.push('\n');
        }
    }

    fn render_version_analysis(&self, output: &mut String, analysis: &VersionAnalysisView) {
        output.push_str("## Version Analysis\n\n");
        output.push_str(&format!(
            "- **Dependencies with known versions:** {}\n",
            analysis.known
        ));
        output.push_str(&format!(
            "- **Dependencies with unknown versions:** {}\n\n",
            analysis.unknown
        ));

        if analysis.unresolved.is_empty() {
            return;
        }
        output.push_str("### Dependencies with Unknown Versions\n\n");
        output.push_str("The following dependencies have unknown or unspecified versions:\n\n");
        for c in &analysis.unresolved {
            match &c.file_path {
                Some(path) => output.push_str(&format!("- **{}** in `{}`\n", c.name, path)),
                None => output.push_str(&format!("- **{}**\n", c.name)),
            }
        }
        output.push('\n');
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl SbomFormatter for MarkdownFormatter {
    fn format(&self, model: &SbomReadModel) -> Result<String> {
        let mut output = String::new();

        self.render_header(&mut output, model);
        self.render_build_info(&mut output, &model.build_info);
        self.render_source_versions(&mut output, &model.metadata.properties);
        self.render_all_dependencies(&mut output, &model.components);
        if let Some(groups) = &model.source_groups {
            self.render_source_groups(&mut output, groups);
        }
        if let Some(analysis) = &model.version_analysis {
            self.render_version_analysis(&mut output, analysis);
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::read_models::SbomMetadataView;
    use crate::sbom_generation::parsers::parse_build_info_section;

    fn component(name: &str, version: &str, known: bool, path: Option<&str>) -> ComponentView {
        ComponentView {
            name: name.to_string(),
            version: version.to_string(),
            version_known: known,
            source: "CMakeLists.txt".to_string(),
            file_path: path.map(str::to_string),
        }
    }

    fn create_test_read_model() -> SbomReadModel {
        let components = vec![
            component("Boost", "1.82.0", true, None),
            component("lwtnn", "undefined", false, Some("External/lwtnn/CMakeLists.txt")),
        ];
        SbomReadModel {
            title: "AnalysisBase".to_string(),
            metadata: SbomMetadataView {
                timestamp: "2026-03-01T02:00:00Z".to_string(),
                generated_on: "2026-03-01 02:00:00".to_string(),
                tool_name: "sbom-ledger".to_string(),
                tool_version: "0.1.0".to_string(),
                serial_number: "urn:uuid:1".to_string(),
                properties: vec![
                    ("AnalysisBase".to_string(), "24.0".to_string()),
                    ("AnalysisBaseExternals".to_string(), "24.2.42".to_string()),
                ],
            },
            build_info: vec![
                ("C Compiler".to_string(), "GNU 13.1.0".to_string()),
                ("Platform".to_string(), "x86_64|el9".to_string()),
            ],
            source_groups: Some(vec![SourceGroupView {
                source: "CMakeLists.txt".to_string(),
                components: components.clone(),
            }]),
            version_analysis: Some(VersionAnalysisView {
                known: 1,
                unknown: 1,
                unresolved: vec![components[1].clone()],
            }),
            components,
            include_provenance: true,
        }
    }

    #[test]
    fn test_format_full_report() {
        let output = MarkdownFormatter::new()
            .format(&create_test_read_model())
            .unwrap();

        assert!(output.starts_with("# AnalysisBase SBOM Report\n"));
        assert!(output.contains("**Generated on:** 2026-03-01 02:00:00"));
        assert!(output.contains("**Total dependencies:** 2"));
        assert!(output.contains("## Build Information"));
        assert!(output.contains("| C Compiler | GNU 13.1.0 |"));
        assert!(output.contains("| AnalysisBaseExternals | 24.2.42 |"));
        assert!(output.contains("| Boost | 1.82.0 |"));
        assert!(output.contains("## CMakeLists.txt Dependencies (2)"));
        assert!(output.contains("| Boost | 1.82.0 | N/A |"));
        assert!(output.contains("- **Dependencies with unknown versions:** 1"));
        assert!(output.contains("- **lwtnn** in `External/lwtnn/CMakeLists.txt`"));
    }

    #[test]
    fn test_build_info_round_trips() {
        let output = MarkdownFormatter::new()
            .format(&create_test_read_model())
            .unwrap();
        let rows = parse_build_info_section(&output);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows["C Compiler"], "GNU 13.1.0");
        assert_eq!(rows["Platform"], "x86_64|el9");
    }

    #[test]
    fn test_optional_sections_omitted() {
        let mut model = create_test_read_model();
        model.build_info.clear();
        model.metadata.properties.clear();
        model.source_groups = None;
        model.version_analysis = None;

        let output = MarkdownFormatter::new().format(&model).unwrap();
        assert!(!output.contains("## Build Information"));
        assert!(!output.contains("## Source Versions"));
        assert!(!output.contains("## Version Analysis"));
        assert!(output.contains("## All Dependencies"));
    }

    #[test]
    fn test_escape_markdown_table_cell() {
        assert_eq!(
            MarkdownFormatter::escape_markdown_table_cell("a|b\nc"),
            "a\\|b c"
        );
    }
}
