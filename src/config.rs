//! Configuration file support for sbom-ledger.
//!
//! Projects are described in `sbom-ledger.config.yml`. Relative paths are
//! resolved against the project's `root`, which itself defaults to the
//! directory holding the config file, so a run never depends on the process
//! working directory.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::application::dto::{
    BuildLogInput, InterpreterPromotion, ManifestScan, PackageIndexInput, ProjectProfile,
    SecondaryLookup, TreeScan,
};
use crate::application::read_models::RenderOptions;
use crate::sbom_generation::domain::{UNDEFINED_VERSION, UNKNOWN_VERSION};
use crate::sbom_generation::parsers::{
    builtin_meta_packages, MetaPackage, MetaPackageKind, PlatformLine, DEFAULT_TABLE_ID,
    DEFAULT_URL_TEMPLATE,
};
use crate::sbom_generation::policies::{ExtractionRules, NameAliases};
use crate::shared::error::SbomError;
use crate::shared::security::validate_path_segment;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "sbom-ledger.config.yml";

const DEFAULT_INDEX_SOURCE_TAG: &str = "LCG Website";
const DEFAULT_SECONDARY_SOURCE_TAG: &str = "AtlasExternals";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Directory holding one `<project>/v<N>` tree per project
    pub output_root: Option<PathBuf>,
    pub logs_dir: Option<PathBuf>,
    pub fetch_timeout_secs: Option<u64>,
    #[serde(default)]
    pub projects: Vec<ProjectConfig>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ProjectConfig {
    pub name: String,
    pub display_name: Option<String>,
    pub tool_name: Option<String>,
    pub unknown_version_label: Option<String>,
    #[serde(default)]
    pub properties: Vec<PropertyConfig>,
    #[serde(default)]
    pub group_by_source: bool,
    #[serde(default)]
    pub version_analysis: bool,
    pub component_provenance: Option<bool>,
    pub root: Option<PathBuf>,
    pub build_log: Option<BuildLogConfig>,
    #[serde(default)]
    pub requirements: Vec<PathBuf>,
    #[serde(default)]
    pub side_files: Vec<PathBuf>,
    pub build_manifests: Option<BuildManifestConfig>,
    pub package_index: Option<PackageIndexConfig>,
    pub interpreter_promotion: Option<InterpreterPromotionConfig>,
    pub tree_scan: Option<TreeScanConfig>,
}

#[derive(Debug, Deserialize)]
pub struct PropertyConfig {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct BuildLogConfig {
    pub path: PathBuf,
    /// 1-based line number, or `any`
    pub platform_line: Option<PlatformLineConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PlatformLineConfig {
    Line(usize),
    Keyword(String),
}

#[derive(Debug, Deserialize, Default)]
pub struct BuildManifestConfig {
    pub package_root: PathBuf,
    #[serde(default)]
    pub filter_files: Vec<PathBuf>,
    pub side_file: Option<PathBuf>,
    /// Replacement pattern lists, keyed by package
    #[serde(default)]
    pub patterns: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub underscore_versioned: Vec<String>,
    /// Defaults to the built-in meta packages when omitted
    pub meta_packages: Option<Vec<MetaPackageConfig>>,
}

#[derive(Debug, Deserialize)]
pub struct MetaPackageConfig {
    pub name: String,
    /// Requirement templates inside the package directory; when empty the
    /// package manifest is scanned for source tarballs instead
    #[serde(default)]
    pub requirements: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PackageIndexConfig {
    pub url_template: Option<String>,
    pub table_id: Option<String>,
    pub cache_file: Option<PathBuf>,
    pub source_tag: Option<String>,
    #[serde(default)]
    pub aliases: Vec<(String, String)>,
    pub secondary: Option<SecondaryLookupConfig>,
}

#[derive(Debug, Deserialize)]
pub struct SecondaryLookupConfig {
    /// Checkout whose `External/<name>` directories are scanned
    pub checkout: PathBuf,
    pub source_tag: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InterpreterPromotionConfig {
    pub from: PathBuf,
    pub to: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct TreeScanConfig {
    pub root: PathBuf,
    #[serde(default = "default_true")]
    pub find_package: bool,
    #[serde(default = "default_true")]
    pub requirements: bool,
}

fn default_true() -> bool {
    true
}

/// A validated configuration with every path resolved.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub output_root: PathBuf,
    pub logs_dir: PathBuf,
    pub fetch_timeout: Duration,
    pub profiles: Vec<ProjectProfile>,
}

impl LoadedConfig {
    /// # Errors
    /// `SbomError::ProjectNotFound` listing the configured names
    pub fn profile(&self, name: &str) -> Result<&ProjectProfile> {
        self.profiles
            .iter()
            .find(|p| p.name == name)
            .or_else(|| {
                self.profiles
                    .iter()
                    .find(|p| p.name.eq_ignore_ascii_case(name))
            })
            .ok_or_else(|| {
                SbomError::ProjectNotFound {
                    name: name.to_string(),
                    available: self.project_names().join(", "),
                }
                .into()
            })
    }

    pub fn project_names(&self) -> Vec<String> {
        self.profiles.iter().map(|p| p.name.clone()).collect()
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<LoadedConfig> {
    if !path.exists() {
        return Err(SbomError::ConfigNotFound {
            path: path.to_path_buf(),
        }
        .into());
    }

    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    let base_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    resolve_config(config, &base_dir)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<LoadedConfig>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if config.fetch_timeout_secs == Some(0) {
        bail!(
            "Invalid config: fetch_timeout_secs must be greater than 0.\n\n\
             💡 Hint: Omit the field to use the default of 30 seconds."
        );
    }

    let mut seen = HashSet::new();
    for (i, project) in config.projects.iter().enumerate() {
        let name = project.name.trim();
        if name.is_empty() {
            bail!(
                "Invalid config: projects[{}].name must not be empty.\n\n\
                 💡 Hint: Each project needs a name such as \"AnalysisBase\".",
                i
            );
        }
        validate_path_segment(name, "Project name").with_context(|| {
            format!(
                "Invalid config: projects[{}].name '{}' cannot be used as a directory name.",
                i, name
            )
        })?;
        if !seen.insert(name.to_lowercase()) {
            bail!(
                "Invalid config: project '{}' is defined more than once.\n\n\
                 💡 Hint: Project names must be unique, ignoring case.",
                name
            );
        }

        if let Some(label) = &project.unknown_version_label {
            if label != UNDEFINED_VERSION && label != UNKNOWN_VERSION {
                bail!(
                    "Invalid config: project '{}' has unknown_version_label '{}'.\n\n\
                     💡 Hint: Use \"{}\" or \"{}\".",
                    name,
                    label,
                    UNDEFINED_VERSION,
                    UNKNOWN_VERSION
                );
            }
        }

        if let Some(line) = project.build_log.as_ref().and_then(|b| b.platform_line.as_ref()) {
            match line {
                PlatformLineConfig::Line(0) => bail!(
                    "Invalid config: project '{}' has build_log.platform_line 0.\n\n\
                     💡 Hint: Line numbers start at 1; use \"any\" to search the whole log.",
                    name
                ),
                PlatformLineConfig::Keyword(word) if word != "any" => bail!(
                    "Invalid config: project '{}' has build_log.platform_line '{}'.\n\n\
                     💡 Hint: Use a line number or \"any\".",
                    name,
                    word
                ),
                _ => {}
            }
        }

        if let Some(template) = project
            .package_index
            .as_ref()
            .and_then(|p| p.url_template.as_ref())
        {
            if !template.contains("{release}") || !template.contains("{platform}") {
                bail!(
                    "Invalid config: project '{}' has a package_index.url_template without \
                     {{release}} and {{platform}}.\n\n\
                     💡 Hint: For example \"{}\".",
                    name,
                    DEFAULT_URL_TEMPLATE
                );
            }
        }
    }
    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}

fn resolve_config(config: ConfigFile, base_dir: &Path) -> Result<LoadedConfig> {
    let output_root = resolve(
        base_dir,
        config.output_root.unwrap_or_else(|| PathBuf::from("SBOMs")),
    );
    let logs_dir = resolve(
        base_dir,
        config.logs_dir.unwrap_or_else(|| PathBuf::from("logs")),
    );
    let fetch_timeout = Duration::from_secs(
        config
            .fetch_timeout_secs
            .unwrap_or(crate::adapters::outbound::network::DEFAULT_TIMEOUT_SECS),
    );

    let profiles = config
        .projects
        .into_iter()
        .map(|project| project.into_profile(base_dir, &output_root))
        .collect::<Result<Vec<_>>>()?;

    Ok(LoadedConfig {
        output_root,
        logs_dir,
        fetch_timeout,
        profiles,
    })
}

impl ProjectConfig {
    fn into_profile(self, base_dir: &Path, output_root: &Path) -> Result<ProjectProfile> {
        let name = self.name.trim().to_string();
        let root = match self.root {
            Some(root) => resolve(base_dir, root),
            None => base_dir.to_path_buf(),
        };

        let mut profile = ProjectProfile::new(&name, output_root.join(&name));
        if let Some(tool_name) = self.tool_name {
            profile.tool_name = tool_name;
        }
        profile.properties = self
            .properties
            .into_iter()
            .map(|p| (p.name, p.value))
            .collect();
        profile.render = RenderOptions {
            title: self.display_name.unwrap_or_else(|| name.clone()),
            unknown_version_label: self
                .unknown_version_label
                .unwrap_or_else(|| UNDEFINED_VERSION.to_string()),
            group_by_source: self.group_by_source,
            version_analysis: self.version_analysis,
            component_provenance: self.component_provenance.unwrap_or(true),
        };

        profile.build_log = self.build_log.map(|b| BuildLogInput {
            path: resolve(&root, b.path),
            platform_line: match b.platform_line {
                Some(PlatformLineConfig::Line(n)) => PlatformLine::Fixed(n),
                Some(PlatformLineConfig::Keyword(_)) => PlatformLine::Anywhere,
                None => PlatformLine::default(),
            },
        });
        profile.requirements = self
            .requirements
            .into_iter()
            .map(|p| resolve(&root, p))
            .collect();
        profile.side_files = self
            .side_files
            .into_iter()
            .map(|p| resolve(&root, p))
            .collect();

        if let Some(manifests) = self.build_manifests {
            let rules = ExtractionRules::builtin()
                .with_overrides(&manifests.patterns)
                .with_context(|| format!("Invalid extraction pattern for project '{}'", name))?
                .with_underscore_versioned(&manifests.underscore_versioned);
            profile.manifest_scan = Some(ManifestScan {
                package_root: resolve(&root, manifests.package_root),
                filter_files: manifests
                    .filter_files
                    .into_iter()
                    .map(|p| resolve(&root, p))
                    .collect(),
                side_file: manifests.side_file.map(|p| resolve(&root, p)),
                rules,
                meta_packages: meta_packages(manifests.meta_packages),
            });
        }

        if let Some(index) = self.package_index {
            let secondary = index.secondary.map(|s| SecondaryLookup {
                package_root: resolve(&root, s.checkout).join("External"),
                source_tag: s
                    .source_tag
                    .unwrap_or_else(|| DEFAULT_SECONDARY_SOURCE_TAG.to_string()),
                rules: profile
                    .manifest_scan
                    .as_ref()
                    .map(|m| m.rules.clone())
                    .unwrap_or_default(),
                meta_packages: builtin_meta_packages(),
            });
            profile.package_index = Some(PackageIndexInput {
                url_template: index
                    .url_template
                    .unwrap_or_else(|| DEFAULT_URL_TEMPLATE.to_string()),
                table_id: index.table_id.unwrap_or_else(|| DEFAULT_TABLE_ID.to_string()),
                cache_file: index.cache_file.map(|p| resolve(&root, p)),
                source_tag: index
                    .source_tag
                    .unwrap_or_else(|| DEFAULT_INDEX_SOURCE_TAG.to_string()),
                aliases: NameAliases::builtin().with_pairs(index.aliases),
                secondary,
            });
        }

        profile.interpreter_promotion = self.interpreter_promotion.map(|p| InterpreterPromotion {
            from: resolve(&root, p.from),
            to: resolve(&root, p.to),
        });
        profile.tree_scan = self.tree_scan.map(|t| TreeScan {
            root: resolve(&root, t.root),
            find_package: t.find_package,
            requirements: t.requirements,
        });

        Ok(profile)
    }
}

fn meta_packages(configured: Option<Vec<MetaPackageConfig>>) -> Vec<MetaPackage> {
    match configured {
        None => builtin_meta_packages(),
        Some(list) => list
            .into_iter()
            .map(|m| MetaPackage {
                name: m.name,
                kind: if m.requirements.is_empty() {
                    MetaPackageKind::SourceTarballs
                } else {
                    MetaPackageKind::Requirements {
                        files: m.requirements,
                    }
                },
            })
            .collect(),
    }
}

fn resolve(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_full_project() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            r#"
output_root: out
fetch_timeout_secs: 10
projects:
  - name: AnalysisBase
    tool_name: AnalysisBase SBOM Generator
    unknown_version_label: unknown
    properties:
      - name: AnalysisBase
        value: "24.2.42"
      - name: AnalysisBaseExternals
        value: "24.2.42"
    group_by_source: true
    version_analysis: true
    root: workspace
    build_log:
      path: build/cmake_config.log
      platform_line: any
    side_files: [deps/pythonDep.txt]
    build_manifests:
      package_root: src/External
      filter_files: [src/Projects/AnalysisBaseExternals/package_filters.txt]
      side_file: deps/cppDep.txt
      patterns:
        Acts: ['acts-v([0-9.]+)\.tar\.gz']
    package_index:
      cache_file: cache/lcg.html
      aliases: [[Eigen, eigen]]
      secondary:
        checkout: /opt/atlasexternals
    interpreter_promotion:
      from: deps/pythonDep.txt
      to: deps/cppDep.txt
"#,
        );

        let config = load_config_from_path(&path).unwrap();
        assert_eq!(config.output_root, dir.path().join("out"));
        assert_eq!(config.logs_dir, dir.path().join("logs"));
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));

        let profile = config.profile("AnalysisBase").unwrap();
        let root = dir.path().join("workspace");
        assert_eq!(profile.output_dir, dir.path().join("out/AnalysisBase"));
        assert_eq!(profile.tool_name, "AnalysisBase SBOM Generator");
        assert_eq!(profile.properties.len(), 2);
        assert_eq!(profile.render.unknown_version_label, "unknown");
        assert!(profile.render.group_by_source);
        assert!(profile.render.component_provenance);

        let build_log = profile.build_log.as_ref().unwrap();
        assert_eq!(build_log.path, root.join("build/cmake_config.log"));
        assert_eq!(build_log.platform_line, PlatformLine::Anywhere);

        let scan = profile.manifest_scan.as_ref().unwrap();
        assert_eq!(scan.package_root, root.join("src/External"));
        assert_eq!(scan.side_file, Some(root.join("deps/cppDep.txt")));
        assert_eq!(scan.meta_packages, builtin_meta_packages());
        assert_eq!(
            scan.rules
                .extract_version("Acts", "sources/acts-v35.2.0.tar.gz")
                .unwrap()
                .version,
            "35.2.0"
        );

        let index = profile.package_index.as_ref().unwrap();
        assert_eq!(index.url_template, DEFAULT_URL_TEMPLATE);
        assert_eq!(index.source_tag, "LCG Website");
        assert_eq!(index.cache_file, Some(root.join("cache/lcg.html")));
        let secondary = index.secondary.as_ref().unwrap();
        assert_eq!(secondary.package_root, PathBuf::from("/opt/atlasexternals/External"));
        assert_eq!(secondary.source_tag, "AtlasExternals");
        assert_eq!(index.aliases.aliases_for("Eigen").collect::<Vec<_>>(), vec!["eigen"]);

        assert!(profile.interpreter_promotion.is_some());
    }

    #[test]
    fn test_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "projects:\n  - name: StatAnalysis\n");

        let config = load_config_from_path(&path).unwrap();
        assert_eq!(config.output_root, dir.path().join("SBOMs"));
        assert_eq!(config.fetch_timeout, Duration::from_secs(30));

        let profile = &config.profiles[0];
        assert_eq!(profile.render.title, "StatAnalysis");
        assert_eq!(profile.render.unknown_version_label, "undefined");
        assert!(profile.build_log.is_none());
        assert!(profile.package_index.is_none());
    }

    #[test]
    fn test_platform_line_number() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "projects:\n  - name: Athena\n    build_log:\n      path: log.txt\n      platform_line: 30\n",
        );
        let config = load_config_from_path(&path).unwrap();
        assert_eq!(
            config.profiles[0].build_log.as_ref().unwrap().platform_line,
            PlatformLine::Fixed(30)
        );
    }

    #[test]
    fn test_profile_lookup_is_case_insensitive_fallback() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "projects:\n  - name: Athena\n  - name: AnalysisBase\n");
        let config = load_config_from_path(&path).unwrap();

        assert_eq!(config.profile("athena").unwrap().name, "Athena");
        let err = config.profile("Gaudi").unwrap_err().to_string();
        assert!(err.contains("Unknown project: Gaudi"));
        assert!(err.contains("Athena, AnalysisBase"));
    }

    #[test]
    fn test_discover_config_found() {
        let dir = TempDir::new().unwrap();
        write(&dir, "projects: []\n");
        let config = discover_config(dir.path()).unwrap();
        assert!(config.unwrap().profiles.is_empty());
    }

    #[test]
    fn test_discover_config_not_found() {
        let dir = TempDir::new().unwrap();
        assert!(discover_config(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config_from_path(Path::new("/nonexistent/sbom-ledger.config.yml"))
            .unwrap_err()
            .to_string();
        assert!(err.contains("Configuration file not found"));
    }

    #[test]
    fn test_load_config_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "projects: [[[broken");
        let err = format!("{}", load_config_from_path(&path).unwrap_err());
        assert!(err.contains("Failed to parse config file"));
    }

    #[test]
    fn test_duplicate_project_names_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "projects:\n  - name: Athena\n  - name: athena\n");
        let err = format!("{}", load_config_from_path(&path).unwrap_err());
        assert!(err.contains("defined more than once"));
    }

    #[test]
    fn test_project_name_must_be_a_path_segment() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "projects:\n  - name: ../escape\n");
        let err = format!("{}", load_config_from_path(&path).unwrap_err());
        assert!(err.contains("cannot be used as a directory name"));
    }

    #[test]
    fn test_invalid_unknown_version_label() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "projects:\n  - name: Athena\n    unknown_version_label: n/a\n",
        );
        let err = format!("{}", load_config_from_path(&path).unwrap_err());
        assert!(err.contains("unknown_version_label"));
    }

    #[test]
    fn test_url_template_needs_placeholders() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "projects:\n  - name: Athena\n    package_index:\n      url_template: https://example.org/{release}/\n",
        );
        let err = format!("{}", load_config_from_path(&path).unwrap_err());
        assert!(err.contains("{release} and {platform}"));
    }

    #[test]
    fn test_invalid_platform_line_keyword() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "projects:\n  - name: Athena\n    build_log:\n      path: log.txt\n      platform_line: last\n",
        );
        let err = format!("{}", load_config_from_path(&path).unwrap_err());
        assert!(err.contains("platform_line 'last'"));
    }

    #[test]
    fn test_invalid_extraction_pattern() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "projects:\n  - name: Athena\n    build_manifests:\n      package_root: External\n      patterns:\n        Acts: ['(unclosed']\n",
        );
        let err = format!("{:#}", load_config_from_path(&path).unwrap_err());
        assert!(err.contains("Invalid extraction pattern for project 'Athena'"));
    }

    #[test]
    fn test_unknown_fields_collected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.yml");
        fs::write(&path, "projects: []\nformat: json\ncheck_cve: true\n").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let config: ConfigFile = serde_yaml_ng::from_str(&content).unwrap();
        assert_eq!(config.unknown_fields.len(), 2);
        assert!(config.unknown_fields.contains_key("check_cve"));
        assert!(load_config_from_path(&path).is_ok());
    }
}
