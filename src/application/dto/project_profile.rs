use crate::application::read_models::RenderOptions;
use crate::sbom_generation::parsers::{MetaPackage, PlatformLine};
use crate::sbom_generation::policies::{ExtractionRules, NameAliases};
use std::path::PathBuf;

/// A fully resolved project: every path absolute, every rule table compiled
///
/// Built from the configuration file; the use cases never look at the
/// process working directory.
#[derive(Debug, Clone)]
pub struct ProjectProfile {
    pub name: String,
    pub tool_name: String,
    pub tool_version: String,
    /// Manifest metadata properties, also the narrative's source-versions table
    pub properties: Vec<(String, String)>,
    /// Root of the `v<N>` version directories
    pub output_dir: PathBuf,
    pub render: RenderOptions,
    pub build_log: Option<BuildLogInput>,
    /// Pinned requirement files
    pub requirements: Vec<PathBuf>,
    /// `name: version` side files read as supplementary records
    pub side_files: Vec<PathBuf>,
    pub manifest_scan: Option<ManifestScan>,
    pub package_index: Option<PackageIndexInput>,
    pub interpreter_promotion: Option<InterpreterPromotion>,
    pub tree_scan: Option<TreeScan>,
}

#[derive(Debug, Clone)]
pub struct BuildLogInput {
    pub path: PathBuf,
    pub platform_line: PlatformLine,
}

/// Per-package manifest scan driven by a filter list
#[derive(Debug, Clone)]
pub struct ManifestScan {
    /// Directory holding one sub-directory per package
    pub package_root: PathBuf,
    /// Filter-file candidates; the first existing one wins
    pub filter_files: Vec<PathBuf>,
    /// Side file receiving every discovered `name: version` line
    pub side_file: Option<PathBuf>,
    pub rules: ExtractionRules,
    pub meta_packages: Vec<MetaPackage>,
}

/// Remote package index plus the secondary lookup for what it lacks
#[derive(Debug, Clone)]
pub struct PackageIndexInput {
    pub url_template: String,
    pub table_id: String,
    /// Saved copy of the page used when the fetch fails
    pub cache_file: Option<PathBuf>,
    pub source_tag: String,
    pub aliases: NameAliases,
    pub secondary: Option<SecondaryLookup>,
}

#[derive(Debug, Clone)]
pub struct SecondaryLookup {
    /// Directory containing one sub-directory per package, e.g. `<checkout>/External`
    pub package_root: PathBuf,
    pub source_tag: String,
    pub rules: ExtractionRules,
    pub meta_packages: Vec<MetaPackage>,
}

/// Copy `Python: x.y` from `from` into `to` before the side files are read
#[derive(Debug, Clone)]
pub struct InterpreterPromotion {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Recursive scan of a source tree for `find_package` calls and requirements files
#[derive(Debug, Clone)]
pub struct TreeScan {
    pub root: PathBuf,
    pub find_package: bool,
    pub requirements: bool,
}

impl ProjectProfile {
    /// A profile with no inputs configured.
    pub fn new(name: &str, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            tool_name: crate::sbom_generation::services::DEFAULT_TOOL_NAME.to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            properties: Vec::new(),
            output_dir: output_dir.into(),
            render: RenderOptions {
                title: name.to_string(),
                ..RenderOptions::default()
            },
            build_log: None,
            requirements: Vec::new(),
            side_files: Vec::new(),
            manifest_scan: None,
            package_index: None,
            interpreter_promotion: None,
            tree_scan: None,
        }
    }
}
