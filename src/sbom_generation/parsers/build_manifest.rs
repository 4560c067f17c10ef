//! Build-system manifest (CMakeLists.txt) extraction helpers.
//!
//! Locating manifests on disk is done by the caller through the
//! `SourceFiles` port; everything here works on text and paths only.

use crate::sbom_generation::domain::Dependency;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

pub const MANIFEST_FILE_NAME: &str = "CMakeLists.txt";

static SOURCE_TARBALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"sources/([A-Za-z0-9_\-]+)-([0-9][0-9A-Za-z\._\-]+)\.tar\.gz")
        .expect("source tarball pattern must compile")
});

static ASSIGNED_TARBALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z0-9_\-]+)\s*=\s*sources/[A-Za-z0-9_\-]+-([0-9][0-9A-Za-z\._\-]+)\.tar\.gz")
        .expect("assigned tarball pattern must compile")
});

static FIND_PACKAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)find_package\s*\(\s*([A-Za-z0-9_]+)\s*(?:([^\s)]+)\s*)?(?:[A-Z_]+)?\s*\)")
        .expect("find_package pattern must compile")
});

/// `find_package` keywords that can sit where a version would be.
const FIND_PACKAGE_KEYWORDS: &[&str] = &[
    "REQUIRED",
    "QUIET",
    "EXACT",
    "NO_MODULE",
    "GLOBAL",
    "CONFIG",
    "MODULE",
    "COMPONENTS",
    "OPTIONAL_COMPONENTS",
];

/// How a meta-package exposes the packages it bundles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaPackageKind {
    /// Pinned `name==version` templates inside the package directory
    Requirements { files: Vec<String> },
    /// `sources/<name>-<version>.tar.gz` references in the package manifest
    SourceTarballs,
}

/// A filter-list entry that stands for several sub-packages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaPackage {
    pub name: String,
    pub kind: MetaPackageKind,
}

pub fn builtin_meta_packages() -> Vec<MetaPackage> {
    vec![
        MetaPackage {
            name: "PyModules".to_string(),
            kind: MetaPackageKind::Requirements {
                files: vec![
                    "requirements_analysisbase.txt.in".to_string(),
                    "requirements.txt.in".to_string(),
                    "requirements_athena.txt.in".to_string(),
                ],
            },
        },
        MetaPackage {
            name: "PyAnalysis".to_string(),
            kind: MetaPackageKind::SourceTarballs,
        },
    ]
}

/// Where a discovered version came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOrigin {
    /// Extracted from the manifest of the package itself
    Manifest,
    /// Listed by the named meta-package
    MetaPackage(String),
}

/// A `(name, version)` pair found while scanning manifests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredEntry {
    pub name: String,
    pub version: String,
    pub origin: EntryOrigin,
    pub file_path: PathBuf,
}

impl DiscoveredEntry {
    /// The line written to a side file for this entry.
    pub fn side_file_line(&self) -> String {
        format!("{}: {}", self.name, self.version)
    }

    /// Converts to a record tagged with `manifest_source`, or with the
    /// meta-package name for meta-package entries.
    pub fn into_dependency(self, manifest_source: &str) -> Option<Dependency> {
        let source = match &self.origin {
            EntryOrigin::Manifest => manifest_source.to_string(),
            EntryOrigin::MetaPackage(meta) => meta.clone(),
        };
        Dependency::new(self.name, Some(self.version), source)
            .ok()
            .map(|d| d.with_file_path(self.file_path))
    }
}

/// Manifest locations for a package directory, in lookup order.
pub fn manifest_candidates(package_dir: &Path) -> [PathBuf; 2] {
    [
        package_dir.join(MANIFEST_FILE_NAME),
        package_dir.join("cmake").join(MANIFEST_FILE_NAME),
    ]
}

/// Sub-packages referenced as source tarballs, first occurrence order, no repeats.
pub fn parse_source_tarballs(content: &str) -> Vec<(String, String)> {
    let mut found: Vec<(String, String)> = Vec::new();
    let direct = SOURCE_TARBALL
        .captures_iter(content)
        .map(|c| (c[1].to_string(), c[2].to_string()));
    let assigned = ASSIGNED_TARBALL
        .captures_iter(content)
        .map(|c| (c[1].to_string(), c[2].to_string()));

    for pair in direct.chain(assigned) {
        if !found.contains(&pair) {
            found.push(pair);
        }
    }
    found
}

/// `find_package(<Name> [<version>] [<keyword>])` calls in a CMake file.
///
/// A keyword in the version slot is not a version.
pub fn parse_find_package_calls(content: &str) -> Vec<(String, Option<String>)> {
    FIND_PACKAGE
        .captures_iter(content)
        .map(|caps| {
            let name = caps[1].to_string();
            let version = caps
                .get(2)
                .map(|m| m.as_str().trim().to_string())
                .filter(|v| !v.is_empty())
                .filter(|v| !FIND_PACKAGE_KEYWORDS.contains(&v.to_uppercase().as_str()));
            (name, version)
        })
        .collect()
}
