use crate::shared::Result;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

/// Maximum length for dependency names (security limit)
const MAX_NAME_LENGTH: usize = 255;

/// Maximum length for version strings; requirement specifiers can be long
const MAX_VERSION_LENGTH: usize = 255;

/// Version text that parsers emit when nothing could be determined.
pub const UNDEFINED_VERSION: &str = "undefined";

/// Alternative placeholder some projects render for undetermined versions.
pub const UNKNOWN_VERSION: &str = "unknown";

/// Returns true when `version` is one of the "not determined" placeholders.
pub fn is_placeholder_version(version: &str) -> bool {
    let trimmed = version.trim();
    trimmed.is_empty() || trimmed == UNDEFINED_VERSION || trimmed == UNKNOWN_VERSION
}

/// A single scraped dependency record.
///
/// Identity is `(name, version)` compared exactly; `source` and `file_path` are
/// provenance only and never take part in equality or hashing. Placeholder
/// versions are folded into `None` on construction so that `foo: undefined`
/// and a bare `foo` are the same dependency.
#[derive(Debug, Clone)]
pub struct Dependency {
    name: String,
    version: Option<String>,
    source: String,
    file_path: Option<PathBuf>,
}

impl Dependency {
    pub fn new(
        name: impl Into<String>,
        version: Option<String>,
        source: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            anyhow::bail!("Dependency name cannot be empty");
        }
        if name.len() > MAX_NAME_LENGTH {
            anyhow::bail!(
                "Dependency name is too long ({} bytes). Maximum allowed: {} bytes",
                name.len(),
                MAX_NAME_LENGTH
            );
        }
        if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
            anyhow::bail!("Dependency name '{}' contains whitespace or control characters", name);
        }

        let version = match version {
            Some(v) if !is_placeholder_version(&v) => {
                let v = v.trim().to_string();
                if v.len() > MAX_VERSION_LENGTH {
                    anyhow::bail!(
                        "Version of '{}' is too long ({} bytes). Maximum allowed: {} bytes",
                        name,
                        v.len(),
                        MAX_VERSION_LENGTH
                    );
                }
                if v.chars().any(|c| c.is_control()) {
                    anyhow::bail!("Version of '{}' contains control characters", name);
                }
                Some(v)
            }
            _ => None,
        };

        Ok(Self {
            name,
            version,
            source: source.into(),
            file_path: None,
        })
    }

    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn is_version_known(&self) -> bool {
        self.version.is_some()
    }

    /// Version text for rendering, substituting `placeholder` when undetermined.
    pub fn display_version<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.version.as_deref().unwrap_or(placeholder)
    }

    fn identity(&self) -> (&str, Option<&str>) {
        (&self.name, self.version.as_deref())
    }
}

impl PartialEq for Dependency {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Dependency {}

impl Hash for Dependency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

type IdentityKey = (String, Option<String>);

/// Identity-deduplicated collection of dependency records.
///
/// The first record inserted for an identity wins; later duplicates are dropped
/// without touching the stored provenance.
#[derive(Debug, Clone, Default)]
pub struct DependencySet {
    entries: BTreeMap<IdentityKey, Dependency>,
}

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `dependency` unless its identity is already present.
    /// Returns whether the record was added.
    pub fn insert(&mut self, dependency: Dependency) -> bool {
        let key = (dependency.name.clone(), dependency.version.clone());
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, dependency);
        true
    }

    /// Inserts every record in order, returning how many were new.
    pub fn extend<I>(&mut self, dependencies: I) -> usize
    where
        I: IntoIterator<Item = Dependency>,
    {
        dependencies
            .into_iter()
            .map(|d| self.insert(d))
            .filter(|added| *added)
            .count()
    }

    pub fn contains(&self, name: &str, version: Option<&str>) -> bool {
        self.entries
            .contains_key(&(name.to_string(), version.map(str::to_string)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dependency> {
        self.entries.values()
    }

    /// Records ordered case-insensitively by name, ties broken by exact name then version.
    pub fn sorted_for_display(&self) -> Vec<&Dependency> {
        let mut sorted: Vec<&Dependency> = self.entries.values().collect();
        sorted.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.version.cmp(&b.version))
        });
        sorted
    }

    /// Records grouped by provenance tag, each group in display order.
    pub fn grouped_by_source(&self) -> BTreeMap<&str, Vec<&Dependency>> {
        let mut groups: BTreeMap<&str, Vec<&Dependency>> = BTreeMap::new();
        for dependency in self.sorted_for_display() {
            groups.entry(dependency.source()).or_default().push(dependency);
        }
        groups
    }

    /// Count of records per provenance tag.
    pub fn source_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for dependency in self.entries.values() {
            *counts.entry(dependency.source()).or_insert(0) += 1;
        }
        counts
    }
}

impl FromIterator<Dependency> for DependencySet {
    fn from_iter<I: IntoIterator<Item = Dependency>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}
