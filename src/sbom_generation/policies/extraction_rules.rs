use crate::shared::Result;
use anyhow::Context;
use regex::Regex;
use std::collections::BTreeMap;

/// Package-specific version patterns. Capture group 1 is the version.
///
/// Within a package the first matching pattern wins, so the most precise
/// pattern is listed first.
const BUILTIN_PATTERNS: &[(&str, &[&str])] = &[
    ("Acts", &[r"Acts[-_/]?([0-9.]+)\.tar\.gz", r"acts[-_/]?([0-9.]+)\.tar\.gz"]),
    (
        "BAT",
        &[
            r"BAT[-_/]?([0-9]+(?:\.[0-9]+){1,})\.tar\.gz",
            r"/v[0-9]+/BAT-([0-9.]+)\.tar\.gz",
        ],
    ),
    ("Blas", &[r"OpenBLAS-([0-9.]+)\.tar\.gz"]),
    ("Boost", &[r"boost_([0-9_]+)\.tar\.gz"]),
    ("CLHEP", &[r"CLHEP[-_/]?([0-9.]+)\.tar\.gz", r"clhep[-_/]?([0-9.]+)\.tar\.gz"]),
    ("COOL", &[r"COOL[-_/]?([0-9.]+)\.tar\.gz", r"cool[-_/]?([0-9.]+)\.tar\.gz"]),
    ("CORAL", &[r"CORAL[-_/]?([0-9.]+)\.tar\.gz", r"coral[-_/]?([0-9.]+)\.tar\.gz"]),
    ("Coin3D", &[r"Coin3D[-_/]?([0-9.]+)\.tar\.gz", r"coin3d[-_/]?([0-9.]+)\.tar\.gz"]),
    ("Davix", &[r"davix-([0-9.]+)\.tar\.gz"]),
    ("dcap", &[r"dcap-([0-9.]+)-", r"dcap-([0-9.]+)\.tar"]),
    ("Eigen", &[r"eigen-([0-9.]+)\.tar\.gz"]),
    ("FastJet", &[r"fastjet-([0-9.]+)\.tar\.gz"]),
    (
        "FastJetContrib",
        &[r"fjcontrib-([0-9.]+)\.tar\.gz", r"fastjetcontrib-([0-9.]+)\.tar\.gz"],
    ),
    ("Gaudi", &[r"Gaudi[-_/]?([0-9.]+)\.tar\.gz", r"gaudi[-_/]?([0-9.]+)\.tar\.gz"]),
    ("Geant4", &[r"Geant4[-_/]?([0-9.]+)\.tar\.gz", r"geant4[-_/]?([0-9.]+)\.tar\.gz"]),
    (
        "GeoModel",
        &[r"GeoModel[-_/]?([0-9.]+)\.tar\.gz", r"geomodel[-_/]?([0-9.]+)\.tar\.gz"],
    ),
    (
        "GoogleTest",
        &[r"googletest-([0-9.]+)\.tar\.gz", r"GoogleTest[-_/]?([0-9.]+)\.tar\.gz"],
    ),
    (
        "HDF5",
        &[r#"ATLAS_HDF5_VERSION\s*"([^"]+)""#, r"HDF5[-_]?([0-9.]+)\.tar\.gz"],
    ),
    (
        "KLFitter",
        &[r"KLFitter[/\\]v?([0-9.]+)\.tar\.gz", r"KLFitter-([0-9.]+)\.tar\.gz"],
    ),
    ("Lhapdf", &[r"LHAPDF-([0-9.]+)\.tar\.gz"]),
    ("LibXml2", &[r"libxml2-([0-9.]+)\.tar\.gz"]),
    (
        "lwtnn",
        &[
            r"lwtnn[/\\]v?([0-9.]+)\.tar\.gz",
            r"externals/lwtnn/v?([0-9.]+)\.tar\.gz",
            r"v([0-9.]+)\.tar\.gz",
        ],
    ),
    (
        "nlohmann_json",
        &[r"json-([0-9.]+)\.tar\.gz", r"nlohmann_json[-_/]?([0-9.]+)\.tar\.gz"],
    ),
    ("onnxruntime", &[r"onnxruntime[-\w]*-([0-9.]+)\.(?:tgz|tar\.gz)"]),
    ("Python", &[r"Python-([0-9.]+)\.t(?:ar\.)?[gx]z", r"Python\s+([0-9.]+)"]),
    (
        "ROOT",
        &[
            r"root_v([0-9.]+)\.source\.tar\.gz",
            r"ROOT[/\\]root_v([0-9.]+)\.source\.tar\.gz",
        ],
    ),
    ("SQLite", &[r"sqlite-autoconf-([0-9]+)\.tar\.gz"]),
    ("TBB", &[r"oneTBB-([0-9.]+)\.tar\.gz"]),
    ("XRootD", &[r"xrootd-([0-9.]+)\.tar\.gz"]),
];

/// Heuristics tried in order when no package-specific pattern matches.
const GENERIC_PATTERNS: &[&str] = &[
    r"/sources/[^/]+-([0-9A-Za-z\._\-]+)\.tar\.gz",
    r"[-_/]v?([0-9]+\.[0-9]+\.[0-9A-Za-z\._\-]+)\.tar\.gz",
    r"[-_/]v?([0-9]+\.[0-9A-Za-z\._\-]+)\.tar\.gz",
    r"([0-9]{6,})\.tar\.gz",
];

/// Packages whose tarball versions use `_` as the separator (`boost_1_82_0`).
const UNDERSCORE_VERSIONED: &[&str] = &["Boost"];

/// How a version was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    PackageSpecific,
    Generic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedVersion {
    pub version: String,
    pub strategy: MatchStrategy,
}

#[derive(Debug, Clone)]
struct PackageRules {
    key: String,
    patterns: Vec<Regex>,
    normalize_underscores: bool,
}

/// Ordered `(pattern, extractor)` lists for pulling versions out of build manifests.
///
/// Lookup of a package's rules tries the exact key first and then a
/// case-insensitive match with `-` treated as `_`, so filter names like
/// `root` or `nlohmann-json` reach `ROOT` and `nlohmann_json`.
#[derive(Debug, Clone)]
pub struct ExtractionRules {
    packages: Vec<PackageRules>,
    generic: Vec<Regex>,
}

impl ExtractionRules {
    /// The built-in rule table.
    pub fn builtin() -> Self {
        let packages = BUILTIN_PATTERNS
            .iter()
            .map(|(key, patterns)| PackageRules {
                key: key.to_string(),
                patterns: patterns.iter().map(|p| compile_builtin(p)).collect(),
                normalize_underscores: UNDERSCORE_VERSIONED.contains(key),
            })
            .collect();

        Self {
            packages,
            generic: GENERIC_PATTERNS.iter().map(|p| compile_builtin(p)).collect(),
        }
    }

    /// Replaces (or adds) the pattern list of each package named in `overrides`.
    ///
    /// # Errors
    /// Returns an error if a pattern does not compile or has no capture group.
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, Vec<String>>) -> Result<Self> {
        for (key, patterns) in overrides {
            let compiled = patterns
                .iter()
                .map(|p| compile_user_pattern(key, p))
                .collect::<Result<Vec<_>>>()?;

            match self.packages.iter_mut().find(|r| &r.key == key) {
                Some(rules) => rules.patterns = compiled,
                None => self.packages.push(PackageRules {
                    key: key.clone(),
                    patterns: compiled,
                    normalize_underscores: false,
                }),
            }
        }
        Ok(self)
    }

    /// Marks additional packages whose versions use `_` separators.
    pub fn with_underscore_versioned<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for key in keys {
            if let Some(rules) = self.rules_for_mut(key.as_ref()) {
                rules.normalize_underscores = true;
            }
        }
        self
    }

    /// Extracts the version of `package` from manifest `content`.
    ///
    /// Package-specific patterns are tried first, then the generic fallbacks.
    pub fn extract_version(&self, package: &str, content: &str) -> Option<ExtractedVersion> {
        if content.is_empty() {
            return None;
        }

        let rules = self.rules_for(package);
        let specific = rules.and_then(|r| first_capture(&r.patterns, content));
        let (raw, strategy) = match specific {
            Some(v) => (v, MatchStrategy::PackageSpecific),
            None => (first_capture(&self.generic, content)?, MatchStrategy::Generic),
        };

        let version = match rules {
            Some(r) if r.normalize_underscores => raw.replace('_', "."),
            _ => raw,
        };

        Some(ExtractedVersion { version, strategy })
    }

    fn rules_for(&self, package: &str) -> Option<&PackageRules> {
        if let Some(exact) = self.packages.iter().find(|r| r.key == package) {
            return Some(exact);
        }
        let wanted = normalize_key(package);
        self.packages.iter().find(|r| normalize_key(&r.key) == wanted)
    }

    fn rules_for_mut(&mut self, package: &str) -> Option<&mut PackageRules> {
        let wanted = normalize_key(package);
        self.packages
            .iter_mut()
            .find(|r| r.key == package || normalize_key(&r.key) == wanted)
    }
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self::builtin()
    }
}

fn normalize_key(name: &str) -> String {
    name.to_lowercase().replace('-', "_")
}

fn first_capture(patterns: &[Regex], content: &str) -> Option<String> {
    patterns.iter().find_map(|re| {
        re.captures(content)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    })
}

fn compile_builtin(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in extraction pattern must compile")
}

fn compile_user_pattern(key: &str, pattern: &str) -> Result<Regex> {
    let re = Regex::new(pattern)
        .with_context(|| format!("Invalid extraction pattern for '{}': {}", key, pattern))?;
    if re.captures_len() < 2 {
        anyhow::bail!(
            "Extraction pattern for '{}' has no capture group: {}",
            key,
            pattern
        );
    }
    Ok(re)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_patterns_compile() {
        let rules = ExtractionRules::builtin();
        assert_eq!(rules.packages.len(), BUILTIN_PATTERNS.len());
        assert_eq!(rules.generic.len(), 4);
    }

    #[test]
    fn test_boost_underscores_normalized() {
        let rules = ExtractionRules::builtin();
        let content = "URL http://cern.ch/lcgpackages/tarFiles/sources/boost_1_82_0.tar.gz;";
        let found = rules.extract_version("Boost", content).unwrap();
        assert_eq!(found.version, "1.82.0");
        assert_eq!(found.strategy, MatchStrategy::PackageSpecific);
    }

    #[test]
    fn test_first_matching_pattern_wins() {
        let rules = ExtractionRules::builtin();
        let content = r#"set( ATLAS_HDF5_VERSION "1.14.3" )
URL ${ATLAS_SOURCES}/HDF5-1.12.2.tar.gz"#;
        assert_eq!(rules.extract_version("HDF5", content).unwrap().version, "1.14.3");
    }

    #[test]
    fn test_key_normalization() {
        let rules = ExtractionRules::builtin();
        let key = |name: &str| rules.rules_for(name).map(|r| r.key.clone());
        assert_eq!(key("root").as_deref(), Some("ROOT"));
        assert_eq!(key("nlohmann-json").as_deref(), Some("nlohmann_json"));
        assert_eq!(key("blas").as_deref(), Some("Blas"));
        assert_eq!(key("NotAPackage"), None);

        let content = "URL ${LCG_SOURCES}/root_v6.30.06.source.tar.gz";
        assert_eq!(rules.extract_version("root", content).unwrap().version, "6.30.06");
    }

    #[test]
    fn test_generic_fallback_order() {
        let rules = ExtractionRules::builtin();

        let hyphenated = "URL https://cern.ch/lcgpackages/sources/yaml-cpp-0.8.0.tar.gz";
        let found = rules.extract_version("yaml-cpp", hyphenated).unwrap();
        assert_eq!(found.version, "0.8.0");
        assert_eq!(found.strategy, MatchStrategy::Generic);

        let dotted = "URL https://example.org/releases/gsl_2.7.1.tar.gz";
        assert_eq!(rules.extract_version("GSL", dotted).unwrap().version, "2.7.1");

        let two_part = "URL https://example.org/zlib/v1.3.tar.gz";
        assert_eq!(rules.extract_version("zlib", two_part).unwrap().version, "1.3");

        let dated = "URL https://example.org/snapshot20240115.tar.gz";
        assert_eq!(rules.extract_version("snap", dated).unwrap().version, "20240115");
    }

    #[test]
    fn test_no_match_returns_none() {
        let rules = ExtractionRules::builtin();
        assert!(rules.extract_version("Boost", "nothing to see").is_none());
        assert!(rules.extract_version("Boost", "").is_none());
    }

    #[test]
    fn test_overrides_replace_and_add() {
        let mut overrides = BTreeMap::new();
        overrides.insert(
            "ROOT".to_string(),
            vec![r"ROOT_VERSION\s+([0-9.]+)".to_string()],
        );
        overrides.insert("Frobnicator".to_string(), vec![r"frob-([0-9.]+)\.zip".to_string()]);
        let rules = ExtractionRules::builtin().with_overrides(&overrides).unwrap();

        let found = rules.extract_version("ROOT", "ROOT_VERSION 6.32.02").unwrap();
        assert_eq!(found.version, "6.32.02");
        let found = rules.extract_version("Frobnicator", "get frob-2.1.zip").unwrap();
        assert_eq!(found.strategy, MatchStrategy::PackageSpecific);
    }

    #[test]
    fn test_override_without_capture_group_rejected() {
        let mut overrides = BTreeMap::new();
        overrides.insert("ROOT".to_string(), vec![r"root_v[0-9.]+".to_string()]);
        let err = ExtractionRules::builtin().with_overrides(&overrides).unwrap_err();
        assert!(err.to_string().contains("no capture group"));
    }

    #[test]
    fn test_extra_underscore_versioned_package() {
        let rules = ExtractionRules::builtin().with_underscore_versioned(["SQLite"]);
        let found = rules
            .extract_version("SQLite", "sqlite-autoconf-3450100.tar.gz")
            .unwrap();
        assert_eq!(found.version, "3450100");
    }
}
