//! Package filter lists: which external packages a build is expected to carry.

/// Used when no filter file can be found.
pub const FALLBACK_PACKAGES: &[&str] = &[
    "HDF5",
    "BAT",
    "Blas",
    "Boost",
    "Davix",
    "dcap",
    "Eigen",
    "lwtnn",
    "FastJet",
    "FastJetContrib",
    "GoogleTest",
    "KLFitter",
    "Lhapdf",
    "LibXml2",
    "onnxruntime",
    "nlohmann_json",
    "PyAnalysis",
    "PyModules",
    "Python",
    "ROOT",
    "SQLite",
    "TBB",
    "XRootD",
];

const EXTERNAL_PREFIX: &str = "External/";

/// Extracts package names from `+ External/<name> ...` lines, in file order.
///
/// Exclusion lines (`- External/...`) and anything else are ignored. An
/// existing but empty filter file yields an empty list, not the fallback.
pub fn parse_package_filters(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('+'))
        .filter_map(|line| line.split_once(EXTERNAL_PREFIX))
        .filter_map(|(_, after)| after.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

pub fn fallback_packages() -> Vec<String> {
    FALLBACK_PACKAGES.iter().map(|p| p.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_package_filters() {
        let content = "\
# AnalysisBaseExternals package filters
+ External/Boost
+ External/ROOT   # the big one
- External/Geant4
+ External/
+External/TBB
something else
";
        assert_eq!(parse_package_filters(content), vec!["Boost", "ROOT", "TBB"]);
    }

    #[test]
    fn test_empty_file_gives_empty_list() {
        assert!(parse_package_filters("").is_empty());
    }

    #[test]
    fn test_fallback_list() {
        let fallback = fallback_packages();
        assert_eq!(fallback.len(), 23);
        assert_eq!(fallback.first().map(String::as_str), Some("HDF5"));
        assert!(fallback.contains(&"PyModules".to_string()));
    }
}
