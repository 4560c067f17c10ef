use std::collections::BTreeMap;

/// Row label for the C compiler in the build information table.
pub const C_COMPILER_LABEL: &str = "C Compiler";
/// Row label for the C++ compiler in the build information table.
pub const CXX_COMPILER_LABEL: &str = "CXX Compiler";
/// Row label for the platform in the build information table.
pub const PLATFORM_LABEL: &str = "Platform";

/// A `<product> release "<version>" for platform: <platform>` line from a build log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseInfo {
    pub product: String,
    pub version: String,
    pub platform: String,
}

impl ReleaseInfo {
    /// Label of the release row, e.g. `LCG Version`.
    pub fn label(&self) -> String {
        format!("{} Version", self.product)
    }
}

/// Toolchain facts scraped from a configure log.
///
/// Every field is independently optional; a missing log yields `BuildInfo::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildInfo {
    pub c_compiler: Option<String>,
    pub cxx_compiler: Option<String>,
    pub platform: Option<String>,
    pub release: Option<ReleaseInfo>,
    /// Package names listed in the log's package-filtering section, in log order
    pub packages: Vec<String>,
}

impl BuildInfo {
    /// True when nothing that would appear in the rendered table was found.
    pub fn is_empty(&self) -> bool {
        self.table_rows().is_empty()
    }

    /// `(label, value)` rows in rendering order.
    ///
    /// These rows are both what the narrative report prints and what the
    /// version signature hashes, so re-reading a stored report gives back
    /// exactly this list.
    pub fn table_rows(&self) -> Vec<(String, String)> {
        let mut rows = Vec::new();
        if let Some(c) = &self.c_compiler {
            rows.push((C_COMPILER_LABEL.to_string(), c.clone()));
        }
        if let Some(cxx) = &self.cxx_compiler {
            rows.push((CXX_COMPILER_LABEL.to_string(), cxx.clone()));
        }
        if let Some(platform) = &self.platform {
            rows.push((PLATFORM_LABEL.to_string(), platform.clone()));
        }
        if let Some(release) = &self.release {
            rows.push((release.label(), release.version.clone()));
        }
        rows
    }

    /// Signature view of the table rows, `None` when there is nothing to compare.
    pub fn signature_entries(&self) -> Option<BTreeMap<String, String>> {
        let rows = self.table_rows();
        if rows.is_empty() {
            None
        } else {
            Some(rows.into_iter().collect())
        }
    }
}
