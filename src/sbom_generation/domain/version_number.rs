use std::fmt;

/// Number of a stored SBOM version directory (`v1`, `v2`, ...).
///
/// Always at least 1. Directory names that are not exactly `v` followed by
/// ASCII digits do not parse and are ignored by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionNumber(u32);

impl VersionNumber {
    pub const FIRST: VersionNumber = VersionNumber(1);

    pub fn new(number: u32) -> Option<Self> {
        (number >= 1).then_some(Self(number))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Directory name for this version, e.g. `v3`.
    pub fn dir_name(self) -> String {
        format!("v{}", self.0)
    }

    /// Parses a directory name such as `v12`.
    pub fn parse_dir_name(name: &str) -> Option<Self> {
        let digits = name.strip_prefix('v')?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse::<u32>().ok().and_then(Self::new)
    }

    /// The number a new version gets given the existing ones: `max + 1`, or 1.
    pub fn next_after<I>(existing: I) -> Self
    where
        I: IntoIterator<Item = VersionNumber>,
    {
        existing
            .into_iter()
            .max()
            .map(Self::next)
            .unwrap_or(Self::FIRST)
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}
