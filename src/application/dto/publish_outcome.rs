use crate::sbom_generation::domain::VersionNumber;
use std::fmt;
use std::path::PathBuf;

/// What a generation run did to the version store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Created { version: VersionNumber, path: PathBuf },
    Duplicate { of: VersionNumber },
}

impl PublishOutcome {
    pub fn version(&self) -> VersionNumber {
        match self {
            PublishOutcome::Created { version, .. } => *version,
            PublishOutcome::Duplicate { of } => *of,
        }
    }
}

impl fmt::Display for PublishOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishOutcome::Created { version, .. } => {
                write!(f, "created version {}", version.get())
            }
            PublishOutcome::Duplicate { of } => write!(f, "duplicate of version {}", of.get()),
        }
    }
}
