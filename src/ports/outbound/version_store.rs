use crate::sbom_generation::domain::VersionNumber;
use crate::shared::Result;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// A rendered manifest and narrative, not yet persisted.
#[derive(Debug, Clone)]
pub struct CandidateArtifacts {
    pub manifest: String,
    pub narrative: String,
}

/// The contents of one stored version directory.
#[derive(Debug, Clone)]
pub struct StoredArtifacts {
    pub version: VersionNumber,
    pub directory: PathBuf,
    pub manifest_path: PathBuf,
    pub narrative_path: PathBuf,
    /// `None` when the manifest file is missing or unreadable
    pub manifest: Option<String>,
    pub narrative: Option<String>,
    pub modified: Option<DateTime<Utc>>,
}

/// VersionStore port for a project's append-only `v1, v2, ...` directories
///
/// Directory names that are not `v<N>` are ignored. Stored versions are
/// never modified or removed.
pub trait VersionStore {
    /// Held for the duration of a generation run; dropping it releases the store
    type Guard;

    /// Takes exclusive ownership of the store
    ///
    /// # Errors
    /// Returns `SbomError::GenerationInProgress` if another run holds it
    fn lock(&self) -> Result<Self::Guard>;

    /// Stored version numbers, ascending
    fn versions(&self) -> Result<Vec<VersionNumber>>;

    fn load(&self, version: VersionNumber) -> Result<Option<StoredArtifacts>>;

    /// Persists both documents as `version`, all or nothing
    ///
    /// # Errors
    /// Returns `SbomError::VersionConflict` if the directory already exists
    fn commit(&self, version: VersionNumber, artifacts: &CandidateArtifacts) -> Result<PathBuf>;
}

impl<T: VersionStore + ?Sized> VersionStore for &T {
    type Guard = T::Guard;

    fn lock(&self) -> Result<Self::Guard> {
        (**self).lock()
    }

    fn versions(&self) -> Result<Vec<VersionNumber>> {
        (**self).versions()
    }

    fn load(&self, version: VersionNumber) -> Result<Option<StoredArtifacts>> {
        (**self).load(version)
    }

    fn commit(&self, version: VersionNumber, artifacts: &CandidateArtifacts) -> Result<PathBuf> {
        (**self).commit(version, artifacts)
    }
}
