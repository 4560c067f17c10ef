use crate::ports::outbound::{CandidateArtifacts, StoredArtifacts, VersionStore};
use crate::sbom_generation::domain::VersionNumber;
use crate::shared::error::SbomError;
use crate::shared::security::read_regular_file;
use crate::shared::Result;
use chrono::{DateTime, Utc};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

pub const LOCK_FILE_NAME: &str = ".generation.lock";
const MANIFEST_SUFFIX: &str = "-sbom.json";

/// VersionedDirectoryStore adapter: `<root>/v<N>/<project>-sbom.{json,md}`
///
/// Commits are staged in a hidden sibling directory and renamed into place,
/// so a failed run never leaves a partial `v<N>` behind.
pub struct VersionedDirectoryStore {
    root: PathBuf,
    project: String,
    file_stem: String,
}

impl VersionedDirectoryStore {
    pub fn new(root: impl Into<PathBuf>, project: &str) -> Self {
        Self {
            root: root.into(),
            project: project.to_string(),
            file_stem: format!("{}-sbom", project.to_lowercase()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest_file_name(&self) -> String {
        format!("{}.json", self.file_stem)
    }

    pub fn narrative_file_name(&self) -> String {
        format!("{}.md", self.file_stem)
    }

    /// The manifest in `dir`: the project's own file name first, then any `*-sbom.json`.
    fn locate_manifest(&self, dir: &Path) -> PathBuf {
        let preferred = dir.join(self.manifest_file_name());
        if preferred.is_file() {
            return preferred;
        }
        let mut others: Vec<PathBuf> = fs::read_dir(dir)
            .into_iter()
            .flatten()
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.is_file()
                    && p.file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.ends_with(MANIFEST_SUFFIX))
            })
            .collect();
        others.sort();
        others.into_iter().next().unwrap_or(preferred)
    }
}

/// Removes the lock file when dropped.
#[derive(Debug)]
pub struct StoreLock {
    path: PathBuf,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

impl VersionStore for VersionedDirectoryStore {
    type Guard = StoreLock;

    fn lock(&self) -> Result<StoreLock> {
        fs::create_dir_all(&self.root).map_err(|e| SbomError::FileWriteError {
            path: self.root.clone(),
            details: e.to_string(),
        })?;

        let path = self.root.join(LOCK_FILE_NAME);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(SbomError::GenerationInProgress {
                    project: self.project.clone(),
                    lock_path: path,
                }
                .into())
            }
            Err(e) => {
                return Err(SbomError::FileWriteError {
                    path,
                    details: e.to_string(),
                }
                .into())
            }
        };
        // Informational only; the lock is the file's existence
        let _ = writeln!(file, "{}", std::process::id());

        Ok(StoreLock { path })
    }

    fn versions(&self) -> Result<Vec<VersionNumber>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(SbomError::FileReadError {
                    path: self.root.clone(),
                    details: e.to_string(),
                }
                .into())
            }
        };

        let mut versions: Vec<VersionNumber> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_ok_and(|t| t.is_dir()))
            .filter_map(|e| e.file_name().to_str().and_then(VersionNumber::parse_dir_name))
            .collect();
        versions.sort();
        Ok(versions)
    }

    fn load(&self, version: VersionNumber) -> Result<Option<StoredArtifacts>> {
        let directory = self.root.join(version.dir_name());
        if !directory.is_dir() {
            return Ok(None);
        }

        let manifest_path = self.locate_manifest(&directory);
        let narrative_path = manifest_path.with_extension("md");
        let modified = fs::metadata(&manifest_path)
            .or_else(|_| fs::metadata(&directory))
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Utc>::from);

        Ok(Some(StoredArtifacts {
            version,
            manifest: read_regular_file(&manifest_path, "stored manifest").ok(),
            narrative: read_regular_file(&narrative_path, "stored report").ok(),
            directory,
            manifest_path,
            narrative_path,
            modified,
        }))
    }

    fn commit(&self, version: VersionNumber, artifacts: &CandidateArtifacts) -> Result<PathBuf> {
        let target = self.root.join(version.dir_name());
        if target.exists() {
            return Err(SbomError::VersionConflict { path: target }.into());
        }

        let write_error = |path: &Path, e: std::io::Error| SbomError::FileWriteError {
            path: path.to_path_buf(),
            details: e.to_string(),
        };

        fs::create_dir_all(&self.root).map_err(|e| write_error(&self.root, e))?;
        let staging = tempfile::Builder::new()
            .prefix(".staging-")
            .tempdir_in(&self.root)
            .map_err(|e| write_error(&self.root, e))?;

        let manifest_path = staging.path().join(self.manifest_file_name());
        fs::write(&manifest_path, &artifacts.manifest).map_err(|e| write_error(&manifest_path, e))?;
        let narrative_path = staging.path().join(self.narrative_file_name());
        fs::write(&narrative_path, &artifacts.narrative)
            .map_err(|e| write_error(&narrative_path, e))?;

        let staging_path = staging.keep();
        if let Err(e) = fs::rename(&staging_path, &target) {
            let _ = fs::remove_dir_all(&staging_path);
            return Err(write_error(&target, e).into());
        }
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn artifacts(tag: &str) -> CandidateArtifacts {
        CandidateArtifacts {
            manifest: format!("{{\"components\": [], \"tag\": \"{}\"}}", tag),
            narrative: format!("# {} SBOM Report\n", tag),
        }
    }

    fn version(n: u32) -> VersionNumber {
        VersionNumber::new(n).unwrap()
    }

    #[test]
    fn test_versions_ignore_other_entries() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        for name in ["v1", "v2", "v7", "v0", "vX", "latest", ".staging-abc"] {
            fs::create_dir(root.join(name)).unwrap();
        }
        fs::write(root.join("v9"), "a file, not a directory").unwrap();

        let store = VersionedDirectoryStore::new(root, "Athena");
        assert_eq!(store.versions().unwrap(), vec![version(1), version(2), version(7)]);
    }

    #[test]
    fn test_versions_of_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let store = VersionedDirectoryStore::new(temp_dir.path().join("SBOMs"), "Athena");
        assert!(store.versions().unwrap().is_empty());
    }

    #[test]
    fn test_commit_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = VersionedDirectoryStore::new(temp_dir.path().join("SBOMs"), "AnalysisBase");

        let dir = store.commit(version(1), &artifacts("first")).unwrap();
        assert!(dir.join("analysisbase-sbom.json").is_file());
        assert!(dir.join("analysisbase-sbom.md").is_file());

        let stored = store.load(version(1)).unwrap().unwrap();
        assert!(stored.manifest.unwrap().contains("first"));
        assert!(stored.narrative.unwrap().starts_with("# first"));
        assert!(stored.modified.is_some());

        let leftovers: Vec<_> = fs::read_dir(store.root())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".staging-"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_commit_never_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let store = VersionedDirectoryStore::new(temp_dir.path(), "Athena");
        store.commit(version(1), &artifacts("first")).unwrap();

        let err = store.commit(version(1), &artifacts("second")).unwrap_err();
        assert!(format!("{}", err).contains("already exists"));

        let stored = store.load(version(1)).unwrap().unwrap();
        assert!(stored.manifest.unwrap().contains("first"));
    }

    #[test]
    fn test_load_missing_version() {
        let temp_dir = TempDir::new().unwrap();
        let store = VersionedDirectoryStore::new(temp_dir.path(), "Athena");
        assert!(store.load(version(3)).unwrap().is_none());
    }

    #[test]
    fn test_load_falls_back_to_any_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("v1");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("legacy-sbom.json"), "{}").unwrap();

        let store = VersionedDirectoryStore::new(temp_dir.path(), "Athena");
        let stored = store.load(version(1)).unwrap().unwrap();
        assert_eq!(stored.manifest.as_deref(), Some("{}"));
        assert!(stored.narrative.is_none());
    }

    #[test]
    fn test_lock_is_exclusive_and_released() {
        let temp_dir = TempDir::new().unwrap();
        let store = VersionedDirectoryStore::new(temp_dir.path().join("SBOMs"), "Athena");

        let guard = store.lock().unwrap();
        let err = store.lock().unwrap_err();
        assert!(format!("{}", err).contains("already in progress"));

        drop(guard);
        assert!(store.lock().is_ok());
    }
}
