use sbom_ledger::ports::outbound::{CandidateArtifacts, StoredArtifacts};
use sbom_ledger::prelude::*;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// VersionStore kept in memory; commits never touch the filesystem
#[derive(Default)]
pub struct InMemoryVersionStore {
    versions: Mutex<BTreeMap<VersionNumber, CandidateArtifacts>>,
}

impl InMemoryVersionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commit_count(&self) -> usize {
        self.versions.lock().unwrap().len()
    }

    pub fn manifest(&self, version: u32) -> Option<String> {
        let version = VersionNumber::new(version)?;
        self.versions
            .lock()
            .unwrap()
            .get(&version)
            .map(|a| a.manifest.clone())
    }
}

impl VersionStore for InMemoryVersionStore {
    type Guard = ();

    fn lock(&self) -> Result<Self::Guard> {
        Ok(())
    }

    fn versions(&self) -> Result<Vec<VersionNumber>> {
        Ok(self.versions.lock().unwrap().keys().copied().collect())
    }

    fn load(&self, version: VersionNumber) -> Result<Option<StoredArtifacts>> {
        Ok(self.versions.lock().unwrap().get(&version).map(|a| {
            let directory = PathBuf::from(version.dir_name());
            StoredArtifacts {
                version,
                manifest_path: directory.join("sbom.json"),
                narrative_path: directory.join("sbom.md"),
                directory,
                manifest: Some(a.manifest.clone()),
                narrative: Some(a.narrative.clone()),
                modified: None,
            }
        }))
    }

    fn commit(&self, version: VersionNumber, artifacts: &CandidateArtifacts) -> Result<PathBuf> {
        let mut versions = self.versions.lock().unwrap();
        if versions.contains_key(&version) {
            anyhow::bail!("{} already committed", version);
        }
        versions.insert(version, artifacts.clone());
        Ok(PathBuf::from(version.dir_name()))
    }
}
