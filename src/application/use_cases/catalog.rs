use crate::application::dto::{CatalogEntry, ProjectCatalog, ProjectSummary};
use crate::ports::outbound::{StoredArtifacts, VersionStore};
use crate::sbom_generation::domain::{Signature, VersionNumber};
use crate::sbom_generation::parsers::parse_build_info_section;
use crate::shared::error::SbomError;
use crate::shared::Result;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Catalog id of a stored version: `<project>-v<N>`, lower-cased project
pub fn artifact_id(project: &str, version: VersionNumber) -> String {
    format!("{}-{}", project.to_lowercase(), version.dir_name())
}

/// A project's version store as seen by the catalog
pub struct CatalogProject<V> {
    pub name: String,
    pub display_name: String,
    pub store: V,
}

/// CatalogUseCase - read-only view over every project's stored versions
pub struct CatalogUseCase<V> {
    projects: Vec<CatalogProject<V>>,
}

impl<V: VersionStore> CatalogUseCase<V> {
    pub fn new(projects: Vec<CatalogProject<V>>) -> Self {
        Self { projects }
    }

    /// Every readable stored manifest, grouped by project, newest version first
    ///
    /// Versions whose manifest is missing or not valid JSON are left out.
    pub fn list(&self) -> Result<Vec<ProjectCatalog>> {
        self.projects
            .iter()
            .map(|project| {
                let mut entries = Vec::new();
                for version in project.store.versions()?.into_iter().rev() {
                    if let Some(stored) = project.store.load(version)? {
                        entries.extend(build_entry(project, stored));
                    }
                }
                Ok(ProjectCatalog {
                    name: project.name.clone(),
                    display_name: project.display_name.clone(),
                    entries,
                })
            })
            .collect()
    }

    /// Configured projects and how many versions each has
    pub fn projects(&self) -> Result<Vec<ProjectSummary>> {
        self.projects
            .iter()
            .map(|project| {
                let versions = project.store.versions()?;
                Ok(ProjectSummary {
                    name: project.name.clone(),
                    display_name: project.display_name.clone(),
                    available: !versions.is_empty(),
                    version_count: versions.len(),
                    latest_id: versions.last().map(|v| artifact_id(&project.name, *v)),
                })
            })
            .collect()
    }

    /// # Errors
    /// `SbomError::ArtifactNotFound` if no stored manifest has this id
    pub fn show(&self, id: &str) -> Result<CatalogEntry> {
        let (project, stored) = self.find(id)?;
        build_entry(project, stored).ok_or_else(|| not_found(id))
    }

    pub fn raw_manifest(&self, id: &str) -> Result<String> {
        let (_, stored) = self.find(id)?;
        stored.manifest.ok_or_else(|| not_found(id))
    }

    pub fn raw_narrative(&self, id: &str) -> Result<String> {
        let (_, stored) = self.find(id)?;
        stored.narrative.ok_or_else(|| not_found(id))
    }

    fn find(&self, id: &str) -> Result<(&CatalogProject<V>, StoredArtifacts)> {
        let (project_id, version) = parse_artifact_id(id).ok_or_else(|| not_found(id))?;
        let project = self
            .projects
            .iter()
            .find(|p| p.name.to_lowercase() == project_id)
            .ok_or_else(|| not_found(id))?;
        let stored = project.store.load(version)?.ok_or_else(|| not_found(id))?;
        Ok((project, stored))
    }
}

fn parse_artifact_id(id: &str) -> Option<(String, VersionNumber)> {
    let (project, version) = id.rsplit_once('-')?;
    let version = VersionNumber::parse_dir_name(version)?;
    (!project.is_empty()).then(|| (project.to_lowercase(), version))
}

fn not_found(id: &str) -> anyhow::Error {
    SbomError::ArtifactNotFound { id: id.to_string() }.into()
}

fn build_entry<V>(project: &CatalogProject<V>, stored: StoredArtifacts) -> Option<CatalogEntry> {
    let manifest: Value = serde_json::from_str(stored.manifest.as_deref()?).ok()?;
    let build_info = parse_build_info_section(stored.narrative.as_deref().unwrap_or(""));

    let components = manifest
        .get("components")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let sources: BTreeSet<String> = components
        .iter()
        .filter_map(|c| c.get("properties").and_then(Value::as_array))
        .flatten()
        .filter(|p| p.get("name").and_then(Value::as_str) == Some("source"))
        .filter_map(|p| p.get("value").and_then(Value::as_str))
        .map(str::to_string)
        .collect();

    let properties: BTreeMap<String, String> = manifest
        .pointer("/metadata/properties")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|p| {
            Some((
                p.get("name")?.as_str()?.to_string(),
                p.get("value")?.as_str()?.to_string(),
            ))
        })
        .collect();

    let timestamp = manifest
        .pointer("/metadata/timestamp")
        .and_then(Value::as_str)
        .map(str::to_string);

    Some(CatalogEntry {
        id: artifact_id(&project.name, stored.version),
        project: project.name.clone(),
        display_name: format!("{} {}", project.display_name, stored.version),
        version: stored.version.get(),
        manifest_path: stored.manifest_path,
        narrative_path: stored.narrative.is_some().then_some(stored.narrative_path),
        timestamp,
        dependency_count: components.len(),
        sources: sources.into_iter().collect(),
        properties,
        modified: stored.modified,
        signature: Signature::from_manifest(&manifest, Some(&build_info)).digest(),
    })
}
