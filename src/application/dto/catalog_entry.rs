use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// One stored manifest as listed by the catalog
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// `<project>-v<N>`
    pub id: String,
    pub project: String,
    pub display_name: String,
    pub version: u32,
    pub manifest_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub dependency_count: usize,
    /// Distinct component `source` properties, sorted
    pub sources: Vec<String>,
    pub properties: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
    /// SHA-256 of the content signature
    pub signature: String,
}

/// All stored manifests of one project, newest first
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCatalog {
    pub name: String,
    pub display_name: String,
    pub entries: Vec<CatalogEntry>,
}

/// A configured project and whether anything has been stored for it yet
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub name: String,
    pub display_name: String,
    pub available: bool,
    pub version_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_id: Option<String>,
}
