use crate::sbom_generation::domain::SbomMetadata;
use chrono::Utc;
use uuid::Uuid;

pub const DEFAULT_TOOL_NAME: &str = "sbom-ledger";

/// SbomGenerator service for manifest metadata
///
/// Every call stamps the current time and a fresh serial number; neither
/// participates in the version signature.
pub struct SbomGenerator;

impl SbomGenerator {
    /// Generates metadata for a manifest produced by `tool_name`
    ///
    /// # Arguments
    /// * `tool_name` - Tool identity written to `metadata.tools`
    /// * `tool_version` - Version of that tool
    /// * `properties` - Free-form `(name, value)` pairs, kept in order
    pub fn generate_metadata(
        tool_name: &str,
        tool_version: &str,
        properties: Vec<(String, String)>,
    ) -> SbomMetadata {
        let serial_number = format!("urn:uuid:{}", Uuid::new_v4());

        SbomMetadata::new(
            Utc::now(),
            tool_name.to_string(),
            tool_version.to_string(),
            serial_number,
        )
        .with_properties(properties)
    }

    /// Metadata naming this crate as the tool
    pub fn generate_default_metadata(properties: Vec<(String, String)>) -> SbomMetadata {
        Self::generate_metadata(DEFAULT_TOOL_NAME, env!("CARGO_PKG_VERSION"), properties)
    }
}
