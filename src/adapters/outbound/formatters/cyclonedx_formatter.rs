use crate::application::read_models::{ComponentView, SbomMetadataView, SbomReadModel};
use crate::ports::outbound::SbomFormatter;
use crate::shared::Result;
use serde::Serialize;
use serde_json::{Map, Value};

const SCHEMA_URL: &str = "http://cyclonedx.org/schema/bom-1.6.schema.json";
const SPEC_VERSION: &str = "1.6";

/// Top-level manifest keys in the order they must appear.
pub const TOP_LEVEL_KEY_ORDER: &[&str] = &[
    "$schema",
    "bomFormat",
    "specVersion",
    "serialNumber",
    "version",
    "metadata",
    "components",
];

#[derive(Debug, Serialize)]
struct Bom {
    #[serde(rename = "$schema")]
    schema: String,
    #[serde(rename = "bomFormat")]
    bom_format: String,
    #[serde(rename = "specVersion")]
    spec_version: String,
    #[serde(rename = "serialNumber")]
    serial_number: String,
    version: u32,
    metadata: Metadata,
    components: Vec<Component>,
}

#[derive(Debug, Serialize)]
struct Metadata {
    timestamp: String,
    tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    properties: Vec<Property>,
}

#[derive(Debug, Serialize)]
struct Tool {
    name: String,
    version: String,
}

#[derive(Debug, Serialize)]
struct Component {
    #[serde(rename = "type")]
    component_type: String,
    name: String,
    version: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    properties: Vec<Property>,
}

#[derive(Debug, Serialize)]
struct Property {
    name: String,
    value: String,
}

impl Property {
    fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// CycloneDxFormatter adapter for generating CycloneDX 1.6 JSON
pub struct CycloneDxFormatter;

impl CycloneDxFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CycloneDxFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl SbomFormatter for CycloneDxFormatter {
    fn format(&self, model: &SbomReadModel) -> Result<String> {
        let bom = Bom {
            schema: SCHEMA_URL.to_string(),
            bom_format: "CycloneDX".to_string(),
            spec_version: SPEC_VERSION.to_string(),
            serial_number: model.metadata.serial_number.clone(),
            version: 1,
            metadata: self.build_metadata(&model.metadata),
            components: self.build_components(&model.components, model.include_provenance),
        };

        let value = order_top_level_keys(serde_json::to_value(&bom)?);
        serde_json::to_string_pretty(&value).map_err(Into::into)
    }
}

impl CycloneDxFormatter {
    fn build_metadata(&self, metadata: &SbomMetadataView) -> Metadata {
        Metadata {
            timestamp: metadata.timestamp.clone(),
            tools: vec![Tool {
                name: metadata.tool_name.clone(),
                version: metadata.tool_version.clone(),
            }],
            properties: metadata
                .properties
                .iter()
                .map(|(name, value)| Property::new(name, value))
                .collect(),
        }
    }

    fn build_components(&self, components: &[ComponentView], provenance: bool) -> Vec<Component> {
        components
            .iter()
            .map(|c| {
                let mut properties = Vec::new();
                if provenance {
                    properties.push(Property::new("source", &c.source));
                    if let Some(path) = &c.file_path {
                        properties.push(Property::new("file_path", path));
                    }
                }
                Component {
                    component_type: "library".to_string(),
                    name: c.name.clone(),
                    version: c.version.clone(),
                    properties,
                }
            })
            .collect()
    }
}

/// Reorders the keys of a manifest root object.
///
/// Known keys come first in [`TOP_LEVEL_KEY_ORDER`]; any other keys follow in
/// their original order. Nothing is dropped. Non-object values pass through.
pub fn order_top_level_keys(value: Value) -> Value {
    let Value::Object(mut original) = value else {
        return value;
    };

    let mut ordered = Map::new();
    for key in TOP_LEVEL_KEY_ORDER {
        if let Some(v) = original.shift_remove(*key) {
            ordered.insert((*key).to_string(), v);
        }
    }
    for (key, v) in original {
        ordered.insert(key, v);
    }
    Value::Object(ordered)
}
