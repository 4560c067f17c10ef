use chrono::{DateTime, SecondsFormat, Utc};

/// SbomMetadata value object representing manifest metadata
#[derive(Debug, Clone)]
pub struct SbomMetadata {
    generated_at: DateTime<Utc>,
    tool_name: String,
    tool_version: String,
    serial_number: String,
    properties: Vec<(String, String)>,
}

impl SbomMetadata {
    pub fn new(
        generated_at: DateTime<Utc>,
        tool_name: String,
        tool_version: String,
        serial_number: String,
    ) -> Self {
        Self {
            generated_at,
            tool_name,
            tool_version,
            serial_number,
            properties: Vec::new(),
        }
    }

    /// Attaches free-form `(name, value)` properties, kept in the given order.
    pub fn with_properties(mut self, properties: Vec<(String, String)>) -> Self {
        self.properties = properties;
        self
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// RFC 3339 timestamp for the manifest
    pub fn timestamp(&self) -> String {
        self.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    pub fn tool_version(&self) -> &str {
        &self.tool_version
    }

    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    pub fn properties(&self) -> &[(String, String)] {
        &self.properties
    }
}
