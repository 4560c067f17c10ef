use crate::shared::Result;
use anyhow::Context;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Canonical, timestamp-free fingerprint of a manifest.
///
/// Consists of the sorted `(name, version)` component pairs, the metadata
/// properties sorted by name, and the build-information rows when present.
/// Serial number and timestamps never participate, so two runs over the same
/// inputs produce equal signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    components: Vec<(String, String)>,
    properties: Vec<(String, String)>,
    build_info: Option<Vec<(String, String)>>,
}

impl Signature {
    /// Computes the signature of a parsed manifest document.
    ///
    /// Missing or non-string names and versions are read as empty strings; an
    /// empty build-info map is treated the same as no build info.
    pub fn from_manifest(
        manifest: &Value,
        build_info: Option<&BTreeMap<String, String>>,
    ) -> Self {
        let mut components: Vec<(String, String)> = manifest
            .get("components")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .map(|c| (string_field(c, "name"), string_field(c, "version")))
                    .collect()
            })
            .unwrap_or_default();
        components.sort();

        // Later duplicates of a property name win, matching a map rebuild
        let properties: BTreeMap<String, String> = manifest
            .pointer("/metadata/properties")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .map(|p| (string_field(p, "name"), string_field(p, "value")))
                    .collect()
            })
            .unwrap_or_default();

        let build_info = build_info
            .filter(|b| !b.is_empty())
            .map(|b| b.iter().map(|(k, v)| (k.clone(), v.clone())).collect());

        Self {
            components,
            properties: properties.into_iter().collect(),
            build_info,
        }
    }

    /// Parses `manifest_json` and computes its signature.
    pub fn from_manifest_str(
        manifest_json: &str,
        build_info: Option<&BTreeMap<String, String>>,
    ) -> Result<Self> {
        let manifest: Value =
            serde_json::from_str(manifest_json).context("Manifest is not valid JSON")?;
        Ok(Self::from_manifest(&manifest, build_info))
    }

    /// Hex-encoded SHA-256 over a line-oriented canonical encoding.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        for (name, version) in &self.components {
            hasher.update(format!("component\t{}\t{}\n", name, version));
        }
        for (name, value) in &self.properties {
            hasher.update(format!("property\t{}\t{}\n", name, value));
        }
        if let Some(rows) = &self.build_info {
            for (key, value) in rows {
                hasher.update(format!("build\t{}\t{}\n", key, value));
            }
        }
        hex::encode(hasher.finalize())
    }
}

fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manifest(timestamp: &str, components: Value) -> Value {
        json!({
            "bomFormat": "CycloneDX",
            "serialNumber": format!("urn:uuid:{}", timestamp),
            "metadata": {
                "timestamp": timestamp,
                "properties": [
                    {"name": "project", "value": "AnalysisBase"},
                    {"name": "generator", "value": "sbom-ledger"}
                ]
            },
            "components": components
        })
    }

    #[test]
    fn test_signature_ignores_component_order() {
        let a = manifest(
            "2024-01-01T00:00:00Z",
            json!([{"name": "ROOT", "version": "6.30.06"}, {"name": "Boost", "version": "1.82.0"}]),
        );
        let b = manifest(
            "2024-01-01T00:00:00Z",
            json!([{"name": "Boost", "version": "1.82.0"}, {"name": "ROOT", "version": "6.30.06"}]),
        );
        assert_eq!(
            Signature::from_manifest(&a, None),
            Signature::from_manifest(&b, None)
        );
    }

    #[test]
    fn test_signature_ignores_timestamp_and_serial() {
        let components = json!([{"name": "numpy", "version": "1.26.4"}]);
        let a = manifest("2024-01-01T00:00:00Z", components.clone());
        let b = manifest("2025-06-30T12:34:56Z", components);

        let sig_a = Signature::from_manifest(&a, None);
        let sig_b = Signature::from_manifest(&b, None);
        assert_eq!(sig_a, sig_b);
        assert_eq!(sig_a.digest(), sig_b.digest());
    }

    #[test]
    fn test_signature_detects_version_change() {
        let a = manifest("t", json!([{"name": "numpy", "version": "1.26.4"}]));
        let b = manifest("t", json!([{"name": "numpy", "version": "2.0.0"}]));
        assert_ne!(
            Signature::from_manifest(&a, None).digest(),
            Signature::from_manifest(&b, None).digest()
        );
    }

    #[test]
    fn test_signature_includes_build_info() {
        let doc = manifest("t", json!([]));
        let mut gcc13 = BTreeMap::new();
        gcc13.insert("C Compiler".to_string(), "GNU 13.1.0".to_string());
        let mut gcc14 = BTreeMap::new();
        gcc14.insert("C Compiler".to_string(), "GNU 14.2.0".to_string());

        assert_ne!(
            Signature::from_manifest(&doc, Some(&gcc13)),
            Signature::from_manifest(&doc, Some(&gcc14))
        );
    }

    #[test]
    fn test_empty_build_info_equals_none() {
        let doc = manifest("t", json!([{"name": "ROOT", "version": "6.30.06"}]));
        let empty = BTreeMap::new();
        assert_eq!(
            Signature::from_manifest(&doc, Some(&empty)),
            Signature::from_manifest(&doc, None)
        );
    }

    #[test]
    fn test_property_order_is_irrelevant() {
        let a = json!({"metadata": {"properties": [
            {"name": "b", "value": "2"}, {"name": "a", "value": "1"}
        ]}, "components": []});
        let b = json!({"metadata": {"properties": [
            {"name": "a", "value": "1"}, {"name": "b", "value": "2"}
        ]}, "components": []});
        assert_eq!(
            Signature::from_manifest(&a, None),
            Signature::from_manifest(&b, None)
        );
    }

    #[test]
    fn test_from_manifest_str_rejects_garbage() {
        assert!(Signature::from_manifest_str("not json", None).is_err());
    }

    #[test]
    fn test_digest_is_hex_sha256() {
        let digest = Signature::from_manifest(&json!({}), None).digest();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
