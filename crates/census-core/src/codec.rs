//! Helm release record codec
//!
//! Helm stores each release revision in a Secret under the `release` key.
//! The value is base64 text wrapping a gzip stream wrapping a JSON document.
//! Only the handful of fields the report needs are modelled here; everything
//! else in the document is ignored.

use std::io::{Read, Write};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use flate2::{Compression, read::MultiGzDecoder, write::GzEncoder};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CodecError;

/// Release status Helm gives to the revision currently live in the cluster
pub const DEPLOYED_STATUS: &str = "deployed";

/// A decoded Helm release record
///
/// Decoding is lenient the way Helm's own Go types are: a `null` or missing
/// field reads as empty, and a revision that isn't a number reads as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelmRelease {
    /// Release name
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Namespace the release was installed into
    #[serde(deserialize_with = "null_as_default")]
    pub namespace: String,
    /// Release revision, incremented on every upgrade or rollback
    #[serde(deserialize_with = "lenient_revision")]
    pub version: Option<u64>,
    #[serde(deserialize_with = "null_as_default")]
    pub chart: ReleaseChart,
    #[serde(deserialize_with = "null_as_default")]
    pub info: ReleaseInfo,
}

/// Chart section of a release record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseChart {
    #[serde(deserialize_with = "null_as_default")]
    pub metadata: ChartMetadata,
}

/// Chart.yaml metadata embedded in the release
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartMetadata {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub version: String,
}

/// Info section of a release record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseInfo {
    /// Status string (deployed, superseded, failed, pending-upgrade, ...)
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_revision<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(serde_json::Value::deserialize(deserializer)?.as_u64())
}

impl HelmRelease {
    /// Whether this revision is the live one (status compared case-insensitively)
    pub fn is_deployed(&self) -> bool {
        self.info.status.eq_ignore_ascii_case(DEPLOYED_STATUS)
    }

    pub fn chart_name(&self) -> &str {
        &self.chart.metadata.name
    }

    pub fn chart_version(&self) -> &str {
        &self.chart.metadata.version
    }
}

/// Decode a stored release value: base64, then gzip, then JSON
pub fn decode_release(raw: &[u8]) -> Result<HelmRelease, CodecError> {
    let compressed = STANDARD.decode(raw)?;

    let mut decoder = MultiGzDecoder::new(compressed.as_slice());
    let mut json = Vec::new();
    decoder.read_to_end(&mut json)?;

    Ok(serde_json::from_slice(&json)?)
}

/// Encode a release the way Helm stores it
pub fn encode_release(release: &HelmRelease) -> Result<String, CodecError> {
    let json = serde_json::to_vec(release)?;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json)?;
    let compressed = encoder.finish()?;

    Ok(STANDARD.encode(compressed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release(name: &str, version: &str, status: &str) -> HelmRelease {
        HelmRelease {
            name: format!("{}-release", name),
            namespace: "default".to_string(),
            version: Some(1),
            chart: ReleaseChart {
                metadata: ChartMetadata {
                    name: name.to_string(),
                    version: version.to_string(),
                },
            },
            info: ReleaseInfo {
                status: status.to_string(),
            },
        }
    }

    fn gzip_base64(bytes: &[u8]) -> String {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(bytes).unwrap();
        STANDARD.encode(encoder.finish().unwrap())
    }

    #[test]
    fn test_round_trip_recovers_chart_and_status() {
        let original = release("cert-manager", "v1.14.4", "deployed");
        let encoded = encode_release(&original).unwrap();

        let decoded = decode_release(encoded.as_bytes()).unwrap();
        assert_eq!(decoded.chart_name(), "cert-manager");
        assert_eq!(decoded.chart_version(), "v1.14.4");
        assert_eq!(decoded.info.status, "deployed");
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_decode_real_helm_shape() {
        // Trimmed release document as written by Helm 3
        let json = r#"{
            "name": "ingress",
            "namespace": "ingress-nginx",
            "version": 4,
            "info": {
                "first_deployed": "2024-03-01T10:00:00Z",
                "status": "deployed",
                "description": "Upgrade complete"
            },
            "chart": {
                "metadata": {
                    "name": "ingress-nginx",
                    "version": "4.10.0",
                    "appVersion": "1.10.0",
                    "apiVersion": "v2"
                },
                "templates": []
            },
            "manifest": "---\n"
        }"#;

        let decoded = decode_release(gzip_base64(json.as_bytes()).as_bytes()).unwrap();
        assert_eq!(decoded.name, "ingress");
        assert_eq!(decoded.version, Some(4));
        assert_eq!(decoded.chart_name(), "ingress-nginx");
        assert_eq!(decoded.chart_version(), "4.10.0");
        assert!(decoded.is_deployed());
    }

    #[test]
    fn test_status_filter_ignores_case() {
        for status in ["deployed", "DEPLOYED", "Deployed", "dEpLoYeD"] {
            assert!(release("a", "1", status).is_deployed(), "{}", status);
        }
        for status in ["superseded", "failed", "pending-upgrade", "uninstalled", ""] {
            assert!(!release("a", "1", status).is_deployed(), "{}", status);
        }
    }

    #[test]
    fn test_bad_base64_fails_at_base64_stage() {
        let err = decode_release(b"not base64!!").unwrap_err();
        assert_eq!(err.stage(), "base64");
    }

    #[test]
    fn test_plain_json_fails_at_gzip_stage() {
        let raw = STANDARD.encode(br#"{"info":{"status":"deployed"}}"#);
        let err = decode_release(raw.as_bytes()).unwrap_err();
        assert_eq!(err.stage(), "gzip");
    }

    #[test]
    fn test_garbage_json_fails_at_json_stage() {
        let raw = gzip_base64(b"{ this is not json");
        let err = decode_release(raw.as_bytes()).unwrap_err();
        assert_eq!(err.stage(), "json");
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let decoded = decode_release(gzip_base64(b"{}").as_bytes()).unwrap();
        assert_eq!(decoded.chart_name(), "");
        assert!(!decoded.is_deployed());
    }

    #[test]
    fn test_null_fields_read_as_empty() {
        let json = br#"{"chart":{"metadata":{"name":"x","version":null}},"info":{"status":"deployed"}}"#;
        let decoded = decode_release(gzip_base64(json).as_bytes()).unwrap();
        assert_eq!(decoded.chart_name(), "x");
        assert_eq!(decoded.chart_version(), "");
        assert!(decoded.is_deployed());

        let json = br#"{"name":null,"chart":null,"info":{"status":null}}"#;
        let decoded = decode_release(gzip_base64(json).as_bytes()).unwrap();
        assert_eq!(decoded.chart_name(), "");
        assert!(!decoded.is_deployed());
    }

    #[test]
    fn test_non_numeric_revision_is_none() {
        let json = br#"{"version":"3","chart":{"metadata":{"name":"x","version":"1"}},"info":{"status":"deployed"}}"#;
        let decoded = decode_release(gzip_base64(json).as_bytes()).unwrap();
        assert_eq!(decoded.version, None);
        assert_eq!(decoded.chart_version(), "1");
        assert!(decoded.is_deployed());

        let json = br#"{"version":null,"info":{"status":"deployed"}}"#;
        let decoded = decode_release(gzip_base64(json).as_bytes()).unwrap();
        assert_eq!(decoded.version, None);
    }

    #[test]
    fn test_concatenated_gzip_members_are_read() {
        let mut first = GzEncoder::new(Vec::new(), Compression::default());
        first.write_all(br#"{"chart":{"metadata":{"name":"x","#).unwrap();
        let mut stream = first.finish().unwrap();

        let mut second = GzEncoder::new(Vec::new(), Compression::default());
        second
            .write_all(br#""version":"2.0.0"}},"info":{"status":"deployed"}}"#)
            .unwrap();
        stream.extend(second.finish().unwrap());

        let decoded = decode_release(STANDARD.encode(stream).as_bytes()).unwrap();
        assert_eq!(decoded.chart_version(), "2.0.0");
    }
}
