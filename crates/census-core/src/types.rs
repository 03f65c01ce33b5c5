//! Report types for helm-census
//!
//! Field names on the wire match what the collection endpoint expects,
//! which is why a few Rust names are renamed during serialization.

use serde::{Deserialize, Serialize};

/// Version reported when a chart's version cannot be determined
pub const UNKNOWN_VERSION: &str = "unknown";

/// One discovered chart deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartRecord {
    /// Chart name (Helm path) or deployment name (ArgoCD path)
    #[serde(rename = "chart_name")]
    pub name: String,
    pub version: String,
    pub namespace: String,
}

impl ChartRecord {
    /// Build a record, returning `None` when the name or namespace is empty.
    ///
    /// An empty version is replaced by [`UNKNOWN_VERSION`].
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Option<Self> {
        let name = name.into();
        let namespace = namespace.into();
        if name.is_empty() || namespace.is_empty() {
            return None;
        }

        let mut version = version.into();
        if version.is_empty() {
            version = UNKNOWN_VERSION.to_string();
        }

        Some(Self {
            name,
            version,
            namespace,
        })
    }
}

impl std::fmt::Display for ChartRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{} ({})", self.name, self.version, self.namespace)
    }
}

/// The report sent once per run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    pub cluster_id: String,
    pub cluster_name: String,
    pub kube_version: String,
    #[serde(rename = "helm_charts")]
    pub chart_records: Vec<ChartRecord>,
}

impl ClusterSnapshot {
    /// Serialize with two-space indentation
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_requires_name_and_namespace() {
        assert!(ChartRecord::new("", "1.0.0", "default").is_none());
        assert!(ChartRecord::new("nginx", "1.0.0", "").is_none());
        assert!(ChartRecord::new("nginx", "1.0.0", "default").is_some());
    }

    #[test]
    fn test_empty_version_becomes_unknown() {
        let record = ChartRecord::new("nginx", "", "web").unwrap();
        assert_eq!(record.version, UNKNOWN_VERSION);
    }

    #[test]
    fn test_record_display() {
        let record = ChartRecord::new("nginx", "15.0.0", "web").unwrap();
        assert_eq!(record.to_string(), "nginx@15.0.0 (web)");
    }

    #[test]
    fn test_snapshot_wire_field_names() {
        let snapshot = ClusterSnapshot {
            cluster_id: "id".to_string(),
            cluster_name: "prod".to_string(),
            kube_version: "v1.31.2".to_string(),
            chart_records: vec![ChartRecord::new("nginx", "15.0.0", "web").unwrap()],
        };

        let json = snapshot.to_pretty_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["cluster_id"], "id");
        assert_eq!(value["kube_version"], "v1.31.2");
        assert_eq!(value["helm_charts"][0]["chart_name"], "nginx");
        assert_eq!(value["helm_charts"][0]["version"], "15.0.0");
        assert_eq!(value["helm_charts"][0]["namespace"], "web");
        assert!(json.contains("\n  \"cluster_name\": \"prod\""));
    }
}
