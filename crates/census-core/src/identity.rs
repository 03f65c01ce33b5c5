//! Cluster identity attached to every snapshot

use uuid::Uuid;

use crate::config::CensusConfig;

/// Cluster name reported when `CLUSTER_NAME` is not set
pub const DEFAULT_CLUSTER_NAME: &str = "unknown-cluster";
/// Kubernetes version reported when the API server can't be queried
pub const UNKNOWN_KUBE_VERSION: &str = "unknown-version";

/// Identity fields resolved once per run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterIdentity {
    pub cluster_id: String,
    pub cluster_name: String,
    pub kube_version: String,
}

impl ClusterIdentity {
    /// Build the identity for a cluster name, deriving its id.
    ///
    /// `kube_version` of `None` yields [`UNKNOWN_KUBE_VERSION`].
    pub fn new(cluster_name: impl Into<String>, kube_version: Option<String>) -> Self {
        let cluster_name = cluster_name.into();
        Self {
            cluster_id: cluster_id(&cluster_name),
            cluster_name,
            kube_version: kube_version.unwrap_or_else(|| UNKNOWN_KUBE_VERSION.to_string()),
        }
    }
}

/// Cluster name from configuration, or [`DEFAULT_CLUSTER_NAME`]
pub fn resolve_cluster_name(config: &CensusConfig) -> String {
    config
        .cluster_name_override
        .clone()
        .unwrap_or_else(|| DEFAULT_CLUSTER_NAME.to_string())
}

/// Stable id for a cluster name: UUID v5 in the DNS namespace
pub fn cluster_id(cluster_name: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_DNS, cluster_name.as_bytes()).to_string()
}
