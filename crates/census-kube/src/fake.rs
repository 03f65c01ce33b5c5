//! In-memory [`ClusterSource`] and fixture builders for tests

use std::collections::{BTreeMap, HashMap};

use census_core::codec::{ChartMetadata, HelmRelease, ReleaseChart, ReleaseInfo, encode_release};
use k8s_openapi::ByteString;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use crate::error::K8sError;
use crate::scanner::RELEASE_DATA_KEY;
use crate::source::{ARGOCD_INSTANCE_LABEL, ClusterSource};

/// Canned cluster contents. Anything not configured behaves as an API error,
/// except Secret listings, which default to empty.
#[derive(Debug, Default)]
pub struct FakeSource {
    namespaces: Option<Vec<String>>,
    secrets: HashMap<String, Vec<Secret>>,
    failing_namespaces: Vec<String>,
    deployments: Option<Vec<Deployment>>,
    version: Option<String>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespaces(mut self, names: &[&str]) -> Self {
        self.namespaces = Some(names.iter().map(|n| n.to_string()).collect());
        self
    }

    pub fn with_secret(mut self, secret: Secret) -> Self {
        let ns = secret.metadata.namespace.clone().unwrap_or_default();
        self.secrets.entry(ns).or_default().push(secret);
        self
    }

    /// Make Secret listing fail for `namespace`
    pub fn with_failing_namespace(mut self, namespace: &str) -> Self {
        self.failing_namespaces.push(namespace.to_string());
        self
    }

    pub fn with_deployments(mut self, deployments: Vec<Deployment>) -> Self {
        self.deployments = Some(deployments);
        self
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }
}

impl ClusterSource for FakeSource {
    async fn list_namespaces(&self) -> Result<Vec<String>, K8sError> {
        self.namespaces
            .clone()
            .ok_or_else(|| K8sError::ApiError("namespaces is forbidden".to_string()))
    }

    async fn list_helm_secrets(&self, namespace: &str) -> Result<Vec<Secret>, K8sError> {
        if self.failing_namespaces.iter().any(|n| n == namespace) {
            return Err(K8sError::ApiError(format!(
                "secrets is forbidden in namespace {}",
                namespace
            )));
        }
        Ok(self.secrets.get(namespace).cloned().unwrap_or_default())
    }

    async fn list_argocd_deployments(&self) -> Result<Vec<Deployment>, K8sError> {
        self.deployments
            .clone()
            .ok_or_else(|| K8sError::ApiError("deployments.apps is forbidden".to_string()))
    }

    async fn server_version(&self) -> Result<String, K8sError> {
        self.version
            .clone()
            .ok_or_else(|| K8sError::ApiError("connection refused".to_string()))
    }
}

/// Release record as Helm would write it
pub fn release(chart: &str, version: &str, status: &str, revision: u32) -> HelmRelease {
    HelmRelease {
        name: chart.to_string(),
        namespace: String::new(),
        version: Some(u64::from(revision)),
        chart: ReleaseChart {
            metadata: ChartMetadata {
                name: chart.to_string(),
                version: version.to_string(),
            },
        },
        info: ReleaseInfo {
            status: status.to_string(),
        },
    }
}

/// Helm-owned Secret with arbitrary data entries
pub fn helm_secret(name: &str, namespace: &str, data: &[(&str, &str)]) -> Secret {
    let labels = BTreeMap::from([("owner".to_string(), "helm".to_string())]);
    let data = data
        .iter()
        .map(|(k, v)| (k.to_string(), ByteString(v.as_bytes().to_vec())))
        .collect();

    Secret {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            labels: Some(labels),
            ..Default::default()
        },
        data: Some(data),
        type_: Some("helm.sh/release.v1".to_string()),
        ..Default::default()
    }
}

/// Helm-owned Secret holding an encoded release under the `release` key
pub fn release_secret(namespace: &str, release: &HelmRelease) -> Secret {
    let name = format!(
        "sh.helm.release.v1.{}.v{}",
        release.name,
        release.version.unwrap_or(0)
    );
    let payload = encode_release(release).unwrap_or_default();
    helm_secret(&name, namespace, &[(RELEASE_DATA_KEY, payload.as_str())])
}

/// ArgoCD-managed Deployment with the given extra labels
pub fn argocd_deployment(name: &str, namespace: &str, labels: &[(&str, &str)]) -> Deployment {
    let mut all_labels = BTreeMap::from([(ARGOCD_INSTANCE_LABEL.to_string(), name.to_string())]);
    for (k, v) in labels {
        all_labels.insert(k.to_string(), v.to_string());
    }

    Deployment {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            labels: Some(all_labels),
            ..Default::default()
        },
        ..Default::default()
    }
}
