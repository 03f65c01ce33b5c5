//! Access to the cluster resources the census reads
//!
//! [`ClusterSource`] is the seam between the discovery logic and the API
//! server. [`KubeSource`] is the real implementation; tests use the
//! in-memory one from the `fake` module.

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Namespace, Secret};
use kube::{
    Client,
    api::{Api, ListParams},
};

use crate::error::K8sError;

/// Label selector Helm puts on its release Secrets
pub const HELM_OWNER_SELECTOR: &str = "owner=helm";
/// Label key ArgoCD puts on every resource it manages
pub const ARGOCD_INSTANCE_LABEL: &str = "argocd.argoproj.io/instance";

/// Read-only view of the cluster used by the discovery paths
#[allow(async_fn_in_trait)]
pub trait ClusterSource {
    /// Names of all namespaces, in API order
    async fn list_namespaces(&self) -> Result<Vec<String>, K8sError>;

    /// Secrets in `namespace` labelled [`HELM_OWNER_SELECTOR`]
    async fn list_helm_secrets(&self, namespace: &str) -> Result<Vec<Secret>, K8sError>;

    /// Deployments in all namespaces carrying [`ARGOCD_INSTANCE_LABEL`]
    async fn list_argocd_deployments(&self) -> Result<Vec<Deployment>, K8sError>;

    /// API server `gitVersion`
    async fn server_version(&self) -> Result<String, K8sError>;
}

/// [`ClusterSource`] backed by a live API server
#[derive(Clone)]
pub struct KubeSource {
    client: Client,
}

impl KubeSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ClusterSource for KubeSource {
    async fn list_namespaces(&self) -> Result<Vec<String>, K8sError> {
        let namespaces: Api<Namespace> = Api::all(self.client.clone());
        let list = namespaces.list(&ListParams::default()).await?;

        tracing::debug!("Discovered {} namespace(s)", list.items.len());

        Ok(list
            .items
            .into_iter()
            .filter_map(|ns| ns.metadata.name)
            .collect())
    }

    async fn list_helm_secrets(&self, namespace: &str) -> Result<Vec<Secret>, K8sError> {
        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        let list = secrets
            .list(&ListParams::default().labels(HELM_OWNER_SELECTOR))
            .await?;
        Ok(list.items)
    }

    async fn list_argocd_deployments(&self) -> Result<Vec<Deployment>, K8sError> {
        let deployments: Api<Deployment> = Api::all(self.client.clone());
        let list = deployments
            .list(&ListParams::default().labels(ARGOCD_INSTANCE_LABEL))
            .await?;
        Ok(list.items)
    }

    async fn server_version(&self) -> Result<String, K8sError> {
        let info = self.client.apiserver_version().await?;
        Ok(info.git_version)
    }
}

/// Query the API server version, logging and returning `None` on failure
pub async fn resolve_kube_version<S: ClusterSource>(source: &S) -> Option<String> {
    match source.server_version().await {
        Ok(version) => Some(version),
        Err(e) => {
            tracing::warn!("Failed to get Kubernetes version: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeSource;

    #[tokio::test]
    async fn test_resolve_version() {
        let source = FakeSource::new().with_version("v1.31.2");
        assert_eq!(resolve_kube_version(&source).await.as_deref(), Some("v1.31.2"));
    }

    #[tokio::test]
    async fn test_resolve_version_failure_is_none() {
        let source = FakeSource::new();
        assert_eq!(resolve_kube_version(&source).await, None);
    }
}
