//! Kubernetes client construction
//!
//! The job normally runs as a pod and authenticates with its service
//! account. Local runs can opt into the usual kubeconfig inference.

use kube::{Client, Config};

use crate::error::K8sError;

/// Where the client takes its credentials from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClientMode {
    /// Service account token and CA mounted into the pod
    #[default]
    InCluster,
    /// `$KUBECONFIG` / `~/.kube/config`, falling back to in-cluster
    Kubeconfig,
}

/// Create a Kubernetes client
pub async fn create_k8s_client(mode: ClientMode) -> Result<Client, K8sError> {
    let config = match mode {
        ClientMode::InCluster => {
            Config::incluster().map_err(|e| K8sError::InClusterConfig(e.to_string()))?
        }
        ClientMode::Kubeconfig => Config::infer()
            .await
            .map_err(|e| K8sError::KubeconfigInfer(e.to_string()))?,
    };

    tracing::debug!("Connecting to K8s API at {}", config.cluster_url);

    Client::try_from(config).map_err(|e| K8sError::ClientCreate(e.to_string()))
}
