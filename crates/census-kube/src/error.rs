//! Error types for census-kube

use thiserror::Error;

/// Error type for K8s operations
#[derive(Debug, Error)]
pub enum K8sError {
    #[error("Failed to load in-cluster config: {0}")]
    InClusterConfig(String),
    #[error("Failed to infer kubeconfig: {0}")]
    KubeconfigInfer(String),
    #[error("Failed to create K8s client: {0}")]
    ClientCreate(String),
    #[error("K8s API error: {0}")]
    ApiError(String),
}

impl From<kube::Error> for K8sError {
    fn from(e: kube::Error) -> Self {
        K8sError::ApiError(e.to_string())
    }
}
