//! census-kube: Kubernetes discovery for helm-census
//!
//! Two independent discovery paths run against a [`ClusterSource`]:
//! the Helm scanner reads Helm's own release Secrets, the ArgoCD reconciler
//! infers charts from labels on ArgoCD-managed Deployments.

pub mod client;
pub mod error;
pub mod reconciler;
pub mod scanner;
pub mod source;

#[cfg(any(test, feature = "test-util"))]
pub mod fake;

pub use client::{ClientMode, create_k8s_client};
pub use error::K8sError;
pub use reconciler::reconcile_argocd_releases;
pub use scanner::{DuplicatePolicy, scan_helm_releases};
pub use source::{ClusterSource, KubeSource, resolve_kube_version};
