//! ArgoCD chart discovery
//!
//! ArgoCD renders charts itself and applies the manifests directly, so no
//! Helm release Secret exists. Each ArgoCD-managed Deployment is reported
//! as a chart named after the Deployment, with the version taken from its
//! chart label when there is one.

use census_core::ChartRecord;
use census_core::labels::infer_chart_version;
use k8s_openapi::api::apps::v1::Deployment;

use crate::source::ClusterSource;

/// List ArgoCD-managed Deployments and turn each into a chart record.
///
/// A listing failure is logged and yields no records.
pub async fn reconcile_argocd_releases<S: ClusterSource>(source: &S) -> Vec<ChartRecord> {
    let deployments = match source.list_argocd_deployments().await {
        Ok(deployments) => deployments,
        Err(e) => {
            tracing::warn!("Failed to get ArgoCD-managed deployments: {}", e);
            return Vec::new();
        }
    };

    let records: Vec<ChartRecord> = deployments.iter().filter_map(record_from_deployment).collect();

    tracing::info!("Found {} ArgoCD-managed deployment(s)", records.len());

    records
}

/// Chart record for one Deployment; `None` if it lacks a name or namespace
pub fn record_from_deployment(deployment: &Deployment) -> Option<ChartRecord> {
    let meta = &deployment.metadata;
    let labels = meta.labels.clone().unwrap_or_default();
    let version = infer_chart_version(&labels);

    let record = ChartRecord::new(
        meta.name.clone().unwrap_or_default(),
        version,
        meta.namespace.clone().unwrap_or_default(),
    );

    match &record {
        Some(record) => tracing::debug!("Found ArgoCD deployment {}", record),
        None => tracing::debug!("Skipping deployment without name or namespace"),
    }

    record
}
