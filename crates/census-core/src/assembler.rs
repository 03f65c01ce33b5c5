//! Snapshot assembly

use crate::identity::ClusterIdentity;
use crate::types::{ChartRecord, ClusterSnapshot};

/// Combine both discovery paths into the final snapshot.
///
/// Helm records come first, then ArgoCD records, each in the order they
/// were discovered. Nothing is deduplicated or sorted.
pub fn assemble(
    identity: ClusterIdentity,
    helm_records: Vec<ChartRecord>,
    argocd_records: Vec<ChartRecord>,
) -> ClusterSnapshot {
    let mut chart_records = helm_records;
    chart_records.extend(argocd_records);

    tracing::debug!("Assembled snapshot with {} chart records", chart_records.len());

    ClusterSnapshot {
        cluster_id: identity.cluster_id,
        cluster_name: identity.cluster_name,
        kube_version: identity.kube_version,
        chart_records,
    }
}
