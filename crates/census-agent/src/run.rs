//! A single census run

use census_core::identity::{ClusterIdentity, resolve_cluster_name};
use census_core::{CensusConfig, ClusterSnapshot, assemble};
use census_kube::{
    ClusterSource, DuplicatePolicy, K8sError, reconcile_argocd_releases, resolve_kube_version,
    scan_helm_releases,
};

/// Knobs that change what a run reports
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub duplicate_policy: DuplicatePolicy,
}

/// Identify the cluster, run both discovery paths and assemble the snapshot.
///
/// Only a failure to list namespaces is returned as an error; everything
/// else degrades to missing records or sentinel values.
pub async fn run<S: ClusterSource>(
    source: &S,
    config: &CensusConfig,
    options: RunOptions,
) -> Result<ClusterSnapshot, K8sError> {
    let cluster_name = resolve_cluster_name(config);
    let kube_version = resolve_kube_version(source).await;
    let identity = ClusterIdentity::new(cluster_name, kube_version);

    tracing::info!("Cluster ID: {}", identity.cluster_id);
    tracing::info!("Cluster Name: {}", identity.cluster_name);
    tracing::info!("Kubernetes Version: {}", identity.kube_version);

    let helm_records = scan_helm_releases(source, options.duplicate_policy).await?;
    let argocd_records = reconcile_argocd_releases(source).await;

    Ok(assemble(identity, helm_records, argocd_records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use census_kube::fake::{FakeSource, argocd_deployment, release, release_secret};

    #[tokio::test]
    async fn test_identity_fields() {
        let source = FakeSource::new()
            .with_namespaces(&[])
            .with_deployments(Vec::new())
            .with_version("v1.30.4");
        let config = CensusConfig {
            cluster_name_override: Some("prod-eu-1".to_string()),
            ..Default::default()
        };

        let snapshot = run(&source, &config, RunOptions::default()).await.unwrap();
        assert_eq!(snapshot.cluster_name, "prod-eu-1");
        assert_eq!(snapshot.cluster_id, "4a4e4b41-88d7-5731-ba00-7bc9026521ab");
        assert_eq!(snapshot.kube_version, "v1.30.4");
        assert!(snapshot.chart_records.is_empty());
    }

    #[tokio::test]
    async fn test_degraded_sources_still_produce_snapshot() {
        // No version, no ArgoCD access
        let source = FakeSource::new()
            .with_namespaces(&["ns"])
            .with_secret(release_secret("ns", &release("app", "1.0.0", "deployed", 1)));

        let snapshot = run(&source, &CensusConfig::default(), RunOptions::default())
            .await
            .unwrap();
        assert_eq!(snapshot.cluster_name, "unknown-cluster");
        assert_eq!(snapshot.kube_version, "unknown-version");
        assert_eq!(snapshot.chart_records.len(), 1);
    }

    #[tokio::test]
    async fn test_namespace_failure_aborts_run() {
        let source = FakeSource::new()
            .with_deployments(vec![argocd_deployment("api", "apps", &[])])
            .with_version("v1.30.4");

        let result = run(&source, &CensusConfig::default(), RunOptions::default()).await;
        assert!(result.is_err());
    }
}
