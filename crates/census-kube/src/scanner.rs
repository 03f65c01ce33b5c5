//! Helm release discovery
//!
//! Helm 3 keeps one Secret per release revision, labelled `owner=helm`,
//! with the encoded release under the `release` data key. Only revisions
//! whose status is `deployed` are reported.

use std::collections::HashMap;

use census_core::{ChartRecord, decode_release};
use k8s_openapi::api::core::v1::Secret;

use crate::error::K8sError;
use crate::source::ClusterSource;

/// Data key holding the encoded release inside a Helm Secret
pub const RELEASE_DATA_KEY: &str = "release";

/// What to do when several deployed revisions of one chart are found
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Report one record per matching Secret
    #[default]
    KeepAll,
    /// Report only the highest revision per (namespace, chart name)
    LatestRevision,
}

/// A deployed release found in a Secret
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedRelease {
    pub record: ChartRecord,
    /// Helm revision number embedded in the release, 0 when absent
    pub revision: u64,
}

/// Scan every namespace for deployed Helm releases.
///
/// Failing to list namespaces is an error. Failing to list Secrets in one
/// namespace, or to decode one Secret, only skips that namespace or Secret.
pub async fn scan_helm_releases<S: ClusterSource>(
    source: &S,
    policy: DuplicatePolicy,
) -> Result<Vec<ChartRecord>, K8sError> {
    let namespaces = source.list_namespaces().await?;

    let mut found = Vec::new();
    for namespace in &namespaces {
        let secrets = match source.list_helm_secrets(namespace).await {
            Ok(secrets) => secrets,
            Err(e) => {
                tracing::warn!("Failed to get secrets in namespace {}: {}", namespace, e);
                continue;
            }
        };

        found.extend(
            secrets
                .iter()
                .filter_map(|secret| release_from_secret(namespace, secret)),
        );
    }

    if policy == DuplicatePolicy::LatestRevision {
        found = keep_latest_revisions(found);
    }

    tracing::info!(
        "Found {} deployed Helm release(s) across {} namespace(s)",
        found.len(),
        namespaces.len()
    );

    Ok(found.into_iter().map(|r| r.record).collect())
}

/// Decode one Helm Secret into a deployed release, if it holds one
pub fn release_from_secret(namespace: &str, secret: &Secret) -> Option<ScannedRelease> {
    let secret_name = secret.metadata.name.as_deref().unwrap_or("<unnamed>");

    let Some(raw) = secret
        .data
        .as_ref()
        .and_then(|data| data.get(RELEASE_DATA_KEY))
    else {
        tracing::debug!("Secret {}/{} has no release data", namespace, secret_name);
        return None;
    };

    let release = match decode_release(&raw.0) {
        Ok(release) => release,
        Err(e) => {
            tracing::warn!(
                stage = e.stage(),
                "Failed to decode release in secret {}/{}: {}",
                namespace,
                secret_name,
                e
            );
            return None;
        }
    };

    if !release.is_deployed() {
        tracing::debug!(
            "Skipping {}/{}: status {}",
            namespace,
            secret_name,
            release.info.status
        );
        return None;
    }

    let Some(record) = ChartRecord::new(release.chart_name(), release.chart_version(), namespace)
    else {
        tracing::debug!("Skipping {}/{}: release has no chart name", namespace, secret_name);
        return None;
    };

    tracing::debug!("Found Helm release {}", record);

    Some(ScannedRelease {
        record,
        revision: release.version.unwrap_or(0),
    })
}

/// Keep the highest revision per (namespace, chart name), at the position
/// where that chart was first seen
fn keep_latest_revisions(found: Vec<ScannedRelease>) -> Vec<ScannedRelease> {
    let mut kept: Vec<ScannedRelease> = Vec::with_capacity(found.len());
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for release in found {
        let key = (release.record.namespace.clone(), release.record.name.clone());
        match index.get(&key) {
            Some(&i) => {
                if release.revision > kept[i].revision {
                    kept[i] = release;
                }
            }
            None => {
                index.insert(key, kept.len());
                kept.push(release);
            }
        }
    }

    kept
}
