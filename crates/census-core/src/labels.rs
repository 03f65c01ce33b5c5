//! Chart version inference from workload labels
//!
//! ArgoCD-applied charts leave no Helm release record behind, so the only
//! hint of the chart version is whatever chart label the templates put on
//! the workload (`helm.sh/chart`, `chart`, `chart-version`, ...).

use std::collections::BTreeMap;

use crate::types::UNKNOWN_VERSION;

/// Substring that marks a label key as carrying chart information
const CHART_KEY_MARKER: &str = "chart";

/// Return the value of the first label whose key contains "chart".
///
/// Keys are matched case-insensitively and visited in sorted order, so the
/// winner is deterministic when several keys match. Falls back to
/// [`UNKNOWN_VERSION`].
pub fn infer_chart_version(labels: &BTreeMap<String, String>) -> String {
    labels
        .iter()
        .find(|(key, _)| key.to_lowercase().contains(CHART_KEY_MARKER))
        .map(|(_, value)| value.clone())
        .unwrap_or_else(|| UNKNOWN_VERSION.to_string())
}
