//! Job configuration
//!
//! Built once at startup and passed to whatever needs it.

/// Environment variable overriding the reported cluster name
pub const CLUSTER_NAME_VAR: &str = "CLUSTER_NAME";
/// Environment variable holding the collection endpoint URL
pub const API_URL_VAR: &str = "API_URL";
/// Environment variable holding the collection endpoint token
pub const API_TOKEN_VAR: &str = "API_TOKEN";

/// Configuration for a single census run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CensusConfig {
    /// Name to report instead of the default identity
    pub cluster_name_override: Option<String>,
    /// Collection endpoint URL
    pub api_url: Option<String>,
    /// Token sent in the `x-api-token` header
    pub api_token: Option<String>,
}

impl CensusConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        Self {
            cluster_name_override: get(CLUSTER_NAME_VAR),
            api_url: get(API_URL_VAR),
            api_token: get(API_TOKEN_VAR),
        }
    }

    /// URL and token, if both are configured
    pub fn delivery_target(&self) -> Option<(&str, &str)> {
        match (&self.api_url, &self.api_token) {
            (Some(url), Some(token)) => Some((url.as_str(), token.as_str())),
            _ => None,
        }
    }
}
