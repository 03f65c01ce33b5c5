//! Snapshot delivery
//!
//! One `PUT` of the pretty-printed snapshot to `API_URL`, authenticated by
//! the `x-api-token` header. Delivery is best-effort: the outcome is logged
//! and returned, but never turned into an error for the caller.

use census_core::CensusConfig;
use reqwest::header::CONTENT_TYPE;

use crate::error::DeliveryError;

/// Header carrying the collection endpoint token
pub const API_TOKEN_HEADER: &str = "x-api-token";

/// Result of a delivery attempt
#[derive(Debug)]
pub enum DeliveryOutcome {
    /// URL or token not configured, nothing was sent
    Skipped,
    /// Endpoint accepted the snapshot
    Delivered { status: u16 },
    /// Request failed or was rejected
    Failed(DeliveryError),
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered { .. })
    }
}

/// Send the serialized snapshot to the configured endpoint
pub async fn deliver_snapshot(config: &CensusConfig, body: &str) -> DeliveryOutcome {
    let Some((url, token)) = config.delivery_target() else {
        tracing::info!("API_URL or API_TOKEN not set, skipping API request");
        return DeliveryOutcome::Skipped;
    };

    match send(url, token, body).await {
        Ok(status) => {
            tracing::info!("Successfully sent data to API (status {})", status);
            DeliveryOutcome::Delivered { status }
        }
        Err(e) => {
            tracing::error!("{}", e);
            DeliveryOutcome::Failed(e)
        }
    }
}

async fn send(url: &str, token: &str, body: &str) -> Result<u16, DeliveryError> {
    let client = reqwest::Client::builder().build()?;

    let resp = client
        .put(url)
        .header(CONTENT_TYPE, "application/json")
        .header(API_TOKEN_HEADER, token)
        .body(body.to_string())
        .send()
        .await?;

    let status = resp.status();
    if status.is_success() {
        Ok(status.as_u16())
    } else {
        Err(DeliveryError::Status(status.as_u16()))
    }
}
