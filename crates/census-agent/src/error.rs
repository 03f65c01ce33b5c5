//! Error types for census-agent

use thiserror::Error;

/// Errors that can occur when sending the snapshot
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// Request could not be built or sent
    #[error("Failed to send data to API: {0}")]
    Transport(#[from] reqwest::Error),

    /// Endpoint answered outside 2xx
    #[error("API request failed with status: {0}")]
    Status(u16),
}
