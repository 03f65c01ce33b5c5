//! census-agent: Runs a census and delivers the result
//!
//! [`run`] drives both discovery paths against a cluster and assembles the
//! snapshot; [`deliver_snapshot`] hands it to the collection endpoint.

pub mod delivery;
pub mod error;
pub mod run;

pub use delivery::{DeliveryOutcome, deliver_snapshot};
pub use error::DeliveryError;
pub use run::{RunOptions, run};

/// Install the ring crypto provider for rustls.
///
/// The Kubernetes and HTTP clients share one process-wide provider; this
/// must happen before either builds a TLS config. Calling it twice is fine.
pub fn install_crypto_provider() {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        tracing::debug!("rustls crypto provider already installed");
    }
}
