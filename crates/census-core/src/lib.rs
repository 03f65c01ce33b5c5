//! census-core: Core domain logic for helm-census
//!
//! Holds the report types, the Helm release record codec and the pieces
//! that turn discovered charts into a cluster snapshot. Nothing in here
//! talks to Kubernetes or the network.

pub mod assembler;
pub mod codec;
pub mod config;
pub mod error;
pub mod identity;
pub mod labels;
pub mod types;

pub use assembler::assemble;
pub use codec::{HelmRelease, decode_release, encode_release};
pub use config::CensusConfig;
pub use error::CodecError;
pub use identity::ClusterIdentity;
pub use types::{ChartRecord, ClusterSnapshot, UNKNOWN_VERSION};
