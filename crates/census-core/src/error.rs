//! Error types for census-core

use thiserror::Error;

/// Errors that can occur while decoding a stored Helm release record
///
/// Each variant names the pipeline stage that failed.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The payload is not valid standard base64
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decoded bytes are not a valid gzip stream
    #[error("Gzip error: {0}")]
    Gzip(#[from] std::io::Error),

    /// The decompressed document is not a release
    #[error("Release JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CodecError {
    /// Short name of the failed stage, used as a log field
    pub fn stage(&self) -> &'static str {
        match self {
            CodecError::Base64(_) => "base64",
            CodecError::Gzip(_) => "gzip",
            CodecError::Json(_) => "json",
        }
    }
}
