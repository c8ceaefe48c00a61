//! Snapshot error types.

use thiserror::Error;

/// Why a snapshot could not be written, read or restored.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckpointError {
    #[error("Could not encode snapshot: {0}")]
    SerializationFailed(String),

    #[error("Could not decode snapshot: {0}")]
    DeserializationFailed(String),

    #[error("Snapshot format {found} is not supported (expected {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The snapshot was taken under a catalog with another name.
    #[error("Snapshot belongs to catalog '{found}', policy uses '{expected}'")]
    CatalogMismatch { expected: String, found: String },

    #[error("Snapshot references code '{code}' missing from catalog '{catalog}'")]
    UnknownCode { catalog: String, code: String },

    /// A logged step is not a declared rule of the policy.
    #[error("Logged step {index} from '{from}' to '{to}' is not a declared rule")]
    IllegalStep {
        index: usize,
        from: String,
        to: String,
    },

    /// A logged step does not start where the previous one ended.
    #[error("Logged step {index} starts at '{found}' but the previous step ended at '{expected}'")]
    BrokenChain {
        index: usize,
        expected: String,
        found: String,
    },

    #[error("Log ends at '{logged}' but the snapshot's current code is '{current}'")]
    CurrentMismatch { logged: String, current: String },
}
