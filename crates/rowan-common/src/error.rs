//! Error types for RowanDB.

use thiserror::Error;

/// Result type alias using RowanError.
pub type Result<T> = std::result::Result<T, RowanError>;

/// Errors that can occur in RowanDB operations.
///
/// Lookups that miss are not errors. They surface as `None`, `false`, or an
/// empty result set.
#[derive(Debug, Error)]
pub enum RowanError {
    // Index errors
    #[error("Duplicate key: {key}")]
    DuplicateKey { key: i64 },

    // Heap errors
    #[error("RID {rid} out of bounds (heap holds {len} records)")]
    RidOutOfBounds { rid: u64, len: usize },

    #[error("Storage corrupted: {0}")]
    Corrupted(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid parameter: {name} = {value}")]
    InvalidParameter { name: String, value: String },
}

impl RowanError {
    /// Returns true if this error reports a broken engine invariant rather
    /// than a rejected caller request.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            RowanError::RidOutOfBounds { .. } | RowanError::Corrupted(_)
        )
    }
}
