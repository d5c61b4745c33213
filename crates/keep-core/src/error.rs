//! Error types for Keep core operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Errors are descriptive at the core level; the CLI layer will map these
//! to user-friendly messages.

use thiserror::Error;

/// Result type alias for Keep operations.
pub type Result<T> = std::result::Result<T, KeepError>;

/// Core error type for Keep operations.
#[derive(Debug, Error)]
pub enum KeepError {
    /// Item key fails character-class validation
    #[error("Invalid key '{0}': keys may only contain alphanumerics, '_', '-' and '/'")]
    InvalidKey(String),

    /// Operation requires the master password but got an access password
    #[error("The master password is required for this operation")]
    MasterPasswordRequired,

    /// A password value was rejected at construction
    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    /// Item absent from the store or from the access database
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Stored payload is too short to contain salt, nonce and tag
    #[error("Malformed envelope: payload is shorter than the minimum salt, nonce and tag length")]
    MalformedEnvelope,

    /// AEAD tag check failed. Wrong password and tampered data are
    /// intentionally indistinguishable.
    #[error("Decryption failed: wrong password or corrupted data")]
    AuthenticationFailure,

    /// Blob store I/O error other than not-found
    #[error("Store error: {0}")]
    StoreUnavailable(String),

    /// Key derivation or cipher setup error
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// The item was stored and is reachable via the returned access
    /// password, but registering it in the access database failed, so the
    /// master password cannot resolve it.
    #[error(
        "Item stored (access password {access_password}), but updating the access database failed: {source}"
    )]
    DatabaseUpdateFailed {
        access_password: String,
        source: Box<KeepError>,
    },
}
