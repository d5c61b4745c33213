//! # Keep Core
//!
//! Core library for Keep - a small vault that stores individually encrypted
//! items in a remote blob store.
//!
//! Every item is sealed under its own generated access password, while a
//! single master password can recover any item through an encrypted
//! key-to-access-password database that lives alongside the items.
//!
//! ## Architecture
//!
//! - **envelope**: passphrase-based authenticated encryption (scrypt + AES-128-GCM)
//! - **password**: master/access password roles and access-password generation
//! - **store**: the blob-store trait and an in-memory implementation
//! - **database**: the encrypted key -> access-password mapping
//! - **vault**: orchestration of item storage, retrieval, and password resolution

pub mod database;
pub mod envelope;
pub mod error;
pub mod password;
pub mod store;
pub mod vault;

pub use envelope::Cipher;
pub use error::{KeepError, Result};
pub use password::{AccessPassword, Password};
pub use store::{BlobStore, MemoryStore, StoreError};
pub use vault::Vault;

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
