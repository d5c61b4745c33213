//! The encrypted access database.
//!
//! A single JSON mapping from item key to access password, sealed under the
//! master password and stored as one object at a reserved key. The reserved
//! key contains a `.`, which the item-key character class forbids, so it
//! can never collide with a user item.
//!
//! The database is absent until the first put; a store not-found on read is
//! treated as an empty mapping, not an error. Every update rewrites the
//! whole object.

use std::collections::BTreeMap;

use crate::envelope::Cipher;
use crate::error::{KeepError, Result};
use crate::password::Password;
use crate::store::{BlobStore, StoreError};

/// Reserved store key for the access database.
pub const DATABASE_KEY: &str = "internal.databass";

/// The key -> access-password mapping.
pub type AccessDatabase = BTreeMap<String, String>;

/// Fetch and decrypt the database, bootstrapping an empty mapping when the
/// store has no database object yet.
pub fn fetch<S: BlobStore>(store: &S, cipher: &Cipher, password: &Password) -> Result<AccessDatabase> {
    let envelope = match store.get(DATABASE_KEY) {
        Ok(envelope) => envelope,
        Err(StoreError::NotFound) => return Ok(AccessDatabase::new()),
        Err(StoreError::Unavailable(msg)) => return Err(KeepError::StoreUnavailable(msg)),
    };

    let plaintext = cipher.decrypt(password.expose(), DATABASE_KEY.as_bytes(), &envelope)?;
    let database = serde_json::from_slice(&plaintext)?;
    Ok(database)
}

/// Encrypt and store the database, fully overwriting the previous version.
pub fn persist<S: BlobStore>(
    store: &S,
    cipher: &Cipher,
    password: &Password,
    database: &AccessDatabase,
) -> Result<()> {
    let plaintext = serde_json::to_vec(database)?;
    let envelope = cipher.encrypt(password.expose(), DATABASE_KEY.as_bytes(), &plaintext)?;
    store.put(DATABASE_KEY, &envelope).map_err(|e| match e {
        StoreError::NotFound => KeepError::StoreUnavailable("store rejected write".to_string()),
        StoreError::Unavailable(msg) => KeepError::StoreUnavailable(msg),
    })
}
