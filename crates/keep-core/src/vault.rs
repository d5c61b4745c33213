//! Vault orchestration.
//!
//! A [`Vault`] ties a blob store and a cipher together and implements the
//! access-control scheme: items are sealed under generated per-item access
//! passwords, and the master password resolves any item through the
//! encrypted access database.
//!
//! The vault keeps no state of its own; every operation is a pure function
//! of its arguments plus what it reads from the store. Construct one per
//! invocation and hand it to whoever needs it.

use crate::database::{self, DATABASE_KEY};
use crate::envelope::Cipher;
use crate::error::{KeepError, Result};
use crate::password::{AccessPassword, Password};
use crate::store::{BlobStore, StoreError};

/// The vault: a blob store plus an envelope cipher.
pub struct Vault<S: BlobStore> {
    store: S,
    cipher: Cipher,
}

impl<S: BlobStore> Vault<S> {
    pub fn new(store: S, cipher: Cipher) -> Self {
        Self { store, cipher }
    }

    /// Store `data` under `key`, sealed under a freshly generated access
    /// password, and register that password in the access database.
    ///
    /// Only the master password may introduce or overwrite items. A second
    /// put on the same key replaces both the stored envelope and the
    /// registered access password; the previous access password becomes
    /// permanently unusable for that key.
    ///
    /// The item write and the database update are two store objects written
    /// without any concurrency control: concurrent puts against the same
    /// vault can lose the earlier call's database registration (the item
    /// itself stays reachable via its returned access password).
    ///
    /// # Errors
    ///
    /// [`KeepError::DatabaseUpdateFailed`] reports the partial-failure
    /// state where the item was stored but the database update failed; the
    /// error carries the access password, which still opens the item.
    pub fn put_item(&self, key: &str, password: &Password, data: &[u8]) -> Result<AccessPassword> {
        validate_key(key)?;
        if !password.is_master() {
            return Err(KeepError::MasterPasswordRequired);
        }

        let access = AccessPassword::generate();
        let envelope = self.cipher.encrypt(access.as_bytes(), key.as_bytes(), data)?;
        self.store
            .put(key, &envelope)
            .map_err(|e| store_error(key, e))?;

        if let Err(source) = self.register_access_password(key, password, &access) {
            return Err(KeepError::DatabaseUpdateFailed {
                access_password: access.as_str().to_string(),
                source: Box::new(source),
            });
        }

        Ok(access)
    }

    /// Retrieve and decrypt the item stored under `key`.
    ///
    /// With the master password the item's access password is first
    /// resolved through the database; an access password is used directly.
    pub fn get_item(&self, key: &str, password: &Password) -> Result<Vec<u8>> {
        validate_key(key)?;

        let access = match password {
            Password::Master(_) => self.resolve_access_password(key, password)?,
            Password::Access(access) => access.clone(),
        };

        let envelope = self.store.get(key).map_err(|e| store_error(key, e))?;
        self.cipher
            .decrypt(access.as_bytes(), key.as_bytes(), &envelope)
    }

    /// Look up the access password registered for `key`.
    ///
    /// Requires the master password; handing in an access password is
    /// refused rather than echoed back.
    pub fn get_access_password(&self, key: &str, password: &Password) -> Result<AccessPassword> {
        validate_key(key)?;
        if !password.is_master() {
            return Err(KeepError::MasterPasswordRequired);
        }
        self.resolve_access_password(key, password)
    }

    /// Read-modify-write of the access database. Not atomic with respect
    /// to other writers; last write wins.
    fn register_access_password(
        &self,
        key: &str,
        master: &Password,
        access: &AccessPassword,
    ) -> Result<()> {
        let mut db = database::fetch(&self.store, &self.cipher, master)?;
        db.insert(key.to_string(), access.as_str().to_string());
        database::persist(&self.store, &self.cipher, master, &db)
    }

    fn resolve_access_password(&self, key: &str, master: &Password) -> Result<AccessPassword> {
        let db = database::fetch(&self.store, &self.cipher, master)?;
        let value = db
            .get(key)
            .ok_or_else(|| KeepError::ItemNotFound(key.to_string()))?;
        AccessPassword::parse(value)
    }
}

/// Validate an item key: non-empty, `[A-Za-z0-9_/-]` only.
///
/// Runs before any store I/O. The reserved database key contains a `.` and
/// can never pass, so user operations cannot touch it.
fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() || key == DATABASE_KEY {
        return Err(KeepError::InvalidKey(key.to_string()));
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '/')
    {
        return Err(KeepError::InvalidKey(key.to_string()));
    }
    Ok(())
}

fn store_error(key: &str, error: StoreError) -> KeepError {
    match error {
        StoreError::NotFound => KeepError::ItemNotFound(key.to_string()),
        StoreError::Unavailable(msg) => KeepError::StoreUnavailable(msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn test_vault() -> Vault<MemoryStore> {
        Vault::new(MemoryStore::new(), Cipher::with_cost(12, 8, 1))
    }

    fn master() -> Password {
        Password::master("masterdummy").unwrap()
    }

    #[test]
    fn example_scenario() {
        let vault = test_vault();
        let access = vault.put_item("item/1", &master(), b"hello").unwrap();

        assert_eq!(access.as_str().len(), 40);
        assert!(access.as_str().starts_with("vvvvv"));

        let by_access = vault
            .get_item("item/1", &Password::Access(access.clone()))
            .unwrap();
        assert_eq!(by_access, b"hello");

        let by_master = vault.get_item("item/1", &master()).unwrap();
        assert_eq!(by_master, b"hello");

        let resolved = vault.get_access_password("item/1", &master()).unwrap();
        assert_eq!(resolved.as_str(), access.as_str());
    }

    #[test]
    fn put_requires_master_password() {
        let vault = test_vault();
        let access = Password::Access(AccessPassword::generate());
        let result = vault.put_item("item/1", &access, b"data");
        assert!(matches!(result, Err(KeepError::MasterPasswordRequired)));
    }

    #[test]
    fn get_access_password_refuses_access_password() {
        let vault = test_vault();
        vault.put_item("item/1", &master(), b"data").unwrap();
        let access = Password::Access(AccessPassword::generate());
        let result = vault.get_access_password("item/1", &access);
        assert!(matches!(result, Err(KeepError::MasterPasswordRequired)));
    }

    #[test]
    fn invalid_keys_rejected_before_store_io() {
        // A store that fails loudly if the vault touches it.
        struct UnreachableStore;
        impl BlobStore for UnreachableStore {
            fn get(&self, key: &str) -> std::result::Result<Vec<u8>, StoreError> {
                panic!("store reached for key {}", key);
            }
            fn put(&self, key: &str, _data: &[u8]) -> std::result::Result<(), StoreError> {
                panic!("store reached for key {}", key);
            }
        }

        let vault = Vault::new(UnreachableStore, Cipher::with_cost(12, 8, 1));
        for key in ["", "bad*key", "back\\slash", "spaced key", "dotted.key", DATABASE_KEY] {
            assert!(
                matches!(vault.get_item(key, &master()), Err(KeepError::InvalidKey(_))),
                "key {:?} should be invalid",
                key
            );
            assert!(matches!(
                vault.put_item(key, &master(), b"data"),
                Err(KeepError::InvalidKey(_))
            ));
        }
    }

    #[test]
    fn valid_key_character_class() {
        let vault = test_vault();
        for key in ["a", "A-Z_a-z/0-9", "deep/path/to/item", "_-/"] {
            vault.put_item(key, &master(), b"data").unwrap();
            assert_eq!(vault.get_item(key, &master()).unwrap(), b"data");
        }
    }

    #[test]
    fn first_use_bootstrap_reports_item_not_found() {
        let vault = test_vault();
        let result = vault.get_item("item/1", &master());
        assert!(matches!(result, Err(KeepError::ItemNotFound(_))));

        let result = vault.get_access_password("item/1", &master());
        assert!(matches!(result, Err(KeepError::ItemNotFound(_))));
    }

    #[test]
    fn missing_database_entry_is_item_not_found() {
        let vault = test_vault();
        vault.put_item("item/1", &master(), b"data").unwrap();
        let result = vault.get_item("item/2", &master());
        assert!(matches!(result, Err(KeepError::ItemNotFound(_))));
    }

    #[test]
    fn wrong_master_password_fails_authentication() {
        let vault = test_vault();
        vault.put_item("item/1", &master(), b"data").unwrap();
        let wrong = Password::master("not-the-master").unwrap();
        let result = vault.get_item("item/1", &wrong);
        assert!(matches!(result, Err(KeepError::AuthenticationFailure)));
    }

    #[test]
    fn overwrite_replaces_access_password() {
        let vault = test_vault();
        let first = vault.put_item("item/1", &master(), b"version one").unwrap();
        let second = vault.put_item("item/1", &master(), b"version two").unwrap();
        assert_ne!(first.as_str(), second.as_str());

        // The master resolves to the new password and the new contents.
        assert_eq!(vault.get_item("item/1", &master()).unwrap(), b"version two");
        assert_eq!(
            vault.get_access_password("item/1", &master()).unwrap().as_str(),
            second.as_str()
        );

        // The old access password no longer opens the item.
        let result = vault.get_item("item/1", &Password::Access(first));
        assert!(matches!(result, Err(KeepError::AuthenticationFailure)));
    }

    #[test]
    fn envelope_copied_to_another_key_fails_authentication() {
        let store = MemoryStore::new();
        let vault = Vault::new(&store, Cipher::with_cost(12, 8, 1));

        let access = vault.put_item("item/a", &master(), b"bound to a").unwrap();

        // Splice item/a's envelope in under item/b.
        let envelope = store.get("item/a").unwrap();
        store.put("item/b", &envelope).unwrap();

        let result = vault.get_item("item/b", &Password::Access(access));
        assert!(matches!(result, Err(KeepError::AuthenticationFailure)));
    }

    #[test]
    fn database_update_failure_is_distinct_and_recoverable() {
        // Fails every write to the reserved database key.
        struct FailingDbStore(MemoryStore);
        impl BlobStore for FailingDbStore {
            fn get(&self, key: &str) -> std::result::Result<Vec<u8>, StoreError> {
                self.0.get(key)
            }
            fn put(&self, key: &str, data: &[u8]) -> std::result::Result<(), StoreError> {
                if key == DATABASE_KEY {
                    return Err(StoreError::Unavailable("injected failure".to_string()));
                }
                self.0.put(key, data)
            }
        }

        let vault = Vault::new(
            FailingDbStore(MemoryStore::new()),
            Cipher::with_cost(12, 8, 1),
        );

        let err = vault.put_item("item/1", &master(), b"orphaned").unwrap_err();
        let access_password = match err {
            KeepError::DatabaseUpdateFailed {
                access_password,
                source,
            } => {
                assert!(matches!(*source, KeepError::StoreUnavailable(_)));
                access_password
            }
            other => panic!("expected DatabaseUpdateFailed, got {:?}", other),
        };

        // The item is unreachable via the master password...
        let result = vault.get_item("item/1", &master());
        assert!(matches!(result, Err(KeepError::ItemNotFound(_))));

        // ...but still reachable via the returned access password.
        let password = Password::from_input(&access_password).unwrap();
        assert_eq!(vault.get_item("item/1", &password).unwrap(), b"orphaned");
    }

    #[test]
    fn items_under_different_keys_are_independent() {
        let vault = test_vault();
        let a = vault.put_item("item/a", &master(), b"alpha").unwrap();
        let b = vault.put_item("item/b", &master(), b"beta").unwrap();

        assert_eq!(vault.get_item("item/a", &Password::Access(a.clone())).unwrap(), b"alpha");
        assert_eq!(vault.get_item("item/b", &Password::Access(b)).unwrap(), b"beta");

        // An access password for one item does not open another.
        let result = vault.get_item("item/b", &Password::Access(a));
        assert!(matches!(result, Err(KeepError::AuthenticationFailure)));
    }
}
