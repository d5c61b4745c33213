//! `keep get` - retrieve an item to a file or stdout.

use keep_core::{BlobStore, Password, Vault};

use crate::input;

pub fn handle_get(
    vault: &Vault<Box<dyn BlobStore>>,
    password: &Password,
    target: &str,
    key: &str,
) -> anyhow::Result<()> {
    // Decrypt fully before touching the target so a failure writes nothing.
    let data = vault.get_item(key, password)?;
    input::write_output(target, &data)
}
