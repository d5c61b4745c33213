//! `keep pass` - print the access password registered for an item.

use keep_core::{BlobStore, Password, Vault};

pub fn handle_pass(
    vault: &Vault<Box<dyn BlobStore>>,
    password: &Password,
    key: &str,
) -> anyhow::Result<()> {
    let access = vault.get_access_password(key, password)?;
    println!("{}", access);
    Ok(())
}
