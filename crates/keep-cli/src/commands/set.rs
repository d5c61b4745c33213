//! `keep set` - store an item and print its new access password.

use keep_core::{BlobStore, Password, Vault};

use crate::input;

pub fn handle_set(
    vault: &Vault<Box<dyn BlobStore>>,
    password: &Password,
    key: &str,
    file: Option<&str>,
) -> anyhow::Result<()> {
    let data = input::read_data(file)?;
    let access = vault.put_item(key, password, &data)?;
    println!("Item stored, its access password is {}", access);
    Ok(())
}
