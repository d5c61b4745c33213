//! Configuration resolution: flags and environment into a concrete vault.
//!
//! The backend is chosen from the resolved settings: a local directory
//! store when `--store-dir` / `KEEP_STORE_DIR` is set, otherwise S3. For
//! the AWS credentials the `KEEP_`-prefixed variables win, with the plain
//! `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` variables as fallback.

use keep_core::{BlobStore, Cipher, Vault};

use crate::cli::Cli;
use crate::store::{DirStore, S3Store};

/// Build the vault for this invocation.
pub fn build_vault(cli: &Cli) -> anyhow::Result<Vault<Box<dyn BlobStore>>> {
    Ok(Vault::new(build_store(cli)?, build_cipher(cli)))
}

fn build_cipher(cli: &Cli) -> Cipher {
    match cli.scrypt_log_n {
        Some(log_n) => Cipher::with_cost(log_n, 8, 1),
        None => Cipher::new(),
    }
}

fn build_store(cli: &Cli) -> anyhow::Result<Box<dyn BlobStore>> {
    if let Some(dir) = &cli.store_dir {
        return Ok(Box::new(DirStore::new(dir.clone())));
    }

    let access_key = cli
        .access_key
        .clone()
        .or_else(|| env_non_empty("AWS_ACCESS_KEY_ID"));
    let secret_key = cli
        .secret_key
        .clone()
        .or_else(|| env_non_empty("AWS_SECRET_ACCESS_KEY"));

    match (access_key, secret_key, &cli.bucket) {
        (Some(access_key), Some(secret_key), Some(bucket)) => Ok(Box::new(S3Store::new(
            access_key,
            secret_key,
            bucket.clone(),
            cli.prefix.clone(),
            cli.region.clone(),
        ))),
        _ => Err(anyhow::anyhow!(
            "The access-key, secret-key and bucket parameters are mandatory (or set --store-dir for a local store)"
        )),
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
