//! Input and output plumbing: password resolution, item data from file or
//! stdin, plaintext to file or stdout.

use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::Path;

use dialoguer::Password as PasswordPrompt;
use keep_core::Password;

use crate::cli::Cli;

/// Resolve the vault password: flag/env first, then an interactive prompt.
///
/// The raw value is classified at this boundary: values carrying the access
/// marker become access passwords, everything else is the master password.
pub fn resolve_password(cli: &Cli) -> anyhow::Result<Password> {
    if let Some(value) = &cli.password {
        return Ok(Password::from_input(value)?);
    }
    if io::stdin().is_terminal() {
        let value = PasswordPrompt::new()
            .with_prompt("Password")
            .interact()
            .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))?;
        return Ok(Password::from_input(&value)?);
    }
    Err(anyhow::anyhow!(
        "No password provided and no TTY available. Use --password or set KEEP_PASSWORD."
    ))
}

/// Read item data from a file, or from piped stdin when no file is given.
pub fn read_data(file: Option<&str>) -> anyhow::Result<Vec<u8>> {
    match file {
        Some(path) => fs::read(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path, e)),
        None => {
            if io::stdin().is_terminal() {
                return Err(anyhow::anyhow!(
                    "You need to specify a source file or pipe data in"
                ));
            }
            let mut data = Vec::new();
            io::stdin()
                .read_to_end(&mut data)
                .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
            Ok(data)
        }
    }
}

/// Write retrieved plaintext to a file, or to stdout for `-`.
///
/// Only called after decryption succeeded, so a failed retrieval never
/// leaves a target file behind. Files are created owner-readable only.
pub fn write_output(target: &str, data: &[u8]) -> anyhow::Result<()> {
    if target == "-" {
        io::stdout()
            .write_all(data)
            .map_err(|e| anyhow::anyhow!("Failed to write stdout: {}", e))?;
        return Ok(());
    }

    fs::write(target, data).map_err(|e| anyhow::anyhow!("Failed to write {}: {}", target, e))?;
    restrict_permissions(Path::new(target))
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> anyhow::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .map_err(|e| anyhow::anyhow!("Failed to set permissions on {}: {}", path.display(), e))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> anyhow::Result<()> {
    Ok(())
}
