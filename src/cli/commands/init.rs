//! `lak init` — create a new vault, optionally seeded from a plain dataset.

use std::fs;
use std::path::Path;

use crate::cli::output;
use crate::cli::{prompt_new_password, settings, vault_path, Cli};
use crate::errors::{LakError, Result};
use crate::vault::{save_vault, VaultStore};

/// Execute the `init` command.
pub fn execute(cli: &Cli, from: Option<&Path>) -> Result<()> {
    let settings = settings()?;
    let path = vault_path(cli, &settings)?;

    // 1. Never overwrite an existing vault.
    if path.exists() {
        output::tip("Use `lak add` to add entries to the existing vault.");
        return Err(LakError::VaultAlreadyExists(path));
    }

    // 2. Build the dataset before asking for a password, so a bad seed
    //    file fails fast.
    let store = match from {
        Some(source) => VaultStore::from_external_file(source)?,
        None => VaultStore::new()?,
    };

    // 3. Create the parent directory if needed.
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
            output::info(&format!("Created directory: {}", parent.display()));
        }
    }

    // 4. Prompt for a new password (with confirmation) and write the file.
    let password = prompt_new_password()?;
    save_vault(&path, password.as_bytes(), &store)?;

    match from {
        Some(source) => output::success(&format!(
            "Vault created at {} with {} entries from {}",
            path.display(),
            store.entry_count()?,
            source.display()
        )),
        None => output::success(&format!("Vault created at {}", path.display())),
    }

    output::tip("Run `lak add <NAME>` to add an entry.");
    output::tip("Run `lak list` to see all entries.");

    Ok(())
}
