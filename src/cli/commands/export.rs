//! `lak export` — write the vault as plain CSV sections.
//!
//! The output holds every secret in clear text.

use std::path::Path;

use crate::bridge;
use crate::cli::output;
use crate::cli::{Cli, Unlocked};
use crate::errors::{LakError, Result};

/// Execute the `export` command.
pub fn execute(cli: &Cli, dest: &Path) -> Result<()> {
    // Safety: refuse to overwrite vault files.
    if dest
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("lak"))
    {
        return Err(LakError::CommandFailed(
            "refusing to export over a .lak file".into(),
        ));
    }

    let vault = Unlocked::open(cli)?;
    if dest == vault.path {
        return Err(LakError::CommandFailed(
            "refusing to export over the vault itself".into(),
        ));
    }

    bridge::dump_to_file(&vault.store, dest)
        .map_err(|e| LakError::CommandFailed(format!("failed to write export file: {e}")))?;

    output::success(&format!(
        "Exported {} entries and {} groups to {}",
        vault.store.entry_count()?,
        vault.store.list_groups()?.len(),
        dest.display()
    ));
    output::warning("The export contains your secrets in clear text. Delete it when done.");

    Ok(())
}
