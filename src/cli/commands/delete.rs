//! `lak delete` — remove an entry from the vault.

use crate::cli::output;
use crate::cli::{confirm, Cli, Unlocked};
use crate::errors::Result;

/// Execute the `delete` command.
pub fn execute(cli: &Cli, id: i64, force: bool) -> Result<()> {
    let vault = Unlocked::open(cli)?;

    let Some(entry) = vault.store.get_entry(id)? else {
        output::info(&format!("Entry #{id} does not exist; nothing to delete."));
        return Ok(());
    };

    // Unless --force is set, ask for confirmation before deleting.
    if !force && !confirm(&format!("Delete entry #{id} '{}'?", entry.name))? {
        output::info("Cancelled.");
        return Ok(());
    }

    vault.store.delete_entry(id)?;
    vault.save_if_dirty()?;

    output::success(&format!("Deleted entry #{id} '{}'", entry.name));
    Ok(())
}
