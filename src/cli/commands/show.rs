//! `lak show` — print one entry.

use crate::cli::output;
use crate::cli::{Cli, Unlocked};
use crate::errors::{LakError, Result};
use crate::vault::EntryRow;

/// Execute the `show` command.
pub fn execute(cli: &Cli, id: i64, reveal: bool) -> Result<()> {
    let vault = Unlocked::open(cli)?;

    let entry = vault
        .store
        .get_entry(id)?
        .ok_or_else(|| LakError::entry_not_found(id))?;
    let group = match entry.group_id {
        Some(gid) => vault.store.get_group(gid)?,
        None => None,
    };

    let row = EntryRow {
        group_name: group.as_ref().map(|g| g.name.clone()),
        group_icon: group.map(|g| g.icon),
        entry,
    };
    output::print_entry(&row, reveal);

    Ok(())
}
