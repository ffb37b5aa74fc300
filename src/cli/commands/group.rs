//! `lak group` — add, edit, list and delete groups.

use crate::cli::output;
use crate::cli::{confirm, Cli, GroupAction, Unlocked};
use crate::errors::{LakError, Result};
use crate::vault::EntryFilter;

/// Execute a `group` subcommand.
pub fn execute(cli: &Cli, action: &GroupAction) -> Result<()> {
    let vault = Unlocked::open(cli)?;

    match action {
        GroupAction::Add { name, icon } => {
            let id = vault.store.add_group(name, *icon)?;
            vault.save_if_dirty()?;
            output::success(&format!("Group #{id} '{name}' added"));
            output::tip(&format!("Run `lak add <NAME> --group {id}` to file an entry under it."));
        }

        GroupAction::Edit { id, name, icon } => {
            let current = vault
                .store
                .get_group(*id)?
                .ok_or_else(|| LakError::group_not_found(*id))?;
            let name = name.as_deref().unwrap_or(&current.name);
            vault.store.edit_group(*id, name, icon.unwrap_or(current.icon))?;
            vault.save_if_dirty()?;
            output::success(&format!("Group #{id} '{name}' updated"));
        }

        GroupAction::List => {
            let groups = vault.store.list_groups()?;
            output::print_groups_table(&groups);
        }

        GroupAction::Delete { id, force } => {
            let Some(group) = vault.store.get_group(*id)? else {
                output::info(&format!("Group #{id} does not exist; nothing to delete."));
                return Ok(());
            };
            let members = vault
                .store
                .list_entries(&EntryFilter::default().group(*id))?
                .len();

            if !force
                && !confirm(&format!(
                    "Delete group #{id} '{}'? {members} entries will become ungrouped.",
                    group.name
                ))?
            {
                output::info("Cancelled.");
                return Ok(());
            }

            vault.store.delete_group(*id)?;
            vault.save_if_dirty()?;
            output::success(&format!(
                "Deleted group #{id} '{}' ({members} entries ungrouped)",
                group.name
            ));
        }
    }

    Ok(())
}
