//! `lak edit` — change an entry in place.

use crate::cli::output;
use crate::cli::{settings, Cli, Unlocked};
use crate::errors::{LakError, Result};
use crate::passgen::{evaluate_password, generate_password};
use crate::vault::EntryDraft;

/// Arguments of `lak edit`.  `None` keeps the current value.
pub struct EditArgs<'a> {
    pub name: Option<&'a str>,
    pub secret: Option<&'a str>,
    pub generate: bool,
    pub login: Option<&'a str>,
    pub website: Option<&'a str>,
    pub group: Option<i64>,
    pub no_group: bool,
}

/// Execute the `edit` command.
pub fn execute(cli: &Cli, id: i64, args: &EditArgs<'_>) -> Result<()> {
    let vault = Unlocked::open(cli)?;

    let current = vault
        .store
        .get_entry(id)?
        .ok_or_else(|| LakError::entry_not_found(id))?;
    let mut draft = EntryDraft::from(&current);

    if let Some(name) = args.name {
        draft.name = name.to_string();
    }
    if args.generate {
        let settings = settings()?;
        draft.secret = generate_password(
            &settings.generator_charset.chars(),
            settings.generator_length,
        )?;
        let (strength, entropy) = evaluate_password(&draft.secret);
        output::info(&format!("Generated a new secret ({strength}, {entropy:.0} bits)"));
    } else if let Some(secret) = args.secret {
        output::warning("Secret provided on command line — it may appear in shell history.");
        draft.secret = secret.to_string();
    }
    if let Some(login) = args.login {
        draft.login = Some(login.to_string());
    }
    if let Some(website) = args.website {
        draft.website = Some(website.to_string());
    }
    if args.no_group {
        draft.group_id = None;
    } else if let Some(group) = args.group {
        draft.group_id = Some(group);
    }

    vault.store.edit_entry(id, &draft)?;
    vault.save_if_dirty()?;

    output::success(&format!("Entry #{id} '{}' updated", draft.name));
    Ok(())
}
