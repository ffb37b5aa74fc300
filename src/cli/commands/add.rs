//! `lak add` — add an entry to the vault.

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{read_secret, settings, Cli, Unlocked};
use crate::errors::Result;
use crate::passgen::{evaluate_password, generate_password};
use crate::vault::EntryDraft;

/// Arguments of `lak add`, bundled.
pub struct AddArgs<'a> {
    pub name: &'a str,
    pub login: Option<&'a str>,
    pub website: Option<&'a str>,
    pub group: Option<i64>,
    pub secret: Option<&'a str>,
    pub generate: bool,
}

/// Execute the `add` command.
pub fn execute(cli: &Cli, args: &AddArgs<'_>) -> Result<()> {
    // The secret is settled before the vault password is asked for.
    let secret = if args.generate {
        let settings = settings()?;
        let generated = generate_password(
            &settings.generator_charset.chars(),
            settings.generator_length,
        )?;
        let (strength, entropy) = evaluate_password(&generated);
        output::info(&format!(
            "Generated a {}-character secret ({strength}, {entropy:.0} bits)",
            settings.generator_length
        ));
        Zeroizing::new(generated)
    } else if let Some(s) = args.secret {
        output::warning("Secret provided on command line — it may appear in shell history.");
        Zeroizing::new(s.to_string())
    } else {
        read_secret(args.name)?
    };

    let vault = Unlocked::open(cli)?;

    let mut draft = EntryDraft::new(args.name, secret.as_str());
    draft.login = args.login.map(str::to_string);
    draft.website = args.website.map(str::to_string);
    draft.group_id = args.group;

    let id = vault.store.add_entry(&draft)?;
    vault.save_if_dirty()?;

    output::success(&format!(
        "Entry #{id} '{}' added ({} total)",
        args.name,
        vault.store.entry_count()?
    ));
    output::tip(&format!("Run `lak show {id} --reveal` to see it."));

    Ok(())
}
