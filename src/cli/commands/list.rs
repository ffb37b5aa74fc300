//! `lak list` — display entries in a table (or JSON).

use crate::cli::output;
use crate::cli::{Cli, Unlocked};
use crate::errors::{LakError, Result};
use crate::vault::EntryFilter;

/// Execute the `list` command.
pub fn execute(
    cli: &Cli,
    filter: Option<&str>,
    group: Option<i64>,
    json: bool,
    reveal: bool,
) -> Result<()> {
    let vault = Unlocked::open(cli)?;

    let filter = EntryFilter {
        text: filter.map(str::to_string),
        group_id: group,
    };
    let mut rows = vault.store.list_entries(&filter)?;

    if json {
        if !reveal {
            for row in &mut rows {
                row.entry.secret = output::MASK.to_string();
            }
        }
        let text = serde_json::to_string_pretty(&rows)
            .map_err(|e| LakError::CommandFailed(format!("JSON serialization failed: {e}")))?;
        println!("{text}");
        return Ok(());
    }

    output::info(&format!(
        "{} — {} entr{}",
        vault.path.display(),
        rows.len(),
        if rows.len() == 1 { "y" } else { "ies" }
    ));
    output::print_entries_table(&rows, reveal);

    Ok(())
}
