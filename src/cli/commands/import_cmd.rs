//! `lak import` — merge CSV sections produced by `lak export`.
//!
//! Rows with an id replace the row that has it; rows without one are added.

use std::path::Path;

use crate::bridge;
use crate::cli::output;
use crate::cli::{Cli, Unlocked};
use crate::errors::{LakError, Result};

/// Execute the `import` command.
pub fn execute(cli: &Cli, source: &Path) -> Result<()> {
    if !source.exists() {
        return Err(LakError::NotFound(format!("Import file {}", source.display())));
    }

    let vault = Unlocked::open(cli)?;
    let count = bridge::restore_from_file(&vault.store, source)?;
    vault.save_if_dirty()?;

    if count == 0 {
        output::warning("No rows found in the import file.");
    } else {
        output::success(&format!("Imported {count} rows from {}", source.display()));
    }

    Ok(())
}
