//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use clap::Parser;

use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{LakError, Result};
use crate::passgen::Charset;
use crate::vault::{open_vault, save_vault, Icon, VaultStore};

/// Minimum password length to prevent trivially weak passwords.
const MIN_PASSWORD_LEN: usize = 8;

/// Environment variable checked before prompting for the vault password.
pub const PASSWORD_ENV: &str = "LAK_PASSWORD";

/// Lock and Key: a local encrypted password vault.
#[derive(Parser)]
#[command(name = "lak", about = "Local encrypted password vault", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault file (default: `vault_path` from lak.toml, else vault.lak)
    #[arg(long, global = true, env = "LAK_VAULT")]
    pub vault: Option<PathBuf>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new vault
    Init {
        /// Seed the vault from an unencrypted dataset file
        #[arg(long)]
        from: Option<PathBuf>,
    },

    /// Add an entry
    Add {
        /// Entry name (e.g. "Mail")
        name: String,
        #[arg(long)]
        login: Option<String>,
        #[arg(long)]
        website: Option<String>,
        /// Group id
        #[arg(long)]
        group: Option<i64>,
        /// Secret value (omit for prompt or piped stdin)
        #[arg(long, conflicts_with = "generate")]
        secret: Option<String>,
        /// Generate a random secret
        #[arg(long)]
        generate: bool,
    },

    /// Change an entry; fields left out keep their value
    Edit {
        /// Entry id
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, conflicts_with = "generate")]
        secret: Option<String>,
        /// Replace the secret with a random one
        #[arg(long)]
        generate: bool,
        /// Login (pass "" to clear)
        #[arg(long)]
        login: Option<String>,
        /// Website (pass "" to clear)
        #[arg(long)]
        website: Option<String>,
        #[arg(long, conflicts_with = "no_group")]
        group: Option<i64>,
        /// Remove the entry from its group
        #[arg(long)]
        no_group: bool,
    },

    /// Show one entry
    Show {
        id: i64,
        /// Print the secret instead of a mask
        #[arg(long)]
        reveal: bool,
    },

    /// List entries
    List {
        /// Name glob, `*` for any run and `?` for one character
        #[arg(short, long)]
        filter: Option<String>,
        /// Only entries in this group
        #[arg(short, long)]
        group: Option<i64>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
        /// Include secrets in the output
        #[arg(long)]
        reveal: bool,
    },

    /// Delete an entry
    Delete {
        id: i64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Manage groups
    Group {
        #[command(subcommand)]
        action: GroupAction,
    },

    /// Export the vault as plain CSV sections (secrets in clear text)
    Export {
        /// Destination file
        file: PathBuf,
    },

    /// Import CSV sections produced by `export`
    Import {
        /// Path to the file to import
        file: PathBuf,
    },

    /// Generate a random password and rate it
    Generate {
        #[arg(short, long)]
        length: Option<usize>,
        /// alphanumeric, full or urlsafe
        #[arg(short, long)]
        charset: Option<Charset>,
    },
}

/// Group subcommands.
#[derive(clap::Subcommand)]
pub enum GroupAction {
    /// Add a group
    Add {
        name: String,
        /// Icon: key, controller, database, domino, globe, mail, percent,
        /// person, terminal
        #[arg(long, default_value = "key")]
        icon: Icon,
    },

    /// Rename a group or change its icon
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        icon: Option<Icon>,
    },

    /// List groups
    List,

    /// Delete a group; its entries become ungrouped
    Delete {
        id: i64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load `lak.toml` from the working directory.
pub fn settings() -> Result<Settings> {
    Settings::load(&std::env::current_dir()?)
}

/// The vault file this invocation works on.
pub fn vault_path(cli: &Cli, settings: &Settings) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(settings.vault_path(&cwd, cli.vault.as_deref()))
}

/// Get the vault password, trying in order:
/// 1. `LAK_PASSWORD` env var (scripts, tests)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter vault password")
        .interact()
        .map_err(|e| LakError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new password with confirmation (used during `init`).
///
/// Also respects `LAK_PASSWORD` for scripted usage.
/// Enforces a minimum password length.
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            if pw.chars().count() < MIN_PASSWORD_LEN {
                return Err(LakError::CommandFailed(format!(
                    "password must be at least {MIN_PASSWORD_LEN} characters"
                )));
            }
            return Ok(Zeroizing::new(pw));
        }
    }

    loop {
        let password = dialoguer::Password::new()
            .with_prompt("Choose vault password")
            .with_confirmation(
                "Confirm vault password",
                "Passwords do not match, try again",
            )
            .interact()
            .map_err(|e| LakError::CommandFailed(format!("password prompt: {e}")))?;

        if password.chars().count() < MIN_PASSWORD_LEN {
            output::warning(&format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(Zeroizing::new(password));
    }
}

/// Read a secret value from piped stdin, or prompt for it.
pub fn read_secret(label: &str) -> Result<Zeroizing<String>> {
    if !io::stdin().is_terminal() {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(Zeroizing::new(buf.trim_end_matches(['\r', '\n']).to_string()));
    }

    let value = dialoguer::Password::new()
        .with_prompt(format!("Secret for {label}"))
        .interact()
        .map_err(|e| LakError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(value))
}

/// Ask before a destructive action.  `Ok(false)` means the user declined.
pub fn confirm(prompt: &str) -> Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| LakError::CommandFailed(format!("confirm prompt: {e}")))
}

/// An opened vault together with what is needed to save it again.
pub struct Unlocked {
    pub path: PathBuf,
    pub store: VaultStore,
    password: Zeroizing<String>,
}

impl Unlocked {
    /// Resolve the vault path, ask for the password, and decrypt.
    pub fn open(cli: &Cli) -> Result<Self> {
        let settings = settings()?;
        let path = vault_path(cli, &settings)?;
        Self::open_at(&path)
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        if !path.exists() {
            output::tip("Run `lak init` to create a vault.");
            return Err(LakError::NotFound(format!("Vault {}", path.display())));
        }
        let password = prompt_password()?;
        let store = open_vault(path, password.as_bytes())?;
        Ok(Self {
            path: path.to_path_buf(),
            store,
            password,
        })
    }

    /// Write the vault back only if something changed.  Returns whether a
    /// write happened.
    pub fn save_if_dirty(&self) -> Result<bool> {
        if !self.store.is_dirty() {
            return Ok(false);
        }
        save_vault(&self.path, self.password.as_bytes(), &self.store)?;
        Ok(true)
    }
}
