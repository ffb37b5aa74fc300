use thiserror::Error;

/// All errors that can occur in Lock and Key.
#[derive(Debug, Error)]
pub enum LakError {
    // --- Store errors ---
    #[error("Missing required field: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    // --- Crypto errors ---
    /// Authentication tag check failed. A wrong password and a tampered
    /// file look exactly the same from here.
    #[error("Wrong password or corrupted vault")]
    WrongPasswordOrCorrupt,

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Format errors ---
    #[error("Invalid format: {0}")]
    Format(String),

    // --- Engine errors ---
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Vault already exists at {0}")]
    VaultAlreadyExists(std::path::PathBuf),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    Config(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for Lock and Key results.
pub type Result<T> = std::result::Result<T, LakError>;

impl LakError {
    pub(crate) fn entry_not_found(id: i64) -> Self {
        Self::NotFound(format!("Entry #{id}"))
    }

    pub(crate) fn group_not_found(id: i64) -> Self {
        Self::NotFound(format!("Group #{id}"))
    }
}
