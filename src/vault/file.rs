//! Reading and writing `.lak` files.
//!
//! The file on disk is only ever replaced by a complete envelope: the new
//! content goes to a temp file in the same directory and is renamed over
//! the target, so an interrupted save leaves the old vault untouched.

use std::fs;
use std::path::Path;

use crate::errors::{LakError, Result};

use super::envelope;
use super::store::VaultStore;

/// Read the envelope text from `path`.
pub fn read_envelope(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(LakError::NotFound(format!("Vault {}", path.display())));
    }
    Ok(fs::read_to_string(path)?)
}

/// Write `envelope` to `path` **atomically**.
pub fn write_envelope(path: &Path, envelope: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    fs::write(&tmp_path, envelope)?;

    // Owner-only read/write on Unix before the file takes its real name.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o600))?;
    }

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}

/// Decrypt the vault at `path` and load its dataset.
pub fn open_vault(path: &Path, password: &[u8]) -> Result<VaultStore> {
    let text = read_envelope(path)?;
    let plaintext = envelope::decrypt(password, &text)?;
    let store = VaultStore::from_serialized(&plaintext)?;
    tracing::info!(path = %path.display(), "opened vault");
    Ok(store)
}

/// Serialize, encrypt, and atomically write `store` to `path`, then clear
/// its dirty flag.
pub fn save_vault(path: &Path, password: &[u8], store: &VaultStore) -> Result<()> {
    let plaintext = store.to_serialized()?;
    let text = envelope::encrypt(password, &plaintext)?;
    write_envelope(path, &text)?;
    store.mark_persisted();
    tracing::info!(path = %path.display(), "saved vault");
    Ok(())
}
