use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{LakError, Result};
use crate::passgen::Charset;

/// User configuration, loaded from `lak.toml`.
///
/// Every field has a default, so `lak` works without any config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Vault file used when `--vault` is not given.
    #[serde(default = "default_vault_path")]
    pub vault_path: PathBuf,

    /// Length of generated passwords.
    #[serde(default = "default_generator_length")]
    pub generator_length: usize,

    /// Character set for generated passwords.
    #[serde(default)]
    pub generator_charset: Charset,

    /// `tracing` filter used when `LAK_LOG` is unset (e.g. "warn",
    /// "lockandkey=debug").
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_path() -> PathBuf {
    PathBuf::from("vault.lak")
}

fn default_generator_length() -> usize {
    16
}

fn default_log_level() -> String {
    "warn".to_string()
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_path: default_vault_path(),
            generator_length: default_generator_length(),
            generator_charset: Charset::default(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the working directory.
    pub const FILE_NAME: &'static str = "lak.toml";

    /// Load settings from `<dir>/lak.toml`.
    ///
    /// A missing file yields the defaults.  A file that exists but cannot
    /// be parsed is an error.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            LakError::Config(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Resolve the vault file: an explicit path wins, otherwise the
    /// configured one relative to `dir`.
    pub fn vault_path(&self, dir: &Path, explicit: Option<&Path>) -> PathBuf {
        match explicit {
            Some(path) => path.to_path_buf(),
            None => dir.join(&self.vault_path),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.vault_path, PathBuf::from("vault.lak"));
        assert_eq!(s.generator_length, 16);
        assert_eq!(s.generator_charset, Charset::Full);
        assert_eq!(s.log_level, "warn");
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.generator_length, 16);
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
vault_path = "secrets/home.lak"
generator_length = 24
generator_charset = "urlsafe"
log_level = "debug"
"#;
        fs::write(tmp.path().join("lak.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.vault_path, PathBuf::from("secrets/home.lak"));
        assert_eq!(settings.generator_length, 24);
        assert_eq!(settings.generator_charset, Charset::Urlsafe);
        assert_eq!(settings.log_level, "debug");
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("lak.toml"), "generator_length = 8\n").unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.generator_length, 8);
        assert_eq!(settings.generator_charset, Charset::Full);
        assert_eq!(settings.vault_path, PathBuf::from("vault.lak"));
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("lak.toml"), "not valid {{toml").unwrap();

        let result = Settings::load(tmp.path());
        assert!(matches!(result, Err(LakError::Config(_))));
    }

    #[test]
    fn load_errors_on_unknown_key() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("lak.toml"), "argon2_iterations = 3\n").unwrap();

        assert!(matches!(
            Settings::load(tmp.path()),
            Err(LakError::Config(_))
        ));
    }

    #[test]
    fn vault_path_prefers_explicit_path() {
        let s = Settings::default();
        let dir = Path::new("/home/user");
        assert_eq!(
            s.vault_path(dir, Some(Path::new("/tmp/other.lak"))),
            PathBuf::from("/tmp/other.lak")
        );
        assert_eq!(s.vault_path(dir, None), PathBuf::from("/home/user/vault.lak"));
    }
}
