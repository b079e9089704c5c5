use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::DEFAULT_PASSWORD_LEN;
use crate::errors::{CropassError, Result};
use crate::vault::{ParseMode, StoreConfig};

/// Per-directory configuration, loaded from `cropass.toml`.
///
/// Every field has a sensible default so cropass works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Length of passwords generated by `new`.
    #[serde(default = "default_password_length")]
    pub password_length: usize,

    /// Read containers written before the `CRP00000` header existed.
    #[serde(default = "default_allow_legacy_format")]
    pub allow_legacy_format: bool,

    /// Let `show` and `list` skip lines that fail to decode instead of
    /// aborting.  Mutating commands are always strict.
    #[serde(default)]
    pub skip_malformed_records: bool,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_password_length() -> usize {
    DEFAULT_PASSWORD_LEN
}

fn default_allow_legacy_format() -> bool {
    true
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            password_length: default_password_length(),
            allow_legacy_format: default_allow_legacy_format(),
            skip_malformed_records: false,
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the storage directory.
    pub const FILE_NAME: &'static str = "cropass.toml";

    /// Load settings from `<storage_dir>/cropass.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(storage_dir: &Path) -> Result<Self> {
        let config_path = storage_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            CropassError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        if settings.password_length == 0 {
            return Err(CropassError::ConfigError(format!(
                "password_length in {} must be at least 1",
                config_path.display()
            )));
        }

        Ok(settings)
    }

    /// Build the store configuration for `storage_dir`.
    pub fn store_config(&self, storage_dir: &Path) -> StoreConfig {
        StoreConfig {
            storage_dir: PathBuf::from(storage_dir),
            allow_legacy_format: self.allow_legacy_format,
        }
    }

    /// Parse mode for read-only commands.
    pub fn read_mode(&self) -> ParseMode {
        if self.skip_malformed_records {
            ParseMode::Lenient
        } else {
            ParseMode::Strict
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
        assert_eq!(s.password_length, 16);
        assert!(s.allow_legacy_format);
        assert!(!s.skip_malformed_records);
        assert_eq!(s.read_mode(), ParseMode::Strict);
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.password_length, 16);
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
password_length = 24
allow_legacy_format = false
skip_malformed_records = true
"#;
        fs::write(tmp.path().join("cropass.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.password_length, 24);
        assert!(!settings.allow_legacy_format);
        assert_eq!(settings.read_mode(), ParseMode::Lenient);
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("cropass.toml"), "password_length = 20\n").unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.password_length, 20);
        // Rest should be defaults
        assert!(settings.allow_legacy_format);
        assert!(!settings.skip_malformed_records);
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("cropass.toml"), "not valid {{toml").unwrap();

        let result = Settings::load(tmp.path());
        assert!(matches!(result, Err(CropassError::ConfigError(_))));
    }

    #[test]
    fn load_rejects_zero_password_length() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("cropass.toml"), "password_length = 0\n").unwrap();
        assert!(Settings::load(tmp.path()).is_err());
    }

    #[test]
    fn store_config_carries_directory_and_format_policy() {
        let s = Settings {
            allow_legacy_format: false,
            ..Settings::default()
        };
        let config = s.store_config(Path::new("/home/user/pw"));
        assert_eq!(config.storage_dir, PathBuf::from("/home/user/pw"));
        assert!(!config.allow_legacy_format);
    }
}
