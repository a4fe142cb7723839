//! Configuration for the default backends.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::backend::Accessibility;

/// Configuration loaded from a TOML file.
///
/// Every section and field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Directory holding the persistent default stores. Relative paths in
    /// the other sections are resolved against it.
    pub root: Option<PathBuf>,
    pub vault: VaultConfig,
    pub cloud: CloudConfig,
    pub local: LocalConfig,
}

/// Secure vault settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VaultConfig {
    /// Database directory.
    pub path: PathBuf,
    /// Shares items between applications using the same group.
    pub access_group: Option<String>,
    pub accessibility: Accessibility,
    /// Marks new items as synchronizable and matches synchronizable items
    /// on read.
    pub synchronizable: bool,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("vault"),
            access_group: None,
            accessibility: Accessibility::default(),
            synchronizable: false,
        }
    }
}

/// Cloud-synchronized store settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CloudConfig {
    /// Snapshot file written by `synchronize`. In-memory only when unset.
    pub sync_path: Option<PathBuf>,
}

/// Local preference store settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocalConfig {
    /// Database directory.
    pub path: PathBuf,
    /// Preference suite, stored as its own keyspace.
    pub suite: String,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("local"),
            suite: "defaults".to_string(),
        }
    }
}

impl StoreConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(path.as_ref().display().to_string(), e))?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Parse)
    }

    /// Configuration rooted at `root`, everything else default.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            ..Self::default()
        }
    }

    /// The root directory, defaulting to the platform's local data dir.
    pub fn root_dir(&self) -> PathBuf {
        match &self.root {
            Some(root) => root.clone(),
            None => dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("kv-field"),
        }
    }

    pub fn vault_path(&self) -> PathBuf {
        self.root_dir().join(&self.vault.path)
    }

    pub fn local_path(&self) -> PathBuf {
        self.root_dir().join(&self.local.path)
    }

    pub fn cloud_sync_path(&self) -> Option<PathBuf> {
        self.cloud
            .sync_path
            .as_ref()
            .map(|path| self.root_dir().join(path))
    }
}

/// Configuration error.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}': {1}")]
    Io(String, #[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
root = "/var/lib/app/kv"

[vault]
access_group = "com.example.shared"
accessibility = "after-first-unlock"
synchronizable = true

[cloud]
sync_path = "cloud.json"

[local]
suite = "com.example.prefs"
"#;
        let config = StoreConfig::parse(toml).unwrap();
        assert_eq!(config.root_dir(), PathBuf::from("/var/lib/app/kv"));
        assert_eq!(config.vault.access_group.as_deref(), Some("com.example.shared"));
        assert_eq!(config.vault.accessibility, Accessibility::AfterFirstUnlock);
        assert!(config.vault.synchronizable);
        assert_eq!(config.vault_path(), PathBuf::from("/var/lib/app/kv/vault"));
        assert_eq!(
            config.cloud_sync_path(),
            Some(PathBuf::from("/var/lib/app/kv/cloud.json"))
        );
        assert_eq!(config.local.suite, "com.example.prefs");
        assert_eq!(config.local_path(), PathBuf::from("/var/lib/app/kv/local"));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = StoreConfig::parse("").unwrap();
        assert!(config.root.is_none());
        assert_eq!(config.vault.accessibility, Accessibility::WhenUnlocked);
        assert!(!config.vault.synchronizable);
        assert!(config.cloud_sync_path().is_none());
        assert_eq!(config.local.suite, "defaults");
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = StoreConfig::parse("[vault]\nencrypt = true\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
