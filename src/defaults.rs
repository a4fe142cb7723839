//! Process-wide default backends.
//!
//! The vault, cloud and local stores are opened lazily on first use from the
//! installed [`StoreConfig`] and shared for the rest of the process. Tests
//! and embedders can replace any of them with [`install`] and drop them all
//! with [`reset`].

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::backend::CloudStore;
use crate::config::StoreConfig;
use crate::logging::{debug, error, info};
use crate::store::{KvError, KvStore};

/// The default backends a selector can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefaultStore {
    Vault,
    Cloud,
    Local,
}

impl DefaultStore {
    pub fn as_str(self) -> &'static str {
        match self {
            DefaultStore::Vault => "vault",
            DefaultStore::Cloud => "cloud",
            DefaultStore::Local => "local",
        }
    }
}

impl fmt::Display for DefaultStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Default)]
struct Registry {
    config: StoreConfig,
    vault: Option<Arc<dyn KvStore>>,
    cloud: Option<Arc<dyn KvStore>>,
    local: Option<Arc<dyn KvStore>>,
}

impl Registry {
    fn slot(&mut self, kind: DefaultStore) -> &mut Option<Arc<dyn KvStore>> {
        match kind {
            DefaultStore::Vault => &mut self.vault,
            DefaultStore::Cloud => &mut self.cloud,
            DefaultStore::Local => &mut self.local,
        }
    }

    fn get(&self, kind: DefaultStore) -> Option<Arc<dyn KvStore>> {
        match kind {
            DefaultStore::Vault => self.vault.clone(),
            DefaultStore::Cloud => self.cloud.clone(),
            DefaultStore::Local => self.local.clone(),
        }
    }

    fn clear(&mut self) {
        self.vault = None;
        self.cloud = None;
        self.local = None;
    }
}

static REGISTRY: Lazy<RwLock<Registry>> = Lazy::new(|| RwLock::new(Registry::default()));

/// Returns the shared instance of `kind`, opening it on first use.
pub fn shared(kind: DefaultStore) -> Result<Arc<dyn KvStore>, KvError> {
    if let Some(store) = REGISTRY.read().get(kind) {
        return Ok(store);
    }

    let mut registry = REGISTRY.write();
    if let Some(store) = registry.get(kind) {
        return Ok(store);
    }
    let store = open(kind, &registry.config).inspect_err(|err| {
        error!(kind = kind.as_str(), error = %err, "failed to open default store");
    })?;
    *registry.slot(kind) = Some(store.clone());
    Ok(store)
}

pub fn vault() -> Result<Arc<dyn KvStore>, KvError> {
    shared(DefaultStore::Vault)
}

pub fn cloud() -> Result<Arc<dyn KvStore>, KvError> {
    shared(DefaultStore::Cloud)
}

pub fn local() -> Result<Arc<dyn KvStore>, KvError> {
    shared(DefaultStore::Local)
}

/// Replaces the shared instance of `kind`.
pub fn install(kind: DefaultStore, store: Arc<dyn KvStore>) {
    debug!(kind = kind.as_str(), store = store.name(), "installing default store");
    *REGISTRY.write().slot(kind) = Some(store);
}

/// Drops every shared instance. The next access reopens from the current
/// configuration.
pub fn reset() {
    REGISTRY.write().clear();
}

/// Installs `config` and drops already-opened instances.
pub fn configure(config: StoreConfig) {
    let mut registry = REGISTRY.write();
    info!(root = %config.root_dir().display(), "configuring default stores");
    registry.config = config;
    registry.clear();
}

/// Loads a TOML configuration file and installs it.
pub fn configure_from_file(path: impl AsRef<Path>) -> crate::Result<()> {
    configure(StoreConfig::from_file(path)?);
    Ok(())
}

/// The configuration defaults are opened from.
pub fn config() -> StoreConfig {
    REGISTRY.read().config.clone()
}

fn open(kind: DefaultStore, config: &StoreConfig) -> Result<Arc<dyn KvStore>, KvError> {
    match kind {
        DefaultStore::Cloud => {
            let store = match config.cloud_sync_path() {
                Some(path) => CloudStore::open(path)?,
                None => CloudStore::in_memory(),
            };
            Ok(Arc::new(store))
        }
        #[cfg(feature = "persistent")]
        DefaultStore::Vault => {
            use crate::backend::{VaultOptions, VaultStore};
            let store = VaultStore::open(&config.vault_path(), VaultOptions::from(&config.vault))?;
            Ok(Arc::new(store))
        }
        #[cfg(feature = "persistent")]
        DefaultStore::Local => {
            use crate::backend::LocalStore;
            let store = LocalStore::open(&config.local_path(), &config.local.suite)?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "persistent"))]
        DefaultStore::Vault | DefaultStore::Local => Err(KvError::Unavailable {
            backend: kind.as_str(),
            reason: "built without the `persistent` feature".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::KvStoreExt;
    use parking_lot::Mutex;
    use tempfile::TempDir;

    // The registry is global; serialize the tests that touch it.
    static LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_shared_is_a_singleton() {
        let _guard = LOCK.lock();
        let dir = TempDir::new().unwrap();
        configure(StoreConfig::with_root(dir.path()));

        let a = cloud().unwrap();
        let b = shared(DefaultStore::Cloud).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        reset();
        let c = cloud().unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
        reset();
    }

    #[test]
    fn test_install_replaces_default() {
        let _guard = LOCK.lock();
        configure(StoreConfig::default());

        let store: Arc<dyn KvStore> = Arc::new(CloudStore::in_memory());
        store.set("flag", Some(true)).unwrap();
        install(DefaultStore::Vault, store.clone());
        let vault = vault().unwrap();
        assert!(Arc::ptr_eq(&vault, &store));
        assert_eq!(vault.get::<bool>("flag").unwrap(), Some(true));
        reset();
    }

    #[cfg(feature = "persistent")]
    #[test]
    fn test_local_opens_under_root() {
        let _guard = LOCK.lock();
        let dir = TempDir::new().unwrap();
        configure(StoreConfig::with_root(dir.path()));

        local().unwrap().set("k", Some(1i32)).unwrap();
        assert!(dir.path().join("local").exists());
        reset();
    }

    #[test]
    fn test_configure_from_missing_file() {
        let err = configure_from_file("/nonexistent/kv-field.toml").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }
}
