//! Secure credential vault.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::VaultConfig;
use crate::logging::{debug, trace};
use crate::store::{Entries, KvError, KvStore, ValueSink};
use crate::value::{Value, codec};

use super::access::Accessibility;
use super::disk::Disk;

const KEYSPACE: &str = "vault";

/// Separates the access group from the account in a storage key.
const GROUP_SEPARATOR: char = '\u{0}';

/// Options applied to every item the vault reads or writes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VaultOptions {
    /// Items are only visible to vaults opened with the same group.
    pub access_group: Option<String>,
    /// Recorded on written items.
    pub accessibility: Accessibility,
    /// Written items are marked synchronizable, and reads match both
    /// synchronizable and device-local items. When `false` only device-local
    /// items are visible.
    pub synchronizable: bool,
}

impl From<&VaultConfig> for VaultOptions {
    fn from(config: &VaultConfig) -> Self {
        Self {
            access_group: config.access_group.clone(),
            accessibility: config.accessibility,
            synchronizable: config.synchronizable,
        }
    }
}

/// Attributes stored alongside a vault item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaultItemInfo {
    pub accessibility: Accessibility,
    pub synchronizable: bool,
}

#[derive(Serialize, Deserialize)]
struct VaultItem {
    accessibility: Accessibility,
    synchronizable: bool,
    /// Byte envelope of the stored value.
    #[serde(with = "serde_bytes")]
    data: Vec<u8>,
}

/// Secure store for credentials and other small secrets.
///
/// Items are addressed by access group and account (the key). Values are
/// always serialized to bytes; the vault has no typed slots. Writes
/// overwrite existing items.
pub struct VaultStore {
    disk: Disk,
    options: VaultOptions,
}

impl VaultStore {
    /// Opens the vault database at `path`.
    pub fn open(path: &Path, options: VaultOptions) -> Result<Self, KvError> {
        Ok(Self {
            disk: Disk::open(path, KEYSPACE)?,
            options,
        })
    }

    pub fn options(&self) -> &VaultOptions {
        &self.options
    }

    /// Accounts visible to this vault, in key order.
    pub fn keys(&self) -> Result<Vec<String>, KvError> {
        let prefix = self.group_prefix();
        let mut accounts = Vec::new();
        for storage_key in self.disk.keys_with_prefix(&prefix) {
            let Some(account) = storage_key.strip_prefix(&prefix) else {
                continue;
            };
            if self.load(account)?.is_some() {
                accounts.push(account.to_string());
            }
        }
        Ok(accounts)
    }

    /// Attributes of the item stored under `key`, if visible.
    pub fn attributes(&self, key: &str) -> Result<Option<VaultItemInfo>, KvError> {
        Ok(self.load(key)?.map(|item| VaultItemInfo {
            accessibility: item.accessibility,
            synchronizable: item.synchronizable,
        }))
    }

    fn group_prefix(&self) -> String {
        let group = self.options.access_group.as_deref().unwrap_or_default();
        format!("{group}{GROUP_SEPARATOR}")
    }

    fn storage_key(&self, account: &str) -> String {
        format!("{}{account}", self.group_prefix())
    }

    /// Loads the item for `account`, hiding synchronizable items from a
    /// vault that does not match them.
    fn load(&self, account: &str) -> Result<Option<VaultItem>, KvError> {
        let Some(bytes) = self.disk.get(&self.storage_key(account))? else {
            return Ok(None);
        };
        let item: VaultItem = postcard::from_bytes(&bytes)
            .map_err(|e| KvError::Corrupted(format!("vault item '{account}': {e}")))?;
        if item.synchronizable && !self.options.synchronizable {
            trace!(account = account, "skipping synchronizable item");
            return Ok(None);
        }
        Ok(Some(item))
    }
}

impl KvStore for VaultStore {
    fn name(&self) -> &str {
        "vault"
    }

    fn read(&self, key: &str, sink: &mut dyn ValueSink) -> Result<bool, KvError> {
        let Some(item) = self.load(key)? else {
            return Ok(false);
        };
        sink.accept(codec::decode(&item.data)?)?;
        Ok(true)
    }

    fn write(&self, key: &str, value: Option<Value>) -> Result<(), KvError> {
        let storage_key = self.storage_key(key);
        let Some(value) = value else {
            debug!(account = key, "deleting vault item");
            return self.disk.remove(&storage_key);
        };

        let item = VaultItem {
            accessibility: self.options.accessibility,
            synchronizable: self.options.synchronizable,
            data: codec::encode(&value)?,
        };
        let bytes = postcard::to_stdvec(&item)
            .map_err(|e| KvError::Corrupted(format!("vault item '{key}': {e}")))?;
        self.disk.insert(&storage_key, &bytes)
    }

    fn all(&self) -> Result<Entries, KvError> {
        let mut entries = Entries::new();
        for account in self.keys()? {
            if let Some(item) = self.load(&account)? {
                entries.insert(account, codec::decode(&item.data)?);
            }
        }
        Ok(entries)
    }
}
