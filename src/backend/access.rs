//! Vault item accessibility classes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// When a vault item should be readable.
///
/// Recorded on every item written to a [`VaultStore`](super::VaultStore).
/// The vault keeps the attribute so platform adapters can enforce it; the
/// on-disk store itself has no lock state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Accessibility {
    /// Readable only while the device is unlocked. Migrates with encrypted
    /// backups.
    #[default]
    WhenUnlocked,
    /// Readable only while unlocked; never leaves this device.
    WhenUnlockedThisDeviceOnly,
    /// Readable after the first unlock following a restart, for background
    /// work. Migrates with encrypted backups.
    AfterFirstUnlock,
    /// As [`AfterFirstUnlock`](Self::AfterFirstUnlock), never leaves this
    /// device.
    AfterFirstUnlockThisDeviceOnly,
    /// Requires a passcode; removed when the passcode is disabled.
    WhenPasscodeSetThisDeviceOnly,
}

impl Accessibility {
    pub const fn as_str(self) -> &'static str {
        match self {
            Accessibility::WhenUnlocked => "when-unlocked",
            Accessibility::WhenUnlockedThisDeviceOnly => "when-unlocked-this-device-only",
            Accessibility::AfterFirstUnlock => "after-first-unlock",
            Accessibility::AfterFirstUnlockThisDeviceOnly => "after-first-unlock-this-device-only",
            Accessibility::WhenPasscodeSetThisDeviceOnly => "when-passcode-set-this-device-only",
        }
    }

    /// Whether items with this class may migrate to another device.
    pub const fn migrates(self) -> bool {
        matches!(
            self,
            Accessibility::WhenUnlocked | Accessibility::AfterFirstUnlock
        )
    }
}

impl fmt::Display for Accessibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
