//! Concrete backends behind the default selectors.
//!
//! - [`VaultStore`]: secure credential vault, byte-only (requires `persistent`)
//! - [`CloudStore`]: cloud-synchronized store with typed native slots
//! - [`LocalStore`]: local preference store, byte-only (requires `persistent`)

mod access;
mod cloud;
#[cfg(feature = "persistent")]
mod disk;
#[cfg(feature = "persistent")]
mod local;
#[cfg(feature = "persistent")]
mod vault;

pub use access::Accessibility;
pub use cloud::{CloudStore, CloudValue};
#[cfg(feature = "persistent")]
pub use local::LocalStore;
#[cfg(feature = "persistent")]
pub use vault::{VaultItemInfo, VaultOptions, VaultStore};
