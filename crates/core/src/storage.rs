//! On-device key-value storage seam.
//!
//! Hosts provide whatever the device actually has; [`MemoryStorage`] is the
//! always-available fallback. [`DeviceStore`] binds a storage to the snapshot
//! codec and keeps working with an identical interface when the storage is
//! broken - reads fall back to defaults, writes are swallowed, and the
//! degradation is visible through [`DeviceStore::persistence`].

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::warn;

use crate::capability::Capability;
use crate::store::{self, Action, Effect, STORE_RECORD_KEY, StoreState};

/// Why a storage operation failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The backing medium cannot be reached at all.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// The write was refused (quota, read-only medium).
    #[error("write rejected: {0}")]
    WriteRejected(String),
}

/// String-keyed record storage provided by the environment.
pub trait KeyValueStorage: Send + Sync {
    /// Read the record at `key`, `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write the record at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the medium cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the record at `key`. Deleting an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the medium cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Process-local storage, the fallback when the device offers nothing better.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::Unavailable("storage lock poisoned".to_owned()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::Unavailable("storage lock poisoned".to_owned()))?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::Unavailable("storage lock poisoned".to_owned()))?;
        entries.remove(key);
        Ok(())
    }
}

/// The store bound to a device storage.
///
/// Opening never fails: a broken storage or record yields the default state
/// and a degraded persistence status. Dispatch forwards to the store and
/// writes the snapshot back whenever a persist effect is returned.
pub struct DeviceStore<S> {
    storage: S,
    state: StoreState,
    persistence: Capability,
}

impl<S: KeyValueStorage> DeviceStore<S> {
    /// Load the persisted record (if any) and bind the storage.
    pub fn open(storage: S) -> Self {
        let (state, persistence) = match storage.get(STORE_RECORD_KEY) {
            Ok(raw) => {
                let rehydration = store::snapshot::rehydrate(raw.as_deref());
                (rehydration.state, rehydration.outcome)
            }
            Err(err) => {
                warn!(error = %err, "device storage unreadable, using in-memory state");
                (
                    StoreState::default(),
                    Capability::degraded(format!("in-memory only: {err}")),
                )
            }
        };
        Self {
            storage,
            state,
            persistence,
        }
    }

    /// Dispatch an action, carrying out its persistence effect.
    pub fn dispatch(&mut self, action: Action, now: DateTime<Utc>) -> Vec<Effect> {
        let effects = self.state.dispatch(action, now);
        if effects.contains(&Effect::Persist) {
            self.save();
        }
        effects
    }

    fn save(&mut self) {
        let raw = match store::snapshot::encode(&self.state) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "could not encode store snapshot");
                return;
            }
        };
        if let Err(err) = self.storage.set(STORE_RECORD_KEY, &raw) {
            warn!(error = %err, "store snapshot not persisted");
            self.persistence = Capability::degraded(format!("in-memory only: {err}"));
        }
    }

    #[must_use]
    pub const fn state(&self) -> &StoreState {
        &self.state
    }

    /// Whether snapshots are actually reaching the device.
    #[must_use]
    pub const fn persistence(&self) -> &Capability {
        &self.persistence
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::types::ProductId;

    /// A storage double whose medium is gone.
    struct BrokenStorage;

    impl KeyValueStorage for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("medium missing".to_owned()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("medium missing".to_owned()))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("medium missing".to_owned()))
        }
    }

    /// Readable but refuses every write.
    struct ReadOnlyStorage(MemoryStorage);

    impl KeyValueStorage for ReadOnlyStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get(key)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::WriteRejected("quota exceeded".to_owned()))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::WriteRejected("quota exceeded".to_owned()))
        }
    }

    #[test]
    fn memory_storage_round_trips_records() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("missing").unwrap(), None);
        storage.set("k", "v").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));
        storage.remove("k").unwrap();
        assert_eq!(storage.get("k").unwrap(), None);
    }

    #[test]
    fn snapshots_survive_reopening_the_store() {
        let catalog = Catalog::demo();
        let storage = MemoryStorage::new();
        {
            let mut store = DeviceStore::open(&storage);
            store.dispatch(Action::ToggleDarkMode, Utc::now());
            store.dispatch(
                Action::AddToCart {
                    product: catalog.find(ProductId::new(10)).unwrap().clone(),
                    quantity: 1,
                },
                Utc::now(),
            );
        }

        let reopened = DeviceStore::open(&storage);
        assert_eq!(reopened.persistence(), &Capability::Available);
        assert!(reopened.state().dark_mode);
        assert_eq!(reopened.state().cart_count(), 1);
    }

    #[test]
    fn unreadable_storage_degrades_to_in_memory_defaults() {
        let mut store = DeviceStore::open(BrokenStorage);
        assert!(store.persistence().is_degraded());

        // The interface keeps working.
        store.dispatch(Action::ToggleDarkMode, Utc::now());
        assert!(store.state().dark_mode);
        assert_eq!(store.state().coin_balance(), 1_250);
    }

    #[test]
    fn rejected_writes_surface_only_through_the_persistence_status() {
        let mut store = DeviceStore::open(ReadOnlyStorage(MemoryStorage::new()));
        assert_eq!(store.persistence(), &Capability::Available);

        store.dispatch(Action::ToggleDarkMode, Utc::now());
        assert!(store.state().dark_mode);
        assert!(store.persistence().is_degraded());
    }
}
