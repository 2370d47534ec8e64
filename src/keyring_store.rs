use crate::errors::StorageError;
use crate::storage::{FileStore, KeyValueStore};
use keyring::Entry;

const KEYRING_SERVICE: &str = "magic-link";

/// Key-value store backed by the OS keychain, one entry per key.
///
/// Falls back to a JSON file when the keychain is unavailable or an
/// operation on it fails.
#[derive(Debug)]
pub struct KeyringStore {
    service: String,
    keyring_available: bool,
    fallback: FileStore,
}

impl KeyringStore {
    pub fn new(fallback: FileStore) -> Self {
        Self::with_service(KEYRING_SERVICE, fallback)
    }

    pub fn with_service(service: &str, fallback: FileStore) -> Self {
        // Probe the keychain once so an unavailable backend is reported a single time
        let keyring_available = match Entry::new(service, "probe") {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(
                    "Keyring is not available on this system ({}), will use file-based storage.",
                    e
                );
                false
            }
        };

        KeyringStore {
            service: service.to_string(),
            keyring_available,
            fallback,
        }
    }

    fn entry(&self, key: &str) -> Option<Entry> {
        if !self.keyring_available {
            return None;
        }
        match Entry::new(&self.service, key) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Failed to open keyring entry for {}: {:?}", key, e);
                None
            }
        }
    }

    fn load_from_keyring(entry: &Entry) -> Result<Option<String>, StorageError> {
        match entry.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// A missing entry counts as deleted. A failed delete is returned while
    /// the keychain can still hand the value back to `get`.
    fn delete_from_keyring(entry: &Entry, key: &str) -> Result<(), StorageError> {
        match entry.delete_password() {
            Ok(()) => {
                tracing::debug!("Deleted {} from keyring", key);
                Ok(())
            }
            Err(keyring::Error::NoEntry) => {
                tracing::debug!("No {} entry found in keyring to delete", key);
                Ok(())
            }
            Err(e) => match entry.get_password() {
                Ok(_) => {
                    tracing::warn!("Failed to delete {} from keyring: {:?}", key, e);
                    Err(e.into())
                }
                Err(_) => {
                    tracing::warn!(
                        "Failed to delete {} from keyring ({:?}), but it is not readable there",
                        key,
                        e
                    );
                    Ok(())
                }
            },
        }
    }
}

impl KeyValueStore for KeyringStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        // Try keyring first
        if let Some(entry) = self.entry(key) {
            match Self::load_from_keyring(&entry) {
                Ok(Some(value)) => {
                    tracing::debug!("Loaded {} from keyring", key);
                    return Ok(Some(value));
                }
                Ok(None) => {
                    tracing::debug!("No {} in keyring, checking file storage", key);
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to load {} from keyring: {:?}. Checking file storage.",
                        key,
                        e
                    );
                }
            }
        }

        let value = self.fallback.get(key)?;

        // Migrate file entries into the keyring when it is usable
        if let Some(ref value) = value
            && let Some(entry) = self.entry(key)
        {
            match entry.set_password(value) {
                Ok(()) => {
                    if let Err(e) = self.fallback.remove(key) {
                        tracing::warn!("Failed to drop migrated {} from file: {:?}", key, e);
                    }
                }
                Err(e) => tracing::warn!("Failed to migrate {} to keyring: {:?}", key, e),
            }
        }

        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(entry) = self.entry(key) {
            match entry.set_password(value) {
                Ok(()) => {
                    tracing::debug!("Saved {} to keyring", key);
                    // Drop any older file copy
                    self.fallback.remove(key)?;
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to save {} to keyring: {:?}. Trying fallback storage.",
                        key,
                        e
                    );
                }
            }
        }

        self.fallback.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        // File copy first, so only the keychain can still hold the value
        self.fallback.remove(key)?;

        match self.entry(key) {
            Some(entry) => Self::delete_from_keyring(&entry, key),
            None => Ok(()),
        }
    }
}
