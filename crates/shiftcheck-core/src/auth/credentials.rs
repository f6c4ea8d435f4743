use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use keyring::Entry;
use thiserror::Error;

/// Keychain service name
const SERVICE_NAME: &str = "shiftcheck";

// Fixed keys for the persisted session fields.
pub const TOKEN_KEY: &str = "auth_token";
pub const USERNAME_KEY: &str = "auth_username";
pub const FULL_NAME_KEY: &str = "auth_fullname";
pub const ROLE_KEY: &str = "auth_role";
pub const USER_ID_KEY: &str = "auth_userid";

/// Every key written on login; logout removes all of them.
pub const SESSION_KEYS: [&str; 5] = [TOKEN_KEY, USERNAME_KEY, FULL_NAME_KEY, ROLE_KEY, USER_ID_KEY];

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Keychain error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("Credential storage unavailable: {0}")]
    Unavailable(String),
}

/// Secure, app-private storage of scalar string values under fixed keys.
pub trait CredentialStore: Send + Sync {
    /// Read a value. A missing key is `Ok(None)`, not an error.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a value. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Credentials kept in the OS keychain, one entry per key.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyringStore;

impl KeyringStore {
    pub fn new() -> Self {
        Self
    }

    fn entry(key: &str) -> Result<Entry, StoreError> {
        Ok(Entry::new(SERVICE_NAME, key)?)
    }
}

impl CredentialStore for KeyringStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match Self::entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        Self::entry(key)?.set_password(value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match Self::entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store; contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.remove(key);
        Ok(())
    }
}
