// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! JSON config service over a pluggable blob store.
//!
//! Stores only move bytes; the service owns the JSON encoding, key
//! validation, and the "missing means default" policy used when loading
//! [`WorkspacePrefs`].

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::prefs::{WorkspacePrefs, PREFS_KEY};

/// Blob storage keyed by logical config name.
pub trait ConfigStore {
    /// Raw bytes stored under `key`; `NotFound` when absent.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Replace the bytes stored under `key`.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Config load/save failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Nothing stored under the key.
    #[error("config key not found")]
    NotFound,
    /// Underlying storage failed.
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
    /// Stored bytes are not valid JSON for the requested type.
    #[error("config decode error: {0}")]
    Serde(#[from] serde_json::Error),
    /// The store could not be opened (no config directory, ...).
    #[error("config store unavailable: {0}")]
    Unavailable(String),
    /// Keys are lowercase ASCII words joined by `-` or `_`.
    #[error("invalid config key `{0}`")]
    InvalidKey(String),
}

fn key_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_'
}

/// Reject keys that could not double as a plain file stem.
pub fn check_key(key: &str) -> Result<(), ConfigError> {
    let valid = !key.is_empty() && !key.starts_with(['-', '_']) && key.chars().all(key_char);
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidKey(key.to_owned()))
    }
}

/// Typed JSON access to a [`ConfigStore`].
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Wrap `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The wrapped store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S> ConfigService<S>
where
    S: ConfigStore,
{
    /// Load and deserialize `key`. Returns `Ok(None)` if missing or empty.
    pub fn load<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: DeserializeOwned,
    {
        check_key(key)?;
        match self.store.load_raw(key) {
            Ok(bytes) if bytes.is_empty() => Ok(None),
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(ConfigError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Load `key`, falling back to `T::default()` when it is missing.
    pub fn load_or_default<T>(&self, key: &str) -> Result<T, ConfigError>
    where
        T: DeserializeOwned + Default,
    {
        Ok(self.load(key)?.unwrap_or_default())
    }

    /// Serialize `value` as pretty JSON under `key`.
    pub fn save<T>(&self, key: &str, value: &T) -> Result<(), ConfigError>
    where
        T: Serialize,
    {
        check_key(key)?;
        self.store.save_raw(key, &serde_json::to_vec_pretty(value)?)
    }

    /// Workspace preferences, defaulted when never saved.
    pub fn load_prefs(&self) -> Result<WorkspacePrefs, ConfigError> {
        self.load_or_default(PREFS_KEY)
    }

    /// Persist workspace preferences.
    pub fn save_prefs(&self, prefs: &WorkspacePrefs) -> Result<(), ConfigError> {
        self.save(PREFS_KEY, prefs)
    }

    /// Load, edit and persist the preferences; nothing is written when
    /// `edit` leaves them unchanged. Returns the resulting preferences.
    pub fn update_prefs<F>(&self, edit: F) -> Result<WorkspacePrefs, ConfigError>
    where
        F: FnOnce(&mut WorkspacePrefs),
    {
        let before = self.load_prefs()?;
        let mut after = before.clone();
        edit(&mut after);
        if after != before {
            self.save_prefs(&after)?;
        }
        Ok(after)
    }
}
