//! Device-local user preferences.
//!
//! The store is closed until the shell opens it with a storage handle. While
//! closed, reads return the defaults and writes are dropped. Opening issues a
//! read for every key, stamped with the open's generation; a loaded value only
//! lands if that open is still current and the key was not set since.

use std::collections::HashSet;

use crate::capabilities::{decode_bool, encode_bool, KeyError, PreferenceKey, StorageHandle};
use crate::{AppError, ErrorKind, DEFAULT_DARK_THEME_ENABLED, DEFAULT_FAVORITES_ENABLED};

/// A key/value read the caller must issue after `open`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceRead {
    pub key: PreferenceKey,
    pub storage_key: String,
    pub generation: u64,
}

/// A key/value write the caller must issue after a setter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceWrite {
    pub key: PreferenceKey,
    pub storage_key: String,
    pub value: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct Preferences {
    handle: Option<StorageHandle>,
    generation: u64,
    favorites_enabled: bool,
    dark_theme_enabled: bool,
    set_since_open: HashSet<PreferenceKey>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            handle: None,
            generation: 0,
            favorites_enabled: DEFAULT_FAVORITES_ENABLED,
            dark_theme_enabled: DEFAULT_DARK_THEME_ENABLED,
            set_since_open: HashSet::new(),
        }
    }
}

impl Preferences {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    #[must_use]
    pub fn handle(&self) -> Option<&StorageHandle> {
        self.handle.as_ref()
    }

    /// Bumped by every successful `open`, never reset.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn favorites_enabled(&self) -> bool {
        self.favorites_enabled
    }

    #[must_use]
    pub fn dark_theme_enabled(&self) -> bool {
        self.dark_theme_enabled
    }

    /// Opens the store under `handle`. Returns the reads to issue; empty when
    /// the store was already open.
    pub fn open(&mut self, handle: &str) -> Result<Vec<PreferenceRead>, KeyError> {
        if let Some(current) = &self.handle {
            tracing::debug!(handle = current.as_str(), "preferences already open");
            return Ok(Vec::new());
        }

        let handle = StorageHandle::new(handle)?;
        let generation = self.generation + 1;
        let reads = PreferenceKey::ALL
            .iter()
            .map(|&key| PreferenceRead {
                key,
                storage_key: handle.key(key),
                generation,
            })
            .collect();

        tracing::info!(handle = handle.as_str(), generation, "opening preferences");
        *self = Self {
            handle: Some(handle),
            generation,
            ..Self::default()
        };
        Ok(reads)
    }

    pub fn close(&mut self) {
        if let Some(handle) = self.handle.take() {
            tracing::info!(handle = handle.as_str(), "closing preferences");
        }
        *self = Self {
            generation: self.generation,
            ..Self::default()
        };
    }

    #[must_use]
    pub fn get(&self, key: PreferenceKey) -> bool {
        match key {
            PreferenceKey::FavoritesEnabled => self.favorites_enabled,
            PreferenceKey::DarkTheme => self.dark_theme_enabled,
        }
    }

    fn mirror(&mut self, key: PreferenceKey, value: bool) {
        match key {
            PreferenceKey::FavoritesEnabled => self.favorites_enabled = value,
            PreferenceKey::DarkTheme => self.dark_theme_enabled = value,
        }
    }

    /// Updates the mirror and returns the write to persist it, or `None`
    /// when the store is closed.
    pub fn set(&mut self, key: PreferenceKey, value: bool) -> Option<PreferenceWrite> {
        let Some(handle) = &self.handle else {
            tracing::debug!(key = key.name(), "preferences closed, dropping write");
            return None;
        };
        let storage_key = handle.key(key);

        self.set_since_open.insert(key);
        self.mirror(key, value);
        Some(PreferenceWrite {
            key,
            storage_key,
            value: encode_bool(value),
        })
    }

    /// Applies the answer to an `open` read. `generation` must be the one the
    /// read was issued under. Returns whether the mirror changed source.
    pub fn apply_loaded(
        &mut self,
        key: PreferenceKey,
        generation: u64,
        value: &Result<Option<Vec<u8>>, String>,
    ) -> bool {
        if !self.is_open() {
            tracing::debug!(key = key.name(), "preferences closed, ignoring load");
            return false;
        }
        if generation != self.generation {
            tracing::debug!(
                key = key.name(),
                generation,
                current = self.generation,
                "ignoring load from an earlier open"
            );
            return false;
        }
        if self.set_since_open.contains(&key) {
            tracing::debug!(key = key.name(), "value set since open, ignoring load");
            return false;
        }

        match value {
            Ok(Some(bytes)) => match decode_bool(bytes) {
                Ok(stored) => {
                    self.mirror(key, stored);
                    true
                }
                Err(e) => {
                    let error = AppError::from(&e);
                    tracing::warn!(key = key.name(), %error, "keeping default");
                    false
                }
            },
            Ok(None) => false,
            Err(message) => {
                let error = AppError::new(ErrorKind::Storage, message.as_str());
                tracing::warn!(key = key.name(), %error, "preference read failed");
                false
            }
        }
    }
}
