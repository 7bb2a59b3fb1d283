use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{AppError, ErrorKind, KEY_DARK_THEME, KEY_FAVORITES_ENABLED};

pub const MAX_HANDLE_LENGTH: usize = 64;

/// Namespace handed to the preference store by the shell. Every stored key
/// is prefixed with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorageHandle(String);

impl StorageHandle {
    pub fn new(handle: impl Into<String>) -> Result<Self, KeyError> {
        let handle = handle.into();
        if handle.is_empty() {
            return Err(KeyError::InvalidHandle {
                handle,
                reason: "storage handle cannot be empty".to_string(),
            });
        }
        if handle.len() > MAX_HANDLE_LENGTH {
            return Err(KeyError::InvalidHandle {
                handle,
                reason: format!("storage handle exceeds maximum length of {MAX_HANDLE_LENGTH} bytes"),
            });
        }
        if !handle
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
        {
            return Err(KeyError::InvalidHandle {
                handle,
                reason: "storage handle contains invalid characters".to_string(),
            });
        }
        Ok(Self(handle))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fully qualified key for one preference.
    #[must_use]
    pub fn key(&self, preference: PreferenceKey) -> String {
        format!("{}:{}", self.0, preference.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PreferenceKey {
    FavoritesEnabled,
    DarkTheme,
}

impl PreferenceKey {
    pub const ALL: [Self; 2] = [Self::FavoritesEnabled, Self::DarkTheme];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FavoritesEnabled => KEY_FAVORITES_ENABLED,
            Self::DarkTheme => KEY_DARK_THEME,
        }
    }
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum KeyError {
    #[error("invalid storage handle '{handle}': {reason}")]
    InvalidHandle { handle: String, reason: String },

    #[error("stored value is not a boolean: {message}")]
    Decode { message: String },
}

impl From<&KeyError> for AppError {
    fn from(e: &KeyError) -> Self {
        let error = AppError::new(ErrorKind::Storage, "Preferences unavailable")
            .with_internal(e.to_string());
        match e {
            KeyError::InvalidHandle { handle, .. } => error.with_context("handle", handle.clone()),
            KeyError::Decode { .. } => error,
        }
    }
}

#[must_use]
pub fn encode_bool(value: bool) -> Vec<u8> {
    if value {
        b"true".to_vec()
    } else {
        b"false".to_vec()
    }
}

pub fn decode_bool(bytes: &[u8]) -> Result<bool, KeyError> {
    serde_json::from_slice(bytes).map_err(|e| KeyError::Decode {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_validation_empty() {
        assert!(matches!(
            StorageHandle::new(""),
            Err(KeyError::InvalidHandle { .. })
        ));
    }

    #[test]
    fn test_handle_validation_invalid_chars() {
        assert!(StorageHandle::new("cook mate").is_err());
        assert!(StorageHandle::new("../prefs").is_err());
        assert!(StorageHandle::new("prefs\0").is_err());
    }

    #[test]
    fn test_handle_validation_too_long() {
        assert!(StorageHandle::new("a".repeat(MAX_HANDLE_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_qualified_keys() {
        let handle = StorageHandle::new("cook_mate_prefs").unwrap();
        assert_eq!(
            handle.key(PreferenceKey::FavoritesEnabled),
            "cook_mate_prefs:favorites_enabled"
        );
        assert_eq!(
            handle.key(PreferenceKey::DarkTheme),
            "cook_mate_prefs:dark_theme_enabled"
        );
    }

    #[test]
    fn test_bool_encoding() {
        assert_eq!(decode_bool(&encode_bool(true)), Ok(true));
        assert_eq!(decode_bool(&encode_bool(false)), Ok(false));
        assert!(decode_bool(b"yes").is_err());
        assert!(decode_bool(b"").is_err());
    }

    #[test]
    fn test_key_errors_are_storage_errors() {
        let e = StorageHandle::new("bad handle").unwrap_err();
        let error = AppError::from(&e);
        assert_eq!(error.kind, ErrorKind::Storage);
        assert_eq!(error.code(), "STORAGE_ERROR");
        assert_eq!(error.context.get("handle").map(String::as_str), Some("bad handle"));

        let e = decode_bool(b"maybe").unwrap_err();
        let error = AppError::from(&e);
        assert_eq!(error.kind, ErrorKind::Storage);
        assert!(error.to_string().contains("not a boolean"));
    }
}
