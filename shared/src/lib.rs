// lib.rs - CookMate shared core

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

/// Newtype over a string identifier handed out by a remote service.
macro_rules! typed_id {
    ($name:ident) => {
        #[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            #[must_use]
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

pub mod app;
pub mod capabilities;
pub mod catalog;
pub mod event;
pub mod favorites;
pub mod model;
pub mod preferences;
pub mod recipe;
pub mod router;
pub mod session;
pub mod view;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use catalog::{CatalogState, SingleRecipeState};
pub use crux_core::{render::Render, App as CruxApp};
pub use event::Event;
pub use favorites::Favorites;
pub use model::{Model, Toast, ToastKind};
pub use preferences::Preferences;
pub use recipe::{LooseValue, Recipe, RecipeId};
pub use router::{HomeTab, Route};
pub use session::{SessionState, UserId, UserProfile};
pub use view::ViewModel;

/// Collection holding the public recipe catalog.
pub const RECIPES_COLLECTION: &str = "recipes";
/// Parent collection of per-user data; favorites live under `users/<uid>/favorites`.
pub const USERS_COLLECTION: &str = "users";
pub const FAVORITES_SUBCOLLECTION: &str = "favorites";

pub const MIN_PASSWORD_LENGTH: usize = 6;

pub const DEFAULT_PREFERENCES_HANDLE: &str = "cook_mate_prefs";
pub const KEY_FAVORITES_ENABLED: &str = "favorites_enabled";
pub const KEY_DARK_THEME: &str = "dark_theme_enabled";
pub const DEFAULT_FAVORITES_ENABLED: bool = true;
pub const DEFAULT_DARK_THEME_ENABLED: bool = false;

pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Network,
    Authentication,
    Validation,
    NotFound,
    PermissionDenied,
    Deserialization,
    Storage,
    Internal,
    Unknown,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Network => "NETWORK_ERROR",
            Self::Authentication => "AUTH_ERROR",
            Self::Validation => "VALIDATION_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::PermissionDenied => "FORBIDDEN",
            Self::Deserialization => "DESERIALIZATION_ERROR",
            Self::Storage => "STORAGE_ERROR",
            Self::Internal => "INTERNAL_ERROR",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }
}

/// Error value that crosses from a capability or validation step into model state.
///
/// Nothing in the core returns these to the shell directly: `update` folds them
/// into a state variant or a toast.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    pub internal_message: Option<String>,
    pub context: HashMap<String, String>,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            internal_message: None,
            context: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_internal(mut self, internal: impl Into<String>) -> Self {
        self.internal_message = Some(internal.into());
        self
    }

    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Text shown to the user. Service and validation messages are shown
    /// verbatim; an empty message falls back to the generic text.
    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            ErrorKind::Deserialization => "Invalid recipe data".into(),
            ErrorKind::Internal => GENERIC_FAILURE_MESSAGE.into(),
            _ if self.message.trim().is_empty() => GENERIC_FAILURE_MESSAGE.into(),
            _ => self.message.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)?;
        if let Some(internal) = &self.internal_message {
            write!(f, " (internal: {internal})")?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ErrorKind::Network.code(), "NETWORK_ERROR");
        assert_eq!(ErrorKind::NotFound.code(), "NOT_FOUND");
        assert_eq!(AppError::new(ErrorKind::Validation, "x").code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_user_facing_message_verbatim() {
        let e = AppError::new(ErrorKind::Authentication, "The password is invalid.");
        assert_eq!(e.user_facing_message(), "The password is invalid.");
    }

    #[test]
    fn test_user_facing_message_fallback() {
        let e = AppError::new(ErrorKind::Network, "  ");
        assert_eq!(e.user_facing_message(), GENERIC_FAILURE_MESSAGE);

        let e = AppError::new(ErrorKind::Internal, "lock poisoned");
        assert_eq!(e.user_facing_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn test_display_includes_internal() {
        let e = AppError::new(ErrorKind::Storage, "write failed").with_internal("disk full");
        assert_eq!(e.to_string(), "[STORAGE_ERROR] write failed (internal: disk full)");
    }
}
