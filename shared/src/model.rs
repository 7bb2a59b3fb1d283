use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::favorites::FavoritesSync;
use crate::preferences::Preferences;
use crate::router::Router;
use crate::session::{AccountDeletion, SessionCheck, SessionState, UserProfile};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

/// Transient message for the shell to show once.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }
}

/// Core state. Only `App::update` writes it.
#[derive(Debug, Default)]
pub struct Model {
    pub session: SessionState,
    pub profile: Option<UserProfile>,
    pub session_check: SessionCheck,

    // Catalog and detail lookups
    pub catalog: Catalog,

    // Favorites (live watch of the signed-in user's favorites)
    pub favorites: FavoritesSync,

    pub preferences: Preferences,
    pub router: Router,

    // Generic UI state
    pub toast: Option<Toast>,
    pub deletion: AccountDeletion,
    pub profile_update_in_flight: bool,
    pub password_reset_in_flight: bool,
}

impl Model {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current user, only while the session is authenticated.
    #[must_use]
    pub fn signed_in_user(&self) -> Option<&UserProfile> {
        if self.session.is_authenticated() {
            self.profile.as_ref()
        } else {
            None
        }
    }

    pub fn show(&mut self, toast: Toast) {
        tracing::debug!(kind = ?toast.kind, message = %toast.message, "toast");
        self.toast = Some(toast);
    }
}
