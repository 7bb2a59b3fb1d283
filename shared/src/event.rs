use secrecy::SecretString;
use serde::Deserialize;

use crate::capabilities::{DocumentResult, IdentityResult, PreferenceKey, SubscriptionId};
use crate::catalog::RequestTicket;
use crate::recipe::RecipeId;
use crate::router::{HomeTab, Route};

/// Outcome of a key/value read or write, with the store error flattened to text.
pub type StoreResult = Result<Option<Vec<u8>>, String>;

// --- Event enum: shell-facing variants first, capability callbacks skipped from serde ---

#[derive(Deserialize, Clone, Debug)]
pub enum Event {
    // Lifecycle
    AppStarted,
    RefreshCatalog,

    // Session
    CheckSession,
    SignIn {
        email: String,
        password: SecretString,
    },
    SignUp {
        name: String,
        email: String,
        password: SecretString,
        confirm_password: SecretString,
    },
    SignOut,
    ResetPassword {
        email: String,
    },
    UpdateDisplayName {
        name: String,
    },
    DeleteAccount {
        password: SecretString,
    },

    // Navigation
    Navigate(Route),
    NavigateBack,
    SelectTab(HomeTab),

    // Favorites
    ToggleFavorite {
        id: RecipeId,
    },
    AddFavorite {
        id: RecipeId,
    },
    RemoveFavorite {
        id: RecipeId,
    },

    // Preferences
    /// Opens the preference store; `None` uses the default handle.
    OpenPreferences {
        handle: Option<String>,
    },
    ClosePreferences,
    SetFavoritesEnabled(bool),
    SetDarkThemeEnabled(bool),

    DismissToast,

    // Capability responses (boxed to keep the enum small)
    #[serde(skip)]
    SessionChecked {
        ticket: RequestTicket,
        result: Box<IdentityResult>,
    },
    #[serde(skip)]
    SignedIn(Box<IdentityResult>),
    #[serde(skip)]
    AccountCreated {
        name: String,
        result: Box<IdentityResult>,
    },
    #[serde(skip)]
    DisplayNameAttached {
        name: String,
        result: Box<IdentityResult>,
    },
    #[serde(skip)]
    DisplayNameUpdated {
        name: String,
        result: Box<IdentityResult>,
    },
    #[serde(skip)]
    PasswordResetSent(Box<IdentityResult>),
    #[serde(skip)]
    SignedOut(Box<IdentityResult>),
    #[serde(skip)]
    Reauthenticated(Box<IdentityResult>),
    #[serde(skip)]
    AccountDeleted(Box<IdentityResult>),

    #[serde(skip)]
    CatalogLoaded {
        ticket: RequestTicket,
        result: Box<DocumentResult>,
    },
    #[serde(skip)]
    RecipeLoaded {
        ticket: RequestTicket,
        result: Box<DocumentResult>,
    },

    #[serde(skip)]
    FavoritesSnapshot {
        subscription: SubscriptionId,
        result: Box<DocumentResult>,
    },
    #[serde(skip)]
    FavoriteWritten {
        id: RecipeId,
        result: Box<DocumentResult>,
    },
    #[serde(skip)]
    FavoriteRemoved {
        id: RecipeId,
        result: Box<DocumentResult>,
    },
    #[serde(skip)]
    SubscriptionReleased {
        subscription: SubscriptionId,
        result: Box<DocumentResult>,
    },

    #[serde(skip)]
    PreferenceLoaded {
        key: PreferenceKey,
        generation: u64,
        value: Box<StoreResult>,
    },
    #[serde(skip)]
    PreferenceWritten {
        key: PreferenceKey,
        result: Box<StoreResult>,
    },
}

impl Event {
    /// Variant name for logging. Never includes payloads.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AppStarted => "app_started",
            Self::RefreshCatalog => "refresh_catalog",
            Self::CheckSession => "check_session",
            Self::SignIn { .. } => "sign_in",
            Self::SignUp { .. } => "sign_up",
            Self::SignOut => "sign_out",
            Self::ResetPassword { .. } => "reset_password",
            Self::UpdateDisplayName { .. } => "update_display_name",
            Self::DeleteAccount { .. } => "delete_account",
            Self::Navigate(_) => "navigate",
            Self::NavigateBack => "navigate_back",
            Self::SelectTab(_) => "select_tab",
            Self::ToggleFavorite { .. } => "toggle_favorite",
            Self::AddFavorite { .. } => "add_favorite",
            Self::RemoveFavorite { .. } => "remove_favorite",
            Self::OpenPreferences { .. } => "open_preferences",
            Self::ClosePreferences => "close_preferences",
            Self::SetFavoritesEnabled(_) => "set_favorites_enabled",
            Self::SetDarkThemeEnabled(_) => "set_dark_theme_enabled",
            Self::DismissToast => "dismiss_toast",
            Self::SessionChecked { .. } => "session_checked",
            Self::SignedIn(_) => "signed_in",
            Self::AccountCreated { .. } => "account_created",
            Self::DisplayNameAttached { .. } => "display_name_attached",
            Self::DisplayNameUpdated { .. } => "display_name_updated",
            Self::PasswordResetSent(_) => "password_reset_sent",
            Self::SignedOut(_) => "signed_out",
            Self::Reauthenticated(_) => "reauthenticated",
            Self::AccountDeleted(_) => "account_deleted",
            Self::CatalogLoaded { .. } => "catalog_loaded",
            Self::RecipeLoaded { .. } => "recipe_loaded",
            Self::FavoritesSnapshot { .. } => "favorites_snapshot",
            Self::FavoriteWritten { .. } => "favorite_written",
            Self::FavoriteRemoved { .. } => "favorite_removed",
            Self::SubscriptionReleased { .. } => "subscription_released",
            Self::PreferenceLoaded { .. } => "preference_loaded",
            Self::PreferenceWritten { .. } => "preference_written",
        }
    }
}
