use secrecy::ExposeSecret;

use crate::capabilities::{
    Capabilities, CollectionPath, IdentityError, IdentityOutput, IdentityResult, PreferenceKey,
};
use crate::event::Event;
use crate::model::{Model, Toast};
use crate::preferences::PreferenceRead;
use crate::recipe::RecipeId;
use crate::router::Route;
use crate::session::{validate_sign_in, validate_sign_up, AccountDeletion, SessionState, UserProfile};
use crate::view::ViewModel;
use crate::{AppError, ErrorKind, DEFAULT_PREFERENCES_HANDLE, GENERIC_FAILURE_MESSAGE};

pub const RESET_EMAIL_REQUIRED: &str = "Email field can't be empty";
pub const RESET_EMAIL_SENT: &str = "Check spam section in your email";
pub const NAME_REQUIRED: &str = "Name cannot be empty";
pub const PROFILE_UPDATED: &str = "Profile updated successfully";
pub const PASSWORD_REQUIRED: &str = "Password is required";
pub const ACCOUNT_DELETED: &str = "Account deleted successfully";
pub const FAVORITES_DISABLED: &str = "Favorites are disabled in Settings";

#[derive(Default)]
pub struct App;

fn failure_message(e: &IdentityError) -> String {
    AppError::from(e).user_facing_message()
}

impl App {
    fn set_session(model: &mut Model, state: SessionState) {
        if model.session != state {
            tracing::info!(from = ?model.session, to = ?state, "session transition");
        }
        model.session = state;
        model.router.on_session(&model.session);
    }

    fn enter_authenticated(model: &mut Model, caps: &Capabilities, profile: UserProfile) {
        tracing::info!(uid = %profile.uid, "signed in");
        model.session_check.supersede();
        model.profile = Some(profile);
        Self::set_session(model, SessionState::Authenticated);
        Self::subscribe_favorites(model, caps);
    }

    fn enter_unauthenticated(model: &mut Model, caps: &Capabilities) {
        model.session_check.supersede();
        model.profile = None;
        model.deletion = AccountDeletion::Idle;
        model.profile_update_in_flight = false;
        Self::release_favorites(model, caps);
        Self::set_session(model, SessionState::Unauthenticated);
    }

    fn check_session(model: &mut Model, caps: &Capabilities) {
        let ticket = model.session_check.begin();
        caps.identity.current_user(move |result| Event::SessionChecked {
            ticket,
            result: Box::new(result),
        });
    }

    fn fetch_all(model: &mut Model, caps: &Capabilities) {
        let ticket = model.catalog.begin_fetch_all();
        caps.documents.list(CollectionPath::recipes(), move |result| {
            Event::CatalogLoaded {
                ticket,
                result: Box::new(result),
            }
        });
    }

    fn fetch_by_id(model: &mut Model, caps: &Capabilities, id: &RecipeId) {
        let ticket = model.catalog.begin_fetch_by_id();
        caps.documents
            .get(CollectionPath::recipes(), id.to_string(), move |result| {
                Event::RecipeLoaded {
                    ticket,
                    result: Box::new(result),
                }
            });
    }

    /// (Re)opens the live favorites watch for the signed-in user, releasing
    /// the previous one.
    fn subscribe_favorites(model: &mut Model, caps: &Capabilities) {
        let Some(uid) = model.signed_in_user().map(|user| user.uid.clone()) else {
            Self::release_favorites(model, caps);
            return;
        };

        let (subscription, previous) = model.favorites.begin();
        if let Some(previous) = previous {
            Self::unwatch(caps, previous);
        }

        caps.documents.watch(
            subscription,
            CollectionPath::favorites(&uid),
            move |result| Event::FavoritesSnapshot {
                subscription,
                result: Box::new(result),
            },
        );
    }

    fn release_favorites(model: &mut Model, caps: &Capabilities) {
        if let Some(previous) = model.favorites.end() {
            Self::unwatch(caps, previous);
        }
    }

    fn unwatch(caps: &Capabilities, subscription: crate::capabilities::SubscriptionId) {
        caps.documents.unwatch(subscription, move |result| {
            Event::SubscriptionReleased {
                subscription,
                result: Box::new(result),
            }
        });
    }

    fn add_favorite(model: &mut Model, caps: &Capabilities, id: RecipeId) {
        let Some(uid) = model.signed_in_user().map(|user| user.uid.clone()) else {
            tracing::debug!(recipe = %id, "not signed in, ignoring add");
            return;
        };
        if id.is_blank() {
            tracing::debug!("blank recipe id, ignoring add");
            return;
        }

        let Some(recipe) = model.catalog.find(&id) else {
            tracing::warn!(recipe = %id, "favorite target not loaded");
            model.show(Toast::error(format!(
                "Couldn't update favorites: {}",
                crate::catalog::NOT_FOUND_MESSAGE
            )));
            return;
        };

        let fields = match recipe.to_fields() {
            Ok(fields) => fields,
            Err(e) => {
                tracing::error!(recipe = %id, error = %e, "failed to encode favorite");
                model.show(Toast::error(format!(
                    "Couldn't update favorites: {GENERIC_FAILURE_MESSAGE}"
                )));
                return;
            }
        };

        let key = id.to_string();
        caps.documents
            .set(CollectionPath::favorites(&uid), key, fields, move |result| {
                Event::FavoriteWritten {
                    id,
                    result: Box::new(result),
                }
            });
    }

    fn remove_favorite(model: &mut Model, caps: &Capabilities, id: RecipeId) {
        let Some(uid) = model.signed_in_user().map(|user| user.uid.clone()) else {
            tracing::debug!(recipe = %id, "not signed in, ignoring remove");
            return;
        };
        if id.is_blank() {
            tracing::debug!("blank recipe id, ignoring remove");
            return;
        }

        let key = id.to_string();
        caps.documents
            .delete(CollectionPath::favorites(&uid), key, move |result| {
                Event::FavoriteRemoved {
                    id,
                    result: Box::new(result),
                }
            });
    }

    fn set_preference(model: &mut Model, caps: &Capabilities, key: PreferenceKey, value: bool) {
        let Some(write) = model.preferences.set(key, value) else {
            return;
        };
        caps.key_value.set(write.storage_key, write.value, move |result| {
            Event::PreferenceWritten {
                key,
                result: Box::new(result.map_err(|e| e.to_string())),
            }
        });
    }

    fn profile_from(result: &IdentityResult) -> Option<UserProfile> {
        match result {
            Ok(IdentityOutput::SignedIn(profile) | IdentityOutput::User(Some(profile))) => {
                Some(profile.clone())
            }
            _ => None,
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        tracing::debug!(event = event.name(), "update");

        match event {
            Event::AppStarted => {
                Self::set_session(model, SessionState::Loading);
                Self::check_session(model, caps);
                Self::fetch_all(model, caps);
                caps.render.render();
            }

            Event::RefreshCatalog => {
                Self::fetch_all(model, caps);
                caps.render.render();
            }

            // --- Session ---
            Event::CheckSession => Self::check_session(model, caps),

            Event::SessionChecked { ticket, result } => {
                if !model.session_check.finish(ticket) {
                    return;
                }
                match *result {
                    Ok(IdentityOutput::User(Some(profile))) => {
                        Self::enter_authenticated(model, caps, profile);
                    }
                    Ok(_) => Self::enter_unauthenticated(model, caps),
                    Err(e) => {
                        tracing::warn!(error = %e, "session lookup failed, treating as signed out");
                        Self::enter_unauthenticated(model, caps);
                    }
                }
                caps.render.render();
            }

            Event::SignIn { email, password } => {
                if let Err(e) = validate_sign_in(&email, password.expose_secret()) {
                    let message = AppError::from(e).user_facing_message();
                    Self::set_session(model, SessionState::error(message));
                    caps.render.render();
                    return;
                }

                model.session_check.supersede();
                Self::set_session(model, SessionState::Loading);
                caps.identity.sign_in(
                    email,
                    password.expose_secret().clone(),
                    |result| Event::SignedIn(Box::new(result)),
                );
                caps.render.render();
            }

            Event::SignedIn(result) => {
                match (Self::profile_from(&result), *result) {
                    (Some(profile), _) => Self::enter_authenticated(model, caps, profile),
                    (None, Err(e)) => {
                        tracing::warn!(error = %e, "sign in rejected");
                        Self::set_session(model, SessionState::error(failure_message(&e)));
                    }
                    (None, Ok(other)) => {
                        tracing::error!(?other, "unexpected sign in output");
                        Self::set_session(model, SessionState::error(GENERIC_FAILURE_MESSAGE));
                    }
                }
                caps.render.render();
            }

            Event::SignUp {
                name,
                email,
                password,
                confirm_password,
            } => {
                if let Err(e) = validate_sign_up(
                    &name,
                    &email,
                    password.expose_secret(),
                    confirm_password.expose_secret(),
                ) {
                    let message = AppError::from(e).user_facing_message();
                    Self::set_session(model, SessionState::error(message));
                    caps.render.render();
                    return;
                }

                model.session_check.supersede();
                Self::set_session(model, SessionState::Loading);
                caps.identity.create_account(
                    email,
                    password.expose_secret().clone(),
                    move |result| Event::AccountCreated {
                        name,
                        result: Box::new(result),
                    },
                );
                caps.render.render();
            }

            Event::AccountCreated { name, result } => {
                match (Self::profile_from(&result), *result) {
                    (Some(profile), _) => {
                        // Held until the display name attempt settles.
                        model.profile = Some(profile);
                        caps.identity
                            .update_display_name(name.clone(), move |result| {
                                Event::DisplayNameAttached {
                                    name,
                                    result: Box::new(result),
                                }
                            });
                    }
                    (None, Err(e)) => {
                        tracing::warn!(error = %e, "account creation rejected");
                        Self::set_session(model, SessionState::error(failure_message(&e)));
                    }
                    (None, Ok(other)) => {
                        tracing::error!(?other, "unexpected create account output");
                        Self::set_session(model, SessionState::error(GENERIC_FAILURE_MESSAGE));
                    }
                }
                caps.render.render();
            }

            Event::DisplayNameAttached { name, result } => {
                // Signed out since the account was created.
                if model.session != SessionState::Loading {
                    tracing::debug!(
                        session = ?model.session,
                        "sign up no longer pending, ignoring display name"
                    );
                    return;
                }
                let Some(mut profile) = model.profile.take() else {
                    tracing::debug!("no pending account, ignoring display name");
                    return;
                };

                match *result {
                    Ok(_) => profile.display_name = Some(name),
                    Err(e) => tracing::warn!(error = %e, "could not attach display name"),
                }
                Self::enter_authenticated(model, caps, profile);
                caps.render.render();
            }

            Event::SignOut => {
                caps.identity
                    .sign_out(|result| Event::SignedOut(Box::new(result)));
                Self::enter_unauthenticated(model, caps);
                caps.render.render();
            }

            Event::SignedOut(result) => {
                if let Err(e) = *result {
                    tracing::warn!(error = %e, "remote sign out failed");
                }
            }

            Event::ResetPassword { email } => {
                let email = email.trim();
                if email.is_empty() {
                    model.show(Toast::error(RESET_EMAIL_REQUIRED));
                } else {
                    model.password_reset_in_flight = true;
                    caps.identity.send_password_reset(email.to_string(), |result| {
                        Event::PasswordResetSent(Box::new(result))
                    });
                }
                caps.render.render();
            }

            Event::PasswordResetSent(result) => {
                model.password_reset_in_flight = false;
                match *result {
                    Ok(_) => model.show(Toast::success(RESET_EMAIL_SENT)),
                    Err(e) => model.show(Toast::error(format!(
                        "Failed to send reset email: {}",
                        e.message()
                    ))),
                }
                caps.render.render();
            }

            Event::UpdateDisplayName { name } => {
                let name = name.trim().to_string();
                if name.is_empty() {
                    model.show(Toast::error(NAME_REQUIRED));
                    caps.render.render();
                    return;
                }
                if model.signed_in_user().is_none() {
                    tracing::warn!("display name update without a signed in user");
                    return;
                }

                model.profile_update_in_flight = true;
                caps.identity
                    .update_display_name(name.clone(), move |result| {
                        Event::DisplayNameUpdated {
                            name,
                            result: Box::new(result),
                        }
                    });
                caps.render.render();
            }

            Event::DisplayNameUpdated { name, result } => {
                model.profile_update_in_flight = false;
                match *result {
                    Ok(_) => {
                        if let Some(profile) = model.profile.as_mut() {
                            profile.display_name = Some(name);
                        }
                        model.show(Toast::success(PROFILE_UPDATED));
                    }
                    Err(e) => model.show(Toast::error(format!(
                        "Failed to update profile: {}",
                        e.message()
                    ))),
                }
                caps.render.render();
            }

            Event::DeleteAccount { password } => {
                if password.expose_secret().trim().is_empty() {
                    model.deletion = AccountDeletion::Failed {
                        message: PASSWORD_REQUIRED.to_string(),
                    };
                    caps.render.render();
                    return;
                }
                if model.signed_in_user().is_none() {
                    tracing::warn!("account deletion without a signed in user");
                    return;
                }

                model.deletion = AccountDeletion::InProgress;
                caps.identity.reauthenticate(
                    password.expose_secret().clone(),
                    |result| Event::Reauthenticated(Box::new(result)),
                );
                caps.render.render();
            }

            Event::Reauthenticated(result) => {
                if model.deletion != AccountDeletion::InProgress {
                    tracing::debug!("deletion no longer in progress, ignoring");
                    return;
                }
                match *result {
                    Ok(_) => caps
                        .identity
                        .delete_account(|result| Event::AccountDeleted(Box::new(result))),
                    Err(e) => {
                        model.deletion = AccountDeletion::Failed {
                            message: failure_message(&e),
                        };
                    }
                }
                caps.render.render();
            }

            Event::AccountDeleted(result) => {
                match *result {
                    Ok(_) => {
                        tracing::info!("account deleted");
                        Self::enter_unauthenticated(model, caps);
                        model.show(Toast::success(ACCOUNT_DELETED));
                    }
                    Err(e) => {
                        model.deletion = AccountDeletion::Failed {
                            message: failure_message(&e),
                        };
                    }
                }
                caps.render.render();
            }

            // --- Catalog ---
            Event::CatalogLoaded { ticket, result } => {
                if model.catalog.finish_fetch_all(ticket, &result) {
                    caps.render.render();
                }
            }

            Event::RecipeLoaded { ticket, result } => {
                if model.catalog.finish_fetch_by_id(ticket, &result) {
                    caps.render.render();
                }
            }

            // --- Navigation ---
            Event::Navigate(route) => {
                let entered = model.router.navigate(route, &model.session).clone();
                if let Route::RecipeDetail { id } = entered {
                    Self::fetch_by_id(model, caps, &id);
                }
                caps.render.render();
            }

            Event::NavigateBack => {
                if model.router.back() {
                    caps.render.render();
                }
            }

            Event::SelectTab(tab) => {
                model.router.select_tab(tab);
                caps.render.render();
            }

            // --- Favorites ---
            Event::ToggleFavorite { id } => {
                if !model.preferences.favorites_enabled() {
                    model.show(Toast::info(FAVORITES_DISABLED));
                } else if model.favorites.favorites.is_favorite(&id) {
                    Self::remove_favorite(model, caps, id);
                } else {
                    Self::add_favorite(model, caps, id);
                }
                caps.render.render();
            }

            Event::AddFavorite { id } => {
                Self::add_favorite(model, caps, id);
                caps.render.render();
            }

            Event::RemoveFavorite { id } => {
                Self::remove_favorite(model, caps, id);
                caps.render.render();
            }

            Event::FavoritesSnapshot {
                subscription,
                result,
            } => {
                if model.favorites.apply(subscription, &result) {
                    caps.render.render();
                }
            }

            Event::FavoriteWritten { id, result } | Event::FavoriteRemoved { id, result } => {
                match *result {
                    Ok(_) => {
                        tracing::debug!(recipe = %id, "favorites updated, resubscribing");
                        Self::subscribe_favorites(model, caps);
                    }
                    Err(e) => {
                        tracing::warn!(recipe = %id, error = %e, "favorites write failed");
                        model.show(Toast::error(format!(
                            "Couldn't update favorites: {}",
                            e.message()
                        )));
                    }
                }
                caps.render.render();
            }

            Event::SubscriptionReleased {
                subscription,
                result,
            } => {
                if let Err(e) = *result {
                    tracing::warn!(%subscription, error = %e, "failed to release watch");
                }
            }

            // --- Preferences ---
            Event::OpenPreferences { handle } => {
                let handle = handle.as_deref().unwrap_or(DEFAULT_PREFERENCES_HANDLE);
                match model.preferences.open(handle) {
                    Ok(reads) => {
                        for read in reads {
                            let PreferenceRead {
                                key,
                                storage_key,
                                generation,
                            } = read;
                            caps.key_value.get(storage_key, move |result| {
                                Event::PreferenceLoaded {
                                    key,
                                    generation,
                                    value: Box::new(result.map_err(|e| e.to_string())),
                                }
                            });
                        }
                    }
                    Err(e) => {
                        let error = AppError::from(&e);
                        tracing::error!(%error, "cannot open preferences");
                    }
                }
                caps.render.render();
            }

            Event::ClosePreferences => {
                model.preferences.close();
                caps.render.render();
            }

            Event::SetFavoritesEnabled(value) => {
                Self::set_preference(model, caps, PreferenceKey::FavoritesEnabled, value);
                caps.render.render();
            }

            Event::SetDarkThemeEnabled(value) => {
                Self::set_preference(model, caps, PreferenceKey::DarkTheme, value);
                caps.render.render();
            }

            Event::PreferenceLoaded {
                key,
                generation,
                value,
            } => {
                if model.preferences.apply_loaded(key, generation, &value) {
                    caps.render.render();
                }
            }

            Event::PreferenceWritten { key, result } => {
                if let Err(message) = *result {
                    let error = AppError::new(ErrorKind::Storage, message);
                    tracing::warn!(key = key.name(), %error, "failed to persist preference");
                }
            }

            Event::DismissToast => {
                model.toast = None;
                caps.render.render();
            }
        }
    }

    fn view(&self, model: &Model) -> ViewModel {
        ViewModel::from_model(model)
    }
}
