use serde::{Deserialize, Serialize};

use crate::recipe::RecipeId;
use crate::session::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HomeTab {
    #[default]
    Recipes,
    AiChat,
    Favorites,
    Profile,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum Route {
    #[default]
    Discover,
    AiChef,
    Login,
    SignUp,
    Home { tab: HomeTab },
    RecipeDetail { id: RecipeId },
    EditProfile,
    PrivacySecurity,
    HelpSupport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteEntry {
    pub path: &'static str,
    pub requires_auth: bool,
}

/// Path name and access rule per route kind.
pub const ROUTES: [(&str, RouteEntry); 9] = [
    ("discover", RouteEntry { path: "discover", requires_auth: false }),
    ("ai_chef", RouteEntry { path: "ai_chef", requires_auth: false }),
    ("login", RouteEntry { path: "login", requires_auth: false }),
    ("sign_up", RouteEntry { path: "sign_up", requires_auth: false }),
    ("home", RouteEntry { path: "home", requires_auth: true }),
    ("recipe_detail", RouteEntry { path: "recipe_detail/{id}", requires_auth: true }),
    ("edit_profile", RouteEntry { path: "edit_profile", requires_auth: true }),
    ("privacy_security", RouteEntry { path: "privacy_security", requires_auth: true }),
    ("help_support", RouteEntry { path: "help_support", requires_auth: true }),
];

impl Route {
    #[must_use]
    pub fn home() -> Self {
        Self::Home {
            tab: HomeTab::Recipes,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Discover => "discover",
            Self::AiChef => "ai_chef",
            Self::Login => "login",
            Self::SignUp => "sign_up",
            Self::Home { .. } => "home",
            Self::RecipeDetail { .. } => "recipe_detail",
            Self::EditProfile => "edit_profile",
            Self::PrivacySecurity => "privacy_security",
            Self::HelpSupport => "help_support",
        }
    }

    #[must_use]
    pub fn entry(&self) -> RouteEntry {
        let kind = self.kind();
        ROUTES
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or(
                RouteEntry {
                    path: kind,
                    requires_auth: true,
                },
                |(_, entry)| *entry,
            )
    }

    #[must_use]
    pub fn requires_auth(&self) -> bool {
        self.entry().requires_auth
    }

    /// Concrete path, with the recipe id substituted in.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::RecipeDetail { id } => self.entry().path.replace("{id}", id.as_str()),
            _ => self.entry().path.to_string(),
        }
    }

    fn is_auth_entry(&self) -> bool {
        matches!(self, Self::Login | Self::SignUp)
    }
}

/// Current route plus the routes beneath it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Router {
    current: Route,
    back_stack: Vec<Route>,
    started: bool,
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current(&self) -> &Route {
        &self.current
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.back_stack.len()
    }

    #[must_use]
    pub fn can_go_back(&self) -> bool {
        !self.back_stack.is_empty()
    }

    fn reset_to(&mut self, route: Route) {
        self.back_stack.clear();
        self.current = route;
    }

    /// Reacts to a session transition. The first settled state picks the
    /// initial route; later ones apply the redirect rules.
    pub fn on_session(&mut self, session: &SessionState) {
        if matches!(session, SessionState::Loading) {
            return;
        }

        if !self.started {
            self.started = true;
            let initial = if session.is_authenticated() {
                Route::home()
            } else {
                Route::Discover
            };
            tracing::debug!(route = initial.kind(), "initial route");
            self.reset_to(initial);
            return;
        }

        if session.is_authenticated() {
            if self.current.is_auth_entry() {
                self.reset_to(Route::home());
            }
        } else if matches!(session, SessionState::Unauthenticated) && self.current.requires_auth() {
            tracing::debug!(from = self.current.kind(), "signed out, redirecting to login");
            self.reset_to(Route::Login);
        }
    }

    /// Pushes `route`, or `Login` when it needs a session the user lacks.
    /// Returns the route actually entered.
    pub fn navigate(&mut self, route: Route, session: &SessionState) -> &Route {
        let target = if route.requires_auth() && !session.is_authenticated() {
            tracing::debug!(to = route.kind(), "route requires sign-in");
            Route::Login
        } else {
            route
        };

        if target != self.current {
            let previous = std::mem::replace(&mut self.current, target);
            self.back_stack.push(previous);
        }
        &self.current
    }

    pub fn back(&mut self) -> bool {
        match self.back_stack.pop() {
            Some(previous) => {
                self.current = previous;
                true
            }
            None => false,
        }
    }

    /// Switches the home tab in place. No-op away from `Home`.
    pub fn select_tab(&mut self, tab: HomeTab) {
        if let Route::Home { tab: current } = &mut self.current {
            *current = tab;
        }
    }
}
