//! What the shell renders. Built fresh from the model on every `view` call.

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogState, SingleRecipeState};
use crate::model::{Model, Toast};
use crate::recipe::Recipe;
use crate::router::Route;
use crate::session::{AccountDeletion, SessionState};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RecipeCard {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub total_time: String,
    pub calories: String,
    pub is_favorite: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RecipeDetailView {
    pub card: RecipeCard,
    pub prep_time: String,
    pub cook_time: String,
    pub servings: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub nutrition: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CatalogView {
    Loading,
    Ready { recipes: Vec<RecipeCard> },
    Failed { message: String },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DetailView {
    Idle,
    Loading,
    Ready { recipe: Box<RecipeDetailView> },
    Failed { message: String },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ProfileView {
    pub name: String,
    pub email: String,
    pub initials: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PreferencesView {
    pub favorites_enabled: bool,
    pub dark_theme_enabled: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ViewModel {
    pub route: Route,
    pub can_go_back: bool,
    pub session: SessionState,
    pub catalog: CatalogView,
    pub detail: DetailView,
    pub favorites: Vec<RecipeCard>,
    pub preferences: PreferencesView,
    pub profile: Option<ProfileView>,
    pub profile_update_in_flight: bool,
    pub password_reset_in_flight: bool,
    pub deletion: AccountDeletion,
    pub toast: Option<Toast>,
}

fn card(recipe: &Recipe, model: &Model) -> RecipeCard {
    RecipeCard {
        id: recipe.id.as_str().to_string(),
        name: recipe.name.clone(),
        image_url: recipe.image_url.clone(),
        total_time: recipe.total_time.clone(),
        calories: recipe.calories(),
        is_favorite: is_favorite(model, recipe),
    }
}

fn is_favorite(model: &Model, recipe: &Recipe) -> bool {
    model.session.is_authenticated() && model.favorites.favorites.is_favorite(&recipe.id)
}

fn detail(recipe: &Recipe, model: &Model) -> RecipeDetailView {
    RecipeDetailView {
        card: card(recipe, model),
        prep_time: recipe.prep_time.clone(),
        cook_time: recipe.cook_time.display(),
        servings: recipe.servings.display(),
        ingredients: recipe.ingredient_list(),
        steps: recipe.direction_steps(),
        nutrition: recipe.nutrition.clone(),
    }
}

impl ViewModel {
    #[must_use]
    pub fn from_model(model: &Model) -> Self {
        let catalog = match &model.catalog.all {
            CatalogState::Loading => CatalogView::Loading,
            CatalogState::Success(recipes) => CatalogView::Ready {
                recipes: recipes.iter().map(|r| card(r, model)).collect(),
            },
            CatalogState::Error(message) => CatalogView::Failed {
                message: message.clone(),
            },
        };

        let detail = match &model.catalog.selected {
            SingleRecipeState::Idle => DetailView::Idle,
            SingleRecipeState::Loading => DetailView::Loading,
            SingleRecipeState::Success(recipe) => DetailView::Ready {
                recipe: Box::new(detail(recipe, model)),
            },
            SingleRecipeState::Error(message) => DetailView::Failed {
                message: message.clone(),
            },
        };

        let favorites = if model.session.is_authenticated() {
            model
                .favorites
                .favorites
                .recipes()
                .iter()
                .map(|r| card(r, model))
                .collect()
        } else {
            Vec::new()
        };

        let profile = model.signed_in_user().map(|user| ProfileView {
            name: user.name_or_default().to_string(),
            email: user.email.clone().unwrap_or_default(),
            initials: user.initials(),
        });

        Self {
            route: model.router.current().clone(),
            can_go_back: model.router.can_go_back(),
            session: model.session.clone(),
            catalog,
            detail,
            favorites,
            preferences: PreferencesView {
                favorites_enabled: model.preferences.favorites_enabled(),
                dark_theme_enabled: model.preferences.dark_theme_enabled(),
            },
            profile,
            profile_update_in_flight: model.profile_update_in_flight,
            password_reset_in_flight: model.password_reset_in_flight,
            deletion: model.deletion.clone(),
            toast: model.toast.clone(),
        }
    }
}
