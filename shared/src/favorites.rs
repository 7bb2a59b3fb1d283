//! Per-user favorites mirrored from a live watch.

use std::collections::HashSet;

use crate::capabilities::{DocumentOutput, DocumentResult, SubscriptionId};
use crate::recipe::{parse_documents, Recipe, RecipeId};

/// The favorites list and its id set. Both are private and only replaced
/// together, so the set always equals the ids of the list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Favorites {
    recipes: Vec<Recipe>,
    ids: HashSet<RecipeId>,
}

impl Favorites {
    #[must_use]
    pub fn from_recipes(recipes: Vec<Recipe>) -> Self {
        let ids = recipes.iter().map(|r| r.id.clone()).collect();
        Self { recipes, ids }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn is_favorite(&self, id: &RecipeId) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    #[must_use]
    pub fn ids(&self) -> &HashSet<RecipeId> {
        &self.ids
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct FavoritesSync {
    pub favorites: Favorites,
    subscription: Option<SubscriptionId>,
}

impl FavoritesSync {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn subscription(&self) -> Option<SubscriptionId> {
        self.subscription
    }

    /// Starts a new watch generation. Returns the new id and the one it
    /// replaces, which the caller must release.
    pub fn begin(&mut self) -> (SubscriptionId, Option<SubscriptionId>) {
        let next = SubscriptionId::generate();
        let previous = self.subscription.replace(next);
        (next, previous)
    }

    /// Drops the projections and forgets the current watch.
    pub fn end(&mut self) -> Option<SubscriptionId> {
        self.favorites.clear();
        self.subscription.take()
    }

    /// Applies one delivery from the watch. Deliveries tagged with anything
    /// but the current id are ignored and `false` is returned.
    pub fn apply(&mut self, subscription: SubscriptionId, result: &DocumentResult) -> bool {
        if self.subscription != Some(subscription) {
            tracing::debug!(%subscription, "ignoring snapshot from released watch");
            return false;
        }

        match result {
            Ok(DocumentOutput::Snapshot(docs) | DocumentOutput::Documents(docs)) => {
                let (recipes, skipped) = parse_documents(docs);
                tracing::debug!(count = recipes.len(), skipped, "favorites snapshot");
                self.favorites = Favorites::from_recipes(recipes);
            }
            Ok(other) => {
                tracing::error!(?other, "unexpected output for favorites watch");
                self.favorites.clear();
            }
            Err(e) => {
                tracing::warn!(error = %e, "favorites watch failed");
                self.favorites.clear();
            }
        }
        true
    }
}
