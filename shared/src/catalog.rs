//! Catalog list and single-recipe lookups.
//!
//! Each fetch is stamped with a ticket. Only the answer carrying the newest
//! ticket for its state variable is applied, so overlapping fetches resolve
//! to the most recent request regardless of the order the answers arrive in.

use serde::{Deserialize, Serialize};

use crate::capabilities::{DocumentOutput, DocumentResult};
use crate::recipe::{parse_documents, Recipe, RecipeId};
use crate::{AppError, ErrorKind};

pub const NOT_FOUND_MESSAGE: &str = "Recipe not found";
pub const INVALID_DATA_MESSAGE: &str = "Invalid recipe data";
pub const NETWORK_ERROR_PREFIX: &str = "Network error: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestTicket(pub u64);

#[derive(Debug, Clone, PartialEq, Default)]
pub enum CatalogState {
    #[default]
    Loading,
    Success(Vec<Recipe>),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SingleRecipeState {
    #[default]
    Idle,
    Loading,
    Success(Recipe),
    Error(String),
}

#[derive(Debug, Default)]
pub struct Catalog {
    pub all: CatalogState,
    pub selected: SingleRecipeState,
    issued: u64,
    latest_all: Option<RequestTicket>,
    latest_selected: Option<RequestTicket>,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_ticket(&mut self) -> RequestTicket {
        self.issued += 1;
        RequestTicket(self.issued)
    }

    pub fn begin_fetch_all(&mut self) -> RequestTicket {
        let ticket = self.next_ticket();
        self.latest_all = Some(ticket);
        self.all = CatalogState::Loading;
        ticket
    }

    /// Applies a list answer. Returns `false` when the answer was stale.
    pub fn finish_fetch_all(&mut self, ticket: RequestTicket, result: &DocumentResult) -> bool {
        if self.latest_all != Some(ticket) {
            tracing::debug!(ticket = ticket.0, "dropping stale catalog response");
            return false;
        }

        self.all = match result {
            Ok(DocumentOutput::Documents(docs)) => {
                let (recipes, skipped) = parse_documents(docs);
                tracing::info!(loaded = recipes.len(), skipped, "catalog loaded");
                CatalogState::Success(recipes)
            }
            Ok(other) => {
                tracing::error!(?other, "unexpected output for catalog list");
                CatalogState::Error(crate::GENERIC_FAILURE_MESSAGE.to_string())
            }
            Err(e) => {
                tracing::warn!(error = %e, "catalog fetch failed");
                CatalogState::Error(AppError::from(e).user_facing_message())
            }
        };
        true
    }

    pub fn begin_fetch_by_id(&mut self) -> RequestTicket {
        let ticket = self.next_ticket();
        self.latest_selected = Some(ticket);
        self.selected = SingleRecipeState::Loading;
        ticket
    }

    /// Applies a single-document answer. Returns `false` when the answer was stale.
    pub fn finish_fetch_by_id(&mut self, ticket: RequestTicket, result: &DocumentResult) -> bool {
        if self.latest_selected != Some(ticket) {
            tracing::debug!(ticket = ticket.0, "dropping stale recipe response");
            return false;
        }

        self.selected = match result {
            Ok(DocumentOutput::Document(Some(doc))) => match Recipe::from_document(doc) {
                Ok(recipe) => SingleRecipeState::Success(recipe),
                Err(e) => {
                    let error = AppError::from(&e);
                    tracing::warn!(%error, "recipe document failed to parse");
                    SingleRecipeState::Error(error.user_facing_message())
                }
            },
            Ok(DocumentOutput::Document(None)) => {
                let error = AppError::new(ErrorKind::NotFound, NOT_FOUND_MESSAGE);
                tracing::info!(%error, "recipe lookup came back empty");
                SingleRecipeState::Error(error.user_facing_message())
            }
            Ok(other) => {
                tracing::error!(?other, "unexpected output for recipe lookup");
                SingleRecipeState::Error(crate::GENERIC_FAILURE_MESSAGE.to_string())
            }
            Err(e) => SingleRecipeState::Error(format!("{NETWORK_ERROR_PREFIX}{}", e.message())),
        };
        true
    }

    /// Looks a recipe up in whatever has been loaded, detail first.
    #[must_use]
    pub fn find(&self, id: &RecipeId) -> Option<&Recipe> {
        if let SingleRecipeState::Success(recipe) = &self.selected {
            if &recipe.id == id {
                return Some(recipe);
            }
        }
        match &self.all {
            CatalogState::Success(recipes) => recipes.iter().find(|r| &r.id == id),
            _ => None,
        }
    }
}
