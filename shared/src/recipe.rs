//! Recipe records as stored in the document store.
//!
//! Documents are loosely shaped: any field may be missing, and `servings` /
//! `cook_time` arrive as numbers or strings depending on who wrote them.
//! Parsing is lenient about absence and strict about shape, so a record with
//! a missing name still loads while a record whose name is an array is skipped.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::capabilities::Document;
use crate::{AppError, ErrorKind};

typed_id!(RecipeId);

/// A value that may be a number, a string or missing in the source document.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LooseValue {
    Number(serde_json::Number),
    Text(String),
    #[default]
    Absent,
}

impl LooseValue {
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
            Self::Absent => String::new(),
        }
    }

    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl From<&str> for LooseValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i64> for LooseValue {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl Serialize for LooseValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Number(n) => n.serialize(serializer),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Absent => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for LooseValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Self::Absent),
            Value::Number(n) => Ok(Self::Number(n)),
            Value::String(s) => Ok(Self::Text(s)),
            Value::Bool(b) => Ok(Self::Text(b.to_string())),
            Value::Array(_) => Err(de::Error::custom("expected number or text, found array")),
            Value::Object(_) => Err(de::Error::custom("expected number or text, found object")),
        }
    }
}

fn text_or_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Field layout of a recipe document. The names are the store's, not ours.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct RecipeFields {
    #[serde(deserialize_with = "text_or_null")]
    recipe_name: String,
    #[serde(deserialize_with = "text_or_null")]
    img_src: String,
    #[serde(deserialize_with = "text_or_null")]
    total_time: String,
    #[serde(deserialize_with = "text_or_null")]
    prep_time: String,
    cook_time: LooseValue,
    servings: LooseValue,
    #[serde(deserialize_with = "text_or_null")]
    ingredients: String,
    #[serde(deserialize_with = "text_or_null")]
    directions: String,
    #[serde(deserialize_with = "text_or_null")]
    nutrition: String,
}

#[derive(Debug, Error)]
pub enum RecipeParseError {
    #[error("document {id} is not an object")]
    NotAnObject { id: String },
    #[error("document {id} has a malformed field: {source}")]
    InvalidField {
        id: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("recipe {id} could not be encoded: {source}")]
    Encode {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

impl RecipeParseError {
    #[must_use]
    pub fn document_id(&self) -> &str {
        match self {
            Self::NotAnObject { id } | Self::InvalidField { id, .. } | Self::Encode { id, .. } => id,
        }
    }
}

impl From<&RecipeParseError> for AppError {
    fn from(e: &RecipeParseError) -> Self {
        let kind = match e {
            RecipeParseError::Encode { .. } => ErrorKind::Internal,
            _ => ErrorKind::Deserialization,
        };
        AppError::new(kind, "Invalid recipe data")
            .with_internal(e.to_string())
            .with_context("document", e.document_id())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    pub image_url: String,
    pub total_time: String,
    pub prep_time: String,
    pub cook_time: LooseValue,
    pub servings: LooseValue,
    pub ingredients: String,
    pub directions: String,
    pub nutrition: String,
}

impl Recipe {
    /// Builds a recipe from a store document; the document id becomes the recipe id.
    pub fn from_document(doc: &Document) -> Result<Self, RecipeParseError> {
        if !doc.data.is_object() {
            return Err(RecipeParseError::NotAnObject { id: doc.id.clone() });
        }

        let fields = RecipeFields::deserialize(&doc.data).map_err(|source| {
            RecipeParseError::InvalidField {
                id: doc.id.clone(),
                source,
            }
        })?;

        Ok(Self {
            id: RecipeId::new(doc.id.clone()),
            name: fields.recipe_name,
            image_url: fields.img_src,
            total_time: fields.total_time,
            prep_time: fields.prep_time,
            cook_time: fields.cook_time,
            servings: fields.servings,
            ingredients: fields.ingredients,
            directions: fields.directions,
            nutrition: fields.nutrition,
        })
    }

    /// Document body used when the recipe is written to a user's favorites.
    pub fn to_fields(&self) -> Result<Value, RecipeParseError> {
        let fields = RecipeFields {
            recipe_name: self.name.clone(),
            img_src: self.image_url.clone(),
            total_time: self.total_time.clone(),
            prep_time: self.prep_time.clone(),
            cook_time: self.cook_time.clone(),
            servings: self.servings.clone(),
            ingredients: self.ingredients.clone(),
            directions: self.directions.clone(),
            nutrition: self.nutrition.clone(),
        };

        serde_json::to_value(fields).map_err(|source| RecipeParseError::Encode {
            id: self.id.to_string(),
            source,
        })
    }

    /// Text after the first colon of the `Calories` segment of the nutrition
    /// string, or empty when there is no such segment.
    #[must_use]
    pub fn calories(&self) -> String {
        calories_from_nutrition(&self.nutrition)
    }

    #[must_use]
    pub fn ingredient_list(&self) -> Vec<String> {
        self.ingredients
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    #[must_use]
    pub fn direction_steps(&self) -> Vec<String> {
        self.directions
            .lines()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[must_use]
pub fn calories_from_nutrition(nutrition: &str) -> String {
    nutrition
        .split(',')
        .find(|segment| segment.trim().starts_with("Calories"))
        .and_then(|segment| segment.split_once(':'))
        .map(|(_, value)| value.trim().to_string())
        .unwrap_or_default()
}

/// Parses every document, skipping the ones that fail. Returns the parsed
/// recipes and the number of skipped documents.
#[must_use]
pub fn parse_documents(docs: &[Document]) -> (Vec<Recipe>, usize) {
    let mut recipes = Vec::with_capacity(docs.len());
    let mut skipped = 0;

    for doc in docs {
        match Recipe::from_document(doc) {
            Ok(recipe) => recipes.push(recipe),
            Err(e) => {
                tracing::warn!(document = %doc.id, error = %e, "skipping unparsable recipe");
                skipped += 1;
            }
        }
    }

    (recipes, skipped)
}
