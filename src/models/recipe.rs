use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier assigned by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(String);

impl RecipeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecipeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RecipeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The editable part of a recipe: everything except the server-assigned id.
///
/// This is also the request body for create and update calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeFields {
    pub name: String,
    pub cuisine: String,
    /// Free text, not parsed into individual ingredients.
    pub ingredients: String,
    #[serde(default)]
    pub favorite: bool,
}

impl RecipeFields {
    pub fn new(
        name: impl Into<String>,
        cuisine: impl Into<String>,
        ingredients: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            cuisine: cuisine.into(),
            ingredients: ingredients.into(),
            favorite: false,
        }
    }

    pub fn with_favorite(mut self, favorite: bool) -> Self {
        self.favorite = favorite;
        self
    }

    /// True when every required text field has content.
    pub fn is_complete(&self) -> bool {
        [&self.name, &self.cuisine, &self.ingredients]
            .iter()
            .all(|s| !s.trim().is_empty())
    }
}

/// A recipe as returned by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Document stores hand this out as `_id`; both spellings are accepted.
    #[serde(alias = "_id")]
    pub id: RecipeId,
    #[serde(flatten)]
    pub fields: RecipeFields,
}

impl Recipe {
    pub fn new(id: impl Into<RecipeId>, fields: RecipeFields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    pub fn name(&self) -> &str {
        &self.fields.name
    }

    pub fn cuisine(&self) -> &str {
        &self.fields.cuisine
    }

    pub fn ingredients(&self) -> &str {
        &self.fields.ingredients
    }

    pub fn is_favorite(&self) -> bool {
        self.fields.favorite
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let star = if self.is_favorite() { " *" } else { "" };
        writeln!(f, "{} - {}{}", self.name(), self.cuisine(), star)?;
        write!(f, "  Ingredients: {}", self.ingredients())
    }
}
