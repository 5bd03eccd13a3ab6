use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use crate::models::{Recipe, RecipeFields, RecipeId};

/// Thread-safe, insertion-ordered recipe collection.
#[derive(Debug, Clone, Default)]
pub struct RecipeStore {
    recipes: Arc<RwLock<Vec<Recipe>>>,
}

impl RecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `recipes`.
    pub fn with_recipes(recipes: Vec<Recipe>) -> Self {
        Self {
            recipes: Arc::new(RwLock::new(recipes)),
        }
    }

    // A panicked writer cannot leave a half-updated Vec behind, so a
    // poisoned lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, Vec<Recipe>> {
        self.recipes.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Recipe>> {
        self.recipes.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn list(&self) -> Vec<Recipe> {
        self.read().clone()
    }

    /// Appends a new recipe under a fresh UUID.
    pub fn insert(&self, fields: RecipeFields) -> Recipe {
        let recipe = Recipe::new(Uuid::new_v4().to_string(), fields);
        self.write().push(recipe.clone());
        recipe
    }

    /// Replaces the fields of `id`, keeping its position.
    pub fn replace(&self, id: &RecipeId, fields: RecipeFields) -> Option<Recipe> {
        let mut recipes = self.write();
        let recipe = recipes.iter_mut().find(|r| &r.id == id)?;
        recipe.fields = fields;
        Some(recipe.clone())
    }

    pub fn remove(&self, id: &RecipeId) -> Option<Recipe> {
        let mut recipes = self.write();
        let index = recipes.iter().position(|r| &r.id == id)?;
        Some(recipes.remove(index))
    }
}
