use crate::models::{Recipe, RecipeFields, RecipeId};

/// Contents of the input form plus the record it is editing, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub fields: RecipeFields,
    edit_target: Option<RecipeId>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A form loaded with `recipe`'s fields, set to update that recipe.
    pub fn editing(recipe: &Recipe) -> Self {
        Self {
            fields: recipe.fields.clone(),
            edit_target: Some(recipe.id.clone()),
        }
    }

    pub fn edit_target(&self) -> Option<&RecipeId> {
        self.edit_target.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.edit_target.is_some()
    }

    /// Empties every field and drops the edit target.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
