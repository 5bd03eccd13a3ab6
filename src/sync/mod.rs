//! Client-side synchronization between the recipe form and the remote store.
//!
//! # Usage
//!
//! ```no_run
//! use std::time::Duration;
//! use recipesync::api::HttpRecipeApi;
//! use recipesync::sync::RecipeForm;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let api = HttpRecipeApi::new("http://localhost:8080/api/recipes", Duration::from_secs(30))?;
//! let mut form = RecipeForm::mount(api).await;
//!
//! form.set_name("Soup");
//! form.set_cuisine("FR");
//! form.set_ingredients("water, salt");
//! form.submit().await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod form;
mod view_model;

pub use error::{ErrorKind, ErrorState, Operation, SyncError};
pub use form::FormState;
pub use view_model::{DeleteOutcome, PendingDelete, PendingSubmit, RecipeForm, SubmitOutcome};
