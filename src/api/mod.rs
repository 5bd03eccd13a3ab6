//! Access to the remote recipe collection.
//!
//! The view-model talks to the store only through [`RecipeApi`], so it can
//! run against the HTTP service in production and an in-memory fake in tests.

mod http;

pub use http::HttpRecipeApi;

use std::future::Future;

use thiserror::Error;

use crate::models::{Recipe, RecipeFields, RecipeId};

/// Failure of a single remote call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (connect failure, reset, timeout).
    #[error("Transport error: {0}")]
    Transport(String),
    /// The store answered with a non-success status.
    #[error("Server rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
    /// The store answered with success but the body did not decode.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl ApiError {
    /// Transport failures may succeed when retried; the others will not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }
}

/// CRUD operations on a remote collection of recipes.
pub trait RecipeApi {
    /// `GET <base>`
    fn list(&self) -> impl Future<Output = Result<Vec<Recipe>, ApiError>> + Send;

    /// `POST <base>`; the store assigns the id.
    fn create(
        &self,
        fields: &RecipeFields,
    ) -> impl Future<Output = Result<Recipe, ApiError>> + Send;

    /// `PUT <base>/<id>`
    fn update(
        &self,
        id: &RecipeId,
        fields: &RecipeFields,
    ) -> impl Future<Output = Result<Recipe, ApiError>> + Send;

    /// `DELETE <base>/<id>`; any success status counts.
    fn delete(&self, id: &RecipeId) -> impl Future<Output = Result<(), ApiError>> + Send;
}
