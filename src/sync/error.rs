//! Error types for the recipe view-model.

use std::fmt;

use thiserror::Error;

use crate::api::ApiError;
use crate::models::RecipeId;

/// The user action an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Submit,
    Delete,
}

/// What went wrong, independent of which operation it happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required field is empty. Detected locally.
    Validation,
    /// No response from the store.
    Transport,
    /// The store answered with a non-success status.
    Rejected,
    /// The store answered with a body that could not be decoded.
    Malformed,
    /// Another mutation for the same form or record is still pending.
    Busy,
    /// The id is not in the local collection.
    NotFound,
}

/// Errors returned by [`RecipeForm`](super::RecipeForm) operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncError {
    #[error("Name, cuisine, and ingredients are required")]
    MissingFields,
    #[error("A submission is already in progress")]
    SubmitInFlight,
    #[error("A change to recipe {0} is already in progress")]
    RecordInFlight(RecipeId),
    #[error("Recipe not found: {0}")]
    NotFound(RecipeId),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl SyncError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SyncError::MissingFields => ErrorKind::Validation,
            SyncError::SubmitInFlight | SyncError::RecordInFlight(_) => ErrorKind::Busy,
            SyncError::NotFound(_) => ErrorKind::NotFound,
            SyncError::Api(ApiError::Transport(_)) => ErrorKind::Transport,
            SyncError::Api(ApiError::Rejected { .. }) => ErrorKind::Rejected,
            SyncError::Api(ApiError::Malformed(_)) => ErrorKind::Malformed,
        }
    }
}

/// The latest user-visible failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorState {
    pub operation: Operation,
    pub kind: ErrorKind,
}

impl ErrorState {
    pub fn new(operation: Operation, kind: ErrorKind) -> Self {
        Self { operation, kind }
    }

    /// Static message shown in the form's error region.
    pub fn message(&self) -> &'static str {
        if self.kind == ErrorKind::Validation {
            return "Name, cuisine, and ingredients are required";
        }
        match self.operation {
            Operation::Fetch => "Failed to fetch recipes",
            Operation::Submit => "There was an error submitting the data",
            Operation::Delete => "There was an error deleting the recipe",
        }
    }

    /// Whether repeating the same action could succeed without changes.
    pub fn is_retryable(&self) -> bool {
        self.kind == ErrorKind::Transport
    }
}

impl fmt::Display for ErrorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
