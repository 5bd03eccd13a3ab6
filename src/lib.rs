//! recipesync: a recipe form that keeps a local list in step with a remote
//! REST collection.
//!
//! - [`models`]: the recipe record and its editable fields
//! - [`api`]: the remote collection, over HTTP or any other [`api::RecipeApi`]
//! - [`sync`]: the [`sync::RecipeForm`] view-model
//! - [`server`]: an in-memory implementation of the REST resource
//! - [`config`]: layered configuration for the binaries

pub mod api;
pub mod config;
pub mod models;
pub mod server;
pub mod sync;
