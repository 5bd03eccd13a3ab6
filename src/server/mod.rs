//! In-memory implementation of the recipe REST resource.
//!
//! Backs the `recipes-server` development binary and the HTTP client tests.
//!
//! # Endpoints
//!
//! - `GET /health`: health check
//! - `GET /api/recipes`: list all recipes
//! - `POST /api/recipes`: create a recipe, the server assigns the id
//! - `PUT /api/recipes/{id}`: replace a recipe's fields
//! - `DELETE /api/recipes/{id}`: delete a recipe

mod store;

pub use store::RecipeStore;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;

use crate::models::{RecipeFields, RecipeId};

/// Path of the recipe collection on the dev server.
pub const RECIPES_PATH: &str = "/api/recipes";

/// JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

fn error_response(status: StatusCode, error: &'static str, message: String) -> Response {
    (status, Json(ErrorBody { error, message })).into_response()
}

fn not_found(id: &str) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        "not_found",
        format!("Recipe not found: {}", id),
    )
}

fn missing_fields() -> Response {
    error_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        "missing_fields",
        "Name, cuisine, and ingredients are required".to_string(),
    )
}

/// Builds the router over `store`.
pub fn router(store: RecipeStore) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(RECIPES_PATH, get(list_recipes).post(create_recipe))
        .route(
            &format!("{}/{{id}}", RECIPES_PATH),
            put(update_recipe).delete(delete_recipe),
        )
        .with_state(store)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn list_recipes(State(store): State<RecipeStore>) -> Response {
    Json(store.list()).into_response()
}

async fn create_recipe(
    State(store): State<RecipeStore>,
    Json(fields): Json<RecipeFields>,
) -> Response {
    if !fields.is_complete() {
        return missing_fields();
    }
    let recipe = store.insert(fields);
    tracing::info!("Created recipe {}", recipe.id);
    (StatusCode::CREATED, Json(recipe)).into_response()
}

async fn update_recipe(
    State(store): State<RecipeStore>,
    Path(id): Path<String>,
    Json(fields): Json<RecipeFields>,
) -> Response {
    if !fields.is_complete() {
        return missing_fields();
    }
    match store.replace(&RecipeId::from(id.as_str()), fields) {
        Some(recipe) => {
            tracing::info!("Updated recipe {}", recipe.id);
            Json(recipe).into_response()
        }
        None => not_found(&id),
    }
}

async fn delete_recipe(State(store): State<RecipeStore>, Path(id): Path<String>) -> Response {
    match store.remove(&RecipeId::from(id.as_str())) {
        Some(recipe) => {
            tracing::info!("Deleted recipe {}", recipe.id);
            StatusCode::NO_CONTENT.into_response()
        }
        None => not_found(&id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use tower::ServiceExt;

    fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = router(RecipeStore::new());
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_create_assigns_id() {
        let store = RecipeStore::new();
        let app = router(store.clone());

        let response = app
            .oneshot(json_request(
                Method::POST,
                RECIPES_PATH,
                serde_json::json!({
                    "name": "Soup",
                    "cuisine": "FR",
                    "ingredients": "water,salt",
                    "favorite": false
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert!(!body["id"].as_str().unwrap().is_empty());
        assert_eq!(body["name"], "Soup");
        assert_eq!(store.list().len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_fields() {
        let store = RecipeStore::new();
        let app = router(store.clone());

        let response = app
            .oneshot(json_request(
                Method::POST,
                RECIPES_PATH,
                serde_json::json!({"name": "", "cuisine": "FR", "ingredients": "x"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["error"], "missing_fields");
        assert!(store.list().is_empty());
    }

    #[tokio::test]
    async fn test_update_unknown_is_not_found() {
        let app = router(RecipeStore::new());

        let response = app
            .oneshot(json_request(
                Method::PUT,
                &format!("{}/nope", RECIPES_PATH),
                serde_json::json!({"name": "a", "cuisine": "b", "ingredients": "c"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_removes_recipe() {
        let store = RecipeStore::new();
        let recipe = store.insert(RecipeFields::new("Soup", "FR", "water"));
        let app = router(store.clone());

        let response = app
            .oneshot(
                Request::delete(format!("{}/{}", RECIPES_PATH, recipe.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(store.list().is_empty());
    }
}
