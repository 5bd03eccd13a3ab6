//! Recipe API development server
//!
//! Serves an in-memory recipe collection with the same REST shape as the
//! production API, so the `recipes` CLI can be run locally.
//!
//! # Configuration
//!
//! Environment variables:
//! - `RECIPES_SERVER_PORT`: Port to listen on (default: 8080)
//! - `RECIPES_SEED`: Path to a JSON array of recipes to start with (optional)
//!
//! # Endpoints
//!
//! - `GET /health`: Health check endpoint
//! - `GET /api/recipes`, `POST /api/recipes`
//! - `PUT /api/recipes/{id}`, `DELETE /api/recipes/{id}`

use std::net::SocketAddr;
use std::path::PathBuf;

use recipesync::models::Recipe;
use recipesync::server::{router, RecipeStore, RECIPES_PATH};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Server configuration
#[derive(Debug, Clone)]
struct Config {
    /// Port to listen on
    port: u16,
    /// Optional JSON file of initial recipes
    seed: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        let port = std::env::var("RECIPES_SERVER_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let seed = std::env::var("RECIPES_SEED").ok().map(PathBuf::from);

        Self { port, seed }
    }
}

/// Reads the seed file, falling back to an empty store on any problem.
fn load_store(seed: Option<&PathBuf>) -> RecipeStore {
    let Some(path) = seed else {
        return RecipeStore::new();
    };

    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str::<Vec<Recipe>>(&contents) {
            Ok(recipes) => {
                tracing::info!("Loaded {} seed recipe(s)", recipes.len());
                RecipeStore::with_recipes(recipes)
            }
            Err(e) => {
                tracing::warn!("Failed to parse seed file {}: {}", path.display(), e);
                RecipeStore::new()
            }
        },
        Err(e) => {
            tracing::warn!("Failed to read seed file {}: {}", path.display(), e);
            RecipeStore::new()
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "recipesync=info,recipes_server=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let store = load_store(config.seed.as_ref());

    let app = router(store).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Recipes at http://{}{}", addr, RECIPES_PATH);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
