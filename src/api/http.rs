//! reqwest-backed client for the recipe REST resource.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use super::{ApiError, RecipeApi};
use crate::models::{Recipe, RecipeFields, RecipeId};

/// HTTP client for a REST collection rooted at `base_url`.
#[derive(Debug, Clone)]
pub struct HttpRecipeApi {
    client: Client,
    base_url: String,
}

impl HttpRecipeApi {
    /// Creates a client for the collection at `base_url`.
    ///
    /// Every request is abandoned after `timeout` and reported as a
    /// transport error.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of a single record: `<base>/<id>` with the id percent-encoded.
    fn record_url(&self, id: &RecipeId) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(id.as_str()))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Best effort: surface the server's own message when it sends one
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v["message"].as_str().map(str::to_string))
            .filter(|m| !m.is_empty())
            .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            });

        Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let bytes = response.bytes().await.map_err(transport_error)?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Malformed(e.to_string()))
    }
}

fn transport_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Transport(format!("request timed out: {}", e))
    } else {
        ApiError::Transport(e.to_string())
    }
}

impl RecipeApi for HttpRecipeApi {
    async fn list(&self) -> Result<Vec<Recipe>, ApiError> {
        tracing::debug!("GET {}", self.base_url);
        let response = self.send(self.client.get(&self.base_url)).await?;
        Self::decode(response).await
    }

    async fn create(&self, fields: &RecipeFields) -> Result<Recipe, ApiError> {
        tracing::debug!("POST {}", self.base_url);
        let response = self
            .send(self.client.post(&self.base_url).json(fields))
            .await?;
        Self::decode(response).await
    }

    async fn update(&self, id: &RecipeId, fields: &RecipeFields) -> Result<Recipe, ApiError> {
        let url = self.record_url(id);
        tracing::debug!("PUT {}", url);
        let response = self.send(self.client.put(&url).json(fields)).await?;
        Self::decode(response).await
    }

    async fn delete(&self, id: &RecipeId) -> Result<(), ApiError> {
        let url = self.record_url(id);
        tracing::debug!("DELETE {}", url);
        self.send(self.client.delete(&url)).await?;
        Ok(())
    }
}
