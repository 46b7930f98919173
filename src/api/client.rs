use super::types::{
    Category, CategoryPayload, DeleteResponse, ListResponse, PostPayload, PostSummary,
};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

/// Base URL used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";

/// Fallback error text when the server gives neither a message nor a reason phrase.
const GENERIC_FAILURE: &str = "Request failed";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid API base URL '{0}'")]
    InvalidBaseUrl(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Non-success status. `message` comes from the body's `message` field,
    /// falling back to the status reason phrase.
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("Invalid response body: {0}")]
    Decode(serde_json::Error),
    #[error("Failed to encode request body: {0}")]
    Encode(serde_json::Error),
}

impl ApiError {
    /// HTTP status for server-side failures, `None` for transport or decode errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Client for the category/post REST API.
///
/// Cheap to clone: the inner `reqwest::Client` shares its connection pool.
/// No timeouts or retries are applied; a hung request stays pending.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    /// Create a client with a fresh connection pool.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(2)
            .build()?;
        Self::with_client(http, base_url)
    }

    /// Create a client reusing an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, ApiError> {
        let base = Url::parse(base_url.trim())
            .map_err(|_| ApiError::InvalidBaseUrl(base_url.to_string()))?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    // ========================================================================
    // Categories
    // ========================================================================

    /// `GET /category[?parentCategoryId=N]`
    pub async fn list_categories(
        &self,
        parent_category_id: Option<i64>,
    ) -> Result<ListResponse<Category>, ApiError> {
        let mut url = self.endpoint(&["category"]);
        if let Some(parent) = parent_category_id {
            url.query_pairs_mut()
                .append_pair("parentCategoryId", &parent.to_string());
        }
        self.send(Method::GET, url, None).await
    }

    /// `POST /category`
    pub async fn create_category(&self, payload: &CategoryPayload) -> Result<Category, ApiError> {
        let body = encode(payload)?;
        self.send(Method::POST, self.endpoint(&["category"]), Some(body))
            .await
    }

    /// `PUT /category/{id}`
    pub async fn update_category(
        &self,
        id: i64,
        payload: &CategoryPayload,
    ) -> Result<Category, ApiError> {
        let body = encode(payload)?;
        let url = self.endpoint(&["category", &id.to_string()]);
        self.send(Method::PUT, url, Some(body)).await
    }

    /// `DELETE /category/{id}`
    pub async fn delete_category(&self, id: i64) -> Result<DeleteResponse, ApiError> {
        let url = self.endpoint(&["category", &id.to_string()]);
        self.send(Method::DELETE, url, None).await
    }

    // ========================================================================
    // Posts
    // ========================================================================

    /// `GET /post`
    pub async fn list_posts(&self) -> Result<ListResponse<PostSummary>, ApiError> {
        self.send(Method::GET, self.endpoint(&["post"]), None).await
    }

    /// `POST /post`
    pub async fn create_post(&self, payload: &PostPayload) -> Result<PostSummary, ApiError> {
        let body = encode(payload)?;
        self.send(Method::POST, self.endpoint(&["post"]), Some(body))
            .await
    }

    /// `PUT /post/{id}`
    pub async fn update_post(
        &self,
        id: i64,
        payload: &PostPayload,
    ) -> Result<PostSummary, ApiError> {
        let body = encode(payload)?;
        let url = self.endpoint(&["post", &id.to_string()]);
        self.send(Method::PUT, url, Some(body)).await
    }

    /// `DELETE /post/{id}`
    pub async fn delete_post(&self, id: i64) -> Result<DeleteResponse, ApiError> {
        let url = self.endpoint(&["post", &id.to_string()]);
        self.send(Method::DELETE, url, None).await
    }

    // ========================================================================
    // Plumbing
    // ========================================================================

    /// Append path segments to the base URL, keeping any base path prefix.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // cannot_be_a_base URLs are rejected at construction, so this always succeeds
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
    ) -> Result<T, ApiError> {
        tracing::debug!(method = %method, path = %url.path(), "API request");

        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(method = %method, path = %url.path(), error = %e, "API request failed");
            ApiError::Network(e)
        })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = error_message(status, &text);
            tracing::warn!(
                method = %method,
                path = %url.path(),
                status = status.as_u16(),
                message = %message,
                "API returned error status"
            );
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&text).map_err(ApiError::Decode)
    }
}

fn encode<T: serde::Serialize>(payload: &T) -> Result<Vec<u8>, ApiError> {
    serde_json::to_vec(payload).map_err(ApiError::Encode)
}

/// Pick the user-facing message for a failed response.
///
/// Prefers the body's `message` field. Validation-style servers send an array
/// of strings there, which is joined. Otherwise the status reason phrase.
fn error_message(status: StatusCode, body: &str) -> String {
    let from_body = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| match value.get("message") {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
            Some(serde_json::Value::Array(items)) => {
                let parts: Vec<&str> = items.iter().filter_map(|v| v.as_str()).collect();
                (!parts.is_empty()).then(|| parts.join("; "))
            }
            _ => None,
        });

    from_body
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| GENERIC_FAILURE.to_string())
}
