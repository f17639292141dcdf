//! Data-platform HTTP Client
//!
//! A small, type-safe client for the project-scoped REST API that hosts
//! extraction pipelines, datasets and RAW storage.
//!
//! Every endpoint lives below `{base_url}/api/v1/projects/{project}`. Requests
//! carry a bearer token obtained through the OAuth2 client-credentials flow.
//!
//! # Example
//!
//! ```no_run
//! use extpipes_client::{CdfClient, Credentials};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let credentials = Credentials {
//!         client_id: "deployer".to_string(),
//!         client_secret: "secret".to_string(),
//!         token_url: "https://login.example.com/oauth2/token".to_string(),
//!         scopes: vec!["https://api.example.com/.default".to_string()],
//!         audience: None,
//!     };
//!     let client = CdfClient::connect("https://api.example.com", "my-project", &credentials).await?;
//!
//!     for pipeline in client.list_extpipes().await? {
//!         println!("{}", pipeline.external_id);
//!     }
//!     Ok(())
//! }
//! ```

mod auth;
mod datasets;
pub mod error;
mod extpipes;
mod raw;

// Re-export commonly used types
pub use auth::Credentials;
pub use error::{ClientError, Result};

use extpipes_core::dto::ListResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Largest number of items the API accepts in a single write request
pub const MAX_ITEMS_PER_REQUEST: usize = 1000;

/// Page size requested from listing endpoints
const LIST_LIMIT: usize = 1000;

/// HTTP client for one project of the data-platform API
///
/// Methods are organized into logical groups:
/// - Extraction pipelines (list, create, update, delete, config revisions)
/// - Datasets (lookup by external id)
/// - RAW storage (databases, tables)
#[derive(Debug, Clone)]
pub struct CdfClient {
    /// Base URL of the API cluster (e.g., "https://api.example.com")
    base_url: String,
    /// Project every request is scoped to
    project: String,
    /// Bearer token sent with every request
    token: Option<String>,
    /// HTTP client instance
    client: Client,
}

/// Error envelope returned by the API on non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Borrowed `{"items": [...]}` body for batched writes
#[derive(Debug, Serialize)]
struct Batch<'a, T> {
    items: &'a [T],
}

impl CdfClient {
    /// Create a new unauthenticated client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the API cluster
    /// * `project` - The project name
    ///
    /// # Example
    /// ```
    /// use extpipes_client::CdfClient;
    ///
    /// let client = CdfClient::new("https://api.example.com", "my-project");
    /// ```
    pub fn new(base_url: impl Into<String>, project: impl Into<String>) -> Self {
        Self::with_client(base_url, project, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(
        base_url: impl Into<String>,
        project: impl Into<String>,
        client: Client,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            project: project.into(),
            token: None,
            client,
        }
    }

    /// Attach a pre-issued bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Create a client and authenticate it with client credentials
    ///
    /// # Errors
    /// Returns `ClientError::AuthenticationFailed` if the token endpoint
    /// rejects the credentials.
    pub async fn connect(
        base_url: impl Into<String>,
        project: impl Into<String>,
        credentials: &Credentials,
    ) -> Result<Self> {
        let client = Self::new(base_url, project);
        let token = auth::fetch_token(&client.client, credentials).await?;
        debug!(project = %client.project, "Authenticated against {}", client.base_url);
        Ok(client.with_token(token))
    }

    /// Get the base URL of the API cluster
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the project requests are scoped to
    pub fn project(&self) -> &str {
        &self.project
    }

    // =============================================================================
    // Request Helpers
    // =============================================================================

    /// Build `{base_url}/api/v1/projects/{project}/{segments...}`
    ///
    /// Segments are percent-encoded individually, so names containing `/` or
    /// spaces stay a single path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            ClientError::InvalidRequest(format!("invalid base URL '{}': {}", self.base_url, e))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                ClientError::InvalidRequest(format!(
                    "base URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(["api", "v1", "projects", self.project.as_str()])
            .extend(segments);

        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// GET every page of a cursor-paginated listing
    async fn list_all<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<Vec<T>> {
        let url = self.endpoint(segments)?;
        let limit = LIST_LIMIT.to_string();
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut request = self.client.get(url.clone()).query(&[("limit", &limit)]);
            if let Some(cursor) = &cursor {
                request = request.query(&[("cursor", cursor)]);
            }

            let response = self.authorized(request).send().await?;
            let page: ListResponse<T> = self.handle_response(response).await?;
            items.extend(page.items);

            match page.next_cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }

        debug!(count = items.len(), "Listed {}", url.path());
        Ok(items)
    }

    async fn post_json<B, T>(&self, segments: &[&str], body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        let response = self
            .authorized(self.client.post(url))
            .json(body)
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn post_json_empty<B>(&self, segments: &[&str], body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(segments)?;
        let response = self
            .authorized(self.client.post(url))
            .json(body)
            .send()
            .await?;

        self.handle_empty_response(response).await
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response whose body is irrelevant (e.g., delete operations)
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(())
    }
}

/// Turn a failed response into `ClientError::ApiError`
///
/// Prefers the message from the API's error envelope and falls back to the raw body.
async fn api_error(response: reqwest::Response) -> ClientError {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) if !envelope.error.message.is_empty() => envelope.error.message,
        _ => body,
    };

    ClientError::api_error(status, message)
}
