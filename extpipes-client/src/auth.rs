//! OAuth2 client-credentials authentication

use std::fmt;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::{ClientError, Result};

/// Identity-provider credentials for the client-credentials grant
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub token_url: String,
    /// Requested scopes, sent space-separated
    pub scopes: Vec<String>,
    pub audience: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("token_url", &self.token_url)
            .field("scopes", &self.scopes)
            .field("audience", &self.audience)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Exchange client credentials for an access token
pub(crate) async fn fetch_token(client: &Client, credentials: &Credentials) -> Result<String> {
    let scope = credentials.scopes.join(" ");
    let mut form = vec![
        ("grant_type", "client_credentials"),
        ("client_id", credentials.client_id.as_str()),
        ("client_secret", credentials.client_secret.as_str()),
    ];
    if !scope.is_empty() {
        form.push(("scope", scope.as_str()));
    }
    if let Some(audience) = &credentials.audience {
        form.push(("audience", audience.as_str()));
    }

    let response = client
        .post(&credentials.token_url)
        .form(&form)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::AuthenticationFailed(format!(
            "token endpoint {} returned {}: {}",
            credentials.token_url, status, body
        )));
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| ClientError::ParseError(format!("Failed to parse token response: {}", e)))?;

    debug!(expires_in = ?token.expires_in, "Obtained access token");
    Ok(token.access_token)
}
