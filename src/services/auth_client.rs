// src/services/auth_client.rs
//! OAuth2 client-credentials token client.
//!
//! Exchanges the configured client id and secret for a bearer token used by
//! the signing API. Tokens are requested per signing call and never cached.

use crate::error::{PipelineError, Stage};
use crate::utils::http::ensure_success;
use crate::utils::serialization::deserialize;
use serde::Deserialize;
use std::fmt;

/// Scope requested with every token.
pub const TOKEN_SCOPE: &str = "openid";

/// A bearer token. `Debug` does not print the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Client for the token endpoint.
#[derive(Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl AuthClient {
    pub fn new(
        http: reqwest::Client,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        AuthClient {
            http,
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Requests a token with the client-credentials grant.
    ///
    /// # Errors
    /// - [`PipelineError::Collaborator`] if the endpoint answers non-2xx
    /// - [`PipelineError::InvalidResponse`] if the body has no `access_token`
    pub async fn fetch_token(&self) -> Result<AccessToken, PipelineError> {
        let stage = Stage::AuthToken;
        log::debug!("{}: POST {}", stage, self.token_url);

        let form = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "client_credentials"),
            ("scope", TOKEN_SCOPE),
        ];
        let response = self
            .http
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| PipelineError::from_reqwest(stage, e))?;

        let body = ensure_success(stage, response)
            .await?
            .text()
            .await
            .map_err(|e| PipelineError::from_reqwest(stage, e))?;

        let token: TokenResponse = deserialize(&body).map_err(|e| PipelineError::InvalidResponse {
            stage,
            reason: e.to_string(),
        })?;
        Ok(AccessToken(token.access_token))
    }
}
