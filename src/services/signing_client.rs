// src/services/signing_client.rs
//! Client for the third-party document signing API.

use crate::error::{PipelineError, Stage};
use crate::models::signing::SignPayload;
use crate::services::auth_client::AccessToken;
use crate::utils::http::ensure_success;
use bytes::Bytes;

/// Submits documents for signing and returns the signed bytes.
#[derive(Clone)]
pub struct SigningClient {
    http: reqwest::Client,
    sign_api_url: String,
}

impl SigningClient {
    pub fn new(http: reqwest::Client, sign_api_url: impl Into<String>) -> Self {
        SigningClient {
            http,
            sign_api_url: sign_api_url.into(),
        }
    }

    /// Sends `payload` as JSON with `token` as bearer credential.
    ///
    /// # Returns
    /// The response body verbatim: the signed file.
    pub async fn sign(&self, payload: &SignPayload, token: &AccessToken) -> Result<Bytes, PipelineError> {
        let stage = Stage::Signing;
        log::debug!("{}: POST {} ({})", stage, self.sign_api_url, payload.file.name);

        let response = self
            .http
            .post(&self.sign_api_url)
            .bearer_auth(token.secret())
            .json(payload)
            .send()
            .await
            .map_err(|e| PipelineError::from_reqwest(stage, e))?;

        ensure_success(stage, response)
            .await?
            .bytes()
            .await
            .map_err(|e| PipelineError::from_reqwest(stage, e))
    }
}
