// src/storage/solid_client.rs
//! Solid POD storage client.
//!
//! Creates resources in a POD container with a plain `POST`:
//! - the request body becomes the resource content
//! - `Slug` suggests a name for the new resource
//! - the server answers with the created resource's URL in `Location`
//!
//! Any 2xx status counts as success. The server may ignore the slug, so the
//! `Location` header is the only reliable pointer to what was created.

use crate::error::{PipelineError, Stage};
use crate::utils::http::{ensure_success, location};
use crate::utils::serialization::serialize_pretty;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;

/// Naming hint header understood by Solid / LDP servers.
pub const SLUG: &str = "Slug";

/// Client for one POD container endpoint.
#[derive(Clone)]
pub struct SolidStorage {
    http: reqwest::Client,
    endpoint: String,
}

impl SolidStorage {
    /// Creates a client posting into `endpoint`.
    ///
    /// # Arguments
    /// * `http` - Shared client carrying the per-call deadline
    /// * `endpoint` - Container URL, e.g. `https://pod.example/alice/dids/`
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        SolidStorage {
            http,
            endpoint: endpoint.into(),
        }
    }

    /// Creates a resource from raw bytes.
    ///
    /// # Returns
    /// - `Ok(Some(url))` with the `Location` of the created resource
    /// - `Ok(None)` if the server created it without saying where
    /// - `Err(PipelineError::Collaborator)` on any non-2xx answer, with the
    ///   server's status and body
    pub async fn store_data(
        &self,
        stage: Stage,
        data: impl Into<reqwest::Body>,
        content_type: &str,
        slug: &str,
    ) -> Result<Option<String>, PipelineError> {
        log::debug!("{}: POST {} (Slug: {})", stage, self.endpoint, slug);

        let response = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, content_type)
            .header(SLUG, slug)
            .body(data)
            .send()
            .await
            .map_err(|e| PipelineError::from_reqwest(stage, e))?;

        let response = ensure_success(stage, response).await?;
        Ok(location(&response))
    }

    /// Creates a resource holding `obj` as indented JSON text.
    pub async fn store_json<T: Serialize>(
        &self,
        stage: Stage,
        obj: &T,
        content_type: &str,
        slug: &str,
    ) -> Result<Option<String>, PipelineError> {
        let json_str = serialize_pretty(obj)?;
        self.store_data(stage, json_str, content_type, slug).await
    }
}
