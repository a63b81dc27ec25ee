// src/utils/http.rs
//! Shared outbound HTTP plumbing.

use crate::error::{PipelineError, Stage};
use std::time::Duration;

/// Deadline for establishing a TCP/TLS connection.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds the connection-pooled client shared by every collaborator.
///
/// `timeout` bounds each call from send to the end of the response body.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .build()
}

/// Passes 2xx responses through; turns anything else into
/// [`PipelineError::Collaborator`] carrying the upstream status and body.
pub async fn ensure_success(
    stage: Stage,
    response: reqwest::Response,
) -> Result<reqwest::Response, PipelineError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .map_err(|e| PipelineError::from_reqwest(stage, e))?;
    Err(PipelineError::Collaborator {
        stage,
        status: status.as_u16(),
        body,
    })
}

/// Value of the `Location` response header, if present and valid UTF-8.
pub fn location(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
