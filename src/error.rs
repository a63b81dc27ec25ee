// src/error.rs
//! Error taxonomy for the DID generation pipeline.
//!
//! [`PipelineError`] is what the pipeline stages return. It keeps enough
//! context (stage, upstream status, upstream body) for the HTTP boundary to
//! decide what the caller is allowed to see. [`ApiError`] is that boundary
//! representation and implements [`IntoResponse`].

use axum::{
    extract::Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// A pipeline stage that talks to an external collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Publishing the DID Document to the Solid POD.
    DidDocumentUpload,
    /// Client-credentials token request.
    AuthToken,
    /// Submitting the PDF to the signing API.
    Signing,
    /// Publishing the signed PDF to the Solid POD.
    SignedPdfUpload,
}

impl Stage {
    /// Message returned to the caller when the collaborator rejects the call.
    pub fn failure_message(self) -> &'static str {
        match self {
            Stage::DidDocumentUpload => "Upload to Solid failed",
            Stage::AuthToken => "Failed to get auth token",
            Stage::Signing => "Signing failed",
            Stage::SignedPdfUpload => "Uploading signed PDF failed",
        }
    }

    /// Short name used in logs and timeout details.
    pub fn name(self) -> &'static str {
        match self {
            Stage::DidDocumentUpload => "did-document-upload",
            Stage::AuthToken => "auth-token",
            Stage::Signing => "signing",
            Stage::SignedPdfUpload => "signed-pdf-upload",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors produced while generating and publishing a DID.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("RSA key generation failed: {0}")]
    KeyGeneration(String),

    #[error("{stage} rejected with status {status}: {body}")]
    Collaborator {
        stage: Stage,
        status: u16,
        body: String,
    },

    #[error("could not read local resource {}: {source}", .path.display())]
    LocalResource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage} timed out")]
    Timeout { stage: Stage },

    #[error("{stage} request failed: {source}")]
    Transport {
        stage: Stage,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected response from {stage}: {reason}")]
    InvalidResponse { stage: Stage, reason: String },

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PipelineError {
    /// Classifies a `reqwest` failure, separating deadline expiry from other
    /// transport errors.
    pub fn from_reqwest(stage: Stage, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            PipelineError::Timeout { stage }
        } else {
            PipelineError::Transport { stage, source }
        }
    }
}

/// JSON error body: `{ "error": ..., "details": ... }`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Error as seen by the HTTP caller.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>, details: Option<String>) -> Self {
        ApiError {
            status,
            body: ErrorBody {
                error: error.into(),
                details,
            },
        }
    }

    /// Maps a pipeline failure to what the caller sees.
    ///
    /// Collaborator rejections pass the upstream status and body through (the
    /// token endpoint always maps to 500). Internal failures are logged here
    /// and answered with `generic_message` only.
    pub fn from_pipeline(error: PipelineError, generic_message: &'static str) -> Self {
        match error {
            PipelineError::Collaborator {
                stage,
                status,
                body,
            } => {
                log::warn!("{} rejected with status {}", stage, status);
                let status = match stage {
                    Stage::AuthToken => StatusCode::INTERNAL_SERVER_ERROR,
                    _ => StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                };
                ApiError::new(status, stage.failure_message(), Some(body))
            }
            PipelineError::Timeout { stage } => {
                log::error!("{} exceeded its deadline", stage);
                ApiError::new(
                    StatusCode::GATEWAY_TIMEOUT,
                    "Upstream request timed out",
                    Some(stage.name().to_string()),
                )
            }
            other => {
                log::error!("{}", other);
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, generic_message, None)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENERIC: &str = "Failed to generate or upload DID";

    #[test]
    fn test_collaborator_status_passes_through() {
        let error = ApiError::from_pipeline(
            PipelineError::Collaborator {
                stage: Stage::DidDocumentUpload,
                status: 507,
                body: "quota exceeded".into(),
            },
            GENERIC,
        );

        assert_eq!(error.status, StatusCode::INSUFFICIENT_STORAGE);
        assert_eq!(error.body.error, "Upload to Solid failed");
        assert_eq!(error.body.details.as_deref(), Some("quota exceeded"));
    }

    #[test]
    fn test_token_rejection_is_internal_error() {
        let error = ApiError::from_pipeline(
            PipelineError::Collaborator {
                stage: Stage::AuthToken,
                status: 401,
                body: "invalid_client".into(),
            },
            GENERIC,
        );

        assert_eq!(error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.body.error, "Failed to get auth token");
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let error = ApiError::from_pipeline(
            PipelineError::LocalResource {
                path: PathBuf::from("missing.pdf"),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            },
            GENERIC,
        );

        assert_eq!(error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.body.error, GENERIC);
        assert!(error.body.details.is_none());
    }

    #[test]
    fn test_timeout_maps_to_gateway_timeout() {
        let error = ApiError::from_pipeline(PipelineError::Timeout { stage: Stage::Signing }, GENERIC);

        assert_eq!(error.status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(error.body.details.as_deref(), Some("signing"));
    }

    #[test]
    fn test_details_omitted_when_absent() {
        let body = serde_json::to_value(ErrorBody {
            error: "boom".into(),
            details: None,
        })
        .unwrap();

        assert_eq!(body, serde_json::json!({ "error": "boom" }));
    }
}
