// src/services/api_server.rs
//! API Server for the DID generator
//!
//! Exposes a single endpoint, `POST /generate-did`, which mints a fresh
//! `did:web` identity, publishes its DID Document to a Solid POD and, when
//! signing is configured, has a PDF signed on the identity's behalf and
//! publishes the signed copy next to it.
//!
//! Every response is JSON: either the success shape or
//! `{ "error": ..., "details": ... }`.

use crate::settings::Settings;
use crate::error::ApiError;
use crate::services::did_publisher::{DidPublisher, Publication, PublishRequest};
use crate::storage::solid_client::SolidStorage;
use crate::utils::http::build_client;
use crate::wallet::key_management::KeyManager;
use axum::{
    body::Bytes,
    extract::{Json, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_DOMAIN: &str = "example.com";
pub const DEFAULT_PATH: &str = "user/alice";

/// Placeholder reported when the POD did not return a `Location` header.
pub const UNKNOWN_LOCATION: &str = "unknown";

// API request and response structures

/// Request payload for generating a DID. Every field is optional.
#[derive(Serialize, Deserialize, Debug, Default)]
struct GenerateDIDRequest {
    domain: Option<String>,
    path: Option<String>,
    dni: Option<String>,
    email: Option<String>,
    name: Option<String>,
}

impl GenerateDIDRequest {
    /// Applies defaults. Empty strings count as absent.
    fn into_publish_request(self) -> PublishRequest {
        PublishRequest {
            domain: non_empty(self.domain).unwrap_or_else(|| DEFAULT_DOMAIN.to_string()),
            path: non_empty(self.path).unwrap_or_else(|| DEFAULT_PATH.to_string()),
            dni: non_empty(self.dni),
            email: non_empty(self.email),
            name: non_empty(self.name),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// `application/json` or any `+json` media type, parameters ignored.
fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

/// Reads the request body. Bodies that are not declared as JSON, and empty
/// JSON bodies, mean "all defaults".
fn parse_request(headers: &HeaderMap, body: &[u8]) -> Result<GenerateDIDRequest, ApiError> {
    if !is_json(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(GenerateDIDRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            "Invalid request body",
            Some(e.to_string()),
        )
    })
}

/// Response for a successful run
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(untagged)]
enum GenerateDIDResponse {
    /// Signing flow
    Signed {
        did: String,
        #[serde(rename = "uploadedDidDocumentUrl")]
        uploaded_did_document_url: String,
        #[serde(rename = "signedPdfUrl")]
        signed_pdf_url: String,
    },
    /// DID-only flow
    DidDocument {
        did: String,
        #[serde(rename = "uploadedTo")]
        uploaded_to: String,
    },
}

impl From<Publication> for GenerateDIDResponse {
    fn from(publication: Publication) -> Self {
        let or_unknown = |url: Option<String>| url.unwrap_or_else(|| UNKNOWN_LOCATION.to_string());
        match publication {
            Publication::DidDocument {
                did,
                did_document_url,
            } => GenerateDIDResponse::DidDocument {
                did,
                uploaded_to: or_unknown(did_document_url),
            },
            Publication::Signed {
                did,
                did_document_url,
                signed_pdf_url,
            } => GenerateDIDResponse::Signed {
                did,
                uploaded_did_document_url: or_unknown(did_document_url),
                signed_pdf_url: or_unknown(signed_pdf_url),
            },
        }
    }
}

/// API server state shared by every request
#[derive(Clone)]
pub struct ApiServer {
    /// Pipeline and its collaborator clients
    publisher: Arc<DidPublisher>,

    /// Deadline for a whole request
    request_timeout: Duration,
}

impl ApiServer {
    /// Wires the collaborator clients described by `settings`.
    ///
    /// # Errors
    /// Fails only if the HTTP client cannot be constructed (e.g. no TLS
    /// backend available).
    pub fn new(settings: &Settings) -> Result<Self, reqwest::Error> {
        let http = build_client(settings.http_timeout())?;
        let storage = SolidStorage::new(http.clone(), settings.solid_url.clone());

        let mut publisher = DidPublisher::new(KeyManager::new(), storage);
        if let Some(signing) = settings.signing() {
            publisher = publisher.with_signing(http, signing);
        }

        Ok(ApiServer {
            publisher: Arc::new(publisher),
            request_timeout: settings.request_timeout(),
        })
    }

    /// Whether requests run the signing flow.
    pub fn signs_documents(&self) -> bool {
        self.publisher.signs_documents()
    }

    /// Builds the router.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/generate-did", post(Self::generate_did_handler))
            .with_state(Arc::new(self.clone()))
    }

    /// Starts the API server and begins listening for requests
    ///
    /// # Arguments
    /// * `addr` - Socket address to bind to (e.g., "0.0.0.0:3001")
    pub async fn run(&self, addr: SocketAddr) -> std::io::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        log::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router()).await
    }

    /// Generates a DID and publishes it
    ///
    /// # Endpoint
    /// POST /generate-did
    ///
    /// # Request Body
    /// Optional JSON object: `domain`, `path`, and for the signing flow
    /// `dni`, `email`, `name`
    ///
    /// # Responses
    /// - 200 OK: `{ did, uploadedTo }` or `{ did, uploadedDidDocumentUrl, signedPdfUrl }`
    /// - 400 Bad Request: JSON body is not a valid request object
    /// - 408 Request Timeout: the whole run exceeded the request deadline
    /// - 504 Gateway Timeout: a collaborator did not answer in time
    /// - 500 Internal Server Error: token request or internal failure
    /// - any other status: passed through from the rejecting collaborator
    async fn generate_did_handler(
        State(state): State<Arc<ApiServer>>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<Json<GenerateDIDResponse>, ApiError> {
        let request = parse_request(&headers, &body)?.into_publish_request();

        // Dropping the pipeline future on expiry cancels the outbound call in flight.
        let publication = tokio::time::timeout(state.request_timeout, state.publisher.publish(&request))
            .await
            .map_err(|_| {
                log::error!("request for {} exceeded {:?}", request.path, state.request_timeout);
                ApiError::new(StatusCode::REQUEST_TIMEOUT, "Request timed out", None)
            })?
            .map_err(|e| ApiError::from_pipeline(e, state.publisher.generic_failure_message()))?;

        let response = GenerateDIDResponse::from(publication);
        match &response {
            GenerateDIDResponse::Signed { did, .. } | GenerateDIDResponse::DidDocument { did, .. } => {
                log::info!("published {}", did)
            }
        }
        Ok(Json(response))
    }
}
