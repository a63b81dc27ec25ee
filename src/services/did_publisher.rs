// src/services/did_publisher.rs
//! DID generation and publication pipeline.
//!
//! One call to [`DidPublisher::publish`] runs these stages in order, stopping
//! at the first failure:
//! 1. generate an RSA keypair and derive the `did:web` DID and its document
//! 2. upload the DID Document to the Solid POD
//! 3. (signing flow) read the local PDF and hash it
//! 4. (signing flow) fetch an OAuth2 token
//! 5. (signing flow) have the signing API sign the PDF
//! 6. (signing flow) upload the signed PDF to the Solid POD
//!
//! Nothing is retried and nothing already uploaded is rolled back.

use crate::settings::SigningSettings;
use crate::error::{PipelineError, Stage};
use crate::models::did::{build_did, did_document_slug, signed_pdf_slug, DIDDocument};
use crate::models::signing::{SignFile, SignPayload, SignerProfile};
use crate::services::auth_client::AuthClient;
use crate::services::signing_client::SigningClient;
use crate::storage::solid_client::SolidStorage;
use crate::utils::crypto::sha1_hex;
use crate::wallet::key_management::KeyManager;
use bytes::Bytes;
use std::path::PathBuf;

pub const DEFAULT_DNI: &str = "48948948-E";
pub const DEFAULT_EMAIL: &str = "prueba@rubricae.es";
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Input of one pipeline run, request defaults already applied to
/// `domain` and `path`.
#[derive(Debug, Clone, Default)]
pub struct PublishRequest {
    pub domain: String,
    pub path: String,
    /// Signer profile overrides; `None` falls back to the defaults
    pub dni: Option<String>,
    pub email: Option<String>,
    /// Defaults to the generated DID
    pub name: Option<String>,
}

/// What a successful run produced. URLs are the POD's `Location` headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Publication {
    DidDocument {
        did: String,
        did_document_url: Option<String>,
    },
    Signed {
        did: String,
        did_document_url: Option<String>,
        signed_pdf_url: Option<String>,
    },
}

/// Collaborators of the signing flow.
#[derive(Clone)]
struct SigningFlow {
    auth: AuthClient,
    signer: SigningClient,
    pdf_path: PathBuf,
}

impl SigningFlow {
    /// Reads the configured PDF and prepares the file section of the payload.
    async fn load_pdf(&self) -> Result<SignFile, PipelineError> {
        let data = tokio::fs::read(&self.pdf_path)
            .await
            .map_err(|source| PipelineError::LocalResource {
                path: self.pdf_path.clone(),
                source,
            })?;
        let name = self
            .pdf_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dummy.pdf".to_string());

        Ok(SignFile {
            content: base64::encode(&data),
            name,
            mime_type: PDF_MIME_TYPE.to_string(),
            hash: sha1_hex(&data),
        })
    }

    async fn sign_pdf(&self, did: &str, request: &PublishRequest) -> Result<Bytes, PipelineError> {
        let file = self.load_pdf().await?;
        let token = self.auth.fetch_token().await?;

        let profile = SignerProfile {
            dni: request.dni.clone().unwrap_or_else(|| DEFAULT_DNI.to_string()),
            email: request.email.clone().unwrap_or_else(|| DEFAULT_EMAIL.to_string()),
            name: request.name.clone().unwrap_or_else(|| did.to_string()),
        };
        let payload = SignPayload::single_signer(file, profile);

        self.signer.sign(&payload, &token).await
    }
}

/// Runs the pipeline against a fixed set of collaborators.
#[derive(Clone)]
pub struct DidPublisher {
    key_manager: KeyManager,
    storage: SolidStorage,
    signing: Option<SigningFlow>,
}

impl DidPublisher {
    /// Publisher for the DID-only flow.
    pub fn new(key_manager: KeyManager, storage: SolidStorage) -> Self {
        DidPublisher {
            key_manager,
            storage,
            signing: None,
        }
    }

    /// Enables the signing flow.
    pub fn with_signing(mut self, http: reqwest::Client, settings: SigningSettings) -> Self {
        self.signing = Some(SigningFlow {
            auth: AuthClient::new(
                http.clone(),
                settings.token_url,
                settings.client_id,
                settings.client_secret,
            ),
            signer: SigningClient::new(http, settings.sign_api_url),
            pdf_path: settings.dummy_pdf_path,
        });
        self
    }

    pub fn signs_documents(&self) -> bool {
        self.signing.is_some()
    }

    /// Message returned to callers for failures that must not leak detail.
    pub fn generic_failure_message(&self) -> &'static str {
        if self.signs_documents() {
            "Failed to generate, upload DID and sign/upload PDF"
        } else {
            "Failed to generate or upload DID"
        }
    }

    /// Generates a fresh identity for `request` and publishes it.
    pub async fn publish(&self, request: &PublishRequest) -> Result<Publication, PipelineError> {
        let key_pair = self.key_manager.generate_key_pair().await?;
        let did = build_did(&request.domain, &request.path);
        let document = DIDDocument::new(&did, key_pair.public_jwk());
        log::debug!("generated {}", did);

        let slug = did_document_slug(&request.path);
        let Some(signing) = &self.signing else {
            let did_document_url = self
                .storage
                .store_json(Stage::DidDocumentUpload, &document, "application/json", &slug)
                .await?;
            return Ok(Publication::DidDocument {
                did,
                did_document_url,
            });
        };

        let did_document_url = self
            .storage
            .store_json(Stage::DidDocumentUpload, &document, "text/plain", &slug)
            .await?;

        let signed_pdf = signing.sign_pdf(&did, request).await?;
        let signed_pdf_url = self
            .storage
            .store_data(
                Stage::SignedPdfUpload,
                signed_pdf,
                PDF_MIME_TYPE,
                &signed_pdf_slug(&request.path),
            )
            .await?;

        Ok(Publication::Signed {
            did,
            did_document_url,
            signed_pdf_url,
        })
    }
}
