// src/models/signing.rs
//! Request payload understood by the signing API.
//!
//! Built once per request from the local PDF and the caller's signer profile,
//! sent once, then dropped.

use serde::{Deserialize, Serialize};

/// File section of a signing request.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SignFile {
    /// Standard base64 of the raw file bytes
    pub content: String,

    /// File name shown to the signer
    pub name: String,

    /// MIME type, e.g. `application/pdf`
    #[serde(rename = "type")]
    pub mime_type: String,

    /// Lowercase hex SHA-1 of the raw file bytes
    pub hash: String,
}

/// Identity of the person the document is signed for.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SignerProfile {
    /// National identity document number
    pub dni: String,
    pub email: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Signer {
    pub profile: SignerProfile,

    /// Whether the signing service mails the signed document to the signer
    pub send_email_signed_doc: bool,
}

/// Body of `POST <SIGN_API_URL>`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SignPayload {
    pub file: SignFile,
    pub signers: Vec<Signer>,
}

impl SignPayload {
    /// Payload for one file and one signer who is not emailed the result.
    pub fn single_signer(file: SignFile, profile: SignerProfile) -> Self {
        SignPayload {
            file,
            signers: vec![Signer {
                profile,
                send_email_signed_doc: false,
            }],
        }
    }
}
