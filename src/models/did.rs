// src/models/did.rs
//! `did:web` identifier and DID Document data model.
//!
//! Defines the structure for W3C-compliant DID Documents following the
//! [DID Core Specification](https://www.w3.org/TR/did-core/) and the
//! [did:web method](https://w3c-ccg.github.io/did-method-web/).

use serde::{Deserialize, Serialize};

/// JSON-LD context every generated document declares.
pub const DID_CONTEXT: &str = "https://www.w3.org/ns/did/v1";

/// Verification method type for keys published as a JWK.
pub const JSON_WEB_KEY_2020: &str = "JsonWebKey2020";

/// Fragment appended to the DID to form the key id.
pub const KEY_FRAGMENT: &str = "rsa-key";

/// An RSA public key as a JSON Web Key (RFC 7517, RFC 7518 §6.3.1).
///
/// `n` and `e` are unpadded base64url encodings of the big-endian modulus
/// and public exponent.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Jwk {
    /// Key type, always `"RSA"` here
    pub kty: String,
    /// Modulus
    pub n: String,
    /// Public exponent
    pub e: String,
}

/// A single entry of `verificationMethod`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMethod {
    /// Key id, `<did>#rsa-key`
    pub id: String,

    #[serde(rename = "type")]
    pub type_: String,

    /// The DID that controls this key
    pub controller: String,

    pub public_key_jwk: Jwk,
}

/// A DID Document with exactly one verification method.
///
/// # Shape
/// ```json
/// {
///   "@context": ["https://www.w3.org/ns/did/v1"],
///   "id": "did:web:example.com:user:alice",
///   "verificationMethod": [{ "id": "did:web:example.com:user:alice#rsa-key", ... }],
///   "authentication": ["did:web:example.com:user:alice#rsa-key"],
///   "assertionMethod": ["did:web:example.com:user:alice#rsa-key"]
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DIDDocument {
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    /// The complete DID string identifier
    pub id: String,

    pub verification_method: Vec<VerificationMethod>,

    /// Key ids usable for authentication
    pub authentication: Vec<String>,

    /// Key ids usable for issuing assertions
    pub assertion_method: Vec<String>,
}

impl DIDDocument {
    /// Builds the document for `did` publishing `jwk` as its only key.
    pub fn new(did: &str, jwk: Jwk) -> Self {
        let key_id = key_id(did);
        DIDDocument {
            context: vec![DID_CONTEXT.to_string()],
            id: did.to_string(),
            verification_method: vec![VerificationMethod {
                id: key_id.clone(),
                type_: JSON_WEB_KEY_2020.to_string(),
                controller: did.to_string(),
                public_key_jwk: jwk,
            }],
            authentication: vec![key_id.clone()],
            assertion_method: vec![key_id],
        }
    }
}

/// Derives a `did:web` identifier from a domain and a slash-separated path.
///
/// Every `/` in `path` becomes `:`. Domain and path are used verbatim: no case
/// folding or percent-encoding is applied.
///
/// ```text
/// ("example.com", "")            -> did:web:example.com
/// ("example.com", "user/alice")  -> did:web:example.com:user:alice
/// ```
pub fn build_did(domain: &str, path: &str) -> String {
    if path.is_empty() {
        format!("did:web:{}", domain)
    } else {
        format!("did:web:{}:{}", domain, path.replace('/', ":"))
    }
}

/// Id of the single verification method of `did`.
pub fn key_id(did: &str) -> String {
    format!("{}#{}", did, KEY_FRAGMENT)
}

/// Resource naming hint for the DID Document upload.
pub fn did_document_slug(path: &str) -> String {
    format!("did-web-{}", path.replace('/', "-"))
}

/// Resource naming hint for the signed PDF upload.
pub fn signed_pdf_slug(path: &str) -> String {
    format!("signed-dummy-{}.pdf", path.replace('/', "-"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_jwk() -> Jwk {
        Jwk {
            kty: "RSA".into(),
            n: "sXchDaQebHnPiGvyDOAT4saGEUetSyo9MKLOoWFsueri23bOdgWp4Dy1Wl".into(),
            e: "AQAB".into(),
        }
    }

    #[test]
    fn test_did_without_path() {
        assert_eq!(build_did("example.com", ""), "did:web:example.com");
        assert_eq!(build_did("w3c-ccg.github.io", ""), "did:web:w3c-ccg.github.io");
    }

    #[test]
    fn test_did_with_path() {
        assert_eq!(
            build_did("example.com", "user/alice"),
            "did:web:example.com:user:alice"
        );
        assert_eq!(build_did("example.com", "a/b/c"), "did:web:example.com:a:b:c");
    }

    #[test]
    fn test_did_preserves_case() {
        assert_eq!(
            build_did("Example.COM", "Users/Alice"),
            "did:web:Example.COM:Users:Alice"
        );
    }

    #[test]
    fn test_document_references_single_key() {
        let did = build_did("example.com", "user/alice");
        let document = DIDDocument::new(&did, test_jwk());

        assert_eq!(document.verification_method.len(), 1);
        assert_eq!(document.verification_method[0].id, format!("{}#rsa-key", did));
        assert_eq!(document.verification_method[0].controller, did);
        assert_eq!(document.authentication, vec![format!("{}#rsa-key", did)]);
        assert_eq!(document.assertion_method, document.authentication);
    }

    #[test]
    fn test_document_json_shape() {
        let document = DIDDocument::new("did:web:example.com", test_jwk());
        let value = serde_json::to_value(&document).unwrap();

        assert_eq!(
            value,
            json!({
                "@context": ["https://www.w3.org/ns/did/v1"],
                "id": "did:web:example.com",
                "verificationMethod": [{
                    "id": "did:web:example.com#rsa-key",
                    "type": "JsonWebKey2020",
                    "controller": "did:web:example.com",
                    "publicKeyJwk": {
                        "kty": "RSA",
                        "n": "sXchDaQebHnPiGvyDOAT4saGEUetSyo9MKLOoWFsueri23bOdgWp4Dy1Wl",
                        "e": "AQAB"
                    }
                }],
                "authentication": ["did:web:example.com#rsa-key"],
                "assertionMethod": ["did:web:example.com#rsa-key"]
            })
        );
    }

    #[test]
    fn test_slugs() {
        assert_eq!(did_document_slug("user/alice"), "did-web-user-alice");
        assert_eq!(signed_pdf_slug("user/alice"), "signed-dummy-user-alice.pdf");
        assert_eq!(did_document_slug("bob"), "did-web-bob");
    }
}
