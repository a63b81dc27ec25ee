// src/utils/serialization.rs
//! JSON helpers shared by the collaborator clients.

use serde::{Deserialize, Serialize};

/// Renders a document as JSON indented with two spaces, the form in which
/// DID Documents are stored on the POD.
pub fn serialize_pretty<T: Serialize>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(data)
}

/// Decodes a collaborator's JSON response body.
///
/// Callers read the body as text first, so a failed decode can be reported
/// with the parser's message instead of a bare transport error.
pub fn deserialize<'a, T: Deserialize<'a>>(data: &'a str) -> Result<T, serde_json::Error> {
    serde_json::from_str(data)
}
