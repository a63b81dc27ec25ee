// src/utils/crypto.rs
//! Digest helpers.

use sha1::{Digest, Sha1};

/// Lowercase hex SHA-1 of `data`.
///
/// The signing API uses this to check that the uploaded content arrived
/// intact; it carries no security weight of its own.
pub fn sha1_hex(data: &[u8]) -> String {
    hex::encode(Sha1::digest(data))
}
