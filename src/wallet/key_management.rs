// src/wallet/key_management.rs
//! Key generation for freshly minted DIDs.
//!
//! Every request gets its own RSA keypair. The public half is published in the
//! DID Document as a JSON Web Key; nothing is persisted.
//!
//! Uses the following cryptographic primitives:
//! - RSA (via the `rsa` crate), 2048-bit modulus, public exponent 65537
//! - Cryptographically secure random number generation (`rand::thread_rng`)

use crate::error::PipelineError;
use crate::models::did::Jwk;
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use tokio::task;

/// Default modulus size in bits.
pub const RSA_KEY_BITS: usize = 2048;

/// A freshly generated RSA keypair.
///
/// The private key is held only for the lifetime of the request and is
/// zeroized by `rsa` when dropped.
pub struct KeyPair {
    #[allow(dead_code)]
    private_key: RsaPrivateKey,
    pub public_key: RsaPublicKey,
}

impl KeyPair {
    /// Exports the public key as an RSA JWK (`kty`, `n`, `e`).
    pub fn public_jwk(&self) -> Jwk {
        rsa_public_jwk(&self.public_key)
    }
}

/// Converts an RSA public key into its JSON Web Key representation.
pub fn rsa_public_jwk(public_key: &RsaPublicKey) -> Jwk {
    Jwk {
        kty: "RSA".to_string(),
        n: base64::encode_config(public_key.n().to_bytes_be(), base64::URL_SAFE_NO_PAD),
        e: base64::encode_config(public_key.e().to_bytes_be(), base64::URL_SAFE_NO_PAD),
    }
}

/// Generates RSA keypairs off the async executor.
#[derive(Clone, Debug)]
pub struct KeyManager {
    bits: usize,
}

impl Default for KeyManager {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyManager {
    /// Key manager producing 2048-bit keys.
    pub fn new() -> Self {
        KeyManager { bits: RSA_KEY_BITS }
    }

    /// Generates a new keypair.
    ///
    /// Prime search is CPU bound, so it runs on the blocking pool.
    ///
    /// # Errors
    /// [`PipelineError::KeyGeneration`] if the RSA provider fails or the
    /// blocking task panics.
    pub async fn generate_key_pair(&self) -> Result<KeyPair, PipelineError> {
        let bits = self.bits;

        let private_key = task::spawn_blocking(move || {
            let mut rng = rand::thread_rng();
            RsaPrivateKey::new(&mut rng, bits)
        })
        .await
        .map_err(|e| PipelineError::KeyGeneration(e.to_string()))?
        .map_err(|e| PipelineError::KeyGeneration(e.to_string()))?;

        let public_key = RsaPublicKey::from(&private_key);
        Ok(KeyPair {
            private_key,
            public_key,
        })
    }
}
