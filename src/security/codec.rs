//! Message digests and transport encoding for signatures

use crate::security::{SecurityError, SecurityResult};
use ed25519_dalek::Signature;
use sha2::{Digest as _, Sha256};
use std::fmt;

/// SHA-256 digest length in bytes
pub const DIGEST_LENGTH: usize = 32;

/// Ed25519 signature length in bytes
pub const SIGNATURE_LENGTH: usize = 64;

/// Length of a signature once hex encoded for transport
pub const SIGNATURE_HEX_LENGTH: usize = SIGNATURE_LENGTH * 2;

/// SHA-256 digest of a message. This is what gets signed, never the raw message.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; DIGEST_LENGTH]);

impl Digest {
    /// Hash a message
    pub fn of(message: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(message);

        let mut bytes = [0u8; DIGEST_LENGTH];
        bytes.copy_from_slice(&hasher.finalize());
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

/// Compute the digest of a message
pub fn digest(message: &[u8]) -> Digest {
    Digest::of(message)
}

/// Encoding helpers for signatures crossing the transport boundary
pub struct SignatureCodec;

impl SignatureCodec {
    /// Encode a signature as lowercase hex
    pub fn encode(signature: &Signature) -> String {
        hex::encode(signature.to_bytes())
    }

    /// Decode a lowercase hex signature.
    ///
    /// Upper-case digits are rejected: the encoding is canonical, so two
    /// different strings never decode to the same signature.
    pub fn decode(encoded: &str) -> SecurityResult<Signature> {
        if encoded.len() % 2 != 0 {
            return Err(SecurityError::MalformedSignature(format!(
                "odd number of hex characters ({})",
                encoded.len()
            )));
        }

        if let Some(c) = encoded
            .chars()
            .find(|c| !matches!(c, '0'..='9' | 'a'..='f'))
        {
            return Err(SecurityError::MalformedSignature(format!(
                "invalid character {:?}, expected lowercase hex",
                c
            )));
        }

        if encoded.len() != SIGNATURE_HEX_LENGTH {
            return Err(SecurityError::MalformedSignature(format!(
                "expected {} hex characters, got {}",
                SIGNATURE_HEX_LENGTH,
                encoded.len()
            )));
        }

        let mut bytes = [0u8; SIGNATURE_LENGTH];
        hex::decode_to_slice(encoded, &mut bytes)
            .map_err(|e| SecurityError::MalformedSignature(e.to_string()))?;

        Ok(Signature::from_bytes(&bytes))
    }
}
