//! Server identity challenges
//!
//! The server signs a fresh random nonce with its own key; the client checks
//! the signature against the server public key it fetched earlier. Issued
//! challenges are not recorded anywhere, so there is no replay detection.

use crate::security::{digest, KeyPair, PublicKey, SecurityResult, SignatureCodec};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Number of random bytes in a challenge nonce
pub const NONCE_LENGTH: usize = 16;

/// A signed server nonce, exactly as it crosses the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    /// 32 lowercase hex characters
    pub random_message: String,
    /// Hex-encoded signature over the digest of `random_message`
    pub signature: String,
}

/// Generate a random nonce as lowercase hex
pub fn generate_nonce() -> String {
    let mut nonce = [0u8; NONCE_LENGTH];
    OsRng.fill_bytes(&mut nonce);
    hex::encode(nonce)
}

/// Issues challenges signed with the server key pair
#[derive(Debug, Clone)]
pub struct ChallengeIssuer {
    server_keys: Arc<KeyPair>,
}

impl ChallengeIssuer {
    pub fn new(server_keys: Arc<KeyPair>) -> Self {
        Self { server_keys }
    }

    /// Produce a fresh, independently signed challenge
    pub fn issue(&self) -> SecurityResult<Challenge> {
        let random_message = generate_nonce();
        let signature = self.server_keys.sign(&digest(random_message.as_bytes()))?;

        log::debug!("Issued challenge {}", random_message);

        Ok(Challenge {
            random_message,
            signature: SignatureCodec::encode(&signature),
        })
    }
}

/// Check a challenge against the server public key.
///
/// Returns `false` for any failure, including an undecodable signature.
pub fn verify_challenge(server_public_key: &PublicKey, challenge: &Challenge) -> bool {
    let signature = match SignatureCodec::decode(&challenge.signature) {
        Ok(signature) => signature,
        Err(e) => {
            log::debug!("Challenge signature rejected: {}", e);
            return false;
        }
    };

    server_public_key.verify(&digest(challenge.random_message.as_bytes()), &signature)
}
