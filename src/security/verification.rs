//! Signature verification against registered client keys

use crate::security::{
    digest, ClientKeyDirectory, PublicKey, SecurityError, SecurityResult, SignatureCodec,
};
use ed25519_dalek::Signature;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Outcome of verifying a client signature.
///
/// A failed proof is an expected result, not an error. `UnknownClient` and
/// `MalformedSignature` mean the signature could not even be checked;
/// `Invalid` means it was checked and did not verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationOutcome {
    Valid,
    Invalid,
    UnknownClient,
    MalformedSignature,
}

impl VerificationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, VerificationOutcome::Valid)
    }

    /// Map the outcome onto the error taxonomy for callers that want `?`
    pub fn into_result(self, client_id: &str) -> SecurityResult<()> {
        match self {
            VerificationOutcome::Valid => Ok(()),
            VerificationOutcome::Invalid => Err(SecurityError::InvalidSignature),
            VerificationOutcome::UnknownClient => {
                Err(SecurityError::UnknownClient(client_id.to_string()))
            }
            VerificationOutcome::MalformedSignature => Err(SecurityError::MalformedSignature(
                format!("signature from {} could not be decoded", client_id),
            )),
        }
    }

    /// Outcome for a rejection error, or `None` if the error is not a
    /// verification verdict at all
    pub fn from_rejection(error: &SecurityError) -> Option<Self> {
        match error {
            SecurityError::InvalidSignature => Some(VerificationOutcome::Invalid),
            SecurityError::UnknownClient(_) => Some(VerificationOutcome::UnknownClient),
            SecurityError::MalformedSignature(_) => Some(VerificationOutcome::MalformedSignature),
            _ => None,
        }
    }
}

impl fmt::Display for VerificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VerificationOutcome::Valid => "valid",
            VerificationOutcome::Invalid => "invalid",
            VerificationOutcome::UnknownClient => "unknown client",
            VerificationOutcome::MalformedSignature => "malformed signature",
        };
        f.write_str(s)
    }
}

/// Verifies client signatures using keys from a shared directory.
///
/// Verification only reads the directory.
#[derive(Debug, Clone)]
pub struct VerificationEngine {
    directory: Arc<ClientKeyDirectory>,
}

impl VerificationEngine {
    pub fn new(directory: Arc<ClientKeyDirectory>) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &Arc<ClientKeyDirectory> {
        &self.directory
    }

    /// Verify a hex-encoded signature over `message` for `client_id`.
    ///
    /// The client is resolved before the signature is decoded, so an
    /// unknown identifier always yields `UnknownClient`.
    pub fn verify(
        &self,
        client_id: &str,
        message: &[u8],
        signature_hex: &str,
    ) -> SecurityResult<VerificationOutcome> {
        match self.authenticate(client_id, message, signature_hex) {
            Ok(()) => Ok(VerificationOutcome::Valid),
            Err(e) => VerificationOutcome::from_rejection(&e).ok_or(e),
        }
    }

    /// Same checks as [`verify`](Self::verify), with rejections returned
    /// as errors that keep their reason (e.g. why a signature failed to
    /// decode).
    pub fn authenticate(
        &self,
        client_id: &str,
        message: &[u8],
        signature_hex: &str,
    ) -> SecurityResult<()> {
        let Some(entry) = self.directory.lookup(client_id)? else {
            log::warn!("Verification requested for unknown client: {}", client_id);
            return Err(SecurityError::UnknownClient(client_id.to_string()));
        };

        let signature = SignatureCodec::decode(signature_hex).map_err(|e| {
            log::warn!("Rejected signature from {}: {}", client_id, e);
            e
        })?;

        Self::check(client_id, &entry.public_key, message, &signature).into_result(client_id)
    }

    fn check(
        client_id: &str,
        public_key: &PublicKey,
        message: &[u8],
        signature: &Signature,
    ) -> VerificationOutcome {
        if public_key.verify(&digest(message), signature) {
            log::debug!("Signature from {} is valid", client_id);
            VerificationOutcome::Valid
        } else {
            log::warn!("Signature verification failed for client: {}", client_id);
            VerificationOutcome::Invalid
        }
    }
}
