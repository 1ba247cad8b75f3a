//! Transport-agnostic server operations

use crate::security::{
    Challenge, ChallengeIssuer, ClientKeyDirectory, KeyPair, KeyRegistration,
    RegisterClientKeyRequest, SecurityResult, ServerStatus, VerificationEngine,
    VerificationOutcome, VerifySignatureRequest, SIGNATURE_SCHEME,
};
use std::sync::Arc;

/// The server side of the protocol.
///
/// Owns the server key pair, created once and never changed, and the
/// client key directory. The directory is the only mutable state; both the
/// registration path and the verification engine share it by handle.
#[derive(Debug)]
pub struct AuthService {
    server_keys: Arc<KeyPair>,
    directory: Arc<ClientKeyDirectory>,
    verifier: VerificationEngine,
    issuer: ChallengeIssuer,
}

impl AuthService {
    /// Create a service around an existing server key pair
    pub fn new(server_keys: KeyPair) -> Self {
        let server_keys = Arc::new(server_keys);
        let directory = Arc::new(ClientKeyDirectory::new());

        Self {
            verifier: VerificationEngine::new(Arc::clone(&directory)),
            issuer: ChallengeIssuer::new(Arc::clone(&server_keys)),
            server_keys,
            directory,
        }
    }

    /// Create a service with a freshly generated server key pair
    pub fn generate() -> SecurityResult<Self> {
        let server_keys = KeyPair::generate()?;
        log::info!("Generated server key pair");
        Ok(Self::new(server_keys))
    }

    pub fn directory(&self) -> &Arc<ClientKeyDirectory> {
        &self.directory
    }

    /// RegisterClientKey
    pub fn register_client_key(
        &self,
        request: &RegisterClientKeyRequest,
    ) -> SecurityResult<KeyRegistration> {
        self.directory
            .register(&request.client_id, &request.public_key)
            .map_err(|e| {
                log::warn!("Rejected key registration for {}: {}", request.client_id, e);
                e
            })
    }

    /// VerifySignature
    pub fn verify_signature(
        &self,
        request: &VerifySignatureRequest,
    ) -> SecurityResult<VerificationOutcome> {
        self.verifier.verify(
            &request.client_id,
            request.message.as_bytes(),
            &request.signature,
        )
    }

    /// VerifySignature, with a rejection reported as the error that caused it
    pub fn authenticate(&self, request: &VerifySignatureRequest) -> SecurityResult<()> {
        self.verifier.authenticate(
            &request.client_id,
            request.message.as_bytes(),
            &request.signature,
        )
    }

    /// GetServerPublicKey
    pub fn server_public_key(&self) -> &str {
        self.server_keys.export_public()
    }

    /// IssueChallenge
    pub fn issue_challenge(&self) -> SecurityResult<Challenge> {
        self.issuer.issue()
    }

    pub fn status(&self) -> SecurityResult<ServerStatus> {
        Ok(ServerStatus {
            registered_clients: self.directory.len()?,
            scheme: SIGNATURE_SCHEME.to_string(),
        })
    }
}
