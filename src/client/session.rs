//! Client side of the protocol

use crate::client::transport::AuthTransport;
use crate::security::{
    digest, verify_challenge, KeyPair, KeyRegistration, PublicKey, RegisterClientKeyRequest,
    SecurityError, SecurityResult, SignatureCodec, VerificationOutcome, VerifySignatureRequest,
};
use std::fmt;

/// Where a client session is in the protocol.
///
/// Sessions only move forward. After `Registered` a session takes one of
/// two branches: sign a message and have the server verify it, or check
/// the server's identity with a challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Init,
    KeyGenerated,
    Registered,
    MessageSigned,
    AwaitingVerifyResult,
    ChallengeRequested,
    ChallengeChecked,
}

impl fmt::Display for ClientState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A client session against one server.
///
/// The key pair is generated once per session and never leaves it; only
/// the public key is sent to the server.
pub struct AuthClient<T: AuthTransport> {
    client_id: String,
    transport: T,
    keypair: Option<KeyPair>,
    state: ClientState,
}

impl<T: AuthTransport> AuthClient<T> {
    pub fn new(client_id: &str, transport: T) -> Self {
        Self {
            client_id: client_id.to_string(),
            transport,
            keypair: None,
            state: ClientState::Init,
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn state(&self) -> ClientState {
        self.state
    }

    fn expect_state(&self, expected: ClientState, step: &str) -> SecurityResult<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SecurityError::ProtocolState(format!(
                "{} requires state {}, session is in {}",
                step, expected, self.state
            )))
        }
    }

    fn signing_keys(&self) -> SecurityResult<&KeyPair> {
        self.keypair.as_ref().ok_or(SecurityError::KeyUnavailable)
    }

    /// Generate the session key pair. Returns its public key PEM.
    pub fn generate_keys(&mut self) -> SecurityResult<&str> {
        self.expect_state(ClientState::Init, "generate_keys")?;
        self.keypair = Some(KeyPair::generate()?);
        self.state = ClientState::KeyGenerated;
        self.signing_keys().map(|keys| keys.export_public())
    }

    /// Register the session public key with the server
    pub fn register_request(&self) -> SecurityResult<RegisterClientKeyRequest> {
        Ok(RegisterClientKeyRequest {
            client_id: self.client_id.clone(),
            public_key: self.signing_keys()?.export_public().to_string(),
        })
    }

    pub async fn register(&mut self) -> SecurityResult<KeyRegistration> {
        self.expect_state(ClientState::KeyGenerated, "register")?;
        let request = self.register_request()?;

        let registration = self.transport.register_client_key(&request).await?;
        log::info!("Registered public key for {}", self.client_id);

        self.state = ClientState::Registered;
        Ok(registration)
    }

    /// Sign an application message for server-side verification
    pub fn sign_message(&mut self, message: &str) -> SecurityResult<VerifySignatureRequest> {
        self.expect_state(ClientState::Registered, "sign_message")?;
        let signature = self.signing_keys()?.sign(&digest(message.as_bytes()))?;

        self.state = ClientState::MessageSigned;
        Ok(VerifySignatureRequest {
            client_id: self.client_id.clone(),
            message: message.to_string(),
            signature: SignatureCodec::encode(&signature),
        })
    }

    /// Submit a signed message and wait for the server's verdict
    pub async fn submit_for_verification(
        &mut self,
        request: &VerifySignatureRequest,
    ) -> SecurityResult<VerificationOutcome> {
        self.expect_state(ClientState::MessageSigned, "submit_for_verification")?;
        self.state = ClientState::AwaitingVerifyResult;

        let outcome = self.transport.verify_signature(request).await?;
        log::info!("Server verification for {}: {}", self.client_id, outcome);
        Ok(outcome)
    }

    /// Sign `message` and have the server verify it
    pub async fn sign_and_verify(&mut self, message: &str) -> SecurityResult<VerificationOutcome> {
        let request = self.sign_message(message)?;
        self.submit_for_verification(&request).await
    }

    /// Fetch the server public key, request a challenge and verify it locally.
    ///
    /// A signature that does not check out is reported as `Ok(false)`.
    pub async fn check_server_identity(&mut self) -> SecurityResult<bool> {
        self.expect_state(ClientState::Registered, "check_server_identity")?;

        let server_pem = self.transport.server_public_key().await?;
        let server_key = PublicKey::from_pem(&server_pem)?;

        self.state = ClientState::ChallengeRequested;
        let challenge = self.transport.issue_challenge().await?;

        let verified = verify_challenge(&server_key, &challenge);
        self.state = ClientState::ChallengeChecked;

        if verified {
            log::info!("Server signature on challenge is valid");
        } else {
            log::warn!("Server signature on challenge is INVALID");
        }
        Ok(verified)
    }
}
