//! Request and response bodies for the boundary operations

use serde::{Deserialize, Serialize};

/// Key registration request from a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterClientKeyRequest {
    pub client_id: String,
    /// SubjectPublicKeyInfo PEM
    pub public_key: String,
}

/// Signature verification request from a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifySignatureRequest {
    pub client_id: String,
    pub message: String,
    /// Lowercase hex signature over the SHA-256 digest of `message`
    pub signature: String,
}

/// Successful verification result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifySignatureResponse {
    pub client_id: String,
    pub valid: bool,
}

/// Server status summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerStatus {
    pub registered_clients: usize,
    pub scheme: String,
}
