//! Security module for the signature-based trust protocol
//!
//! This module provides:
//! - Ed25519 key pair generation, PEM export and digest signing
//! - SHA-256 message digests and hex signature encoding
//! - The server-side client key directory
//! - Signature verification against registered client keys
//! - Server challenge issuing and client-side challenge verification

pub mod challenge;
pub mod codec;
pub mod directory;
pub mod keys;
pub mod types;
pub mod verification;

pub use challenge::*;
pub use codec::*;
pub use directory::*;
pub use keys::*;
pub use types::*;
pub use verification::*;

use thiserror::Error;

/// Security-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecurityError {
    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("Unknown client: {0}")]
    UnknownClient(String),

    #[error("Malformed signature: {0}")]
    MalformedSignature(String),

    #[error("Signature verification failed")]
    InvalidSignature,

    #[error("Private key is not available for signing")]
    KeyUnavailable,

    #[error("Client key directory unavailable: {0}")]
    DirectoryUnavailable(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Protocol step out of order: {0}")]
    ProtocolState(String),
}

pub type SecurityResult<T> = Result<T, SecurityError>;

/// Name of the fixed signature scheme, reported on the status endpoint
pub const SIGNATURE_SCHEME: &str = "Ed25519/SHA-256";
