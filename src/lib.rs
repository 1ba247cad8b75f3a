//! # sigauth
//!
//! Mutual authentication between clients and a server using Ed25519
//! signatures over SHA-256 digests.
//!
//! Clients register a public key under an identifier and prove their
//! identity by signing messages the server verifies. The server proves its
//! own identity by signing random challenges that clients check against
//! the server public key.

pub mod auth_server;
pub mod client;
pub mod logging;
pub mod security;

pub use auth_server::{AuthHttpServer, AuthService, ServerConfig};
pub use client::{AuthClient, AuthTransport, ClientState, HttpTransport};
pub use security::{
    Challenge, ClientKeyDirectory, KeyPair, PublicKey, SecurityError, SecurityResult,
    VerificationOutcome,
};
