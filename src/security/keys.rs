//! Ed25519 key generation and management

use crate::security::{Digest, SecurityError, SecurityResult};
use ed25519_dalek::pkcs8::spki::der::pem::LineEnding;
use ed25519_dalek::pkcs8::{DecodePublicKey, EncodePublicKey};
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use rand::rngs::OsRng;

/// Ed25519 public key used for verification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey {
    verifying_key: VerifyingKey,
}

impl PublicKey {
    /// Wrap a verifying key, rejecting small-order points
    pub fn from_verifying_key(verifying_key: VerifyingKey) -> SecurityResult<Self> {
        if verifying_key.is_weak() {
            return Err(SecurityError::InvalidPublicKey(
                "Weak (small-order) public key is not allowed".to_string(),
            ));
        }
        Ok(Self { verifying_key })
    }

    /// Parse a SubjectPublicKeyInfo PEM document
    pub fn from_pem(pem: &str) -> SecurityResult<Self> {
        let verifying_key = VerifyingKey::from_public_key_pem(pem.trim())
            .map_err(|e| SecurityError::InvalidPublicKey(e.to_string()))?;
        Self::from_verifying_key(verifying_key)
    }

    /// Create a public key from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> SecurityResult<Self> {
        let key_bytes: [u8; 32] = bytes.try_into().map_err(|_| {
            SecurityError::InvalidPublicKey("Public key must be 32 bytes".to_string())
        })?;

        let verifying_key = VerifyingKey::from_bytes(&key_bytes)
            .map_err(|e| SecurityError::InvalidPublicKey(e.to_string()))?;
        Self::from_verifying_key(verifying_key)
    }

    /// Encode as a SubjectPublicKeyInfo PEM document
    pub fn to_pem(&self) -> SecurityResult<String> {
        self.verifying_key
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| SecurityError::InvalidPublicKey(e.to_string()))
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.verifying_key.to_bytes()
    }

    /// Verify a signature over a digest
    pub fn verify(&self, digest: &Digest, signature: &Signature) -> bool {
        self.verifying_key
            .verify_strict(digest.as_bytes(), signature)
            .is_ok()
    }
}

/// An identity's key pair.
///
/// The private half is optional: a key pair built from a peer's public key
/// can verify but not sign. Private key material is zeroized on drop by
/// `ed25519-dalek`.
#[derive(Debug)]
pub struct KeyPair {
    signing_key: Option<SigningKey>,
    public_key: PublicKey,
    public_key_pem: String,
}

impl KeyPair {
    /// Generate a new key pair from the OS random number generator
    pub fn generate() -> SecurityResult<Self> {
        let signing_key = SigningKey::generate(&mut OsRng);
        Self::from_signing_key(signing_key)
    }

    /// Create a key pair from an existing signing key
    pub fn from_signing_key(signing_key: SigningKey) -> SecurityResult<Self> {
        let public_key = PublicKey::from_verifying_key(signing_key.verifying_key())
            .map_err(|e| SecurityError::KeyGenerationFailed(e.to_string()))?;
        let public_key_pem = public_key
            .to_pem()
            .map_err(|e| SecurityError::KeyGenerationFailed(e.to_string()))?;

        Ok(Self {
            signing_key: Some(signing_key),
            public_key,
            public_key_pem,
        })
    }

    /// Create a verify-only key pair with no private key
    pub fn public_only(public_key: PublicKey) -> SecurityResult<Self> {
        let public_key_pem = public_key.to_pem()?;
        Ok(Self {
            signing_key: None,
            public_key,
            public_key_pem,
        })
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// The public key in its canonical PEM encoding
    pub fn export_public(&self) -> &str {
        &self.public_key_pem
    }

    pub fn has_private_key(&self) -> bool {
        self.signing_key.is_some()
    }

    /// Sign a digest with the private key
    pub fn sign(&self, digest: &Digest) -> SecurityResult<Signature> {
        let signing_key = self
            .signing_key
            .as_ref()
            .ok_or(SecurityError::KeyUnavailable)?;
        Ok(signing_key.sign(digest.as_bytes()))
    }
}
