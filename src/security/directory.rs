//! Server-side directory of registered client public keys

use crate::security::{PublicKey, SecurityError, SecurityResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

/// A client public key as stored in the directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredKey {
    pub public_key: PublicKey,
    /// Unix timestamp of the registration
    pub registered_at: i64,
}

/// Confirmation returned by a successful registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRegistration {
    pub client_id: String,
    pub registered_at: i64,
    /// Whether an earlier key for the same client was overwritten
    pub replaced: bool,
}

/// Mapping from client identifier to its registered public key.
///
/// Every entry holds a parsed, usable key. Re-registering an identifier
/// silently overwrites the previous key. Entries are never removed.
/// Each register or lookup takes the lock once, so readers see either the
/// old or the new key and never a partial write.
#[derive(Debug, Default)]
pub struct ClientKeyDirectory {
    keys: RwLock<HashMap<String, RegisteredKey>>,
}

impl ClientKeyDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a PEM public key and register it under `client_id`
    pub fn register(&self, client_id: &str, public_key_pem: &str) -> SecurityResult<KeyRegistration> {
        let public_key = PublicKey::from_pem(public_key_pem)?;
        self.register_key(client_id, public_key)
    }

    /// Register an already parsed public key under `client_id`
    pub fn register_key(&self, client_id: &str, public_key: PublicKey) -> SecurityResult<KeyRegistration> {
        let registered_at = chrono::Utc::now().timestamp();
        let entry = RegisteredKey {
            public_key,
            registered_at,
        };

        let previous = {
            let mut keys = self.keys.write().map_err(|_| {
                SecurityError::DirectoryUnavailable("Failed to acquire write lock".to_string())
            })?;
            keys.insert(client_id.to_string(), entry)
        };

        let replaced = previous.is_some();
        if replaced {
            log::info!("Replaced public key for client: {}", client_id);
        } else {
            log::info!("Registered public key for client: {}", client_id);
        }

        Ok(KeyRegistration {
            client_id: client_id.to_string(),
            registered_at,
            replaced,
        })
    }

    /// Current key for `client_id`, or `None` for an unknown client
    pub fn lookup(&self, client_id: &str) -> SecurityResult<Option<RegisteredKey>> {
        let keys = self.keys.read().map_err(|_| {
            SecurityError::DirectoryUnavailable("Failed to acquire read lock".to_string())
        })?;

        Ok(keys.get(client_id).cloned())
    }

    /// Number of registered clients
    pub fn len(&self) -> SecurityResult<usize> {
        let keys = self.keys.read().map_err(|_| {
            SecurityError::DirectoryUnavailable("Failed to acquire read lock".to_string())
        })?;

        Ok(keys.len())
    }

    pub fn is_empty(&self) -> SecurityResult<bool> {
        Ok(self.len()? == 0)
    }
}
