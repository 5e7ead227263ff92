//! Access key persistence
//!
//! The key is kept as a single `"<accessKeyId>:<secretAccessKey>"` string in a
//! [`SecretStore`]. Reads are fail-open: anything that goes wrong while reading
//! is logged and reported as "not configured".

use std::fmt;

use thiserror::Error;

pub mod store;

pub use store::{KeyringStore, MemoryStore, SecretStore};

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("credential store error: {0}")]
    Keyring(#[from] keyring::Error),
    #[error("credential store error: {0}")]
    Backend(String),
}

/// Registry access key pair
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl Credential {
    /// Split a raw token on its first colon. Both halves must be non-empty.
    pub fn parse(raw: &str) -> Option<Self> {
        let (id, secret) = raw.trim().split_once(':')?;
        if id.is_empty() || secret.is_empty() {
            return None;
        }
        Some(Self {
            access_key_id: id.to_string(),
            secret_access_key: secret.to_string(),
        })
    }

    pub fn to_raw(&self) -> String {
        format!("{}:{}", self.access_key_id, self.secret_access_key)
    }
}

// Keep the secret out of logs and panic messages.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// Adapter over a [`SecretStore`] that speaks [`Credential`]s
#[derive(Debug)]
pub struct CredentialStore<S> {
    store: S,
}

impl<S: SecretStore> CredentialStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Current credential, or `None` when missing, malformed or unreadable.
    pub fn get(&self) -> Option<Credential> {
        let raw = match self.store.get_secret() {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("no access key stored");
                return None;
            }
            Err(e) => {
                tracing::warn!("could not read access key, treating as not configured: {}", e);
                return None;
            }
        };

        let credential = Credential::parse(&raw);
        if credential.is_none() {
            tracing::warn!("stored access key is malformed, treating as not configured");
        }
        credential
    }

    pub fn set(&self, raw: &str) -> Result<(), CredentialError> {
        self.store.set_secret(raw)
    }

    pub fn clear(&self) -> Result<(), CredentialError> {
        self.store.delete_secret()
    }

    pub fn inner(&self) -> &S {
        &self.store
    }
}
