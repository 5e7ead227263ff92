//! Backends that hold the raw credential string

use std::sync::Mutex;

use super::CredentialError;

/// Keyring service name the access key is stored under
pub const KEYRING_SERVICE: &str = "ipm";
/// Keyring account name the access key is stored under
pub const KEYRING_ACCOUNT: &str = "access-key";

/// A place that can hold one secret string
pub trait SecretStore {
    fn get_secret(&self) -> Result<Option<String>, CredentialError>;
    fn set_secret(&self, secret: &str) -> Result<(), CredentialError>;
    /// Removing a secret that was never stored is not an error.
    fn delete_secret(&self) -> Result<(), CredentialError>;
}

/// OS credential store (Keychain, Secret Service, Credential Manager)
#[derive(Debug, Clone)]
pub struct KeyringStore {
    service: String,
    account: String,
}

impl KeyringStore {
    pub fn new() -> Self {
        Self {
            service: KEYRING_SERVICE.to_string(),
            account: KEYRING_ACCOUNT.to_string(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, CredentialError> {
        Ok(keyring::Entry::new(&self.service, &self.account)?)
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretStore for KeyringStore {
    fn get_secret(&self) -> Result<Option<String>, CredentialError> {
        match self.entry()?.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_secret(&self, secret: &str) -> Result<(), CredentialError> {
        self.entry()?.set_password(secret)?;
        Ok(())
    }

    fn delete_secret(&self) -> Result<(), CredentialError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store, mostly useful in tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    secret: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: Mutex::new(Some(secret.into())),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>, CredentialError> {
        self.secret
            .lock()
            .map_err(|_| CredentialError::Backend("memory store lock poisoned".to_string()))
    }
}

impl SecretStore for MemoryStore {
    fn get_secret(&self) -> Result<Option<String>, CredentialError> {
        Ok(self.lock()?.clone())
    }

    fn set_secret(&self, secret: &str) -> Result<(), CredentialError> {
        *self.lock()? = Some(secret.to_string());
        Ok(())
    }

    fn delete_secret(&self) -> Result<(), CredentialError> {
        *self.lock()? = None;
        Ok(())
    }
}
