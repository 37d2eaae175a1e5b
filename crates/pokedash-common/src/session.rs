//! The session context shared by the client and the route guard.

use std::sync::Arc;

use crate::{
    storage::{keys, MemoryStorage, TokenStorage},
    StorageError,
};

/// Everything stored about a session after logging in or registering.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionData {
    /// The access token.
    pub access_token: String,

    /// The refresh token, if the server issued one.
    pub refresh_token: Option<String>,

    /// Username of the session owner.
    pub username: Option<String>,

    /// Role of the session owner.
    pub role: Option<String>,
}

/// Typed access to session state kept in a [TokenStorage].
///
/// A session is cheap to clone; clones share the same storage. The route guard only
/// reads from it, the API client is the only component that writes.
#[derive(Clone)]
pub struct Session {
    storage: Arc<dyn TokenStorage>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }
}

impl Session {
    /// Create a session backed by the given storage.
    pub fn new(storage: Arc<dyn TokenStorage>) -> Self {
        Self { storage }
    }

    /// The stored access token.
    pub fn access_token(&self) -> Result<Option<String>, StorageError> {
        self.storage.get(keys::TOKEN)
    }

    /// The stored refresh token.
    pub fn refresh_token(&self) -> Result<Option<String>, StorageError> {
        self.storage.get(keys::REFRESH_TOKEN)
    }

    /// The stored username.
    pub fn username(&self) -> Result<Option<String>, StorageError> {
        self.storage.get(keys::USERNAME)
    }

    /// The stored role.
    pub fn role(&self) -> Result<Option<String>, StorageError> {
        self.storage.get(keys::ROLE)
    }

    /// Replace the session after a successful login or registration.
    ///
    /// Optional fields that are absent are removed, so nothing from a previous session leaks
    /// into the new one.
    pub fn store_login(&self, data: &SessionData) -> Result<(), StorageError> {
        self.storage.set(keys::TOKEN, &data.access_token)?;
        self.put_optional(keys::REFRESH_TOKEN, data.refresh_token.as_deref())?;
        self.put_optional(keys::USERNAME, data.username.as_deref())?;
        self.put_optional(keys::ROLE, data.role.as_deref())?;
        Ok(())
    }

    /// Overwrite the access token.
    pub fn store_access_token(&self, token: &str) -> Result<(), StorageError> {
        self.storage.set(keys::TOKEN, token)
    }

    /// Overwrite the refresh token.
    pub fn store_refresh_token(&self, token: &str) -> Result<(), StorageError> {
        self.storage.set(keys::REFRESH_TOKEN, token)
    }

    /// Drop the credentials but keep the denormalized metadata.
    pub fn clear_tokens(&self) -> Result<(), StorageError> {
        self.storage.remove(keys::TOKEN)?;
        self.storage.remove(keys::REFRESH_TOKEN)?;
        Ok(())
    }

    /// Remove everything belonging to the session.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.clear_tokens()?;
        self.storage.remove(keys::USERNAME)?;
        self.storage.remove(keys::ROLE)?;
        Ok(())
    }

    fn put_optional(&self, key: &str, value: Option<&str>) -> Result<(), StorageError> {
        match value {
            Some(value) => self.storage.set(key, value),
            None => self.storage.remove(key),
        }
    }
}
