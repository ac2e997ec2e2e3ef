//! The file-backed credential store strategy.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use subtle::ConstantTimeEq;

use crate::config::ConfigError;
use crate::error::AuthFailure;
use crate::identity::IdentityRecord;
use crate::strategies::{CredentialVerifier, Credentials};

/// One stored user: password plus an already-canonical group list.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredUser {
    /// Stored password, compared exactly (constant-time).
    pub password: String,
    /// Groups taken verbatim on success; no resolver step.
    #[serde(default)]
    pub groups: Vec<String>,
}

/// Verifies against a `username -> {password, groups}` mapping loaded once
/// at process startup.
///
/// The map is never mutated afterwards, so concurrent lookups from parallel
/// request handlers need no synchronization.
pub struct FileVerifier {
    users: HashMap<String, StoredUser>,
}

impl FileVerifier {
    /// Load the store from a JSON file of the form
    /// `{"alice": {"password": "...", "groups": ["ops"]}}`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::CredentialStore`] when the file cannot be read or
    /// parsed; the gateway refuses to start on a broken store rather than
    /// silently authenticating nobody.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::CredentialStore {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let users = serde_json::from_str(&contents).map_err(|e| ConfigError::CredentialStore {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { users })
    }

    /// Build a store from an in-memory mapping.
    #[must_use]
    pub fn from_users(users: HashMap<String, StoredUser>) -> Self {
        Self { users }
    }

    /// Number of stored users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl CredentialVerifier for FileVerifier {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn verify(&self, credentials: &Credentials) -> Result<IdentityRecord, AuthFailure> {
        let Some(user) = self.users.get(&credentials.username) else {
            return Err(AuthFailure::InvalidCredentials);
        };

        let matches: bool = credentials
            .password
            .as_bytes()
            .ct_eq(user.password.as_bytes())
            .into();
        if !matches {
            return Err(AuthFailure::InvalidCredentials);
        }

        Ok(IdentityRecord::new(
            credentials.username.clone(),
            user.groups.clone(),
        ))
    }
}
