//! Pluggable credential-verification strategies.
//!
//! Each strategy implements [`CredentialVerifier`]; the configured strategies
//! are tried in a fixed priority order by [`VerifierChain`], and the first
//! success wins.

pub mod directory;
pub mod file;
pub mod fixed;

pub use directory::DirectoryVerifier;
pub use file::FileVerifier;
pub use fixed::FixedVerifier;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::{Config, ConfigError, DirectoryProvider};
use crate::directory::{DirectoryClient, MockDirectory};
use crate::error::AuthFailure;
use crate::identity::IdentityRecord;
use crate::metrics;

/// A credential assertion as submitted by the caller.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    /// Asserted username.
    pub username: String,
    /// Asserted password.
    pub password: String,
}

// Manual Debug so a stray log line can never echo the password.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// One pluggable method of verifying a credential assertion.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Strategy name, used in logs and metrics labels.
    fn name(&self) -> &'static str;

    /// Verify the assertion, producing the identity or a typed failure.
    ///
    /// May block on network I/O for directory-backed strategies.
    async fn verify(&self, credentials: &Credentials) -> Result<IdentityRecord, AuthFailure>;
}

/// The configured strategies, tried in priority order.
pub struct VerifierChain {
    verifiers: Vec<Arc<dyn CredentialVerifier>>,
}

impl VerifierChain {
    /// Build a chain from an explicit strategy list.
    #[must_use]
    pub fn new(verifiers: Vec<Arc<dyn CredentialVerifier>>) -> Self {
        Self { verifiers }
    }

    /// Build the chain the configuration asks for, in fixed priority order:
    /// fixed, then file-backed, then directory-backed.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the file-backed store cannot be
    /// loaded.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let mut verifiers: Vec<Arc<dyn CredentialVerifier>> = Vec::new();

        if let Some(fixed) = &config.fixed {
            warn!("fixed credential strategy enabled; intended for smoke testing only");
            verifiers.push(Arc::new(FixedVerifier::new(fixed.clone())));
        }

        if let Some(path) = &config.users_path {
            let store = FileVerifier::load(path)?;
            info!(path = %path.display(), users = store.len(), "loaded credential store");
            verifiers.push(Arc::new(store));
        }

        if let Some(directory) = &config.directory {
            let client: Arc<dyn DirectoryClient> = match directory.provider {
                DirectoryProvider::Mock => Arc::new(MockDirectory::new()),
            };
            info!(url = %directory.url, "directory strategy enabled");
            verifiers.push(Arc::new(DirectoryVerifier::new(client)));
        }

        Ok(Self::new(verifiers))
    }

    /// Names of the registered strategies, in priority order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.verifiers.iter().map(|v| v.name()).collect()
    }

    /// Whether any strategy is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.verifiers.is_empty()
    }

    /// Run the chain for one login attempt.
    ///
    /// The first strategy to succeed short-circuits the rest. When every
    /// strategy fails the caller sees [`AuthFailure::InvalidCredentials`] —
    /// strategy-specific reasons are not leaked — unless some strategy
    /// failed with [`AuthFailure::DirectoryUnavailable`], which wins so a
    /// directory outage is not mistaken for a wrong password.
    ///
    /// # Errors
    ///
    /// [`AuthFailure::MalformedInput`] for an empty username,
    /// [`AuthFailure::NoMatchingStrategy`] when no strategy is configured,
    /// otherwise the collapsed failure described above.
    pub async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<IdentityRecord, AuthFailure> {
        if credentials.username.is_empty() {
            return Err(AuthFailure::MalformedInput {
                reason: "username must not be empty".to_string(),
            });
        }
        if self.verifiers.is_empty() {
            return Err(AuthFailure::NoMatchingStrategy);
        }

        let mut outage: Option<AuthFailure> = None;
        for verifier in &self.verifiers {
            match verifier.verify(credentials).await {
                Ok(identity) => {
                    metrics::LOGIN_ATTEMPTS
                        .with_label_values(&[verifier.name(), "success"])
                        .inc();
                    info!(
                        username = %identity.username(),
                        strategy = verifier.name(),
                        "credential verification succeeded"
                    );
                    return Ok(identity);
                }
                Err(AuthFailure::DirectoryUnavailable { reason }) => {
                    metrics::LOGIN_ATTEMPTS
                        .with_label_values(&[verifier.name(), "unavailable"])
                        .inc();
                    warn!(strategy = verifier.name(), %reason, "directory unavailable");
                    outage = Some(AuthFailure::DirectoryUnavailable { reason });
                }
                Err(_) => {
                    metrics::LOGIN_ATTEMPTS
                        .with_label_values(&[verifier.name(), "rejected"])
                        .inc();
                }
            }
        }

        Err(outage.unwrap_or(AuthFailure::InvalidCredentials))
    }
}
