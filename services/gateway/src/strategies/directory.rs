//! The directory-backed strategy.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::directory::{DirectoryClient, DirectoryError};
use crate::error::{AuthFailure, sanitize_message};
use crate::groups;
use crate::identity::IdentityRecord;
use crate::strategies::{CredentialVerifier, Credentials};

/// Delegates bind and search to a [`DirectoryClient`] and canonicalizes the
/// returned group membership.
///
/// The identity carries the *originally supplied* username, not whatever
/// representation the directory round-trips in the entry DN, so the
/// caller-visible identity is stable across directory renames.
pub struct DirectoryVerifier {
    client: Arc<dyn DirectoryClient>,
}

impl DirectoryVerifier {
    /// Wrap a directory client.
    #[must_use]
    pub fn new(client: Arc<dyn DirectoryClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CredentialVerifier for DirectoryVerifier {
    fn name(&self) -> &'static str {
        "directory"
    }

    async fn verify(&self, credentials: &Credentials) -> Result<IdentityRecord, AuthFailure> {
        let entry = self
            .client
            .bind_and_search(&credentials.username, &credentials.password)
            .await
            .map_err(|err| match err {
                DirectoryError::BindRejected => AuthFailure::InvalidCredentials,
                DirectoryError::Unavailable(reason) => AuthFailure::DirectoryUnavailable {
                    reason: sanitize_message(&reason),
                },
            })?;

        let resolved = entry
            .member_of
            .as_ref()
            .map(groups::resolve)
            .unwrap_or_default();
        debug!(dn = %entry.dn, groups = resolved.len(), "directory entry resolved");

        Ok(IdentityRecord::new(credentials.username.clone(), resolved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::MockDirectory;
    use crate::groups::RawMembership;

    fn creds(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn membership_is_canonicalized() {
        let client = MockDirectory::new().with_user(
            "alice",
            "pw1",
            Some(RawMembership::Many(vec![
                "CN=A,DC=x".into(),
                "CN=B,DC=x".into(),
                "CN=A,DC=x".into(),
            ])),
        );
        let verifier = DirectoryVerifier::new(Arc::new(client));

        let identity = verifier.verify(&creds("alice", "pw1")).await.unwrap();
        assert_eq!(identity.groups(), ["A", "B"]);
    }

    #[tokio::test]
    async fn singleton_membership_is_not_dropped() {
        let client = MockDirectory::new().with_user(
            "bob",
            "pw2",
            Some(RawMembership::Single("CN=Solo,OU=Groups,DC=x".into())),
        );
        let verifier = DirectoryVerifier::new(Arc::new(client));

        let identity = verifier.verify(&creds("bob", "pw2")).await.unwrap();
        assert_eq!(identity.groups(), ["Solo"]);
    }

    #[tokio::test]
    async fn absent_membership_yields_no_groups() {
        let client = MockDirectory::new().with_user("carol", "pw3", None);
        let verifier = DirectoryVerifier::new(Arc::new(client));

        let identity = verifier.verify(&creds("carol", "pw3")).await.unwrap();
        assert!(identity.groups().is_empty());
    }

    #[tokio::test]
    async fn supplied_username_is_preserved() {
        // The mock returns a DN-cased entry; the identity must keep the
        // exact username the caller asserted.
        let client = MockDirectory::new().with_user("Alice", "pw1", None);
        let verifier = DirectoryVerifier::new(Arc::new(client));

        let identity = verifier.verify(&creds("Alice", "pw1")).await.unwrap();
        assert_eq!(identity.username(), "Alice");
    }

    #[tokio::test]
    async fn bind_rejection_maps_to_invalid_credentials() {
        let verifier = DirectoryVerifier::new(Arc::new(MockDirectory::new()));
        assert_eq!(
            verifier.verify(&creds("alice", "pw1")).await,
            Err(AuthFailure::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn outage_maps_to_directory_unavailable() {
        let verifier = DirectoryVerifier::new(Arc::new(MockDirectory::unavailable()));
        assert!(matches!(
            verifier.verify(&creds("alice", "pw1")).await,
            Err(AuthFailure::DirectoryUnavailable { .. })
        ));
    }
}
