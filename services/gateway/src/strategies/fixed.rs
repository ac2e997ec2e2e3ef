//! The fixed single-credential strategy.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use subtle::ConstantTimeEq;

use crate::config::FixedCredentials;
use crate::error::AuthFailure;
use crate::identity::IdentityRecord;
use crate::strategies::{CredentialVerifier, Credentials};

/// Accepts exactly one configured username/password pair, with no groups.
///
/// Smoke-testing only. The chain registers this strategy solely when
/// `AUTH_FIXED_ENABLED=true`; it must never be default-on inside a trust
/// boundary.
pub struct FixedVerifier {
    credentials: FixedCredentials,
}

impl FixedVerifier {
    /// Wrap the configured pair.
    #[must_use]
    pub fn new(credentials: FixedCredentials) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl CredentialVerifier for FixedVerifier {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn verify(&self, credentials: &Credentials) -> Result<IdentityRecord, AuthFailure> {
        let username_matches: bool = credentials
            .username
            .as_bytes()
            .ct_eq(self.credentials.username.as_bytes())
            .into();
        let password_matches: bool = credentials
            .password
            .as_bytes()
            .ct_eq(self.credentials.password.expose_secret().as_bytes())
            .into();

        if username_matches && password_matches {
            Ok(IdentityRecord::new(credentials.username.clone(), vec![]))
        } else {
            Err(AuthFailure::InvalidCredentials)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn verifier() -> FixedVerifier {
        FixedVerifier::new(FixedCredentials {
            username: "smoke".to_string(),
            password: SecretString::from("smoke-pw"),
        })
    }

    #[tokio::test]
    async fn accepts_the_configured_pair_with_no_groups() {
        let identity = verifier()
            .verify(&Credentials {
                username: "smoke".to_string(),
                password: "smoke-pw".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(identity.username(), "smoke");
        assert!(identity.groups().is_empty());
    }

    #[tokio::test]
    async fn rejects_anything_else() {
        let result = verifier()
            .verify(&Credentials {
                username: "smoke".to_string(),
                password: "wrong".to_string(),
            })
            .await;
        assert_eq!(result, Err(AuthFailure::InvalidCredentials));
    }
}
