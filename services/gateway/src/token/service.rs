//! Signing, verification, and renewal of session tokens.

use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};

use crate::error::TokenFailure;
use crate::identity::IdentityRecord;
use crate::token::claims::SessionClaims;

/// Default expiry window: one hour.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// An issued token: the compact encoding plus its decoded claims.
///
/// Tokens are immutable. Renewal produces a new instance; expiry is implicit
/// by timestamp comparison and there is no server-side revocation list.
#[derive(Debug, Clone)]
pub struct SignedToken {
    raw: String,
    claims: SessionClaims,
}

impl SignedToken {
    /// The compact encoding handed to the session transport.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The claims this token was signed over.
    #[must_use]
    pub fn claims(&self) -> &SessionClaims {
        &self.claims
    }

    /// Consume the token, keeping only the encoding.
    #[must_use]
    pub fn into_raw(self) -> String {
        self.raw
    }

    /// When this token stops being accepted.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.claims.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// Issues, verifies, and renews session tokens under the process secret.
///
/// The service exclusively holds the keys derived from the secret; no other
/// component touches them. All operations are pure over the input token and
/// this immutable state, so one instance is shared across request handlers
/// without locking.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    /// Derive signing and verification keys from the process secret.
    #[must_use]
    pub fn new(secret: &SecretString, ttl: Duration) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            ttl,
        }
    }

    /// Issue a fresh token for `identity`, valid for the configured window.
    ///
    /// # Errors
    ///
    /// [`TokenFailure::InvalidIdentity`] if the username is empty or the
    /// group set is not well formed (empty or duplicated entries).
    pub fn issue(&self, identity: &IdentityRecord) -> Result<SignedToken, TokenFailure> {
        check_identity(identity)?;

        let claims = SessionClaims::new(identity, self.ttl);
        let raw = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(SignedToken { raw, claims })
    }

    /// Verify a token and return the identity it carries, unchanged.
    ///
    /// # Errors
    ///
    /// [`TokenFailure::TokenMalformed`] for unparseable encodings,
    /// [`TokenFailure::TokenInvalid`] for signature mismatches, and
    /// [`TokenFailure::TokenExpired`] once the expiry timestamp has passed.
    pub fn verify(&self, raw: &str) -> Result<IdentityRecord, TokenFailure> {
        Ok(self.verified_claims(raw)?.identity())
    }

    /// Reissue a still-valid token with a fresh expiry window.
    ///
    /// A pure reissue: renewal trusts the previously issued token and never
    /// re-authenticates credentials or contacts the directory. Any
    /// verification failure aborts the renewal; expired or tampered tokens
    /// are terminal and require a fresh credential login.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`TokenService::verify`].
    pub fn renew(&self, raw: &str) -> Result<SignedToken, TokenFailure> {
        let identity = self.verified_claims(raw)?.identity();
        self.issue(&identity)
    }

    /// Signature check first, then an explicit expiry comparison, so the
    /// expired case reports the actual expiry timestamp.
    fn verified_claims(&self, raw: &str) -> Result<SessionClaims, TokenFailure> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = decode::<SessionClaims>(raw, &self.decoding_key, &validation)?;
        let claims = data.claims;

        if claims.is_expired() {
            return Err(TokenFailure::TokenExpired {
                expired_at: DateTime::from_timestamp(claims.exp, 0).unwrap_or_else(Utc::now),
            });
        }
        Ok(claims)
    }
}

fn check_identity(identity: &IdentityRecord) -> Result<(), TokenFailure> {
    if identity.username().is_empty() {
        return Err(TokenFailure::InvalidIdentity {
            reason: "username must not be empty".to_string(),
        });
    }

    let mut seen: HashSet<&str> = HashSet::with_capacity(identity.groups().len());
    for group in identity.groups() {
        if group.is_empty() {
            return Err(TokenFailure::InvalidIdentity {
                reason: "group names must not be empty".to_string(),
            });
        }
        if !seen.insert(group.as_str()) {
            return Err(TokenFailure::InvalidIdentity {
                reason: "group set must not contain duplicates".to_string(),
            });
        }
    }
    Ok(())
}
