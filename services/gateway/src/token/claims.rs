//! Claims carried inside a session token.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::identity::IdentityRecord;

/// The signed payload of a session token.
///
/// `sub` and `groups` round-trip the [`IdentityRecord`] through the token so
/// later requests never contact the identity source again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Username of the verified identity.
    pub sub: String,
    /// Canonical group set of the verified identity.
    pub groups: Vec<String>,
    /// Issuance time, seconds since the epoch.
    pub iat: i64,
    /// Expiry time, seconds since the epoch.
    pub exp: i64,
    /// Unique token id.
    pub jti: String,
}

impl SessionClaims {
    /// Claims for `identity`, valid from now for `ttl`.
    #[must_use]
    pub fn new(identity: &IdentityRecord, ttl: Duration) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: identity.username().to_string(),
            groups: identity.groups().to_vec(),
            iat: now,
            exp: now + ttl.as_secs() as i64,
            jti: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Rebuild the embedded identity.
    #[must_use]
    pub fn identity(&self) -> IdentityRecord {
        IdentityRecord::new(self.sub.clone(), self.groups.clone())
    }

    /// Whether the expiry timestamp has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.exp < chrono::Utc::now().timestamp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_claims_are_not_expired() {
        let identity = IdentityRecord::new("alice", vec!["ops".into()]);
        let claims = SessionClaims::new(&identity, Duration::from_secs(3600));
        assert!(!claims.is_expired());
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn identity_round_trips_through_claims() {
        let identity = IdentityRecord::new("alice", vec!["ops".into(), "dev".into()]);
        let claims = SessionClaims::new(&identity, Duration::from_secs(60));
        assert_eq!(claims.identity(), identity);
    }

    #[test]
    fn each_token_gets_a_fresh_jti() {
        let identity = IdentityRecord::new("alice", vec![]);
        let a = SessionClaims::new(&identity, Duration::from_secs(60));
        let b = SessionClaims::new(&identity, Duration::from_secs(60));
        assert_ne!(a.jti, b.jti);
    }
}
