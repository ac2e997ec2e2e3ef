//! Property-based tests for the token lifecycle.
//!
//! Property 1: issue → verify round-trips the identity exactly.
//! Property 2: tokens past their window always verify as expired.
//! Property 3: renewal preserves identity and strictly extends expiry.
//! Property 4: foreign signatures never verify or renew.

use std::time::Duration;

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use proptest::prelude::*;
use secrecy::SecretString;
use webjive_auth::error::TokenFailure;
use webjive_auth::identity::IdentityRecord;
use webjive_auth::token::{SessionClaims, TokenService};

const SECRET: &[u8] = b"property-test-secret";

fn service() -> TokenService {
    TokenService::new(
        &SecretString::from("property-test-secret"),
        Duration::from_secs(3600),
    )
}

/// Sign claims directly, bypassing the service, to craft tokens with
/// arbitrary timestamps.
fn sign_claims(claims: &SessionClaims, secret: &[u8]) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret),
    )
    .unwrap()
}

fn claims_at(username: &str, groups: Vec<String>, iat: i64, exp: i64) -> SessionClaims {
    SessionClaims {
        sub: username.to_string(),
        groups,
        iat,
        exp,
        jti: uuid::Uuid::new_v4().to_string(),
    }
}

fn arb_username() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_.-]{1,32}"
}

fn arb_groups() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[A-Za-z0-9_-]{1,24}", 0..6)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property 1: for every valid identity, verify(issue(i)) == Ok(i).
    #[test]
    fn prop_issue_verify_round_trip(username in arb_username(), groups in arb_groups()) {
        let tokens = service();
        let identity = IdentityRecord::new(username, groups);

        let token = tokens.issue(&identity).unwrap();
        prop_assert_eq!(tokens.verify(token.as_str()).unwrap(), identity);
    }

    /// Property 2: any token whose window closed in the past is expired,
    /// regardless of how long ago.
    #[test]
    fn prop_past_window_is_expired(
        username in arb_username(),
        expired_ago in 1i64..100_000,
    ) {
        let now = chrono::Utc::now().timestamp();
        let claims = claims_at(&username, vec![], now - expired_ago - 3600, now - expired_ago);
        let raw = sign_claims(&claims, SECRET);

        let is_expired = matches!(
            service().verify(&raw),
            Err(TokenFailure::TokenExpired { .. })
        );
        prop_assert!(is_expired);
    }

    /// Property 3: renewing a valid token preserves the identity exactly
    /// and strictly increases the expiry.
    #[test]
    fn prop_renew_preserves_identity_and_extends(
        username in arb_username(),
        groups in arb_groups(),
        age in 1i64..3000,
    ) {
        let tokens = service();
        let now = chrono::Utc::now().timestamp();
        let claims = claims_at(&username, groups.clone(), now - age, now - age + 3600);
        let raw = sign_claims(&claims, SECRET);

        let renewed = tokens.renew(&raw).unwrap();
        prop_assert_eq!(
            renewed.claims().identity(),
            IdentityRecord::new(username, groups)
        );
        prop_assert!(renewed.claims().exp > claims.exp, "expiry strictly increases");
    }

    /// Property 4: tokens signed under any other secret are rejected as
    /// invalid, and renewal produces no token.
    #[test]
    fn prop_foreign_signature_never_verifies(
        username in arb_username(),
        other_secret in "[a-z]{8,32}",
    ) {
        prop_assume!(other_secret.as_bytes() != SECRET);

        let tokens = service();
        let now = chrono::Utc::now().timestamp();
        let claims = claims_at(&username, vec![], now, now + 3600);
        let raw = sign_claims(&claims, other_secret.as_bytes());

        prop_assert_eq!(tokens.verify(&raw), Err(TokenFailure::TokenInvalid));
        prop_assert!(tokens.renew(&raw).is_err());
    }

    /// Expired and tampered tokens are terminal for renewal.
    #[test]
    fn prop_renew_refuses_expired(username in arb_username(), expired_ago in 1i64..100_000) {
        let now = chrono::Utc::now().timestamp();
        let claims = claims_at(&username, vec![], now - expired_ago - 3600, now - expired_ago);
        let raw = sign_claims(&claims, SECRET);

        let is_expired = matches!(
            service().renew(&raw),
            Err(TokenFailure::TokenExpired { .. })
        );
        prop_assert!(is_expired);
    }
}

#[test]
fn malformed_encodings_are_reported_as_malformed() {
    let tokens = service();
    for raw in ["", "garbage", "a.b", "a.b.c.d", "!!!.???.###"] {
        assert!(
            matches!(tokens.verify(raw), Err(TokenFailure::TokenMalformed { .. })),
            "expected TokenMalformed for {raw:?}"
        );
    }
}
