//! Error taxonomies for credential verification and token handling.
//!
//! Verifier-internal faults (directory protocol errors, bad RDN data) are
//! mapped to the nearest taxonomy member at the strategy boundary and never
//! surface as unhandled errors. Messages that might echo credential material
//! are sanitized before they can reach a response body.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Substrings that must never appear in caller-facing error messages.
const SENSITIVE_PATTERNS: &[&str] = &[
    "password",
    "secret",
    "credential",
    "bearer",
    "authorization",
];

/// Failure modes of credential verification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    /// The supplied credentials did not match any identity.
    ///
    /// Deliberately carries no detail: strategy-specific reasons are not
    /// leaked to the caller.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The directory backend could not be reached or timed out.
    ///
    /// Kept distinct from [`AuthFailure::InvalidCredentials`] so operators
    /// can alert on directory outages separately from brute-force noise.
    #[error("directory unavailable: {reason}")]
    DirectoryUnavailable {
        /// Connection-level description, sanitized before exposure.
        reason: String,
    },

    /// The credential assertion itself was unusable (empty or unparseable).
    #[error("malformed credential input: {reason}")]
    MalformedInput {
        /// What was wrong with the input.
        reason: String,
    },

    /// No verification strategy is configured.
    #[error("no matching verification strategy")]
    NoMatchingStrategy,
}

/// Failure modes of session-token verification and renewal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenFailure {
    /// The token encoding could not be parsed at all.
    #[error("token malformed: {reason}")]
    TokenMalformed {
        /// Description of the malformation, sanitized before exposure.
        reason: String,
    },

    /// The token parsed but its signature does not match.
    #[error("token signature invalid")]
    TokenInvalid,

    /// The token was valid once but its expiry has passed.
    #[error("token expired at {expired_at}")]
    TokenExpired {
        /// When the token expired.
        expired_at: DateTime<Utc>,
    },

    /// An identity that violates the record invariants was offered for
    /// issuance (empty username, empty or duplicated group).
    #[error("identity rejected: {reason}")]
    InvalidIdentity {
        /// Which invariant was violated.
        reason: String,
    },
}

/// Stable code strings for logs and response bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Credentials rejected.
    InvalidCredentials,
    /// Directory backend down.
    DirectoryUnavailable,
    /// Unusable request input.
    MalformedInput,
    /// No strategy configured.
    NoMatchingStrategy,
    /// Unparseable token.
    TokenMalformed,
    /// Bad signature.
    TokenInvalid,
    /// Expired token.
    TokenExpired,
    /// Issuance guard tripped.
    InvalidIdentity,
}

impl ErrorCode {
    /// The wire representation of this code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidCredentials => "AUTH_INVALID_CREDENTIALS",
            Self::DirectoryUnavailable => "AUTH_DIRECTORY_UNAVAILABLE",
            Self::MalformedInput => "AUTH_MALFORMED_INPUT",
            Self::NoMatchingStrategy => "AUTH_NO_MATCHING_STRATEGY",
            Self::TokenMalformed => "TOKEN_MALFORMED",
            Self::TokenInvalid => "TOKEN_INVALID",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::InvalidIdentity => "TOKEN_INVALID_IDENTITY",
        }
    }
}

impl AuthFailure {
    /// The stable code for this failure.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidCredentials => ErrorCode::InvalidCredentials,
            Self::DirectoryUnavailable { .. } => ErrorCode::DirectoryUnavailable,
            Self::MalformedInput { .. } => ErrorCode::MalformedInput,
            Self::NoMatchingStrategy => ErrorCode::NoMatchingStrategy,
        }
    }
}

impl TokenFailure {
    /// The stable code for this failure.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::TokenMalformed { .. } => ErrorCode::TokenMalformed,
            Self::TokenInvalid => ErrorCode::TokenInvalid,
            Self::TokenExpired { .. } => ErrorCode::TokenExpired,
            Self::InvalidIdentity { .. } => ErrorCode::InvalidIdentity,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenFailure {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature => TokenFailure::TokenInvalid,
            ErrorKind::ExpiredSignature => TokenFailure::TokenExpired {
                expired_at: Utc::now(),
            },
            _ => TokenFailure::TokenMalformed {
                reason: sanitize_message(&err.to_string()),
            },
        }
    }
}

/// Replace a message wholesale if it might echo credential material.
pub fn sanitize_message(message: &str) -> String {
    let lower = message.to_lowercase();
    for pattern in SENSITIVE_PATTERNS {
        if lower.contains(pattern) {
            return "invalid input".to_string();
        }
    }
    message.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_passes_neutral_messages() {
        assert_eq!(sanitize_message("base64 decode failed"), "base64 decode failed");
    }

    #[test]
    fn sanitize_redacts_credential_material() {
        assert_eq!(sanitize_message("password=hunter2 rejected"), "invalid input");
        assert_eq!(sanitize_message("Bad Authorization header"), "invalid input");
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(AuthFailure::InvalidCredentials.code().as_str(), "AUTH_INVALID_CREDENTIALS");
        assert_eq!(TokenFailure::TokenInvalid.code().as_str(), "TOKEN_INVALID");
    }

    #[test]
    fn jwt_error_maps_to_taxonomy() {
        let err = jsonwebtoken::errors::Error::from(
            jsonwebtoken::errors::ErrorKind::InvalidSignature,
        );
        assert_eq!(TokenFailure::from(err), TokenFailure::TokenInvalid);

        let err = jsonwebtoken::errors::Error::from(jsonwebtoken::errors::ErrorKind::InvalidToken);
        assert!(matches!(TokenFailure::from(err), TokenFailure::TokenMalformed { .. }));
    }
}
