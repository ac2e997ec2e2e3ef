//! WebJive authentication gateway.
//!
//! Accepts a credential assertion, verifies it against one of several
//! pluggable identity sources (fixed pair, file-backed store, external
//! directory), and on success issues a signed, time-bounded session token
//! that downstream services trust without re-verifying credentials.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod directory;
pub mod error;
pub mod groups;
pub mod http;
pub mod identity;
pub mod metrics;
pub mod shutdown;
pub mod strategies;
pub mod token;

// Re-exports for convenience
pub use config::Config;
pub use error::{AuthFailure, TokenFailure};
pub use identity::IdentityRecord;
pub use strategies::VerifierChain;
pub use token::TokenService;
