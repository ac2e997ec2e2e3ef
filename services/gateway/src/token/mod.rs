//! Session-token issuance, verification, and renewal.

pub mod claims;
pub mod service;

pub use claims::SessionClaims;
pub use service::{SignedToken, TokenService};
