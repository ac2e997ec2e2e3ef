//! The seam to the external directory service.
//!
//! The gateway never speaks the directory protocol itself: bind and search
//! are delegated to a [`DirectoryClient`] implementation injected at startup.
//! [`MockDirectory`] is the in-tree implementation, used by tests and by the
//! `mock` provider for local smoke runs.

pub mod mock;

pub use mock::MockDirectory;

use async_trait::async_trait;
use thiserror::Error;

use crate::groups::RawMembership;

/// What a successful bind+search returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Distinguished name of the matched user entry.
    pub dn: String,
    /// The raw group-membership attribute, absent when the user has none.
    pub member_of: Option<RawMembership>,
}

/// Failures a directory client can report.
///
/// The two variants map to different caller-facing outcomes and must not be
/// conflated: a rejected bind is a credential problem, an unreachable
/// directory is a service outage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// The directory refused the bind for these credentials.
    #[error("directory bind rejected")]
    BindRejected,

    /// The directory could not be reached or the call timed out.
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

/// A trusted client for the external directory service.
///
/// One call per login attempt; implementations carry no per-request state,
/// so concurrent logins parallelize across independent round-trips. Timeouts
/// are the implementation's responsibility.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Bind as `username`/`password` and fetch the matching user entry.
    async fn bind_and_search(
        &self,
        username: &str,
        password: &str,
    ) -> Result<DirectoryEntry, DirectoryError>;
}
