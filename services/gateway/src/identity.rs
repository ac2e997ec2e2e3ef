//! The canonical authenticated-identity value.

use serde::Serialize;

/// A verified identity: username plus canonical group set.
///
/// Immutable once constructed; compared by value. The group list preserves
/// first-occurrence order and contains no duplicates (the constructor
/// normalizes). It is created by a credential verifier on success and either
/// dropped at end of request or embedded, by copy, into a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityRecord {
    username: String,
    groups: Vec<String>,
}

impl IdentityRecord {
    /// Build a record, deduplicating groups while preserving the order in
    /// which they first appear.
    #[must_use]
    pub fn new(username: impl Into<String>, groups: Vec<String>) -> Self {
        let mut deduped: Vec<String> = Vec::with_capacity(groups.len());
        for group in groups {
            if !deduped.contains(&group) {
                deduped.push(group);
            }
        }
        Self {
            username: username.into(),
            groups: deduped,
        }
    }

    /// The caller-visible username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The canonical group set, in first-occurrence order.
    #[must_use]
    pub fn groups(&self) -> &[String] {
        &self.groups
    }
}
