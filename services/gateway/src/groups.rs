//! Canonicalization of raw directory group membership.
//!
//! The directory returns the membership attribute either as a single
//! distinguished-name string or as a list of them: a user in exactly one
//! group comes back unwrapped rather than as a length-1 list. That duality
//! is an external-system inconsistency, not something later directory
//! versions can be assumed to fix, so [`resolve`] normalizes it defensively.
//! Missing the single-string case silently drops all groups for
//! single-group users.

use serde::{Deserialize, Serialize};

/// The unprocessed membership attribute as the directory returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawMembership {
    /// Singleton membership, returned unwrapped by the directory.
    Single(String),
    /// Two or more memberships (or an explicit empty list).
    Many(Vec<String>),
}

/// Turn raw membership data into a canonical group list.
///
/// Each entry is a distinguished name (`CN=value,OU=...,DC=...`). Entries are
/// split on `,` into relative-distinguished-name components, each component
/// split on its first `=` into an `(attribute, value)` pair, and only values
/// whose attribute is exactly `CN` (case-sensitive) are kept. The result is
/// deduplicated preserving first-occurrence order; it is never sorted.
///
/// This never fails: components without an `=`, and components with an empty
/// value, are silently skipped rather than rejected. An empty input yields an
/// empty list.
#[must_use]
pub fn resolve(raw: &RawMembership) -> Vec<String> {
    let entries: &[String] = match raw {
        RawMembership::Single(entry) => std::slice::from_ref(entry),
        RawMembership::Many(entries) => entries,
    };

    let mut groups: Vec<String> = Vec::new();
    for entry in entries {
        for component in entry.split(',') {
            let Some((attribute, value)) = component.split_once('=') else {
                // Silent-skip policy: malformed RDN components are dropped.
                continue;
            };
            if attribute != "CN" || value.is_empty() {
                continue;
            }
            if !groups.iter().any(|existing| existing == value) {
                groups.push(value.to_string());
            }
        }
    }
    groups
}
