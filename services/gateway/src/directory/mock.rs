//! In-memory directory for tests and local smoke runs.

use std::collections::HashMap;

use async_trait::async_trait;
use subtle::ConstantTimeEq;

use crate::directory::{DirectoryClient, DirectoryEntry, DirectoryError};
use crate::groups::RawMembership;

struct MockUser {
    password: String,
    member_of: Option<RawMembership>,
}

/// An in-memory [`DirectoryClient`] with seedable users and outage injection.
pub struct MockDirectory {
    users: HashMap<String, MockUser>,
    available: bool,
}

impl Default for MockDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDirectory {
    /// An empty, reachable directory. Every bind is rejected until users are
    /// seeded with [`MockDirectory::with_user`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            users: HashMap::new(),
            available: true,
        }
    }

    /// A directory that fails every call with [`DirectoryError::Unavailable`].
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            users: HashMap::new(),
            available: false,
        }
    }

    /// Seed a user entry.
    #[must_use]
    pub fn with_user(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
        member_of: Option<RawMembership>,
    ) -> Self {
        self.users.insert(
            username.into(),
            MockUser {
                password: password.into(),
                member_of,
            },
        );
        self
    }
}

#[async_trait]
impl DirectoryClient for MockDirectory {
    async fn bind_and_search(
        &self,
        username: &str,
        password: &str,
    ) -> Result<DirectoryEntry, DirectoryError> {
        if !self.available {
            return Err(DirectoryError::Unavailable(
                "mock directory marked unreachable".to_string(),
            ));
        }

        let user = self.users.get(username).ok_or(DirectoryError::BindRejected)?;
        let matches: bool = user
            .password
            .as_bytes()
            .ct_eq(password.as_bytes())
            .into();
        if !matches {
            return Err(DirectoryError::BindRejected);
        }

        Ok(DirectoryEntry {
            dn: format!("CN={username},CN=Users,DC=mock"),
            member_of: user.member_of.clone(),
        })
    }
}
