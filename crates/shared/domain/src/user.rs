use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::sync::Arc;

/// A single record of the in-memory dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u32,
    pub name: String,
    pub is_active: bool,
}

impl User {
    /// Copy of this record with the name upper-cased.
    #[must_use]
    pub fn with_upper_name(&self) -> Self {
        Self { id: self.id, name: self.name.to_uppercase(), is_active: self.is_active }
    }
}

/// The process-wide user collection.
///
/// Generated once at startup and shared read-only afterwards; clones share
/// the same allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    users: Arc<[User]>,
}

impl Dataset {
    /// Builds `size` users: `id = i`, `name = "User {i}"`, active when `i` is even.
    #[must_use]
    pub fn generate(size: u32) -> Self {
        (0..size)
            .map(|id| User { id, name: format!("User {id}"), is_active: id % 2 == 0 })
            .collect()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[User] {
        &self.users
    }
}

impl Deref for Dataset {
    type Target = [User];

    fn deref(&self) -> &Self::Target {
        &self.users
    }
}

impl FromIterator<User> for Dataset {
    fn from_iter<I: IntoIterator<Item = User>>(iter: I) -> Self {
        Self { users: iter.into_iter().collect() }
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self { users: Arc::from([]) }
    }
}
