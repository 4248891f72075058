//! Read-only key-value lookup behind the user service.

use crate::model::UserRecord;
use std::collections::HashMap;

/// Source of user records.
///
/// Implementations are read concurrently by every in-flight request and must not need
/// `&mut self`. Swap the in-memory table for a real store by implementing this trait.
pub trait UserStore: Send + Sync + 'static {
    fn get(&self, user_id: &str) -> Option<UserRecord>;
}

/// A fixed table, populated once at startup.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    users: HashMap<String, UserRecord>,
}

impl InMemoryUserStore {
    pub fn new(users: HashMap<String, UserRecord>) -> Self {
        Self { users }
    }

    /// The table the mesh ships with: a single `user123`.
    pub fn seeded() -> Self {
        [("user123", UserRecord::new("John Doe", "john.doe@example.com"))]
            .into_iter()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, UserRecord)> for InMemoryUserStore {
    fn from_iter<I: IntoIterator<Item = (K, UserRecord)>>(iter: I) -> Self {
        Self {
            users: iter.into_iter().map(|(id, user)| (id.into(), user)).collect(),
        }
    }
}

impl UserStore for InMemoryUserStore {
    fn get(&self, user_id: &str) -> Option<UserRecord> {
        self.users.get(user_id).cloned()
    }
}
