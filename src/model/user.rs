use serde::{Deserialize, Serialize};

/// Contact details of a registered user.
///
/// Immutable once constructed: the user store hands out clones and nothing writes back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: String,
    pub email: String,
}

impl UserRecord {
    /// Creates a new UserRecord.
    ///
    /// # Arguments
    /// * `name` - User's display name
    /// * `email` - User's email address
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Request payload of `UserLookupService.get_user_details`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetUserRequest {
    pub user_id: String,
}

impl GetUserRequest {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}
