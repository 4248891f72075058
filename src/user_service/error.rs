//! Error types for the user lookup service.

use rpc_framework::Status;
use thiserror::Error;

/// Errors that can occur during a user lookup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserError {
    /// The requested user was not found.
    #[error("user with ID {0} not found")]
    NotFound(String),

    /// The backing store failed.
    #[error("internal server error occurred")]
    Internal,
}

impl From<UserError> for Status {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => Status::not_found(err.to_string()),
            UserError::Internal => Status::internal(err.to_string()),
        }
    }
}
