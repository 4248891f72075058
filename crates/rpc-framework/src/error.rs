//! # Call Errors
//!
//! Errors a caller can observe when invoking a service through an
//! [`RpcClient`](crate::RpcClient). Only the [`RpcError::Status`] variant carries a
//! structured status; the others are transport-level failures with no code.

use crate::status::Status;

/// Errors that can occur when calling a service.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error(transparent)]
    Status(#[from] Status),
    #[error("service closed")]
    ServiceClosed,
    #[error("service dropped response channel")]
    ServiceDropped,
    #[error("transport error: {0}")]
    Transport(String),
}

impl RpcError {
    /// The structured status, if the failure carries one.
    pub fn status(&self) -> Option<&Status> {
        match self {
            RpcError::Status(status) => Some(status),
            _ => None,
        }
    }
}
