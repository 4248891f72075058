//! Error types for the order service.

use rpc_framework::{Code, RpcError, Status};
use thiserror::Error;

/// Errors that can occur during order creation.
///
/// The orchestrator only ever produces `NotFound`, `Internal` and `Unknown`. The other
/// two variants exist on the calling side, where the order service itself may be
/// unreachable or the caller's own context may end the call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrderError {
    /// The user service reported a failure.
    #[error("{0}")]
    NotFound(String),

    /// The user service replied without a user.
    #[error("{0}")]
    Internal(String),

    /// The user service call failed without a structured status.
    #[error("{0}")]
    Unknown(String),

    /// A status with any other code, passed through unchanged.
    #[error(transparent)]
    Status(Status),

    /// The order service could not be reached.
    #[error("Order service communication error: {0}")]
    Communication(String),
}

impl OrderError {
    pub fn code(&self) -> Code {
        match self {
            OrderError::NotFound(_) => Code::NotFound,
            OrderError::Internal(_) => Code::Internal,
            OrderError::Unknown(_) => Code::Unknown,
            OrderError::Status(status) => status.code(),
            OrderError::Communication(_) => Code::Unavailable,
        }
    }

    /// Rebuilds the typed error from a status received over the wire.
    pub fn from_status(status: Status) -> Self {
        match status.code() {
            Code::NotFound => OrderError::NotFound(status.message().to_string()),
            Code::Internal => OrderError::Internal(status.message().to_string()),
            Code::Unknown => OrderError::Unknown(status.message().to_string()),
            _ => OrderError::Status(status),
        }
    }
}

impl From<RpcError> for OrderError {
    fn from(err: RpcError) -> Self {
        match err {
            RpcError::Status(status) => OrderError::from_status(status),
            other => OrderError::Communication(other.to_string()),
        }
    }
}

impl From<OrderError> for Status {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::Status(status) => status,
            other => Status::new(other.code(), other.to_string()),
        }
    }
}
