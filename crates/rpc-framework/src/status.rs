//! # Status Model
//!
//! Every failed RPC carries a [`Status`]: a categorized [`Code`] plus a free-text
//! message. Services return it, clients receive it, and layers that sit between
//! two services decide how to translate it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Categorized failure reason attached to a [`Status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Code {
    /// The caller cancelled the call.
    Cancelled,
    /// The failure could not be classified.
    Unknown,
    /// The caller's deadline passed before a reply arrived.
    DeadlineExceeded,
    /// The requested entity does not exist.
    NotFound,
    /// The service failed internally.
    Internal,
    /// The service cannot be reached right now.
    Unavailable,
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Code::Cancelled => "Canceled",
            Code::Unknown => "Unknown",
            Code::DeadlineExceeded => "DeadlineExceeded",
            Code::NotFound => "NotFound",
            Code::Internal => "Internal",
            Code::Unavailable => "Unavailable",
        };
        f.write_str(name)
    }
}

/// A structured RPC failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[error("rpc error: code = {code} desc = {message}")]
pub struct Status {
    code: Code,
    message: String,
}

impl Status {
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(Code::NotFound, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(Code::Internal, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(Code::Unknown, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(Code::Unavailable, message)
    }

    pub fn cancelled() -> Self {
        Self::new(Code::Cancelled, "context canceled")
    }

    pub fn deadline_exceeded() -> Self {
        Self::new(Code::DeadlineExceeded, "context deadline exceeded")
    }

    pub fn code(&self) -> Code {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
