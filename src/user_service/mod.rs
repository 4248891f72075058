//! # User Lookup Service
//!
//! The leaf of the mesh: resolves a user ID to a [`UserRecord`].
//!
//! ## Structure
//!
//! - [`store`] - [`UserStore`] abstraction and the [`InMemoryUserStore`] table
//! - [`error`] - [`UserError`] and its mapping onto RPC statuses
//! - [`UserLookup`] - the lookup itself, hosted as an RPC [`Service`]
//!
//! ## Usage
//!
//! ```rust
//! use order_mesh::user_service::{InMemoryUserStore, UserLookup};
//! use order_mesh::clients::UserClient;
//! use rpc_framework::{CallContext, ServiceServer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (server, rpc) = ServiceServer::new(UserLookup::new(InMemoryUserStore::seeded()), 32);
//!     tokio::spawn(server.run());
//!
//!     let client = UserClient::new(rpc);
//!     let user = client.get_user_details(&CallContext::background(), "user123").await?;
//!     assert_eq!(user.name, "John Doe");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod store;

pub use error::*;
pub use store::*;

use crate::model::{GetUserRequest, UserRecord};
use async_trait::async_trait;
use rpc_framework::{CallContext, Service, Status};
use std::sync::Arc;
use tracing::debug;

/// User ID that simulates a failing backend.
pub const INTERNAL_ERROR_SENTINEL: &str = "error";

/// Resolves user IDs against an injected [`UserStore`].
///
/// Stateless apart from the read-only store, so one instance serves every request.
#[derive(Clone)]
pub struct UserLookup {
    store: Arc<dyn UserStore>,
}

impl UserLookup {
    pub fn new(store: impl UserStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Looks up a user.
    ///
    /// # Errors
    /// - [`UserError::Internal`] for [`INTERNAL_ERROR_SENTINEL`]
    /// - [`UserError::NotFound`] when the store has no such user
    pub fn get_user_details(&self, user_id: &str) -> Result<UserRecord, UserError> {
        if user_id == INTERNAL_ERROR_SENTINEL {
            return Err(UserError::Internal);
        }

        let user = self.store.get(user_id);
        debug!(user_id, found = user.is_some(), "Get");
        user.ok_or_else(|| UserError::NotFound(user_id.to_string()))
    }
}

#[async_trait]
impl Service for UserLookup {
    const NAME: &'static str = "UserLookupService";
    type Request = GetUserRequest;
    type Response = UserRecord;

    async fn call(&self, _ctx: &CallContext, request: GetUserRequest) -> Result<UserRecord, Status> {
        self.get_user_details(&request.user_id).map_err(Status::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpc_framework::Code;
    use std::time::{Duration, Instant};

    #[test]
    fn test_get_user_details() {
        let lookup = UserLookup::new(InMemoryUserStore::seeded());

        struct Case {
            name: &'static str,
            user_id: &'static str,
            expected: Result<UserRecord, (Code, &'static str)>,
        }

        let cases = [
            Case {
                name: "User exists",
                user_id: "user123",
                expected: Ok(UserRecord::new("John Doe", "john.doe@example.com")),
            },
            Case {
                name: "User not found",
                user_id: "user999",
                expected: Err((Code::NotFound, "user with ID user999 not found")),
            },
            Case {
                name: "Empty ID is not found",
                user_id: "",
                expected: Err((Code::NotFound, "user with ID  not found")),
            },
            Case {
                name: "Internal server error",
                user_id: INTERNAL_ERROR_SENTINEL,
                expected: Err((Code::Internal, "internal server error occurred")),
            },
        ];

        for case in cases {
            let result = lookup.get_user_details(case.user_id).map_err(Status::from);
            match (result, case.expected) {
                (Ok(user), Ok(expected)) => assert_eq!(user, expected, "{}", case.name),
                (Err(status), Err((code, message))) => {
                    assert_eq!(status.code(), code, "{}", case.name);
                    assert_eq!(status.message(), message, "{}", case.name);
                }
                (got, want) => panic!("{}: got {:?}, want {:?}", case.name, got, want),
            }
        }
    }

    #[test]
    fn test_sentinel_wins_over_store_contents() {
        let store: InMemoryUserStore =
            [(INTERNAL_ERROR_SENTINEL, UserRecord::new("Err", "err@example.com"))]
                .into_iter()
                .collect();
        let lookup = UserLookup::new(store);

        assert_eq!(
            lookup.get_user_details(INTERNAL_ERROR_SENTINEL),
            Err(UserError::Internal)
        );
    }

    #[tokio::test]
    async fn test_get_user_details_concurrent() {
        let lookup = UserLookup::new(InMemoryUserStore::seeded());
        let started = Instant::now();

        let mut handles = Vec::new();
        for _ in 0..1000 {
            let lookup = lookup.clone();
            handles.push(tokio::spawn(async move {
                lookup
                    .call(&CallContext::background(), GetUserRequest::new("user123"))
                    .await
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }

        assert!(
            started.elapsed() < Duration::from_secs(5),
            "Request handling time should be under 5 seconds"
        );
    }
}
