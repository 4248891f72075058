//! # Service Trait
//!
//! The `Service` trait is the contract every RPC endpoint implements to be hosted by a
//! [`ServiceServer`](crate::ServiceServer). It fixes the request and response types of
//! the endpoint so that a client can only send what the service understands.
//!
//! # Architecture Note
//! The server owns the plumbing (channel, per-request tasks, deadline racing, replies);
//! the service only maps a request to a response or a [`Status`]. Business logic is
//! written once in `call` and never touches a channel.

use crate::context::CallContext;
use crate::status::Status;
use async_trait::async_trait;
use std::fmt::Debug;

/// Contract for an RPC endpoint.
///
/// Implementations are shared across every in-flight request (`&self`), so any state
/// they hold must be safe to read concurrently.
#[async_trait]
pub trait Service: Send + Sync + 'static {
    /// Name used in logs and spans (e.g. `"UserLookupService"`).
    const NAME: &'static str;

    /// The typed request payload.
    type Request: Send + Debug + 'static;

    /// The typed response payload.
    type Response: Send + Debug + 'static;

    /// Handles one request.
    ///
    /// `ctx` is the caller's context. Services that call further services pass it (or a
    /// child of it) along so cancellation reaches them too.
    async fn call(&self, ctx: &CallContext, request: Self::Request)
        -> Result<Self::Response, Status>;
}
