//! # RPC Framework
//!
//! This crate provides the building blocks for hosting typed services and calling them
//! with deadline and cancellation propagation. It is transport-agnostic: requests travel
//! over Tokio channels, which keeps every service in one process while preserving the
//! shape of a real RPC stack (typed request/response, status codes, per-call context).
//!
//! ## Architecture Overview
//!
//! The framework separates concerns into three layers:
//!
//! 1. **Service Layer** ([`Service`]) - Your business logic: request in, response or
//!    [`Status`] out.
//! 2. **Runtime Layer** ([`ServiceServer`]) - Accept loop, one task per request,
//!    deadline racing, replies.
//! 3. **Interface Layer** ([`RpcClient`], [`ServiceClient`]) - Type-safe calls.
//!
//! ## Error Model
//!
//! A service fails with a [`Status`] (`Code` + message). A caller sees an [`RpcError`],
//! which is either that status or a transport failure that carries no status at all
//! (server gone, reply channel dropped). Layers that translate errors between services
//! can therefore tell "the peer said NotFound" apart from "the peer never answered".
//!
//! ## Context Propagation
//!
//! Every call takes a [`CallContext`]. The context rides along with the request, so a
//! service that calls another service can pass it on (or derive a child) and the
//! original caller's cancellation or deadline reaches the whole chain.
//!
//! ```rust
//! use rpc_framework::{CallContext, Code, Service, ServiceServer, Status};
//! use async_trait::async_trait;
//! use std::time::Duration;
//!
//! struct Slow;
//!
//! #[async_trait]
//! impl Service for Slow {
//!     const NAME: &'static str = "Slow";
//!     type Request = ();
//!     type Response = ();
//!
//!     async fn call(&self, _: &CallContext, _: ()) -> Result<(), Status> {
//!         tokio::time::sleep(Duration::from_secs(60)).await;
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (server, client) = ServiceServer::new(Slow, 8);
//!     tokio::spawn(server.run());
//!
//!     let ctx = CallContext::with_timeout(Duration::from_millis(10));
//!     let err = client.call(&ctx, ()).await.unwrap_err();
//!     assert_eq!(err.status().map(|s| s.code()), Some(Code::DeadlineExceeded));
//! }
//! ```
//!
//! ## Testing
//!
//! The [`mock`] module provides a `MockClient` that hands out a real `RpcClient<S>` backed
//! by a queue of expectations instead of a running service.

pub mod client;
pub mod client_trait;
pub mod context;
pub mod error;
pub mod message;
pub mod mock;
pub mod server;
pub mod service;
pub mod status;
pub mod tracing;

// Re-export core types for convenience
pub use client::RpcClient;
pub use client_trait::ServiceClient;
pub use context::CallContext;
pub use error::RpcError;
pub use message::{Responder, RpcRequest};
pub use server::ServiceServer;
pub use service::Service;
pub use status::{Code, Status};
