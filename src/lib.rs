#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Order Mesh
//!
//! > **Two services, one downstream call, and a careful answer to "what went wrong?"**
//!
//! The mesh hosts a user lookup service and an order service on top of the in-process
//! [`rpc_framework`]. Creating an order means asking the user service who the user is,
//! racing that call against the caller's cancellation and translating whatever comes
//! back into the order service's own error contract.
//!
//! ## Design Notes
//!
//! ### 1. One Sub-Task per Order
//! The order service runs each downstream lookup as its own task and waits on a oneshot
//! channel the task owns. Whatever happens to the task (reply, failure, panic, abort) the
//! orchestrator observes exactly one outcome.
//!
//! ### 2. Context Propagation
//! Every call carries a [`CallContext`](rpc_framework::CallContext). The lookup runs under
//! a child of the caller's context, so a cancelled or expired order cancels its lookup.
//! An optional downstream timeout tightens the child's deadline further.
//!
//! ### 3. Error Translation
//! Any structured failure from the user service becomes `NotFound` at the order layer,
//! including the user service's `Internal`. This flattening is long-standing behaviour
//! and is covered by tests. See [`order_service::orchestrator`].
//!
//! ### 4. Observability
//! `tracing` spans wrap each RPC and each client call. See [`rpc_framework::tracing`].
//!
//! ## Module Tour
//!
//! - [`user_service`]: [`UserLookup`](user_service::UserLookup) over an injected
//!   [`UserStore`](user_service::UserStore)
//! - [`order_service`]: [`OrderOrchestrator`](order_service::OrderOrchestrator) and its
//!   [`UserDirectory`](order_service::UserDirectory) seam
//! - [`clients`]: typed [`UserClient`](clients::UserClient) and
//!   [`OrderClient`](clients::OrderClient)
//! - [`lifecycle`]: [`MeshSystem`](lifecycle::MeshSystem), startup and ordered shutdown
//! - [`config`]: [`MeshConfig`](config::MeshConfig), loaded from YAML
//! - [`model`]: request, response and record types
//!
//! ## Running the Demo
//!
//! ```bash
//! # Default configuration
//! RUST_LOG=info cargo run
//!
//! # Custom configuration
//! cargo run -- mesh.yaml
//! ```

pub mod clients;
pub mod config;
pub mod lifecycle;
pub mod model;
pub mod order_service;
pub mod user_service;
