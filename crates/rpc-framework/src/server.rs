//! # Generic Service Server
//!
//! This module defines the `ServiceServer`, the task that hosts a [`Service`] and answers
//! requests arriving from its [`RpcClient`]s.

use crate::client::RpcClient;
use crate::message::RpcRequest;
use crate::service::Service;
use crate::status::Code;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn, Instrument};

/// ## ServiceServer
///
/// The `ServiceServer<S>` is the *server* side of the framework. It owns the receiving
/// end of the request channel and a shared handle to the service.
///
/// **Concurrency Model**:
/// Unlike a state-owning actor, a service is read-only from the server's point of view,
/// so requests are *not* processed sequentially. Every request gets its own task; the
/// server loop only accepts work and reaps finished tasks. Nothing is locked.
///
/// # Usage Pattern
///
/// 1.  **Create**: Call `ServiceServer::new()` to get the `server` and a `client`.
/// 2.  **Run**: Spawn `server.run()` in a background task.
/// 3.  **Call**: Clone the client wherever the service is needed.
///
/// ```rust
/// use rpc_framework::{CallContext, Service, ServiceServer, Status};
/// use async_trait::async_trait;
///
/// struct Upper;
///
/// #[async_trait]
/// impl Service for Upper {
///     const NAME: &'static str = "Upper";
///     type Request = String;
///     type Response = String;
///
///     async fn call(&self, _: &CallContext, request: String) -> Result<String, Status> {
///         Ok(request.to_uppercase())
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (server, client) = ServiceServer::new(Upper, 16);
///     tokio::spawn(server.run());
///
///     let reply = client.call(&CallContext::background(), "hi".into()).await.unwrap();
///     assert_eq!(reply, "HI");
/// }
/// ```
///
/// # Per-request handling
///
/// 1. The handler is raced against the request's context; if the context finishes first
///    the reply is `Cancelled` / `DeadlineExceeded` and the handler future is dropped.
/// 2. The reply is sent exactly once. A caller that already gave up simply never reads it.
/// 3. A panicking handler drops its reply channel, which the caller sees as
///    [`RpcError::ServiceDropped`](crate::RpcError::ServiceDropped).
///
/// # Shutdown
///
/// When every client is dropped the channel closes; the server stops accepting, waits
/// for in-flight requests and returns.
pub struct ServiceServer<S: Service> {
    receiver: mpsc::Receiver<RpcRequest<S>>,
    service: Arc<S>,
}

impl<S: Service> ServiceServer<S> {
    /// Creates a new `ServiceServer` and its associated `RpcClient`.
    ///
    /// # Arguments
    ///
    /// * `service` - The service implementation to host.
    /// * `queue_size` - The capacity of the MPSC channel. If the channel is full,
    ///   callers wait for space (or for their context to finish).
    pub fn new(service: S, queue_size: usize) -> (Self, RpcClient<S>) {
        let (sender, receiver) = mpsc::channel(queue_size);
        let server = Self {
            receiver,
            service: Arc::new(service),
        };
        (server, RpcClient::new(sender))
    }

    /// Runs the accept loop until every client has been dropped.
    pub async fn run(mut self) {
        let service = S::NAME;
        info!(service, "Service started");

        let mut in_flight = JoinSet::new();
        let mut served: u64 = 0;

        loop {
            tokio::select! {
                message = self.receiver.recv() => match message {
                    Some(message) => {
                        served += 1;
                        let span = tracing::info_span!("rpc", service, request_no = served);
                        in_flight.spawn(handle(Arc::clone(&self.service), message).instrument(span));
                    }
                    None => break,
                },
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    if let Err(e) = joined {
                        warn!(service, error = %e, "Request task failed");
                    }
                }
            }
        }

        while let Some(joined) = in_flight.join_next().await {
            if let Err(e) = joined {
                warn!(service, error = %e, "Request task failed");
            }
        }

        info!(service, served, "Shutdown");
    }
}

async fn handle<S: Service>(service: Arc<S>, message: RpcRequest<S>) {
    let RpcRequest {
        ctx,
        request,
        respond_to,
    } = message;
    debug!(?request, "Request");

    let result = tokio::select! {
        biased;
        status = ctx.done() => Err(status),
        result = service.call(&ctx, request) => result,
    };

    match &result {
        Ok(_) => debug!("Ok"),
        Err(status) if is_routine(status.code()) => {
            debug!(code = %status.code(), desc = status.message(), "Failed")
        }
        Err(status) => warn!(code = %status.code(), desc = status.message(), "Failed"),
    }

    if respond_to.send(result).is_err() {
        debug!("Caller went away before the reply");
    }
}

/// Failures that are ordinary answers rather than faults: a missing entity, or a caller
/// that stopped waiting. Logged at debug; everything else at warn.
fn is_routine(code: Code) -> bool {
    matches!(
        code,
        Code::NotFound | Code::Cancelled | Code::DeadlineExceeded
    )
}
