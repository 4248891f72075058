//! # Generic Client
//!
//! This module defines the generic client for calling a hosted service.

use crate::context::CallContext;
use crate::error::RpcError;
use crate::message::RpcRequest;
use crate::service::Service;
use tokio::sync::{mpsc, oneshot};

/// ## RpcClient
///
/// The `RpcClient<S>` provides a type-safe, async API for calling a service hosted by a
/// `ServiceServer<S>`. It forwards requests over a Tokio mpsc channel and receives each
/// reply on its own oneshot channel.
///
/// * **Cloneable** – holds only a sender, so cloning is inexpensive and every clone
///   talks to the same server. Hold one per process and share it.
/// * **Context-aware** – both waiting for queue space and waiting for the reply are
///   raced against the caller's [`CallContext`].
pub struct RpcClient<S: Service> {
    sender: mpsc::Sender<RpcRequest<S>>,
}

impl<S: Service> Clone for RpcClient<S> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<S: Service> RpcClient<S> {
    pub fn new(sender: mpsc::Sender<RpcRequest<S>>) -> Self {
        Self { sender }
    }

    /// Calls the service.
    ///
    /// # Errors
    ///
    /// * [`RpcError::Status`] with `Cancelled` / `DeadlineExceeded` when `ctx` finishes
    ///   first, or with whatever status the service replied.
    /// * [`RpcError::ServiceClosed`] when the server is gone.
    /// * [`RpcError::ServiceDropped`] when the server dropped the reply channel.
    pub async fn call(&self, ctx: &CallContext, request: S::Request) -> Result<S::Response, RpcError> {
        if let Some(status) = ctx.err() {
            return Err(status.into());
        }

        let (respond_to, response) = oneshot::channel();
        let message = RpcRequest {
            ctx: ctx.clone(),
            request,
            respond_to,
        };

        tokio::select! {
            biased;
            status = ctx.done() => return Err(status.into()),
            sent = self.sender.send(message) => sent.map_err(|_| RpcError::ServiceClosed)?,
        }

        tokio::select! {
            biased;
            status = ctx.done() => Err(status.into()),
            reply = response => reply.map_err(|_| RpcError::ServiceDropped)?.map_err(RpcError::from),
        }
    }

    /// Returns `true` once the server has stopped receiving.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}
