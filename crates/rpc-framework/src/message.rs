//! # Request Envelope
//!
//! The message a [`RpcClient`](crate::RpcClient) puts on the channel to a
//! [`ServiceServer`](crate::ServiceServer).

use crate::context::CallContext;
use crate::service::Service;
use crate::status::Status;
use tokio::sync::oneshot;

/// Type alias for the one-shot reply channel of a single call.
pub type Responder<T> = oneshot::Sender<Result<T, Status>>;

/// A typed request together with its caller's context and reply channel.
///
/// The context travels with the request, which is how deadlines and cancellation
/// propagate from caller to callee.
pub struct RpcRequest<S: Service> {
    pub ctx: CallContext,
    pub request: S::Request,
    pub respond_to: Responder<S::Response>,
}

// Manual impl: a derive would demand `S: Debug` on the service itself.
impl<S: Service> std::fmt::Debug for RpcRequest<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcRequest")
            .field("service", &S::NAME)
            .field("ctx", &self.ctx)
            .field("request", &self.request)
            .finish()
    }
}
