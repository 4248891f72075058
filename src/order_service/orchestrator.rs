//! # Order Orchestration
//!
//! Each order triggers exactly one downstream lookup, run as its own task under a child
//! of the caller's context. The task reports back through a oneshot channel it owns:
//! sending consumes the sender, and a panicking task drops it, so the orchestrator
//! observes exactly one outcome on every path.
//!
//! Failures from the user service are re-wrapped before they leave this layer:
//!
//! | Downstream outcome | Order error |
//! |--------------------|-------------|
//! | any structured status | `NotFound`, `"failed to fetch user details: <desc>"` |
//! | failure without a status | `Unknown`, `"unknown error: <error>"` |
//! | reply without a user | `Internal`, `"failed to retrieve user details"` |
//!
//! The first row flattens `Internal` (and caller cancellation) into `NotFound`. Callers
//! already depend on that mapping, so it is kept as is.

use crate::model::{CreateOrderRequest, OrderCreationResult, UserRecord};
use crate::order_service::{OrderError, UserDirectory};
use rpc_framework::{CallContext, RpcError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, instrument, warn};

/// What the downstream task reported. One per request.
#[derive(Debug)]
enum CallOutcome {
    Success(Option<UserRecord>),
    Failure(RpcError),
}

/// Single-use handle the downstream task reports through.
///
/// `fire` consumes it, so at most one outcome is sent. Unwinding drops it unsent,
/// which closes the channel and still wakes the orchestrator.
struct OutcomeSignal {
    tx: Option<oneshot::Sender<CallOutcome>>,
    #[cfg(test)]
    tally: Arc<tests::SignalTally>,
}

impl OutcomeSignal {
    fn fire(mut self, outcome: CallOutcome) {
        if let Some(tx) = self.tx.take() {
            #[cfg(test)]
            self.tally.sent.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            let _ = tx.send(outcome);
        }
    }
}

#[cfg(test)]
impl Drop for OutcomeSignal {
    fn drop(&mut self) {
        if self.tx.is_some() {
            self.tally
                .dropped
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        }
    }
}

/// Turns order requests into user lookups and lookups into order results.
pub struct OrderOrchestrator<D> {
    users: Arc<D>,
    downstream_timeout: Option<Duration>,
    #[cfg(test)]
    tally: Arc<tests::SignalTally>,
}

impl<D> Clone for OrderOrchestrator<D> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            downstream_timeout: self.downstream_timeout,
            #[cfg(test)]
            tally: Arc::clone(&self.tally),
        }
    }
}

impl<D: UserDirectory> OrderOrchestrator<D> {
    pub fn new(users: D) -> Self {
        Self {
            users: Arc::new(users),
            downstream_timeout: None,
            #[cfg(test)]
            tally: Arc::default(),
        }
    }

    /// Bounds every downstream call, whatever deadline the caller sets.
    ///
    /// `None` (the default) leaves the caller's context as the only bound, so a hung
    /// user service with no caller deadline blocks the order indefinitely.
    pub fn with_downstream_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.downstream_timeout = timeout;
        self
    }

    #[instrument(skip_all, fields(user_id = %request.user_id))]
    pub async fn create_order(
        &self,
        ctx: &CallContext,
        request: CreateOrderRequest,
    ) -> Result<OrderCreationResult, OrderError> {
        let call_ctx = match self.downstream_timeout {
            Some(timeout) => ctx.child_with_timeout(timeout),
            None => ctx.child(),
        };
        // Abandoning the order also abandons the lookup.
        let _guard = call_ctx.cancel_on_drop();

        let (tx, rx) = oneshot::channel();
        let signal = OutcomeSignal {
            tx: Some(tx),
            #[cfg(test)]
            tally: Arc::clone(&self.tally),
        };
        let users = Arc::clone(&self.users);
        let user_id = request.user_id;

        tokio::spawn(async move {
            let outcome = match users.get_user_details(&call_ctx, &user_id).await {
                Ok(user) => CallOutcome::Success(user),
                Err(err) => CallOutcome::Failure(err),
            };
            signal.fire(outcome);
        });

        let outcome = rx.await.unwrap_or_else(|_| {
            CallOutcome::Failure(RpcError::Transport("downstream call aborted".to_string()))
        });
        debug!(?outcome, "Downstream call finished");

        translate(outcome)
    }
}

fn translate(outcome: CallOutcome) -> Result<OrderCreationResult, OrderError> {
    match outcome {
        CallOutcome::Success(Some(user)) => Ok(OrderCreationResult::created(user)),
        CallOutcome::Success(None) => Err(OrderError::Internal(
            "failed to retrieve user details".to_string(),
        )),
        CallOutcome::Failure(RpcError::Status(status)) => {
            warn!(code = %status.code(), desc = status.message(), "user service error");
            Err(OrderError::NotFound(format!(
                "failed to fetch user details: {}",
                status.message()
            )))
        }
        CallOutcome::Failure(err) => Err(OrderError::Unknown(format!("unknown error: {err}"))),
    }
}
