//! # Mock Framework & Testing Guide
//!
//! The `MockClient<S>` type hands out a real [`RpcClient<S>`] whose requests are answered
//! from a queue of expectations instead of a running service. It lets you test code that
//! *calls* a service (an orchestrator, a client wrapper) without hosting that service.
//!
//! ## When to use Mocks vs Real Services
//!
//! | Feature | MockClient | Real ServiceServer |
//! |---------|------------|--------------------|
//! | **Determinism** | Replies are scripted | Replies come from the service |
//! | **Error Injection** | Easy (`return_err`, `drop_responder`) | Needs a service that fails on cue |
//! | **Hung peers** | `hang()` | Needs a service that sleeps |
//! | **Use Case** | Unit testing logic *around* the client | Testing the service or the full mesh |
//!
//! ## Example
//!
//! ```rust
//! use rpc_framework::mock::MockClient;
//! use rpc_framework::{CallContext, Code, Service, Status};
//! use async_trait::async_trait;
//!
//! struct Lookup;
//!
//! #[async_trait]
//! impl Service for Lookup {
//!     const NAME: &'static str = "Lookup";
//!     type Request = String;
//!     type Response = String;
//!
//!     async fn call(&self, _: &CallContext, _: String) -> Result<String, Status> {
//!         unreachable!("mocked")
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Lookup>::new();
//!     mock.expect_call().return_ok("found".to_string());
//!     mock.expect_call().return_err(Status::not_found("missing"));
//!
//!     let client = mock.client();
//!     let ctx = CallContext::background();
//!
//!     assert_eq!(client.call(&ctx, "a".into()).await.unwrap(), "found");
//!     let err = client.call(&ctx, "b".into()).await.unwrap_err();
//!     assert_eq!(err.status().map(|s| s.code()), Some(Code::NotFound));
//!
//!     assert_eq!(mock.take_received(), vec!["a".to_string(), "b".to_string()]);
//!     mock.verify();
//! }
//! ```
//!
//! ## Mocking Utilities
//!
//! Use [`create_mock_client`] to get a client and the raw receiver when a test needs to
//! inspect the request envelope (context, payload) itself, or the fluent [`MockClient`]
//! API otherwise.

use crate::client::RpcClient;
use crate::context::CallContext;
use crate::message::{Responder, RpcRequest};
use crate::service::Service;
use crate::status::Status;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// What the mock does with the next request.
enum Expectation<S: Service> {
    Reply(Result<S::Response, Status>),
    Hang,
    DropResponder,
}

/// A mock service endpoint with expectation tracking for fluent testing.
///
/// Expectations are consumed in FIFO order, one per request, regardless of payload. An
/// unexpected request (empty queue) is answered with an `Internal` status and counted;
/// [`MockClient::verify`] reports it.
pub struct MockClient<S: Service> {
    client: RpcClient<S>,
    expectations: Arc<Mutex<VecDeque<Expectation<S>>>>,
    received: Arc<Mutex<Vec<S::Request>>>,
    unexpected: Arc<Mutex<usize>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<S: Service> Default for MockClient<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Service> MockClient<S> {
    /// Creates a new mock with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<RpcRequest<S>>(1024);
        let expectations = Arc::new(Mutex::new(VecDeque::new()));
        let received = Arc::new(Mutex::new(Vec::new()));
        let unexpected = Arc::new(Mutex::new(0));

        let expectations_clone = Arc::clone(&expectations);
        let received_clone = Arc::clone(&received);
        let unexpected_clone = Arc::clone(&unexpected);

        // Spawn background task to answer requests
        let handle = tokio::spawn(async move {
            while let Some(RpcRequest {
                ctx,
                request,
                respond_to,
            }) = receiver.recv().await
            {
                received_clone.lock().unwrap().push(request);
                let expectation = expectations_clone.lock().unwrap().pop_front();

                match expectation {
                    Some(Expectation::Reply(response)) => {
                        let _ = respond_to.send(response);
                    }
                    Some(Expectation::Hang) => {
                        tokio::spawn(hold_until_done(ctx, respond_to));
                    }
                    Some(Expectation::DropResponder) => drop(respond_to),
                    None => {
                        *unexpected_clone.lock().unwrap() += 1;
                        let _ = respond_to.send(Err(Status::internal(format!(
                            "unexpected call to mock {}",
                            S::NAME
                        ))));
                    }
                }
            }
        });

        Self {
            client: RpcClient::new(sender),
            expectations,
            received,
            unexpected,
            _handle: handle,
        }
    }

    /// Returns a client wired to this mock.
    pub fn client(&self) -> RpcClient<S> {
        self.client.clone()
    }

    /// Queues an expectation for the next call.
    pub fn expect_call(&mut self) -> CallExpectationBuilder<S> {
        CallExpectationBuilder {
            expectations: Arc::clone(&self.expectations),
        }
    }

    /// Drains the request payloads received so far, in arrival order.
    pub fn take_received(&self) -> Vec<S::Request> {
        std::mem::take(&mut *self.received.lock().unwrap())
    }

    /// Number of expectations not yet consumed.
    pub fn remaining(&self) -> usize {
        self.expectations.lock().unwrap().len()
    }

    /// Verifies that all expectations were met and no unexpected call arrived.
    pub fn verify(&self) {
        let remaining = self.remaining();
        if remaining != 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
        let unexpected = *self.unexpected.lock().unwrap();
        if unexpected != 0 {
            panic!("{} unexpected call(s) to mock {}", unexpected, S::NAME);
        }
    }
}

async fn hold_until_done<T>(ctx: CallContext, respond_to: Responder<T>) {
    ctx.done().await;
    drop(respond_to);
}

/// Builder for a single call expectation.
pub struct CallExpectationBuilder<S: Service> {
    expectations: Arc<Mutex<VecDeque<Expectation<S>>>>,
}

impl<S: Service> CallExpectationBuilder<S> {
    /// Replies with a successful response.
    pub fn return_ok(self, response: S::Response) {
        self.push(Expectation::Reply(Ok(response)));
    }

    /// Replies with a status.
    pub fn return_err(self, status: Status) {
        self.push(Expectation::Reply(Err(status)));
    }

    /// Never replies; the responder is held until the caller's context is done.
    pub fn hang(self) {
        self.push(Expectation::Hang);
    }

    /// Drops the responder without replying (a crashed peer).
    pub fn drop_responder(self) {
        self.push(Expectation::DropResponder);
    }

    fn push(self, expectation: Expectation<S>) {
        self.expectations.lock().unwrap().push_back(expectation);
    }
}

// =============================================================================
// MESSAGE-LEVEL HELPERS
// =============================================================================

/// Creates a client and the receiver its requests arrive on.
///
/// # Testing Strategy
/// When a test needs to look at the envelope itself (did the context carry a deadline?
/// was the payload built correctly?) it plays the server: receive with [`expect_call`],
/// assert, then answer through the responder.
pub fn create_mock_client<S: Service>(
    queue_size: usize,
) -> (RpcClient<S>, mpsc::Receiver<RpcRequest<S>>) {
    let (sender, receiver) = mpsc::channel(queue_size);
    (RpcClient::new(sender), receiver)
}

/// Receives the next request, split into its parts.
pub async fn expect_call<S: Service>(
    receiver: &mut mpsc::Receiver<RpcRequest<S>>,
) -> Option<(CallContext, S::Request, Responder<S::Response>)> {
    receiver
        .recv()
        .await
        .map(|message| (message.ctx, message.request, message.respond_to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RpcError;
    use crate::status::Code;
    use async_trait::async_trait;
    use std::time::Duration;

    struct Lookup;

    #[async_trait]
    impl Service for Lookup {
        const NAME: &'static str = "Lookup";
        type Request = u32;
        type Response = String;

        async fn call(&self, _ctx: &CallContext, request: u32) -> Result<String, Status> {
            Ok(request.to_string())
        }
    }

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<Lookup>(10);

        let call_task = tokio::spawn(async move {
            let ctx = CallContext::with_timeout(Duration::from_secs(5));
            client.call(&ctx, 7).await
        });

        let (ctx, request, responder) = expect_call(&mut receiver)
            .await
            .expect("Expected a request");
        assert_eq!(request, 7);
        assert!(ctx.deadline().is_some());
        responder.send(Ok("seven".to_string())).unwrap();

        let result = call_task.await.unwrap();
        assert!(matches!(result, Ok(ref reply) if reply == "seven"));
    }

    #[tokio::test]
    async fn test_mock_client_with_expectations() {
        let mut mock = MockClient::<Lookup>::new();
        mock.expect_call().return_ok("one".to_string());
        mock.expect_call().return_err(Status::not_found("nope"));

        let client = mock.client();
        let ctx = CallContext::background();

        assert_eq!(client.call(&ctx, 1).await.unwrap(), "one");
        let err = client.call(&ctx, 2).await.unwrap_err();
        assert_eq!(err.status().map(Status::code), Some(Code::NotFound));

        assert_eq!(mock.take_received(), vec![1, 2]);
        mock.verify();
    }

    #[tokio::test]
    async fn test_drop_responder_is_transport_failure() {
        let mut mock = MockClient::<Lookup>::new();
        mock.expect_call().drop_responder();

        let err = mock
            .client()
            .call(&CallContext::background(), 1)
            .await
            .unwrap_err();

        assert!(matches!(err, RpcError::ServiceDropped));
        assert!(err.status().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hang_resolves_through_context() {
        let mut mock = MockClient::<Lookup>::new();
        mock.expect_call().hang();

        let ctx = CallContext::with_timeout(Duration::from_millis(100));
        let err = mock.client().call(&ctx, 1).await.unwrap_err();

        assert_eq!(err.status().map(Status::code), Some(Code::DeadlineExceeded));
    }

    #[tokio::test]
    #[should_panic(expected = "unexpected call")]
    async fn test_verify_reports_unexpected_calls() {
        let mock = MockClient::<Lookup>::new();
        let err = mock
            .client()
            .call(&CallContext::background(), 1)
            .await
            .unwrap_err();
        assert_eq!(err.status().map(Status::code), Some(Code::Internal));

        mock.verify();
    }
}
