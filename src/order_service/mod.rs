//! # Order Service
//!
//! Creates orders for known users. The service holds no state of its own: every request
//! is answered by asking the user service who the user is.
//!
//! ## Structure
//!
//! - [`downstream`] - [`UserDirectory`], the contract the orchestrator calls through
//! - [`orchestrator`] - [`OrderOrchestrator`], the downstream call and error translation
//! - [`error`] - [`OrderError`] and its mapping onto RPC statuses
//! - [`OrderService`] - the orchestrator hosted as an RPC [`Service`]

pub mod downstream;
pub mod error;
pub mod orchestrator;

pub use downstream::*;
pub use error::*;
pub use orchestrator::*;

use crate::model::{CreateOrderRequest, OrderCreationResult};
use async_trait::async_trait;
use rpc_framework::{CallContext, Service, Status};

/// RPC endpoint for order creation.
pub struct OrderService<D> {
    orchestrator: OrderOrchestrator<D>,
}

impl<D: UserDirectory> OrderService<D> {
    pub fn new(orchestrator: OrderOrchestrator<D>) -> Self {
        Self { orchestrator }
    }
}

#[async_trait]
impl<D: UserDirectory> Service for OrderService<D> {
    const NAME: &'static str = "OrderService";
    type Request = CreateOrderRequest;
    type Response = OrderCreationResult;

    async fn call(
        &self,
        ctx: &CallContext,
        request: CreateOrderRequest,
    ) -> Result<OrderCreationResult, Status> {
        self.orchestrator
            .create_order(ctx, request)
            .await
            .map_err(Status::from)
    }
}
