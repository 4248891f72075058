use crate::model::{CreateOrderRequest, OrderCreationResult};
use crate::order_service::{OrderError, OrderService};
use async_trait::async_trait;
use rpc_framework::{CallContext, RpcClient, RpcError, ServiceClient};
use tracing::{info, instrument};

/// The order service as hosted by the mesh, backed by the user service client.
pub type MeshOrderService = OrderService<super::UserClient>;

/// Client for the order service.
#[derive(Clone)]
pub struct OrderClient {
    inner: RpcClient<MeshOrderService>,
}

impl OrderClient {
    pub fn new(inner: RpcClient<MeshOrderService>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, ctx))]
    pub async fn create_order(
        &self,
        ctx: &CallContext,
        user_id: &str,
    ) -> Result<OrderCreationResult, OrderError> {
        info!("Placing order");
        self.invoke(ctx, CreateOrderRequest::new(user_id)).await
    }
}

#[async_trait]
impl ServiceClient<MeshOrderService> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &RpcClient<MeshOrderService> {
        &self.inner
    }

    fn map_error(e: RpcError) -> Self::Error {
        OrderError::from(e)
    }
}
