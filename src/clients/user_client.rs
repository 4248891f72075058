use crate::model::{GetUserRequest, UserRecord};
use crate::user_service::UserLookup;
use async_trait::async_trait;
use rpc_framework::{CallContext, RpcClient, RpcError, ServiceClient};
use tracing::instrument;

/// Client for the user lookup service.
///
/// Failures stay as [`RpcError`]: the order orchestrator needs to tell structured
/// statuses apart from transport failures.
#[derive(Clone)]
pub struct UserClient {
    inner: RpcClient<UserLookup>,
}

impl UserClient {
    pub fn new(inner: RpcClient<UserLookup>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, ctx))]
    pub async fn get_user_details(
        &self,
        ctx: &CallContext,
        user_id: &str,
    ) -> Result<UserRecord, RpcError> {
        self.invoke(ctx, GetUserRequest::new(user_id)).await
    }
}

#[async_trait]
impl ServiceClient<UserLookup> for UserClient {
    type Error = RpcError;

    fn inner(&self) -> &RpcClient<UserLookup> {
        &self.inner
    }

    fn map_error(e: RpcError) -> Self::Error {
        e
    }
}
