//! The order service's view of the user service.

use crate::clients::UserClient;
use crate::model::UserRecord;
use async_trait::async_trait;
use rpc_framework::{CallContext, RpcError};

/// Resolves user IDs on behalf of the order orchestrator.
///
/// `ctx` carries the caller's deadline and cancellation; implementations must honour it
/// or the orchestrator can block for as long as the peer does. `Ok(None)` means the peer
/// answered with neither a user nor an error.
#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
    async fn get_user_details(
        &self,
        ctx: &CallContext,
        user_id: &str,
    ) -> Result<Option<UserRecord>, RpcError>;
}

#[async_trait]
impl UserDirectory for UserClient {
    async fn get_user_details(
        &self,
        ctx: &CallContext,
        user_id: &str,
    ) -> Result<Option<UserRecord>, RpcError> {
        UserClient::get_user_details(self, ctx, user_id).await.map(Some)
    }
}
