//! # ServiceClient Trait
//!
//! Provides a common interface for service-specific clients, adding a default `invoke`
//! method built on top of a generic `RpcClient`.
use crate::{CallContext, RpcClient, RpcError, Service};
use async_trait::async_trait;

/// Trait for service-specific clients to inherit the standard call path.
///
/// A wrapper only says where its `RpcClient` lives and how call failures map into its
/// own error type; `invoke` is provided.
///
/// # Example
///
/// ```rust
/// use rpc_framework::{CallContext, RpcClient, RpcError, Service, ServiceClient, Status};
/// use async_trait::async_trait;
///
/// struct Echo;
///
/// #[async_trait]
/// impl Service for Echo {
///     const NAME: &'static str = "Echo";
///     type Request = String;
///     type Response = String;
///
///     async fn call(&self, _: &CallContext, request: String) -> Result<String, Status> {
///         Ok(request)
///     }
/// }
///
/// struct EchoClient {
///     inner: RpcClient<Echo>,
/// }
///
/// #[async_trait]
/// impl ServiceClient<Echo> for EchoClient {
///     type Error = String;
///
///     fn inner(&self) -> &RpcClient<Echo> {
///         &self.inner
///     }
///
///     fn map_error(e: RpcError) -> Self::Error {
///         e.to_string()
///     }
/// }
///
/// async fn usage(client: EchoClient) {
///     // invoke() is provided automatically!
///     let _ = client.invoke(&CallContext::background(), "hi".to_string()).await;
/// }
/// ```
#[async_trait]
pub trait ServiceClient<S: Service>: Send + Sync {
    /// The service-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic RpcClient.
    fn inner(&self) -> &RpcClient<S>;

    /// Map call failures to the specific error type.
    fn map_error(e: RpcError) -> Self::Error;

    /// Call the service.
    #[tracing::instrument(skip(self, ctx), fields(service = S::NAME))]
    async fn invoke(&self, ctx: &CallContext, request: S::Request) -> Result<S::Response, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().call(ctx, request).await.map_err(Self::map_error)
    }
}
