use crate::clients::{MeshOrderService, OrderClient, UserClient};
use crate::config::MeshConfig;
use crate::order_service::{OrderOrchestrator, OrderService};
use crate::user_service::UserLookup;
use rpc_framework::{Service, ServiceServer};
use thiserror::Error;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("{service} task failed: {source}")]
    ServiceTask {
        service: &'static str,
        #[source]
        source: JoinError,
    },
}

/// Both services of the mesh, running in one process.
///
/// `MeshSystem` is responsible for:
/// - **Wiring**: the order service gets its own [`UserClient`], so it reaches the user
///   service through the same RPC path as any outside caller
/// - **Lifecycle**: spawning both servers and stopping them in dependency order
///
/// # Example
///
/// ```rust
/// use order_mesh::config::MeshConfig;
/// use order_mesh::lifecycle::MeshSystem;
/// use rpc_framework::CallContext;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let system = MeshSystem::start(&MeshConfig::default());
///
///     let order = system
///         .order_client
///         .create_order(&CallContext::background(), "user123")
///         .await?;
///     assert_eq!(order.user_name, "John Doe");
///
///     system.shutdown().await?;
///     Ok(())
/// }
/// ```
pub struct MeshSystem {
    /// Client for the order service
    pub order_client: OrderClient,

    /// Client for the user service
    pub user_client: UserClient,

    order_handle: JoinHandle<()>,
    user_handle: JoinHandle<()>,
}

impl MeshSystem {
    /// Spawns the user service, then the order service wired to it.
    ///
    /// Must be called inside a Tokio runtime, with a config that passes
    /// [`MeshConfig::validate`] (`load` and `from_yaml_str` check this).
    pub fn start(config: &MeshConfig) -> Self {
        let lookup = UserLookup::new(config.user_store());
        let (user_server, user_rpc) = ServiceServer::new(lookup, config.user_service.queue_size);
        let user_client = UserClient::new(user_rpc);
        let user_handle = tokio::spawn(user_server.run());

        let orchestrator = OrderOrchestrator::new(user_client.clone())
            .with_downstream_timeout(config.downstream_timeout());
        let (order_server, order_rpc) =
            ServiceServer::new(OrderService::new(orchestrator), config.order_service.queue_size);
        let order_handle = tokio::spawn(order_server.run());

        info!(
            users = config.users.len(),
            downstream_timeout_ms = config.downstream_timeout_ms,
            "Mesh started"
        );

        Self {
            order_client: OrderClient::new(order_rpc),
            user_client,
            order_handle,
            user_handle,
        }
    }

    /// Gracefully shuts down both services.
    ///
    /// Dropping the clients closes the request channels. The order service stops first;
    /// only then is its own user client released, which lets the user service stop.
    /// Clones of either client held elsewhere keep their service alive and delay this.
    pub async fn shutdown(self) -> Result<(), LifecycleError> {
        info!("Shutting down mesh...");

        drop(self.order_client);
        drop(self.user_client);

        join_services([
            (MeshOrderService::NAME, self.order_handle),
            (UserLookup::NAME, self.user_handle),
        ])
        .await?;

        info!("Mesh shutdown complete.");
        Ok(())
    }
}

/// Awaits every service task in order, even after one has failed.
///
/// Returns the first failure.
async fn join_services<const N: usize>(
    handles: [(&'static str, JoinHandle<()>); N],
) -> Result<(), LifecycleError> {
    let mut first_error = None;
    for (service, handle) in handles {
        if let Err(source) = handle.await {
            error!(service, error = %source, "Service task failed");
            first_error.get_or_insert(LifecycleError::ServiceTask { service, source });
        }
    }
    first_error.map_or(Ok(()), Err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_failed_service_does_not_abandon_the_rest() {
        let stopped = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stopped);

        let crashed = tokio::spawn(async { panic!("order service crashed"); });
        let draining = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            flag.store(true, Ordering::SeqCst);
        });

        let err = join_services([("OrderService", crashed), ("UserLookupService", draining)])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LifecycleError::ServiceTask { service: "OrderService", .. }
        ));
        assert!(stopped.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_first_failure_is_reported() {
        let first = tokio::spawn(async { panic!("first"); });
        let second = tokio::spawn(async { panic!("second"); });

        let err = join_services([("first", first), ("second", second)])
            .await
            .unwrap_err();

        assert!(err.to_string().starts_with("first task failed"));
    }
}
