use anyhow::Context;
use order_mesh::config::MeshConfig;
use order_mesh::lifecycle::MeshSystem;
use rpc_framework::tracing::setup_tracing;
use rpc_framework::CallContext;
use std::time::Duration;
use tracing::{error, info, info_span, Instrument};

const CONFIG_ENV: &str = "ORDER_MESH_CONFIG";

fn load_config() -> anyhow::Result<MeshConfig> {
    match std::env::args().nth(1).or_else(|| std::env::var(CONFIG_ENV).ok()) {
        Some(path) => MeshConfig::load(&path).with_context(|| format!("loading {path}")),
        None => Ok(MeshConfig::default()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    setup_tracing(&config.log_level);

    let system = MeshSystem::start(&config);

    for user_id in ["user123", "user999"] {
        let ctx = CallContext::with_timeout(Duration::from_secs(1));
        match system
            .order_client
            .create_order(&ctx, user_id)
            .instrument(info_span!("order_demo", user_id))
            .await
        {
            Ok(order) => info!(
                status = %order.status,
                user_name = %order.user_name,
                user_email = %order.user_email,
                "Order placed"
            ),
            Err(e) => error!(code = %e.code(), error = %e, "Order failed"),
        }
    }

    system.shutdown().await?;
    Ok(())
}
