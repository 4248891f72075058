//! Typed wrappers around [`RpcClient`](rpc_framework::RpcClient).

pub mod order_client;
pub mod user_client;

pub use order_client::*;
pub use user_client::*;
