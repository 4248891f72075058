use crate::model::UserRecord;
use serde::{Deserialize, Serialize};

/// Status text of every successfully created order.
pub const ORDER_CREATED: &str = "Order Created Successfully";

/// Request payload of `OrderService.create_order`.
///
/// An empty or unknown `user_id` is a valid request; it ends in `NotFound`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub user_id: String,
}

impl CreateOrderRequest {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// Response payload of a successful order creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCreationResult {
    pub status: String,
    pub user_name: String,
    pub user_email: String,
}

impl OrderCreationResult {
    /// Builds the result for an order placed by `user`.
    pub fn created(user: UserRecord) -> Self {
        Self {
            status: ORDER_CREATED.to_string(),
            user_name: user.name,
            user_email: user.email,
        }
    }
}
