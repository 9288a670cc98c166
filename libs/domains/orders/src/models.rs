use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Status given to every newly created order
pub const STATUS_PENDING: &str = "PENDING";

/// Status written by the cancel shortcut
pub const STATUS_CANCELLED: &str = "CANCELLED";

/// Order entity.
///
/// `status` is an open string: any value is accepted and no transition
/// rules are enforced at this layer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    /// Unique identifier, assigned by the store on creation (0 = not yet persisted)
    pub id: i64,
    /// The user who placed the order; must exist at creation time
    pub user_id: i64,
    /// When the order was placed
    pub order_date: DateTime<Utc>,
    /// Order total
    pub total_amount: f64,
    /// Progress marker, e.g. "PENDING" or "CANCELLED"
    pub status: String,
    pub shipping_address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for placing a new order
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateOrder {
    pub user_id: i64,
    pub total_amount: f64,
    pub shipping_address: Option<String>,
}

/// DTO for overwriting an order's status
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateOrderStatus {
    pub status: String,
}

impl Order {
    /// Create a new order for a validated user reference, dating it now
    pub fn new(input: CreateOrder) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            user_id: input.user_id,
            order_date: now,
            total_amount: input.total_amount,
            status: STATUS_PENDING.to_string(),
            shipping_address: input.shipping_address,
            created_at: now,
            updated_at: now,
        }
    }
}
