use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::error::OrderResult;
use crate::models::Order;

/// Repository trait for Order persistence.
///
/// `find_all_by_date_desc` must return a deterministic ordering: most
/// recent `order_date` first, ties broken stably.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Fetch an order by ID
    async fn find_by_id(&self, id: i64) -> OrderResult<Option<Order>>;

    /// Persist an order, assigning an id on first save
    async fn save(&self, order: Order) -> OrderResult<Order>;

    /// Delete an order by ID (no error if absent)
    async fn delete_by_id(&self, id: i64) -> OrderResult<()>;

    /// Fetch all orders placed by a user
    async fn find_by_user(&self, user_id: i64) -> OrderResult<Vec<Order>>;

    /// Fetch all orders with an exact status
    async fn find_by_status(&self, status: &str) -> OrderResult<Vec<Order>>;

    /// Fetch a user's orders with an exact status
    async fn find_by_user_and_status(&self, user_id: i64, status: &str)
    -> OrderResult<Vec<Order>>;

    /// Fetch all orders, most recent order date first
    async fn find_all_by_date_desc(&self) -> OrderResult<Vec<Order>>;
}

/// In-memory implementation of OrderRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryOrderRepository {
    orders: Arc<RwLock<HashMap<i64, Order>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(mut orders: Vec<Order>) -> Vec<Order> {
        orders.sort_by_key(|o| o.id);
        orders
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn find_by_id(&self, id: i64) -> OrderResult<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.get(&id).cloned())
    }

    async fn save(&self, mut order: Order) -> OrderResult<Order> {
        let mut orders = self.orders.write().await;

        if order.id == 0 {
            order.id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            tracing::info!(order_id = %order.id, "Created order");
        } else {
            tracing::info!(order_id = %order.id, "Updated order");
        }

        orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn delete_by_id(&self, id: i64) -> OrderResult<()> {
        let mut orders = self.orders.write().await;

        if orders.remove(&id).is_some() {
            tracing::info!(order_id = %id, "Deleted order");
        }

        Ok(())
    }

    async fn find_by_user(&self, user_id: i64) -> OrderResult<Vec<Order>> {
        let orders = self.orders.read().await;
        Ok(Self::sorted(
            orders
                .values()
                .filter(|o| o.user_id == user_id)
                .cloned()
                .collect(),
        ))
    }

    async fn find_by_status(&self, status: &str) -> OrderResult<Vec<Order>> {
        let orders = self.orders.read().await;
        Ok(Self::sorted(
            orders
                .values()
                .filter(|o| o.status == status)
                .cloned()
                .collect(),
        ))
    }

    async fn find_by_user_and_status(
        &self,
        user_id: i64,
        status: &str,
    ) -> OrderResult<Vec<Order>> {
        let orders = self.orders.read().await;
        Ok(Self::sorted(
            orders
                .values()
                .filter(|o| o.user_id == user_id && o.status == status)
                .cloned()
                .collect(),
        ))
    }

    async fn find_all_by_date_desc(&self) -> OrderResult<Vec<Order>> {
        let mut result = Self::sorted(self.orders.read().await.values().cloned().collect());
        // Stable sort: ties keep ascending-id order, so the result is
        // deterministic for equal dates
        result.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        Ok(result)
    }
}
