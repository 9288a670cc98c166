use chrono::Utc;
use domain_users::repository::UserRepository;
use std::sync::Arc;

use crate::error::{OrderError, OrderResult};
use crate::models::{CreateOrder, Order, STATUS_CANCELLED};
use crate::repository::OrderRepository;

/// Service layer for Order business logic.
///
/// Holds the order store plus a read-only view of the user store: the one
/// cross-domain dependency, used to validate the user reference when an
/// order is created.
#[derive(Clone)]
pub struct OrderService<R, U>
where
    R: OrderRepository,
    U: UserRepository,
{
    repository: Arc<R>,
    users: Arc<U>,
}

impl<R, U> OrderService<R, U>
where
    R: OrderRepository,
    U: UserRepository,
{
    pub fn new(repository: R, users: U) -> Self {
        Self {
            repository: Arc::new(repository),
            users: Arc::new(users),
        }
    }

    /// List all orders, most recent order date first.
    ///
    /// The descending ordering is part of the contract, not incidental.
    pub async fn list_orders(&self) -> OrderResult<Vec<Order>> {
        self.repository.find_all_by_date_desc().await
    }

    /// Get an order by ID; absence is a normal outcome, not an error
    pub async fn get_order(&self, id: i64) -> OrderResult<Option<Order>> {
        self.repository.find_by_id(id).await
    }

    /// List a user's orders
    pub async fn list_orders_by_user(&self, user_id: i64) -> OrderResult<Vec<Order>> {
        self.repository.find_by_user(user_id).await
    }

    /// List orders with an exact status
    pub async fn list_orders_by_status(&self, status: &str) -> OrderResult<Vec<Order>> {
        self.repository.find_by_status(status).await
    }

    /// List a user's orders with an exact status
    pub async fn list_user_orders_by_status(
        &self,
        user_id: i64,
        status: &str,
    ) -> OrderResult<Vec<Order>> {
        self.repository.find_by_user_and_status(user_id, status).await
    }

    /// Place a new order.
    ///
    /// The user reference must resolve at creation time; the order starts
    /// as "PENDING" dated now.
    pub async fn create_order(&self, input: CreateOrder) -> OrderResult<Order> {
        let user = self
            .users
            .find_by_id(input.user_id)
            .await
            .map_err(|e| OrderError::Store(e.to_string()))?;

        if user.is_none() {
            return Err(OrderError::UserNotFound(input.user_id));
        }

        self.repository.save(Order::new(input)).await
    }

    /// Overwrite an order's status.
    ///
    /// Any string is accepted; there is no transition checking at this
    /// layer.
    pub async fn update_order_status(&self, order_id: i64, new_status: &str) -> OrderResult<Order> {
        let mut order = self
            .repository
            .find_by_id(order_id)
            .await?
            .ok_or(OrderError::NotFound(order_id))?;

        order.status = new_status.to_string();
        order.updated_at = Utc::now();

        self.repository.save(order).await
    }

    /// Cancel an order: shorthand for setting the status to "CANCELLED"
    pub async fn cancel_order(&self, order_id: i64) -> OrderResult<Order> {
        self.update_order_status(order_id, STATUS_CANCELLED).await
    }

    /// Delete an order by ID; idempotent, mirrors the store semantics
    pub async fn delete_order(&self, order_id: i64) -> OrderResult<()> {
        self.repository.delete_by_id(order_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::STATUS_PENDING;
    use crate::repository::InMemoryOrderRepository;
    use domain_users::models::{CreateUser, Role};
    use domain_users::repository::InMemoryUserRepository;
    use domain_users::{User, UserRepository as _};

    async fn service_with_user() -> (
        OrderService<InMemoryOrderRepository, InMemoryUserRepository>,
        User,
    ) {
        let users = InMemoryUserRepository::new();
        let user = users
            .save(User::new(CreateUser {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                password: "secret".to_string(),
                first_name: None,
                last_name: None,
                phone: None,
                role: Role::Customer,
                is_active: true,
            }))
            .await
            .unwrap();

        let service = OrderService::new(InMemoryOrderRepository::new(), users);
        (service, user)
    }

    fn create_input(user_id: i64) -> CreateOrder {
        CreateOrder {
            user_id,
            total_amount: 149.50,
            shipping_address: Some("1 Main St".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_order_for_existing_user() {
        let (service, user) = service_with_user().await;

        let before = Utc::now();
        let order = service.create_order(create_input(user.id)).await.unwrap();

        assert_eq!(order.user_id, user.id);
        assert_eq!(order.status, STATUS_PENDING);
        assert_eq!(order.total_amount, 149.50);
        assert!(order.order_date >= before);
        assert_eq!(order.created_at, order.updated_at);
    }

    #[tokio::test]
    async fn test_create_order_unknown_user() {
        let (service, _user) = service_with_user().await;

        let result = service.create_order(create_input(999)).await;
        assert!(matches!(result, Err(OrderError::UserNotFound(999))));
    }

    #[tokio::test]
    async fn test_update_status_accepts_any_string() {
        let (service, user) = service_with_user().await;
        let order = service.create_order(create_input(user.id)).await.unwrap();

        let updated = service
            .update_order_status(order.id, "OUT_FOR_DELIVERY")
            .await
            .unwrap();
        assert_eq!(updated.status, "OUT_FOR_DELIVERY");
        assert!(updated.updated_at >= order.updated_at);

        let result = service.update_order_status(999, "SHIPPED").await;
        assert!(matches!(result, Err(OrderError::NotFound(999))));
    }

    #[tokio::test]
    async fn test_cancel_sets_cancelled_status() {
        let (service, user) = service_with_user().await;
        let order = service.create_order(create_input(user.id)).await.unwrap();

        service.cancel_order(order.id).await.unwrap();

        let cancelled = service.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(cancelled.status, STATUS_CANCELLED);
    }

    #[tokio::test]
    async fn test_list_orders_most_recent_first() {
        let (service, user) = service_with_user().await;

        for _ in 0..3 {
            service.create_order(create_input(user.id)).await.unwrap();
        }

        let orders = service.list_orders().await.unwrap();
        assert_eq!(orders.len(), 3);
        for pair in orders.windows(2) {
            assert!(pair[0].order_date >= pair[1].order_date);
        }
    }

    #[tokio::test]
    async fn test_filtered_lookups() {
        let (service, user) = service_with_user().await;
        let order = service.create_order(create_input(user.id)).await.unwrap();
        service.create_order(create_input(user.id)).await.unwrap();
        service.cancel_order(order.id).await.unwrap();

        assert_eq!(
            service.list_orders_by_user(user.id).await.unwrap().len(),
            2
        );
        assert_eq!(
            service
                .list_orders_by_status(STATUS_CANCELLED)
                .await
                .unwrap()
                .len(),
            1
        );
        assert_eq!(
            service
                .list_user_orders_by_status(user.id, STATUS_PENDING)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_delete_order() {
        let (service, user) = service_with_user().await;
        let order = service.create_order(create_input(user.id)).await.unwrap();

        service.delete_order(order.id).await.unwrap();
        assert!(service.get_order(order.id).await.unwrap().is_none());

        // Deleting again is not an error
        service.delete_order(order.id).await.unwrap();
    }
}
