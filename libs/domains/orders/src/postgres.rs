use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::{
    entity,
    error::{OrderError, OrderResult},
    models::Order,
    repository::OrderRepository,
};

pub struct PgOrderRepository {
    base: BaseRepository<entity::Entity>,
}

impl PgOrderRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

fn store_err(e: sea_orm::DbErr) -> OrderError {
    OrderError::Store(format!("Database error: {}", e))
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn find_by_id(&self, id: i64) -> OrderResult<Option<Order>> {
        let model = self.base.find_by_id(id).await.map_err(store_err)?;
        Ok(model.map(|m| m.into()))
    }

    async fn save(&self, order: Order) -> OrderResult<Order> {
        let is_new = order.id == 0;
        let active_model: entity::ActiveModel = order.into();

        let model = if is_new {
            self.base.insert(active_model).await.map_err(store_err)?
        } else {
            self.base.update(active_model).await.map_err(store_err)?
        };

        if is_new {
            tracing::info!(order_id = %model.id, "Created order");
        } else {
            tracing::info!(order_id = %model.id, "Updated order");
        }
        Ok(model.into())
    }

    async fn delete_by_id(&self, id: i64) -> OrderResult<()> {
        let rows_affected = self.base.delete_by_id(id).await.map_err(store_err)?;

        if rows_affected > 0 {
            tracing::info!(order_id = %id, "Deleted order");
        }

        Ok(())
    }

    async fn find_by_user(&self, user_id: i64) -> OrderResult<Vec<Order>> {
        let models = entity::Entity::find()
            .filter(entity::Column::UserId.eq(user_id))
            .all(self.base.db())
            .await
            .map_err(store_err)?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn find_by_status(&self, status: &str) -> OrderResult<Vec<Order>> {
        let models = entity::Entity::find()
            .filter(entity::Column::Status.eq(status))
            .all(self.base.db())
            .await
            .map_err(store_err)?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn find_by_user_and_status(
        &self,
        user_id: i64,
        status: &str,
    ) -> OrderResult<Vec<Order>> {
        let models = entity::Entity::find()
            .filter(entity::Column::UserId.eq(user_id))
            .filter(entity::Column::Status.eq(status))
            .all(self.base.db())
            .await
            .map_err(store_err)?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn find_all_by_date_desc(&self) -> OrderResult<Vec<Order>> {
        // Secondary key keeps the ordering deterministic for equal dates
        let models = entity::Entity::find()
            .order_by_desc(entity::Column::OrderDate)
            .order_by_desc(entity::Column::Id)
            .all(self.base.db())
            .await
            .map_err(store_err)?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }
}
