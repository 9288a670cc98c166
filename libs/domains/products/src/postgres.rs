use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::DatabaseConnection;

use crate::{
    entity,
    error::{ProductError, ProductResult},
    models::Product,
    repository::ProductRepository,
};

pub struct PgProductRepository {
    base: BaseRepository<entity::Entity>,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

fn store_err(e: sea_orm::DbErr) -> ProductError {
    ProductError::Store(format!("Database error: {}", e))
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_all(&self) -> ProductResult<Vec<Product>> {
        let models = self.base.find_all().await.map_err(store_err)?;
        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn find_by_id(&self, id: i64) -> ProductResult<Option<Product>> {
        let model = self.base.find_by_id(id).await.map_err(store_err)?;
        Ok(model.map(|m| m.into()))
    }

    async fn save(&self, product: Product) -> ProductResult<Product> {
        let is_new = product.id == 0;
        let active_model: entity::ActiveModel = product.into();

        let model = if is_new {
            self.base.insert(active_model).await.map_err(store_err)?
        } else {
            self.base.update(active_model).await.map_err(store_err)?
        };

        if is_new {
            tracing::info!(product_id = %model.id, "Created product");
        } else {
            tracing::info!(product_id = %model.id, "Updated product");
        }
        Ok(model.into())
    }

    async fn delete_by_id(&self, id: i64) -> ProductResult<()> {
        let rows_affected = self.base.delete_by_id(id).await.map_err(store_err)?;

        if rows_affected > 0 {
            tracing::info!(product_id = %id, "Deleted product");
        }

        Ok(())
    }
}
