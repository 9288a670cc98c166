use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::error::ProductResult;
use crate::models::Product;

/// Repository trait for Product persistence
///
/// `save` both inserts (id 0) and updates (id assigned); deletion is
/// idempotent and succeeds for absent ids.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Fetch all products, store-defined order
    async fn find_all(&self) -> ProductResult<Vec<Product>>;

    /// Fetch a product by ID
    async fn find_by_id(&self, id: i64) -> ProductResult<Option<Product>>;

    /// Persist a product, assigning an id on first save
    async fn save(&self, product: Product) -> ProductResult<Product>;

    /// Delete a product by ID (no error if absent)
    async fn delete_by_id(&self, id: i64) -> ProductResult<()>;
}

/// In-memory implementation of ProductRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<i64, Product>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_all(&self) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;

        let mut result: Vec<Product> = products.values().cloned().collect();
        result.sort_by_key(|p| p.id);

        Ok(result)
    }

    async fn find_by_id(&self, id: i64) -> ProductResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&id).cloned())
    }

    async fn save(&self, mut product: Product) -> ProductResult<Product> {
        let mut products = self.products.write().await;

        if product.id == 0 {
            product.id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            tracing::info!(product_id = %product.id, "Created product");
        } else {
            tracing::info!(product_id = %product.id, "Updated product");
        }

        products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn delete_by_id(&self, id: i64) -> ProductResult<()> {
        let mut products = self.products.write().await;

        if products.remove(&id).is_some() {
            tracing::info!(product_id = %id, "Deleted product");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateProduct;

    fn laptop() -> Product {
        Product::new(CreateProduct {
            name: "Laptop".to_string(),
            description: Some("15 inch ultrabook".to_string()),
            price: 999.99,
            quantity: 10,
        })
    }

    #[tokio::test]
    async fn test_save_assigns_id_and_get() {
        let repo = InMemoryProductRepository::new();

        let product = repo.save(laptop()).await.unwrap();
        assert_eq!(product.id, 1);

        let fetched = repo.find_by_id(product.id).await.unwrap();
        assert!(fetched.is_some());
        assert_eq!(fetched.unwrap().name, "Laptop");
    }

    #[tokio::test]
    async fn test_save_existing_overwrites() {
        let repo = InMemoryProductRepository::new();

        let mut product = repo.save(laptop()).await.unwrap();
        product.quantity = 3;

        let updated = repo.save(product.clone()).await.unwrap();
        assert_eq!(updated.id, product.id);
        assert_eq!(updated.quantity, 3);

        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let repo = InMemoryProductRepository::new();

        let product = repo.save(laptop()).await.unwrap();
        repo.delete_by_id(product.id).await.unwrap();
        // Second delete of the same id is not an error
        repo.delete_by_id(product.id).await.unwrap();

        assert!(repo.find_by_id(product.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_all_ordered_by_id() {
        let repo = InMemoryProductRepository::new();

        for name in ["a", "b", "c"] {
            repo.save(Product::new(CreateProduct {
                name: name.to_string(),
                description: None,
                price: 1.0,
                quantity: 1,
            }))
            .await
            .unwrap();
        }

        let all = repo.find_all().await.unwrap();
        let ids: Vec<i64> = all.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
