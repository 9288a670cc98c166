use chrono::Utc;
use std::sync::Arc;

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ProductStats, UpdateProduct};
use crate::repository::ProductRepository;

/// Service layer for Product business logic
#[derive(Clone)]
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// List all products, store-defined order
    pub async fn list_products(&self) -> ProductResult<Vec<Product>> {
        self.repository.find_all().await
    }

    /// Get a product by ID; absence is a normal outcome, not an error
    pub async fn get_product(&self, id: i64) -> ProductResult<Option<Product>> {
        self.repository.find_by_id(id).await
    }

    /// Persist a new product.
    ///
    /// Timestamps are expected to be set by the caller (`Product::new`)
    /// before this call; the service applies no defaulting here.
    pub async fn create_product(&self, product: Product) -> ProductResult<Product> {
        self.repository.save(product).await
    }

    /// Update a product, overwriting name, description, price and quantity
    /// and refreshing `updated_at`
    pub async fn update_product(&self, id: i64, input: UpdateProduct) -> ProductResult<Product> {
        let mut product = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        product.apply_update(input);

        self.repository.save(product).await
    }

    /// Delete a product by ID; idempotent, mirrors the store semantics
    pub async fn delete_product(&self, id: i64) -> ProductResult<()> {
        self.repository.delete_by_id(id).await
    }

    /// Case-insensitive substring search against name or description.
    ///
    /// A blank or absent keyword returns the full, unfiltered list.
    pub async fn search_products(&self, keyword: Option<&str>) -> ProductResult<Vec<Product>> {
        let products = self.repository.find_all().await?;

        let needle = match keyword {
            Some(keyword) => keyword.trim().to_lowercase(),
            None => return Ok(products),
        };

        if needle.is_empty() {
            return Ok(products);
        }

        Ok(products
            .into_iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.description
                        .as_ref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .collect())
    }

    /// Apply a signed delta to a product's stock level.
    ///
    /// The resulting quantity is clamped at zero; over-subtraction is not
    /// an error.
    pub async fn adjust_stock(&self, id: i64, delta: i32) -> ProductResult<Product> {
        let mut product = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        product.quantity = (product.quantity + delta).max(0);
        product.updated_at = Utc::now();

        self.repository.save(product).await
    }

    /// Compute aggregate statistics over the full catalog
    pub async fn statistics(&self) -> ProductResult<ProductStats> {
        let products = self.repository.find_all().await?;
        Ok(compute_statistics(&products))
    }
}

/// Aggregate statistics over a product list.
///
/// `average_price` is the unweighted mean of unit prices (not weighted by
/// quantity); `in_stock` counts products with `quantity > 0`, everything
/// else counts as out of stock.
pub fn compute_statistics(products: &[Product]) -> ProductStats {
    let mut total_value = 0.0;
    let mut total_price = 0.0;
    let mut total_quantity: i64 = 0;
    let mut in_stock = 0;
    let mut out_of_stock = 0;

    for p in products {
        total_value += p.price * f64::from(p.quantity);
        total_price += p.price;
        total_quantity += i64::from(p.quantity);
        if p.quantity > 0 {
            in_stock += 1;
        } else {
            out_of_stock += 1;
        }
    }

    let average_price = if products.is_empty() {
        0.0
    } else {
        total_price / products.len() as f64
    };

    ProductStats {
        total_products: products.len(),
        total_value: format!("{:.2}", total_value),
        average_price: format!("{:.2}", average_price),
        total_quantity,
        in_stock,
        out_of_stock,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateProduct;
    use crate::repository::{InMemoryProductRepository, MockProductRepository};

    fn service() -> ProductService<InMemoryProductRepository> {
        ProductService::new(InMemoryProductRepository::new())
    }

    fn product(name: &str, description: Option<&str>, price: f64, quantity: i32) -> Product {
        Product::new(CreateProduct {
            name: name.to_string(),
            description: description.map(|d| d.to_string()),
            price,
            quantity,
        })
    }

    #[tokio::test]
    async fn test_adjust_stock_adds_and_subtracts() {
        let service = service();
        let created = service
            .create_product(product("Laptop", None, 999.99, 10))
            .await
            .unwrap();

        let restocked = service.adjust_stock(created.id, 5).await.unwrap();
        assert_eq!(restocked.quantity, 15);

        let sold = service.adjust_stock(created.id, -7).await.unwrap();
        assert_eq!(sold.quantity, 8);
        assert!(sold.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_adjust_stock_clamps_at_zero() {
        let service = service();
        let created = service
            .create_product(product("Mouse", None, 19.99, 3))
            .await
            .unwrap();

        // Over-subtraction clamps instead of erroring
        let adjusted = service.adjust_stock(created.id, -10).await.unwrap();
        assert_eq!(adjusted.quantity, 0);
    }

    #[tokio::test]
    async fn test_adjust_stock_missing_product() {
        let service = service();
        let result = service.adjust_stock(42, 1).await;
        assert!(matches!(result, Err(ProductError::NotFound(42))));
    }

    #[tokio::test]
    async fn test_update_overwrites_fields_and_touches_timestamp() {
        let service = service();
        let created = service
            .create_product(product("Laptop", Some("old"), 999.99, 10))
            .await
            .unwrap();

        let updated = service
            .update_product(
                created.id,
                UpdateProduct {
                    name: "Laptop Pro".to_string(),
                    description: None,
                    price: 1299.0,
                    quantity: 4,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Laptop Pro");
        assert_eq!(updated.description, None);
        assert_eq!(updated.price, 1299.0);
        assert_eq!(updated.quantity, 4);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let service = service();
        let result = service
            .update_product(
                1,
                UpdateProduct {
                    name: "x".to_string(),
                    description: None,
                    price: 1.0,
                    quantity: 0,
                },
            )
            .await;
        assert!(matches!(result, Err(ProductError::NotFound(1))));
    }

    #[tokio::test]
    async fn test_search_blank_and_absent_return_everything() {
        let service = service();
        service
            .create_product(product("Laptop", None, 999.99, 10))
            .await
            .unwrap();
        service
            .create_product(product("Mouse", None, 19.99, 50))
            .await
            .unwrap();

        assert_eq!(service.search_products(None).await.unwrap().len(), 2);
        assert_eq!(service.search_products(Some("")).await.unwrap().len(), 2);
        assert_eq!(service.search_products(Some("   ")).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_search_matches_name_or_description() {
        let service = service();
        service
            .create_product(product("Laptop", None, 999.99, 10))
            .await
            .unwrap();
        service
            .create_product(product("Bag", Some("new laptop bag"), 39.99, 20))
            .await
            .unwrap();
        service
            .create_product(product("Mouse", None, 19.99, 50))
            .await
            .unwrap();

        let found = service.search_products(Some("lap")).await.unwrap();
        let names: Vec<&str> = found.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Laptop", "Bag"]);

        // Keyword is trimmed and matching ignores case
        let found = service.search_products(Some("  LAPTOP ")).await.unwrap();
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn test_statistics_empty_catalog() {
        let stats = compute_statistics(&[]);
        assert_eq!(
            stats,
            ProductStats {
                total_products: 0,
                total_value: "0.00".to_string(),
                average_price: "0.00".to_string(),
                total_quantity: 0,
                in_stock: 0,
                out_of_stock: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_statistics_totals_and_unweighted_average() {
        let products = vec![
            product("a", None, 100.0, 10),
            product("b", None, 200.0, 20),
        ];

        let stats = compute_statistics(&products);
        assert_eq!(stats.total_products, 2);
        // 100×10 + 200×20
        assert_eq!(stats.total_value, "5000.00");
        // (100 + 200) / 2, not weighted by quantity
        assert_eq!(stats.average_price, "150.00");
        assert_eq!(stats.total_quantity, 30);
        assert_eq!(stats.in_stock, 2);
        assert_eq!(stats.out_of_stock, 0);
    }

    #[tokio::test]
    async fn test_statistics_counts_non_positive_quantity_as_out_of_stock() {
        let mut negative = product("returned", None, 5.0, 0);
        negative.quantity = -2;

        let products = vec![
            product("a", None, 10.0, 1),
            product("b", None, 10.0, 0),
            negative,
        ];

        let stats = compute_statistics(&products);
        assert_eq!(stats.in_stock, 1);
        assert_eq!(stats.out_of_stock, 2);
    }

    #[tokio::test]
    async fn test_create_keeps_caller_timestamps() {
        let service = service();
        let input = product("Laptop", None, 999.99, 10);
        let created_at = input.created_at;

        let created = service.create_product(input).await.unwrap();
        assert_eq!(created.created_at, created_at);
        assert_eq!(created.updated_at, created_at);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id()
            .returning(|_| Err(ProductError::Store("connection reset".to_string())));

        let service = ProductService::new(repo);
        let result = service.adjust_stock(1, 1).await;
        assert!(matches!(result, Err(ProductError::Store(_))));
    }
}
