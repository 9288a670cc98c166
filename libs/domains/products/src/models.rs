use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Product entity - an item in the store catalog
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Unique identifier, assigned by the store on creation (0 = not yet persisted)
    pub id: i64,
    /// Product name
    pub name: String,
    /// Product description
    pub description: Option<String>,
    /// Unit price
    pub price: f64,
    /// Units in stock
    pub quantity: i32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[serde(default)]
    pub quantity: i32,
}

/// DTO for updating an existing product
///
/// All fields are overwritten on update; there is no partial patch.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: f64,
    pub quantity: i32,
}

/// Query parameters for keyword search
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
pub struct SearchParams {
    /// Case-insensitive substring matched against name or description;
    /// blank or absent returns the full catalog
    pub keyword: Option<String>,
}

/// Query parameters for stock adjustment
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
pub struct StockParams {
    /// Signed delta applied to the current quantity
    pub quantity: i32,
}

/// Aggregate catalog statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductStats {
    /// Number of products in the catalog
    pub total_products: usize,
    /// Σ(price × quantity), formatted to two decimal places
    pub total_value: String,
    /// Unweighted mean of unit prices, formatted to two decimal places
    pub average_price: String,
    /// Σ quantity
    pub total_quantity: i64,
    /// Products with quantity > 0
    pub in_stock: usize,
    /// Products with quantity <= 0
    pub out_of_stock: usize,
}

impl Product {
    /// Create a new product from the CreateProduct DTO, stamping both
    /// timestamps. Invoked at the request boundary before the service
    /// persists the product.
    pub fn new(input: CreateProduct) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: input.name,
            description: input.description,
            price: input.price,
            quantity: input.quantity,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply updates from UpdateProduct DTO, refreshing `updated_at`
    pub fn apply_update(&mut self, update: UpdateProduct) {
        self.name = update.name;
        self.description = update.description;
        self.price = update.price;
        self.quantity = update.quantity;
        self.updated_at = Utc::now();
    }
}
