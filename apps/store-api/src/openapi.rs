//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for the Store API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Online Store API",
        version = "0.1.0",
        description = "Inventory and order management API over products, users and orders",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/products", api = domain_products::handlers::ApiDoc),
        (path = "/api/users", api = domain_users::handlers::ApiDoc),
        (path = "/api/orders", api = domain_orders::handlers::ApiDoc)
    )
)]
pub struct ApiDoc;
