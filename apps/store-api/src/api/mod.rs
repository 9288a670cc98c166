use axum::Router;

pub mod health;

use domain_orders::{OrderService, PgOrderRepository};
use domain_products::{PgProductRepository, ProductService};
use domain_users::{PgUserRepository, UserService};

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix will be added by the `create_router` helper.
///
/// Returns a stateless Router: each domain router has its service state
/// already applied, and domains share the connection pool through cheap
/// `DatabaseConnection` clones.
pub fn routes(state: &crate::state::AppState) -> Router {
    let products = ProductService::new(PgProductRepository::new(state.db.clone()));
    let users = UserService::new(PgUserRepository::new(state.db.clone()));
    let orders = OrderService::new(
        PgOrderRepository::new(state.db.clone()),
        PgUserRepository::new(state.db.clone()),
    );

    Router::new()
        .nest("/products", domain_products::handlers::router(products))
        .nest("/users", domain_users::handlers::router(users))
        .nest("/orders", domain_orders::handlers::router(orders))
}

/// Creates a router with the /ready endpoint that performs actual health checks.
///
/// This router has state applied and can be merged with the stateless app
/// router from `create_router`. The /ready endpoint pings PostgreSQL.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
