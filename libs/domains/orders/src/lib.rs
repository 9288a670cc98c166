//! Orders Domain
//!
//! Order lifecycle for the store: placement against an existing user,
//! status updates (including the cancel shortcut) and filtered queries.
//! Listing is always most-recent-first by order date.
//!
//! The layering mirrors the other domains; the service additionally reads
//! the user store to validate the referenced user when an order is placed.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_orders::{handlers, repository::InMemoryOrderRepository, service::OrderService};
//! use domain_users::repository::InMemoryUserRepository;
//!
//! let orders = InMemoryOrderRepository::new();
//! let users = InMemoryUserRepository::new();
//! let service = OrderService::new(orders, users);
//!
//! let router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{OrderError, OrderResult};
pub use models::{CreateOrder, Order, STATUS_CANCELLED, STATUS_PENDING, UpdateOrderStatus};
pub use postgres::PgOrderRepository;
pub use repository::{InMemoryOrderRepository, OrderRepository};
pub use service::OrderService;
