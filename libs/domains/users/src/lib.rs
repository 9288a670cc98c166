//! Users Domain
//!
//! Account management for the store: registration with unique username and
//! email, profile updates, activation lifecycle, password changes and
//! role/name queries.
//!
//! The layering mirrors the other domains: handlers over a service over a
//! repository trait with in-memory and Postgres implementations. Uniqueness
//! is pre-checked by the service for friendly errors and enforced for real
//! by the store's unique constraints.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{
//!     handlers,
//!     repository::InMemoryUserRepository,
//!     service::UserService,
//! };
//!
//! let repository = InMemoryUserRepository::new();
//! let service = UserService::new(repository);
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
pub use error::{UserError, UserResult};
pub use models::{ChangePassword, CreateUser, Role, UpdateUser, User, UserResponse};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
