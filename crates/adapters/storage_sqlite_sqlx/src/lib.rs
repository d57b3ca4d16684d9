//! # timer24h-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the `LocalStore` port defined in `timer24h-app::ports::store`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//!
//! ## Dependency rule
//! Depends on `timer24h-app` (for port traits) and `timer24h-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod error;
pub mod local_store;
pub mod pool;

pub use local_store::SqliteLocalStore;
pub use pool::{Config, Database};
