//! # vend-db: SQLite persistence for Vend POS
//!
//! Connection pool, embedded migrations, and repositories.
//!
//! ## Layout
//! ```text
//! pool.rs         DbConfig + Database handle (bounded pool, WAL mode)
//! migrations.rs   embedded SQL migrations
//! error.rs        DbError taxonomy
//! repository/     product, tax, transaction repositories
//! ```
//!
//! Queries are bound at runtime (`sqlx::query_as` + `bind`), so the crate
//! compiles without a development database on disk.

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::product::ProductRepository;
pub use repository::tax::TaxRepository;
pub use repository::transaction::TransactionRepository;
