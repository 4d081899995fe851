//! # Repository Module
//!
//! Database repository implementations for Vend POS.
//!
//! ## Repository Pattern
//! ```text
//! HTTP handler
//!      │  db.products().find_by_code(code)
//!      ▼
//! ProductRepository ──► SQL ──► SQLite
//! ```
//!
//! SQL is isolated here; handlers and the purchase workflow never see a
//! connection or a query string.
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - product lookup by code
//! - [`tax::TaxRepository`] - tax rate lookup
//! - [`transaction::TransactionRepository`] - purchase headers and details

pub mod product;
pub mod tax;
pub mod transaction;
