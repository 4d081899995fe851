//! # vend-core: Pure Business Logic for Vend POS
//!
//! The heart of the system: cart math, money arithmetic, domain types, and
//! validation, all as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    apps/api (axum handlers)                     │
//! │     /auth/start ─► /products ─► /tax ─► /purchase               │
//! └───────────────────────────────┬─────────────────────────────────┘
//! ┌───────────────────────────────▼─────────────────────────────────┐
//! │               ★ vend-core (THIS CRATE) ★                        │
//! │                                                                 │
//! │   types        money        calculator       validation         │
//! │   Product      Money        compute_totals   rules              │
//! │   CartItem     TaxRate                       checks             │
//! │                                                                 │
//! │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │
//! └───────────────────────────────┬─────────────────────────────────┘
//! ┌───────────────────────────────▼─────────────────────────────────┐
//! │                vend-db (SQLite repositories)                    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: same input, same output
//! 2. **Integer money**: all monetary values are minor units (i64)
//! 3. **Explicit errors**: typed enums, never strings or panics

pub mod calculator;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

pub use calculator::{compute_totals, PurchaseTotals};
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Store code stamped on every transaction header.
///
/// The runtime is single-store; the schema carries the code so a multi-store
/// deployment only needs to make this configurable.
pub const DEFAULT_STORE_CD: &str = "30";

/// Point-of-sale terminal number stamped on every transaction header.
pub const DEFAULT_POS_NO: &str = "90";

/// Sentinel employee code used when a purchase request carries none.
pub const UNKNOWN_EMP_CD: &str = "9999999999";

/// Tax category written to every detail row.
///
/// Stored per-unit but never consulted by the calculator, which applies the
/// flat rate below to the whole cart.
pub const DETAIL_TAX_CD: &str = "10";

/// Flat consumption tax rate in basis points (1000 = 10%).
pub const FLAT_TAX_RATE_BPS: u32 = 1000;
