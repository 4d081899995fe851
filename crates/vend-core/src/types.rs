//! # Domain Types
//!
//! Core domain types used throughout Vend POS.
//!
//! ## Type Overview
//! ```text
//! ┌──────────────┐   ┌────────────────┐   ┌─────────────────────┐
//! │   Product    │   │  Transaction   │   │  TransactionDetail  │
//! │ ──────────── │   │ ────────────── │   │ ─────────────────── │
//! │ prd_id       │   │ trd_id         │   │ trd_id (FK)         │
//! │ code         │   │ emp/store/pos  │   │ dtl_id (unit index) │
//! │ name         │   │ total_amt      │   │ prd_* snapshot      │
//! │ price        │   │ ttl_amt_ex_tax │   │ tax_cd              │
//! └──────────────┘   └────────────────┘   └─────────────────────┘
//!
//! ┌──────────────┐   ┌────────────────┐
//! │   CartItem   │   │    TaxRate     │
//! │  (transient, │   │  bps (u32)     │
//! │  per request)│   │  1000 = 10%    │
//! └──────────────┘   └────────────────┘
//! ```
//!
//! Detail rows use the snapshot pattern: product code, name, and price are
//! frozen onto each row at purchase time, so later product edits never
//! rewrite history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate in basis points (1 bp = 0.01%; 1000 bps = 10%).
///
/// Integer basis points keep rate arithmetic exact; the wire format
/// converts to a decimal fraction only at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a decimal fraction (0.1 for 10%). Display only.
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 as f64 / 10000.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Generated identifier.
    pub prd_id: i64,

    /// Scan code. Not unique; lookups return the first match.
    pub code: i64,

    /// Display name shown to the shopper and frozen onto detail rows.
    pub name: String,

    /// Unit price in minor currency units.
    pub price: i64,
}

impl Product {
    /// Returns the price as a Money value.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_minor(self.price)
    }
}

// =============================================================================
// Tax Record
// =============================================================================

/// A persisted tax rate row, served by the tax lookup endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TaxRecord {
    pub tax_id: i64,
    pub tax_cd: String,
    pub tax_rate_bps: i64,
}

impl TaxRecord {
    /// Returns the stored rate.
    #[inline]
    pub fn rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps as u32)
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// One line of a purchase request. Transient, supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub prd_id: i64,
    pub code: i64,
    pub name: String,
    /// Unit price in minor currency units.
    pub price: i64,
    /// Number of units; must be positive.
    pub quantity: i64,
}

impl CartItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_minor(self.price)
    }

    /// Returns price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A persisted purchase header.
///
/// Created with zero amounts, then updated exactly once with the computed
/// totals after the detail rows are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Transaction {
    pub trd_id: i64,
    pub datetime: DateTime<Utc>,
    pub emp_cd: String,
    pub store_cd: String,
    pub pos_no: String,
    /// Tax-inclusive total in minor units.
    pub total_amt: i64,
    /// Pre-tax total in minor units.
    pub ttl_amt_ex_tax: i64,
}

/// Fields for inserting a new transaction header. Amounts start at zero.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub datetime: DateTime<Utc>,
    pub emp_cd: String,
    pub store_cd: String,
    pub pos_no: String,
}

// =============================================================================
// Transaction Detail
// =============================================================================

/// A persisted line-item row: one row per purchased unit.
///
/// `dtl_id` is the unit index within its cart item (1..=quantity) and
/// repeats across distinct cart items in the same transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TransactionDetail {
    pub trd_id: i64,
    pub dtl_id: i64,
    pub prd_id: i64,
    /// Product code at time of sale (frozen).
    pub prd_code: i64,
    /// Product name at time of sale (frozen).
    pub prd_name: String,
    /// Unit price in minor units at time of sale (frozen).
    pub prd_price: i64,
    /// Tax category identifier. Stored, never consulted by the calculator.
    pub tax_cd: String,
}

/// Fields for inserting a new detail row.
#[derive(Debug, Clone)]
pub struct NewDetail {
    pub trd_id: i64,
    pub dtl_id: i64,
    pub prd_id: i64,
    pub prd_code: i64,
    pub prd_name: String,
    pub prd_price: i64,
    pub tax_cd: String,
}

impl NewDetail {
    /// Builds the detail row for one unit of a cart item.
    pub fn for_unit(trd_id: i64, unit_index: i64, item: &CartItem, tax_cd: &str) -> Self {
        NewDetail {
            trd_id,
            dtl_id: unit_index,
            prd_id: item.prd_id,
            prd_code: item.code,
            prd_name: item.name.clone(),
            prd_price: item.price,
            tax_cd: tax_cd.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_fraction() {
        let rate = TaxRate::from_bps(1000);
        assert_eq!(rate.bps(), 1000);
        assert!((rate.fraction() - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cart_item_line_total() {
        let item = CartItem {
            prd_id: 1,
            code: 4901234567890,
            name: "Green Tea 500ml".to_string(),
            price: 150,
            quantity: 3,
        };
        assert_eq!(item.line_total().minor(), 450);
    }

    #[test]
    fn test_detail_for_unit_snapshots_item() {
        let item = CartItem {
            prd_id: 7,
            code: 42,
            name: "Chocolate Bar".to_string(),
            price: 120,
            quantity: 2,
        };
        let row = NewDetail::for_unit(99, 2, &item, "10");
        assert_eq!(row.trd_id, 99);
        assert_eq!(row.dtl_id, 2);
        assert_eq!(row.prd_id, 7);
        assert_eq!(row.prd_code, 42);
        assert_eq!(row.prd_name, "Chocolate Bar");
        assert_eq!(row.prd_price, 120);
        assert_eq!(row.tax_cd, "10");
    }
}
