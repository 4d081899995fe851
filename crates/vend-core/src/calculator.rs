//! # Purchase Calculator
//!
//! Pure totals computation for a cart.
//!
//! ## Computation
//! ```text
//! subtotal_ex_tax = Σ (item.price × item.quantity)
//! tax_amt         = floor(subtotal_ex_tax × 10%)      (truncation)
//! total_amt       = subtotal_ex_tax + tax_amt
//! ```
//!
//! The flat rate applies to the whole cart regardless of the tax category
//! stamped on detail rows; per-category rates are a schema capability the
//! calculation deliberately does not use yet.

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CartItem, TaxRate};
use crate::validation::validate_cart_item;
use crate::FLAT_TAX_RATE_BPS;

/// Computed amounts for one purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseTotals {
    /// Pre-tax total in minor units.
    pub subtotal_ex_tax: i64,
    /// Tax in minor units, truncated toward zero.
    pub tax_amt: i64,
    /// Tax-inclusive total in minor units.
    pub total_amt: i64,
}

/// Computes subtotal, tax, and total for a cart.
///
/// Every item is validated before anything is summed; the first invalid
/// item aborts the whole computation with [`CoreError::InvalidCartItem`].
/// An empty cart is legal and totals to zero.
///
/// ```rust
/// use vend_core::calculator::compute_totals;
/// use vend_core::types::CartItem;
///
/// let items = vec![
///     CartItem { prd_id: 1, code: 10, name: "A".into(), price: 1000, quantity: 2 },
///     CartItem { prd_id: 2, code: 20, name: "B".into(), price: 500, quantity: 1 },
/// ];
/// let totals = compute_totals(&items).unwrap();
/// assert_eq!(totals.subtotal_ex_tax, 2500);
/// assert_eq!(totals.tax_amt, 250);
/// assert_eq!(totals.total_amt, 2750);
/// ```
pub fn compute_totals(items: &[CartItem]) -> CoreResult<PurchaseTotals> {
    for item in items {
        validate_cart_item(item).map_err(|source| CoreError::InvalidCartItem {
            name: item.name.clone(),
            source,
        })?;
    }

    let subtotal: Money = items.iter().map(CartItem::line_total).sum();
    let tax = subtotal.tax_truncated(TaxRate::from_bps(FLAT_TAX_RATE_BPS));

    Ok(PurchaseTotals {
        subtotal_ex_tax: subtotal.minor(),
        tax_amt: tax.minor(),
        total_amt: (subtotal + tax).minor(),
    })
}
