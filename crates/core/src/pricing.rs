//! Pricing
//!
//! Wholesale customers pay the wholesale unit price on lines of at least
//! [`WHOLESALE_MIN_QUANTITY`] units. Every other line is charged at the retail price.

use rust_decimal::Decimal;
use rusty_money::{Money, iso};

use crate::{customers::Classification, products::Product};

/// Minimum line quantity at which wholesale customers get the wholesale price.
pub const WHOLESALE_MIN_QUANTITY: u32 = 100;

/// Return the unit price charged for `quantity` units of `product`.
///
/// `classification` is `None` when no customer has been selected yet, which prices like retail.
pub fn effective_price(
    product: &Product,
    quantity: u32,
    classification: Option<Classification>,
) -> Decimal {
    match classification {
        Some(Classification::Wholesale) if quantity >= WHOLESALE_MIN_QUANTITY => {
            product.wholesale_price
        }
        Some(Classification::Wholesale | Classification::Retail) | None => product.retail_price,
    }
}

/// Return the amount charged for `quantity` units of `product`.
pub fn line_amount(
    product: &Product,
    quantity: u32,
    classification: Option<Classification>,
) -> Decimal {
    effective_price(product, quantity, classification) * Decimal::from(quantity)
}

/// Wrap an amount in Peruvian soles for display.
pub fn soles(amount: Decimal) -> Money<'static, iso::Currency> {
    Money::from_decimal(amount, iso::PEN)
}
