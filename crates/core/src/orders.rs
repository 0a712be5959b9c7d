//! Orders
//!
//! The order payload sent to the orders endpoint. Field names follow the backend's JSON.

use std::{
    fmt,
    sync::atomic::{AtomicI64, Ordering},
};

use jiff::{Timestamp, civil::Date};
use rust_decimal::Decimal;
use serde::Serialize;
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    cart::Cart,
    customers::{Customer, CustomerId},
    pricing::effective_price,
    products::ProductId,
    session::{SellerId, Session},
};

/// Grant type recorded for every bonus grant; the orders endpoint files all of them under it.
pub const GRANT_TYPE: &str = "cantidad";

/// Errors raised when the cart cannot become an order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No customer has been selected.
    #[error("no customer selected")]
    NoCustomer,

    /// No sale line has a quantity above zero.
    #[error("no sellable items")]
    NoSellableItems,

    /// A negative quantity was requested.
    #[error("quantity {0} is negative")]
    NegativeQuantity(i64),

    /// A quantity larger than a line can hold was requested.
    #[error("quantity {0} is too large")]
    QuantityTooLarge(i64),
}

static LAST_ORDER_MILLIS: AtomicI64 = AtomicI64::new(0);

/// Client-generated order number, `PED-<unix millis>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Generate a new order number from the current time.
    ///
    /// Numbers are strictly increasing within the process: two orders built in the same
    /// millisecond get consecutive values.
    pub fn generate() -> Self {
        Self::from_millis(next_millis(Timestamp::now().as_millisecond()))
    }

    fn from_millis(millis: i64) -> Self {
        Self(format!("PED-{millis}"))
    }

    /// Return the order number as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn next_millis(now: i64) -> i64 {
    let mut last = LAST_ORDER_MILLIS.load(Ordering::Relaxed);

    loop {
        let next = now.max(last.saturating_add(1));

        match LAST_ORDER_MILLIS.compare_exchange_weak(
            last,
            next,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => return next,
            Err(actual) => last = actual,
        }
    }
}

/// Bonus units granted alongside a sold product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BonusGrant {
    /// Granted product
    #[serde(rename = "idProducto")]
    pub product: ProductId,

    /// Granted units
    #[serde(rename = "cantidad_bonificada")]
    pub quantity: u32,

    /// Units sold on the detail that carries the grant
    #[serde(rename = "cantidad_comprada")]
    pub purchased_quantity: u32,

    /// Grant type
    #[serde(rename = "tipo_bonificacion")]
    pub grant_type: &'static str,

    /// Remarks, the description of the granted line
    #[serde(rename = "observaciones")]
    pub remarks: String,
}

/// One sold product on an order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDetail {
    /// Sold product
    #[serde(rename = "idProducto")]
    pub product: ProductId,

    /// Sold units
    #[serde(rename = "cantidad")]
    pub quantity: u32,

    /// Unit price charged at the time of sale
    #[serde(rename = "precio_unitario", with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,

    /// Bonus grants attached to this product
    #[serde(rename = "bonificaciones", skip_serializing_if = "SmallVec::is_empty")]
    pub grants: SmallVec<[BonusGrant; 2]>,
}

/// Order payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    /// Ordering customer
    #[serde(rename = "idCliente")]
    pub customer: CustomerId,

    /// Seller submitting the order
    #[serde(rename = "idVendedor")]
    pub seller: SellerId,

    /// Client-generated order number
    #[serde(rename = "numero_pedido")]
    pub number: OrderNumber,

    /// Requested delivery date
    #[serde(rename = "fecha_entrega")]
    pub delivery_date: Date,

    /// Sold products
    #[serde(rename = "detalles")]
    pub details: Vec<OrderDetail>,
}

/// Build the order payload for the current cart.
///
/// A bonus line is nested under the sale detail with the same product id. When no sale detail
/// sells the granted product, it is nested under the detail of the product that triggered its
/// rule instead. A bonus line matching neither is not sent.
///
/// # Errors
///
/// - [`ValidationError::NoCustomer`]: no customer is selected.
/// - [`ValidationError::NoSellableItems`]: every sale line has a quantity of zero.
pub fn build_order(
    cart: &Cart,
    customer: Option<&Customer>,
    session: &Session,
    delivery_date: Date,
) -> Result<Order, ValidationError> {
    let customer = customer.ok_or(ValidationError::NoCustomer)?;
    let classification = Some(customer.classification);

    let mut details: Vec<OrderDetail> = cart
        .sale_lines()
        .filter(|line| line.quantity() > 0)
        .map(|sale| OrderDetail {
            product: sale.product().id,
            quantity: sale.quantity(),
            unit_price: effective_price(sale.product(), sale.quantity(), classification),
            grants: SmallVec::new(),
        })
        .collect();

    if details.is_empty() {
        return Err(ValidationError::NoSellableItems);
    }

    for bonus in cart.bonus_lines().filter(|line| line.quantity() > 0) {
        let trigger = bonus.bonus_source().and_then(|source| source.trigger);

        let target = details
            .iter()
            .position(|detail| detail.product == bonus.product().id)
            .or_else(|| {
                trigger.and_then(|trigger| {
                    details.iter().position(|detail| detail.product == trigger)
                })
            });

        if let Some(detail) = target.and_then(|position| details.get_mut(position)) {
            detail.grants.push(BonusGrant {
                product: bonus.product().id,
                quantity: bonus.quantity(),
                purchased_quantity: detail.quantity,
                grant_type: GRANT_TYPE,
                remarks: bonus.product().description.clone(),
            });
        }
    }

    Ok(Order {
        customer: customer.id,
        seller: session.seller(),
        number: OrderNumber::generate(),
        delivery_date,
        details,
    })
}
