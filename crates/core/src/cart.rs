//! Cart
//!
//! One sale line per catalog product, in catalog order, followed by the bonus lines granted by
//! the last bonus recalculation. Sale line quantities are the only user-editable state.

use std::sync::Arc;

use thiserror::Error;

use crate::{
    bonuses::RuleId,
    orders::ValidationError,
    products::{Product, ProductId},
};

/// Errors raised while editing the cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// No cart line refers to the product.
    #[error("product {0} is not in the cart")]
    UnknownProduct(ProductId),

    /// The requested quantity is not acceptable.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Rule that granted a bonus line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BonusSource {
    /// Rule id
    pub rule: RuleId,

    /// Rule name at the time of the grant
    pub rule_name: String,

    /// Sold product that triggered the grant, if a single one can be named
    pub trigger: Option<ProductId>,
}

/// Cart line
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    product: Arc<Product>,
    quantity: u32,
    bonus: Option<BonusSource>,
}

impl CartLine {
    /// Create an empty sale line for a catalog product.
    pub fn sale(product: Arc<Product>) -> Self {
        Self {
            product,
            quantity: 0,
            bonus: None,
        }
    }

    /// Create a bonus line granted by a rule.
    pub fn bonus(product: Product, quantity: u32, source: BonusSource) -> Self {
        Self {
            product: Arc::new(product),
            quantity,
            bonus: Some(source),
        }
    }

    /// Return the product on this line.
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Return the line quantity.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Return whether this line was injected by a bonus rule.
    pub fn is_bonus(&self) -> bool {
        self.bonus.is_some()
    }

    /// Return the rule that granted this line, for bonus lines.
    pub fn bonus_source(&self) -> Option<&BonusSource> {
        self.bonus.as_ref()
    }
}

/// Cart
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cart with one empty sale line per catalog product.
    pub fn from_catalog(catalog: impl IntoIterator<Item = Product>) -> Self {
        Self {
            lines: catalog
                .into_iter()
                .map(|product| CartLine::sale(Arc::new(product)))
                .collect(),
        }
    }

    /// Return every line, sale lines first.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Return the sale lines.
    pub fn sale_lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter().filter(|line| !line.is_bonus())
    }

    /// Return the bonus lines.
    pub fn bonus_lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter().filter(|line| line.is_bonus())
    }

    /// Return the sale line for a product.
    pub fn sale_line(&self, product: ProductId) -> Option<&CartLine> {
        self.sale_lines().find(|line| line.product.id == product)
    }

    /// Get the number of lines in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart has no lines at all.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Set the quantity of a product's sale line.
    ///
    /// Returns `true` when a sale line was updated. Bonus lines cannot be edited: a product that
    /// only appears as a bonus is left untouched and `false` is returned.
    ///
    /// # Errors
    ///
    /// - [`CartError::Validation`]: the quantity is negative or does not fit a line quantity.
    /// - [`CartError::UnknownProduct`]: no line refers to the product.
    pub fn set_quantity(&mut self, product: ProductId, quantity: i64) -> Result<bool, CartError> {
        let quantity = match u32::try_from(quantity) {
            Ok(quantity) => quantity,
            Err(_) if quantity < 0 => return Err(ValidationError::NegativeQuantity(quantity).into()),
            Err(_) => return Err(ValidationError::QuantityTooLarge(quantity).into()),
        };

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| !line.is_bonus() && line.product.id == product)
        {
            line.quantity = quantity;

            return Ok(true);
        }

        if self.lines.iter().any(|line| line.product.id == product) {
            return Ok(false);
        }

        Err(CartError::UnknownProduct(product))
    }

    /// Remove every bonus line.
    pub(crate) fn clear_bonuses(&mut self) {
        self.lines.retain(|line| !line.is_bonus());
    }

    /// Append a bonus line.
    pub(crate) fn push_bonus(&mut self, line: CartLine) {
        debug_assert!(line.is_bonus(), "only bonus lines may be appended");

        self.lines.push(line);
    }

    /// Reset every sale line to zero and remove every bonus line.
    pub fn clear_quantities(&mut self) {
        self.clear_bonuses();

        for line in &mut self.lines {
            line.quantity = 0;
        }
    }
}
