//! Bonus Rules
//!
//! Promotional rules that grant free units of a product when the cart meets a condition.
//! Rules are reference data: they are evaluated against the cart but never changed by it.

use rust_decimal::Decimal;
use rustc_hash::FxHashSet;

use crate::{
    cart::Cart,
    customers::Classification,
    ids::TypedId,
    pricing::line_amount,
    products::{Product, ProductId},
};

/// Rule Id
pub type RuleId = TypedId<BonusRule>;

/// Suffix appended to the name of a granted product.
pub const GIFT_SUFFIX: &str = " (REGALO)";

/// Presentation shown for granted products.
pub const GIFT_PRESENTATION: &str = "Unidad";

/// Stock reported for granted products; gifts are never stock limited.
pub const GIFT_STOCK: u32 = 9_999;

/// Product granted by a rule.
#[derive(Debug, Clone, PartialEq)]
pub struct BonusProduct {
    /// Product id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Catalog unit price of the product, informational only.
    pub reference_price: Decimal,
}

/// One step of a volume rule's scale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleStep {
    /// Combined quantity required to reach this step.
    pub min_quantity: u32,

    /// Units granted at this step.
    pub bonus: u32,

    /// Number of packages the grant is delivered in.
    pub packages: Option<u32>,

    /// Unit kind label of the grant, e.g. "paquete".
    pub unit_kind: Option<String>,
}

/// Condition a cart has to meet for a rule to grant its bonus.
#[derive(Debug, Clone, PartialEq)]
pub enum BonusCondition {
    /// At least `min_quantity` units of a single product.
    PerProductThreshold {
        /// Trigger product
        product: ProductId,

        /// Minimum quantity of the trigger product
        min_quantity: u32,
    },

    /// A combined quantity across a set of products.
    ///
    /// Only the first scale step is evaluated. Later steps are kept so they can be displayed,
    /// but they never change whether or how much the rule grants.
    VolumeThreshold {
        /// Products contributing to the combined quantity
        products: FxHashSet<ProductId>,

        /// Scale steps, lowest first
        scales: Vec<ScaleStep>,
    },

    /// A minimum spend on a single product, at the customer's effective price.
    SpendThreshold {
        /// Trigger product
        product: ProductId,

        /// Minimum spend on the trigger product
        min_spend: Decimal,
    },
}

impl BonusCondition {
    /// Return the backend's name for this kind of condition.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::PerProductThreshold { .. } => "producto",
            Self::VolumeThreshold { .. } => "cantidad",
            Self::SpendThreshold { .. } => "precio",
        }
    }

    /// Return the sold product that triggers this condition.
    ///
    /// Volume conditions are triggered by several products; the first one in cart order with a
    /// positive quantity is named.
    pub fn trigger_product(&self, cart: &Cart) -> Option<ProductId> {
        match self {
            Self::PerProductThreshold { product, .. } | Self::SpendThreshold { product, .. } => {
                Some(*product)
            }
            Self::VolumeThreshold { products, .. } => cart
                .sale_lines()
                .find(|line| line.quantity() > 0 && products.contains(&line.product().id))
                .map(|line| line.product().id),
        }
    }

    /// Return whether the cart meets this condition.
    pub fn is_met(&self, cart: &Cart, classification: Option<Classification>) -> bool {
        match self {
            Self::PerProductThreshold {
                product,
                min_quantity,
            } => cart
                .sale_line(*product)
                .is_some_and(|line| line.quantity() >= *min_quantity),
            Self::VolumeThreshold { products, scales } => {
                let Some(first) = scales.first() else {
                    return false;
                };

                let combined: u64 = cart
                    .sale_lines()
                    .filter(|line| products.contains(&line.product().id))
                    .map(|line| u64::from(line.quantity()))
                    .sum();

                combined >= u64::from(first.min_quantity)
            }
            Self::SpendThreshold { product, min_spend } => {
                cart.sale_line(*product).is_some_and(|line| {
                    line_amount(line.product(), line.quantity(), classification) >= *min_spend
                })
            }
        }
    }
}

/// Promotional bonus rule.
#[derive(Debug, Clone, PartialEq)]
pub struct BonusRule {
    /// Rule id
    pub id: RuleId,

    /// Rule name
    pub name: String,

    /// Product granted when the condition is met
    pub bonus_product: BonusProduct,

    /// Units granted when the condition is met
    pub bonus_quantity: u32,

    /// Condition the cart has to meet
    pub condition: BonusCondition,
}

impl BonusRule {
    /// Return whether the rule grants its bonus for the given cart.
    pub fn is_satisfied(&self, cart: &Cart, classification: Option<Classification>) -> bool {
        self.condition.is_met(cart, classification)
    }

    /// Build the zero-priced product placed in the cart when this rule grants its bonus.
    pub fn gift_product(&self) -> Product {
        Product {
            id: self.bonus_product.id,
            name: format!("{}{GIFT_SUFFIX}", self.bonus_product.name),
            description: format!("Bonificación: {}", self.name),
            presentation: GIFT_PRESENTATION.to_string(),
            retail_price: Decimal::ZERO,
            wholesale_price: Decimal::ZERO,
            stock: GIFT_STOCK,
            image: String::new(),
        }
    }
}
