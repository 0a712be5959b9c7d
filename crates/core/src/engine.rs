//! Pricing Engine
//!
//! Holds the order being composed: the cart, the selected customer, the bonus rules, the
//! delivery date and the submission status. Every operation is synchronous; the network call
//! that submits an order happens between [`PricingEngine::begin_submission`] and
//! [`PricingEngine::finish_submission`], outside the engine.

use jiff::{Zoned, civil::Date};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    bonuses::BonusRule,
    cart::{BonusSource, Cart, CartError, CartLine},
    customers::{Classification, Customer},
    orders::{Order, ValidationError, build_order},
    pricing::{effective_price, line_amount},
    products::{Product, ProductId},
    session::Session,
};

/// Longest failure reason kept in [`SubmissionStatus::Failed`], in characters.
pub const MAX_REASON_LEN: usize = 512;

/// Where the current order is in its submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionStatus {
    /// Nothing submitted yet, or the last result was acknowledged.
    #[default]
    Idle,

    /// An order has been handed to the gateway and no result has come back.
    Submitting,

    /// The backend accepted the order.
    Success(String),

    /// The order could not be submitted.
    Failed(String),
}

impl SubmissionStatus {
    /// Return whether this is a result waiting to be acknowledged with
    /// [`PricingEngine::reset_status`].
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Success(_) | Self::Failed(_))
    }
}

/// Reasons a submission is refused before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionRejected {
    /// Another submission is still outstanding.
    #[error("an order is already being submitted")]
    InProgress,

    /// The previous result has not been acknowledged yet.
    #[error("the previous submission result has not been acknowledged")]
    Unacknowledged,

    /// The cart does not make a valid order.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Why the gateway could not deliver an order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionFailure {
    /// The backend could not be reached.
    #[error("connection error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("server error {status}: {excerpt}")]
    Server {
        /// HTTP status code
        status: u16,

        /// Start of the response body
        excerpt: String,
    },

    /// The backend answered with something that is not a recognizable response.
    #[error("unexpected response: {0}")]
    Unexpected(String),
}

impl SubmissionFailure {
    /// Create a server failure, keeping only the start of the response body.
    pub fn server(status: u16, body: &str) -> Self {
        Self::Server {
            status,
            excerpt: bounded(body),
        }
    }
}

/// Keep at most [`MAX_REASON_LEN`] characters of `text`.
pub fn bounded(text: &str) -> String {
    text.chars().take(MAX_REASON_LEN).collect()
}

/// Order composition state for one selling session.
#[derive(Debug, Clone)]
pub struct PricingEngine {
    session: Session,
    cart: Cart,
    customer: Option<Customer>,
    rules: Vec<BonusRule>,
    delivery_date: Date,
    status: SubmissionStatus,
}

impl PricingEngine {
    /// Create an engine with one empty sale line per catalog product.
    ///
    /// The delivery date defaults to tomorrow in the local calendar.
    pub fn new(
        session: Session,
        catalog: impl IntoIterator<Item = Product>,
        rules: Vec<BonusRule>,
    ) -> Self {
        Self {
            session,
            cart: Cart::from_catalog(catalog),
            customer: None,
            rules,
            delivery_date: tomorrow(),
            status: SubmissionStatus::Idle,
        }
    }

    /// Return the session the engine composes orders for.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Return the cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Return every cart line, sale lines first.
    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    /// Return the bonus rules.
    pub fn rules(&self) -> &[BonusRule] {
        &self.rules
    }

    /// Return the selected customer.
    pub fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }

    /// Return the selected customer's classification.
    pub fn classification(&self) -> Option<Classification> {
        self.customer.as_ref().map(|customer| customer.classification)
    }

    /// Select the ordering customer, or clear the selection.
    ///
    /// Spend rules depend on the customer's prices, so bonuses are recalculated.
    pub fn select_customer(&mut self, customer: Option<Customer>) {
        self.customer = customer;
        self.recompute_bonuses();
    }

    /// Replace the catalog, discarding every quantity entered so far.
    pub fn replace_catalog(&mut self, catalog: impl IntoIterator<Item = Product>) {
        self.cart = Cart::from_catalog(catalog);
        self.recompute_bonuses();
    }

    /// Replace the bonus rules.
    pub fn replace_rules(&mut self, rules: Vec<BonusRule>) {
        self.rules = rules;
        self.recompute_bonuses();
    }

    /// Return the requested delivery date.
    pub fn delivery_date(&self) -> Date {
        self.delivery_date
    }

    /// Set the requested delivery date.
    pub fn set_delivery_date(&mut self, date: Date) {
        self.delivery_date = date;
    }

    /// Set the quantity of a product's sale line and recalculate bonuses.
    ///
    /// Products that only appear as bonus lines are ignored.
    ///
    /// # Errors
    ///
    /// - [`CartError::Validation`]: the quantity is negative or too large.
    /// - [`CartError::UnknownProduct`]: the product is not in the cart.
    pub fn set_quantity(&mut self, product: ProductId, quantity: i64) -> Result<(), CartError> {
        if self.cart.set_quantity(product, quantity)? {
            self.recompute_bonuses();
        }

        Ok(())
    }

    /// Replace every bonus line with the grants of the rules the cart currently satisfies.
    ///
    /// Rules are evaluated in order and each satisfied rule appends one bonus line. Only sale
    /// lines are considered, so running this twice yields the same bonus lines.
    pub fn recompute_bonuses(&mut self) {
        self.cart.clear_bonuses();

        let classification = self.classification();

        let granted: Vec<CartLine> = self
            .rules
            .iter()
            .filter(|rule| rule.is_satisfied(&self.cart, classification))
            .map(|rule| {
                CartLine::bonus(
                    rule.gift_product(),
                    rule.bonus_quantity,
                    BonusSource {
                        rule: rule.id,
                        rule_name: rule.name.clone(),
                        trigger: rule.condition.trigger_product(&self.cart),
                    },
                )
            })
            .collect();

        for line in granted {
            self.cart.push_bonus(line);
        }
    }

    /// Return the unit price charged on a line.
    pub fn effective_price(&self, line: &CartLine) -> Decimal {
        effective_price(line.product(), line.quantity(), self.classification())
    }

    /// Sum of every sale line at its effective price. Bonus lines are free.
    pub fn subtotal(&self) -> Decimal {
        let classification = self.classification();

        self.cart
            .sale_lines()
            .map(|line| line_amount(line.product(), line.quantity(), classification))
            .sum()
    }

    /// Taxes charged on the order; sales in this region are tax exempt.
    pub fn taxes(&self) -> Decimal {
        Decimal::ZERO
    }

    /// Amount payable for the order.
    pub fn total(&self) -> Decimal {
        self.subtotal() + self.taxes()
    }

    /// Build the order payload for the current cart.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when no customer is selected or nothing is being sold.
    pub fn build_order_payload(&self) -> Result<Order, ValidationError> {
        build_order(
            &self.cart,
            self.customer.as_ref(),
            &self.session,
            self.delivery_date,
        )
    }

    /// Return the submission status.
    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    /// Start submitting the current order and return the payload to send.
    ///
    /// A cart that does not make a valid order moves the status straight to
    /// [`SubmissionStatus::Failed`].
    ///
    /// # Errors
    ///
    /// - [`SubmissionRejected::InProgress`]: a submission is outstanding; nothing changes.
    /// - [`SubmissionRejected::Unacknowledged`]: the last result was not reset; nothing changes.
    /// - [`SubmissionRejected::Invalid`]: the cart does not make a valid order.
    pub fn begin_submission(&mut self) -> Result<Order, SubmissionRejected> {
        match self.status {
            SubmissionStatus::Submitting => return Err(SubmissionRejected::InProgress),
            SubmissionStatus::Success(_) | SubmissionStatus::Failed(_) => {
                return Err(SubmissionRejected::Unacknowledged);
            }
            SubmissionStatus::Idle => {}
        }

        match self.build_order_payload() {
            Ok(order) => {
                self.status = SubmissionStatus::Submitting;

                Ok(order)
            }
            Err(error) => {
                self.status = SubmissionStatus::Failed(bounded(&error.to_string()));

                Err(error.into())
            }
        }
    }

    /// Record the gateway's answer for the outstanding submission.
    ///
    /// A successful submission empties the cart. Outcomes arriving while no submission is
    /// outstanding are ignored.
    pub fn finish_submission(&mut self, outcome: Result<String, SubmissionFailure>) {
        if self.status != SubmissionStatus::Submitting {
            return;
        }

        self.status = match outcome {
            Ok(message) => {
                self.cart.clear_quantities();

                SubmissionStatus::Success(message)
            }
            Err(failure) => SubmissionStatus::Failed(bounded(&failure.to_string())),
        };
    }

    /// Acknowledge the last result so another order can be submitted.
    pub fn reset_status(&mut self) {
        self.status = SubmissionStatus::Idle;
    }
}

fn tomorrow() -> Date {
    let today = Zoned::now().date();

    today.tomorrow().unwrap_or(today)
}
