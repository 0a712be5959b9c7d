//! Bebidas prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    bonuses::{BonusCondition, BonusProduct, BonusRule, RuleId, ScaleStep},
    cart::{BonusSource, Cart, CartError, CartLine},
    customers::{
        Classification, Coordinates, Customer, CustomerDraft, CustomerId, DraftError, FacadePhoto,
        FacadePhotoId, Phone, TaxRegistration, find_customer, match_customer,
    },
    engine::{
        PricingEngine, SubmissionFailure, SubmissionRejected, SubmissionStatus, bounded,
    },
    orders::{BonusGrant, Order, OrderDetail, OrderNumber, ValidationError},
    pricing::{WHOLESALE_MIN_QUANTITY, effective_price, line_amount, soles},
    products::{Product, ProductId},
    session::{SellerId, Session},
};
