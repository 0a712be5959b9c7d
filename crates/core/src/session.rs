//! Session

use crate::ids::TypedId;

/// Seller marker
#[derive(Debug)]
pub struct Seller;

/// Seller Id
pub type SellerId = TypedId<Seller>;

/// The authenticated seller composing orders on this device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    seller: SellerId,
}

impl Session {
    /// Create a session for a seller.
    pub const fn new(seller: SellerId) -> Self {
        Self { seller }
    }

    /// Return the seller submitting orders.
    pub const fn seller(&self) -> SellerId {
        self.seller
    }
}
