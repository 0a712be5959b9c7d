//! Session Config

use bebidas::session::{SellerId, Session};
use clap::Args;
use thiserror::Error;

/// Errors building a session from configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionConfigError {
    #[error("no seller id configured; pass --seller-id or set BEBIDAS_SELLER_ID")]
    MissingSeller,
}

/// Seller session settings.
#[derive(Debug, Args)]
pub struct SessionConfig {
    /// Id of the seller submitting orders
    #[arg(long, env = "BEBIDAS_SELLER_ID")]
    pub seller_id: Option<u32>,
}

impl SessionConfig {
    /// Build the session orders are submitted under.
    ///
    /// # Errors
    ///
    /// Returns [`SessionConfigError::MissingSeller`] when no seller id is configured.
    pub fn session(&self) -> Result<Session, SessionConfigError> {
        self.seller_id
            .map(|id| Session::new(SellerId::new(id)))
            .ok_or(SessionConfigError::MissingSeller)
    }
}
