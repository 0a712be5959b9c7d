//! Gateways
//!
//! Seams between the order desk and the backend.

use std::path::PathBuf;

use async_trait::async_trait;
use bebidas::{
    bonuses::BonusRule,
    customers::{Customer, CustomerDraft, CustomerId, FacadePhoto},
    orders::Order,
    products::Product,
};
use mockall::automock;

use crate::api::{ApiError, forms::CustomerPhotos};

#[automock]
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Retrieves the product catalog.
    async fn fetch_catalog(&self) -> Result<Vec<Product>, ApiError>;
}

#[automock]
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    /// Retrieves customers, optionally filtered by a search text.
    async fn fetch_customers(&self, filter: Option<String>) -> Result<Vec<Customer>, ApiError>;
}

#[automock]
#[async_trait]
pub trait BonusRuleSource: Send + Sync {
    /// Retrieves the promotional bonus rules.
    async fn fetch_bonus_rules(&self) -> Result<Vec<BonusRule>, ApiError>;
}

#[automock]
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Submits an order, returning the backend's confirmation message.
    async fn submit_order(&self, order: &Order) -> Result<String, ApiError>;
}

#[automock]
#[async_trait]
pub trait CustomerRegistry: Send + Sync {
    /// Registers a new customer with its photos, returning the backend's confirmation message.
    async fn create_customer(
        &self,
        draft: &CustomerDraft,
        photos: &CustomerPhotos,
    ) -> Result<String, ApiError>;

    /// Replaces a customer's details, returning the backend's confirmation message.
    async fn update_customer(
        &self,
        customer: CustomerId,
        draft: &CustomerDraft,
        portrait: Option<PathBuf>,
    ) -> Result<String, ApiError>;

    /// Lists the shop-front photos of a customer.
    async fn fetch_facade_photos(&self, customer: CustomerId)
    -> Result<Vec<FacadePhoto>, ApiError>;

    /// Adds a shop-front photo read from a local file.
    async fn upload_facade_photo(&self, customer: CustomerId, path: PathBuf)
    -> Result<(), ApiError>;

    /// Removes a shop-front photo by its stored file name.
    async fn delete_facade_photo(
        &self,
        customer: CustomerId,
        file_name: String,
    ) -> Result<(), ApiError>;
}
