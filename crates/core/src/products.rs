//! Products

use rust_decimal::Decimal;

use crate::ids::TypedId;

/// Product Id
pub type ProductId = TypedId<Product>;

/// Catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Product id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Product description
    pub description: String,

    /// Package or unit description, e.g. "Caja x 12".
    pub presentation: String,

    /// Unit price charged to retail customers.
    pub retail_price: Decimal,

    /// Unit price charged to wholesale customers buying in bulk.
    pub wholesale_price: Decimal,

    /// Units in stock
    pub stock: u32,

    /// Image path or URL
    pub image: String,
}
