//! Bebidas
//!
//! Order pricing and promotional bonus engine for the Bebidas del Perú sales desk. Prices sale
//! lines for retail and wholesale customers, grants bonus lines from promotional rules and builds
//! the order payload sent to the backend. The crate performs no I/O.

pub mod bonuses;
pub mod cart;
pub mod customers;
pub mod engine;
pub mod ids;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod session;

#[cfg(test)]
mod fixtures;
