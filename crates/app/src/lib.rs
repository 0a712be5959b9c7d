//! Order desk client for the Bebidas del Perú backend.

pub mod api;
pub mod config;
pub mod context;
pub mod desk;
pub mod gateways;
pub mod observability;
