//! Backend REST API client.

mod client;
mod errors;
pub mod forms;
pub mod records;

pub use client::{ApiClient, DEFAULT_SUBMIT_MESSAGE};
pub use errors::{ApiError, RecordError};
