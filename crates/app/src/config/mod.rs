//! Client configuration module

use clap::Args;

pub mod api;
pub mod logging;
pub mod session;

pub use api::ApiConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use session::{SessionConfig, SessionConfigError};

/// Settings shared by every command.
#[derive(Debug, Args)]
pub struct ClientConfig {
    /// Backend API settings.
    #[command(flatten)]
    pub api: ApiConfig,

    /// Seller session settings.
    #[command(flatten)]
    pub session: SessionConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}
