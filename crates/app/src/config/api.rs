//! API Config

use clap::Args;

/// Production backend.
pub const DEFAULT_API_URL: &str = "https://api.bebidasdelperuapp.com/api";

/// Backend API settings.
#[derive(Debug, Clone, Args)]
pub struct ApiConfig {
    /// Base URL of the backend REST API
    #[arg(long, env = "BEBIDAS_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,
}

impl ApiConfig {
    /// Return the URL of an endpoint below the base URL.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
