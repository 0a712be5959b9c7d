//! App Context

use std::sync::Arc;

use crate::{
    api::ApiClient,
    config::ApiConfig,
    gateways::{
        BonusRuleSource, CatalogProvider, CustomerDirectory, CustomerRegistry, OrderGateway,
    },
};

#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<dyn CatalogProvider>,
    pub customers: Arc<dyn CustomerDirectory>,
    pub registry: Arc<dyn CustomerRegistry>,
    pub rules: Arc<dyn BonusRuleSource>,
    pub orders: Arc<dyn OrderGateway>,
}

impl AppContext {
    /// Build application context backed by the REST API.
    #[must_use]
    pub fn from_api_config(config: ApiConfig) -> Self {
        let client = Arc::new(ApiClient::new(config));

        Self {
            catalog: client.clone(),
            customers: client.clone(),
            registry: client.clone(),
            rules: client.clone(),
            orders: client,
        }
    }
}
