//! HTTP client for the backend REST API.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bebidas::{
    bonuses::BonusRule,
    customers::{Customer, CustomerDraft, CustomerId, FacadePhoto},
    engine::MAX_REASON_LEN,
    orders::Order,
    products::Product,
};
use reqwest::{
    Client, Response,
    multipart::{Form, Part},
};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::{
    api::{
        ApiError,
        forms::{
            CUSTOMER_CREATED_MESSAGE, CUSTOMER_UPDATED_MESSAGE, CustomerPhotos, create_fields,
            image_mime, update_fields,
        },
        records::{
            BonusRuleRecord, CustomerRecord, Envelope, FacadePhotosResponse, MessageResponse,
            ProductsResponse,
        },
    },
    config::ApiConfig,
    gateways::{
        BonusRuleSource, CatalogProvider, CustomerDirectory, CustomerRegistry, OrderGateway,
    },
};

/// Confirmation shown when the backend accepts an order without a message of its own.
pub const DEFAULT_SUBMIT_MESSAGE: &str = "¡Pedido creado exitosamente!";

/// Most bytes of an error response body read for its excerpt.
const MAX_EXCERPT_BYTES: usize = MAX_REASON_LEN * 4;

/// HTTP client implementing every backend gateway.
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: Client,
}

impl ApiClient {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = self.config.endpoint(path);

        let response = self.http.get(&url).query(query).send().await?;

        let body = success_body(response).await?;

        serde_json::from_str(&body).map_err(ApiError::Decode)
    }

    async fn post_form(&self, path: &str, form: Form) -> Result<String, ApiError> {
        let url = self.config.endpoint(path);

        let response = self.http.post(&url).multipart(form).send().await?;

        success_body(response).await
    }
}

/// Read a response body, turning a non-success status into [`ApiError::Server`].
async fn success_body(response: Response) -> Result<String, ApiError> {
    let status = response.status();

    if !status.is_success() {
        let excerpt = error_excerpt(response).await;

        return Err(ApiError::server(status.as_u16(), &excerpt));
    }

    Ok(response.text().await?)
}

/// Read the start of an error body, keeping at most [`MAX_EXCERPT_BYTES`].
///
/// Reading stops there; the rest of the body is dropped unread.
/// A body that breaks off keeps what was read, since the status matters most here.
async fn error_excerpt(mut response: Response) -> String {
    let mut bytes = Vec::with_capacity(MAX_EXCERPT_BYTES);

    while bytes.len() < MAX_EXCERPT_BYTES {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                let room = MAX_EXCERPT_BYTES - bytes.len();

                bytes.extend(chunk.iter().take(room));
            }
            Ok(None) => break,
            Err(error) => {
                debug!(%error, "error body cut short");
                break;
            }
        }
    }

    String::from_utf8_lossy(&bytes).into_owned()
}

fn message_or(body: &str, default: &str) -> String {
    serde_json::from_str::<MessageResponse>(body)
        .ok()
        .and_then(|response| response.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

async fn file_part(path: &Path) -> Result<Part, ApiError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| ApiError::File {
        path: path.to_path_buf(),
        source,
    })?;

    let file_name = path
        .file_name()
        .map_or_else(|| "foto".to_string(), |name| name.to_string_lossy().into_owned());

    Ok(Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(image_mime(path))?)
}

async fn customer_form(
    fields: Vec<(String, String)>,
    portrait: Option<&Path>,
    facades: &[PathBuf],
) -> Result<Form, ApiError> {
    let mut form = fields
        .into_iter()
        .fold(Form::new(), |form, (name, value)| form.text(name, value));

    if let Some(path) = portrait {
        form = form.part("fotoCliente", file_part(path).await?);
    }

    for path in facades {
        form = form.part("fotosFachada[]", file_part(path).await?);
    }

    Ok(form)
}

#[async_trait]
impl CatalogProvider for ApiClient {
    #[instrument(skip(self))]
    async fn fetch_catalog(&self) -> Result<Vec<Product>, ApiError> {
        let response: ProductsResponse = self.get("products", &[]).await?;

        debug!(count = response.products.len(), "fetched catalog");

        Ok(response.products.into_iter().map(Product::from).collect())
    }
}

#[async_trait]
impl CustomerDirectory for ApiClient {
    #[instrument(skip(self))]
    async fn fetch_customers(&self, filter: Option<String>) -> Result<Vec<Customer>, ApiError> {
        let query: Vec<(&str, &str)> = filter
            .as_deref()
            .map(str::trim)
            .filter(|filter| !filter.is_empty())
            .map(|filter| ("search", filter))
            .into_iter()
            .collect();

        let envelope: Envelope<CustomerRecord> = self.get("customers", &query).await?;

        if !envelope.success {
            return Err(ApiError::Unsuccessful);
        }

        debug!(count = envelope.data.data.len(), "fetched customers");

        Ok(envelope.data.data.into_iter().map(Customer::from).collect())
    }
}

#[async_trait]
impl BonusRuleSource for ApiClient {
    #[instrument(skip(self))]
    async fn fetch_bonus_rules(&self) -> Result<Vec<BonusRule>, ApiError> {
        let envelope: Envelope<serde_json::Value> = self.get("bonificaciones", &[]).await?;

        if !envelope.success {
            return Err(ApiError::Unsuccessful);
        }

        let rules = envelope
            .data
            .data
            .into_iter()
            .filter_map(|value| {
                let record: BonusRuleRecord = match serde_json::from_value(value) {
                    Ok(record) => record,
                    Err(error) => {
                        warn!(%error, "skipping malformed bonus rule");
                        return None;
                    }
                };

                match BonusRule::try_from(record) {
                    Ok(rule) => Some(rule),
                    Err(error) => {
                        warn!(%error, "skipping bonus rule");
                        None
                    }
                }
            })
            .collect::<Vec<_>>();

        debug!(count = rules.len(), "fetched bonus rules");

        Ok(rules)
    }
}

#[async_trait]
impl OrderGateway for ApiClient {
    #[instrument(skip(self, order), fields(number = %order.number, details = order.details.len()))]
    async fn submit_order(&self, order: &Order) -> Result<String, ApiError> {
        let url = self.config.endpoint("pedidos");

        let response = self.http.post(&url).json(order).send().await?;

        let body = success_body(response).await?;

        let message = message_or(&body, DEFAULT_SUBMIT_MESSAGE);

        info!("order accepted");

        Ok(message)
    }
}

#[async_trait]
impl CustomerRegistry for ApiClient {
    #[instrument(skip_all, fields(dni = %draft.dni, facades = photos.facades.len()))]
    async fn create_customer(
        &self,
        draft: &CustomerDraft,
        photos: &CustomerPhotos,
    ) -> Result<String, ApiError> {
        let form = customer_form(
            create_fields(draft),
            photos.portrait.as_deref(),
            &photos.facades,
        )
        .await?;

        let body = self.post_form("customers/create", form).await?;

        info!("customer created");

        Ok(message_or(&body, CUSTOMER_CREATED_MESSAGE))
    }

    #[instrument(skip(self, draft, portrait))]
    async fn update_customer(
        &self,
        customer: CustomerId,
        draft: &CustomerDraft,
        portrait: Option<PathBuf>,
    ) -> Result<String, ApiError> {
        let form = customer_form(update_fields(draft), portrait.as_deref(), &[]).await?;

        let body = self.post_form(&format!("customers/{customer}"), form).await?;

        info!("customer updated");

        Ok(message_or(&body, CUSTOMER_UPDATED_MESSAGE))
    }

    #[instrument(skip(self))]
    async fn fetch_facade_photos(
        &self,
        customer: CustomerId,
    ) -> Result<Vec<FacadePhoto>, ApiError> {
        let response: FacadePhotosResponse = self
            .get(&format!("customers/{customer}/fotos-fachada"), &[])
            .await?;

        if !response.success {
            return Err(ApiError::Unsuccessful);
        }

        debug!(count = response.data.len(), "fetched facade photos");

        Ok(response.data.into_iter().map(FacadePhoto::from).collect())
    }

    #[instrument(skip(self))]
    async fn upload_facade_photo(
        &self,
        customer: CustomerId,
        path: PathBuf,
    ) -> Result<(), ApiError> {
        let form = Form::new().part("foto", file_part(&path).await?);

        self.post_form(&format!("customers/{customer}/fotos-fachada"), form)
            .await?;

        info!("facade photo uploaded");

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_facade_photo(
        &self,
        customer: CustomerId,
        file_name: String,
    ) -> Result<(), ApiError> {
        let url = self
            .config
            .endpoint(&format!("customers/{customer}/fotos-fachada/{file_name}"));

        let response = self.http.delete(&url).send().await?;

        success_body(response).await?;

        info!("facade photo deleted");

        Ok(())
    }
}
