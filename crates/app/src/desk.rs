//! Order Desk
//!
//! Drives a [`PricingEngine`] from the backend: loads the reference data a selling session needs
//! and submits the composed order.

use std::fmt;

use bebidas::{
    customers::{Customer, match_customer},
    engine::{PricingEngine, SubmissionFailure, SubmissionRejected, SubmissionStatus},
    session::Session,
};
use tracing::{info, instrument, warn};

use crate::{
    api::ApiError,
    context::AppContext,
    gateways::{CustomerDirectory, OrderGateway},
};

/// Reference data fetched when a desk is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// Product catalog
    Catalog,

    /// Customer directory
    Customers,

    /// Promotional bonus rules
    BonusRules,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Catalog => "catalog",
            Self::Customers => "customers",
            Self::BonusRules => "bonus rules",
        })
    }
}

/// A fetch that failed while opening a desk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    /// List that could not be fetched
    pub resource: Resource,

    /// Error reported by the gateway
    pub reason: String,
}

/// Fetches that failed while opening a desk. The affected lists start empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Failed fetches, in catalog, customers, bonus rules order
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    /// Whether every fetch succeeded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    fn record<T>(&mut self, resource: Resource, result: Result<Vec<T>, ApiError>) -> Vec<T> {
        result.unwrap_or_else(|error| {
            warn!(%resource, %error, "failed to load");

            self.failures.push(LoadFailure {
                resource,
                reason: error.to_string(),
            });

            Vec::new()
        })
    }
}

/// A selling session: the pricing engine plus the customers it can sell to.
#[derive(Debug, Clone)]
pub struct OrderDesk {
    engine: PricingEngine,
    customers: Vec<Customer>,
}

impl OrderDesk {
    /// Open a desk, fetching the catalog, customers and bonus rules concurrently.
    ///
    /// Fetch failures never abort loading; they are logged and returned in the report.
    #[instrument(skip_all, fields(seller = %session.seller()))]
    pub async fn load(session: Session, context: &AppContext) -> (Self, LoadReport) {
        let (catalog, customers, rules) = tokio::join!(
            context.catalog.fetch_catalog(),
            context.customers.fetch_customers(None),
            context.rules.fetch_bonus_rules(),
        );

        let mut report = LoadReport::default();

        let catalog = report.record(Resource::Catalog, catalog);
        let customers = report.record(Resource::Customers, customers);
        let rules = report.record(Resource::BonusRules, rules);

        info!(
            products = catalog.len(),
            customers = customers.len(),
            rules = rules.len(),
            "desk loaded"
        );

        let desk = Self {
            engine: PricingEngine::new(session, catalog, rules),
            customers,
        };

        (desk, report)
    }

    /// Return the pricing engine.
    #[must_use]
    pub fn engine(&self) -> &PricingEngine {
        &self.engine
    }

    /// Return the pricing engine for editing the order.
    pub fn engine_mut(&mut self) -> &mut PricingEngine {
        &mut self.engine
    }

    /// Return the customers available to this desk.
    #[must_use]
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// Refresh the customer list from the directory.
    ///
    /// # Errors
    ///
    /// Returns the directory's error; the current list is kept.
    pub async fn search_customers(
        &mut self,
        directory: &dyn CustomerDirectory,
        filter: Option<String>,
    ) -> Result<&[Customer], ApiError> {
        self.customers = directory.fetch_customers(filter).await?;

        Ok(&self.customers)
    }

    /// Select the customer a search criterion names by DNI, RUC or name.
    ///
    /// Returns the selected customer, or `None` when no listed customer matches; the previous
    /// selection is cleared either way.
    pub fn select_customer(&mut self, criterion: &str) -> Option<&Customer> {
        let customer = match_customer(&self.customers, criterion).cloned();

        if customer.is_none() {
            warn!(criterion, "no customer matches");
        }

        self.engine.select_customer(customer);

        self.engine.customer()
    }

    /// Submit the current order through the gateway.
    ///
    /// Submissions the engine refuses never reach the gateway.
    #[instrument(skip_all)]
    pub async fn submit(&mut self, gateway: &dyn OrderGateway) -> &SubmissionStatus {
        let order = match self.engine.begin_submission() {
            Ok(order) => order,
            Err(rejected) => {
                match rejected {
                    SubmissionRejected::Invalid(ref error) => warn!(%error, "order is not valid"),
                    _ => warn!(%rejected, "submission refused"),
                }

                return self.engine.status();
            }
        };

        let outcome = gateway
            .submit_order(&order)
            .await
            .map_err(SubmissionFailure::from);

        if let Err(failure) = &outcome {
            warn!(number = %order.number, %failure, "order submission failed");
        }

        self.engine.finish_submission(outcome);

        self.engine.status()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bebidas::{
        bonuses::{BonusCondition, BonusProduct, BonusRule, RuleId},
        customers::{Classification, CustomerId},
        engine::MAX_REASON_LEN,
        products::{Product, ProductId},
        session::SellerId,
    };
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use crate::gateways::{
        MockBonusRuleSource, MockCatalogProvider, MockCustomerDirectory, MockCustomerRegistry,
        MockOrderGateway,
    };

    use super::*;

    fn product(id: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Producto {id}"),
            description: String::new(),
            presentation: "Caja x 12".to_string(),
            retail_price: dec!(2.00),
            wholesale_price: dec!(1.50),
            stock: 500,
            image: String::new(),
        }
    }

    fn customer(id: u32, name: &str) -> Customer {
        Customer {
            id: CustomerId::new(id),
            code: format!("CLI-{id:03}"),
            first_name: name.to_string(),
            last_name: "Quispe".to_string(),
            address: "Av. Grau 123".to_string(),
            district: None,
            classification: Classification::Wholesale,
            dni: Some(format!("4000000{id}")),
            tax: None,
            phones: Vec::new(),
            coordinates: None,
            photo: None,
        }
    }

    fn rule() -> BonusRule {
        BonusRule {
            id: RuleId::new(1),
            name: "10 + 1".to_string(),
            bonus_product: BonusProduct {
                id: ProductId::new(1),
                name: "Producto 1".to_string(),
                reference_price: dec!(2.00),
            },
            bonus_quantity: 1,
            condition: BonusCondition::PerProductThreshold {
                product: ProductId::new(1),
                min_quantity: 10,
            },
        }
    }

    fn context(
        catalog: MockCatalogProvider,
        customers: MockCustomerDirectory,
        rules: MockBonusRuleSource,
    ) -> AppContext {
        let mut orders = MockOrderGateway::new();
        orders.expect_submit_order().never();

        let mut registry = MockCustomerRegistry::new();
        registry.expect_create_customer().never();
        registry.expect_update_customer().never();

        AppContext {
            catalog: Arc::new(catalog),
            customers: Arc::new(customers),
            registry: Arc::new(registry),
            rules: Arc::new(rules),
            orders: Arc::new(orders),
        }
    }

    fn session() -> Session {
        Session::new(SellerId::new(3))
    }

    async fn loaded_desk() -> OrderDesk {
        let mut catalog = MockCatalogProvider::new();
        catalog
            .expect_fetch_catalog()
            .once()
            .return_once(|| Ok(vec![product(1), product(2)]));

        let mut customers = MockCustomerDirectory::new();
        customers
            .expect_fetch_customers()
            .once()
            .withf(|filter| filter.is_none())
            .return_once(|_| Ok(vec![customer(1, "Rosa"), customer(2, "Luis")]));

        let mut rules = MockBonusRuleSource::new();
        rules
            .expect_fetch_bonus_rules()
            .once()
            .return_once(|| Ok(vec![rule()]));

        let (desk, _report) = OrderDesk::load(session(), &context(catalog, customers, rules)).await;

        desk
    }

    #[tokio::test]
    async fn load_fills_engine_and_customers() -> TestResult {
        let desk = loaded_desk().await;

        assert_eq!(desk.engine().lines().len(), 2);
        assert_eq!(desk.engine().rules().len(), 1);
        assert_eq!(desk.customers().len(), 2);
        assert_eq!(desk.engine().session().seller(), SellerId::new(3));

        Ok(())
    }

    #[tokio::test]
    async fn load_failures_leave_lists_empty_and_are_reported() -> TestResult {
        let mut catalog = MockCatalogProvider::new();
        catalog
            .expect_fetch_catalog()
            .once()
            .return_once(|| Err(ApiError::server(500, "boom")));

        let mut customers = MockCustomerDirectory::new();
        customers
            .expect_fetch_customers()
            .once()
            .return_once(|_| Ok(vec![customer(1, "Rosa")]));

        let mut rules = MockBonusRuleSource::new();
        rules
            .expect_fetch_bonus_rules()
            .once()
            .return_once(|| Err(ApiError::Unsuccessful));

        let (desk, report) = OrderDesk::load(session(), &context(catalog, customers, rules)).await;

        assert!(desk.engine().lines().is_empty());
        assert!(desk.engine().rules().is_empty());
        assert_eq!(desk.customers().len(), 1);

        assert!(!report.is_complete());

        let failed: Vec<Resource> = report.failures.iter().map(|f| f.resource).collect();

        assert_eq!(failed, [Resource::Catalog, Resource::BonusRules]);
        assert_eq!(report.failures[0].reason, "server error 500: boom");

        Ok(())
    }

    #[tokio::test]
    async fn search_replaces_customer_list() -> TestResult {
        let mut desk = loaded_desk().await;

        let mut directory = MockCustomerDirectory::new();
        directory
            .expect_fetch_customers()
            .once()
            .withf(|filter| filter.as_deref() == Some("Ana"))
            .return_once(|_| Ok(vec![customer(9, "Ana")]));

        let found = desk
            .search_customers(&directory, Some("Ana".to_string()))
            .await?;

        assert_eq!(found.len(), 1);
        assert_eq!(desk.customers()[0].id, CustomerId::new(9));

        Ok(())
    }

    #[tokio::test]
    async fn failed_search_keeps_customer_list() -> TestResult {
        let mut desk = loaded_desk().await;

        let mut directory = MockCustomerDirectory::new();
        directory
            .expect_fetch_customers()
            .once()
            .return_once(|_| Err(ApiError::Unsuccessful));

        let result = desk.search_customers(&directory, None).await;

        assert!(result.is_err());
        assert_eq!(desk.customers().len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn select_customer_by_name() -> TestResult {
        let mut desk = loaded_desk().await;

        let selected = desk.select_customer("luis").map(|c| c.id);

        assert_eq!(selected, Some(CustomerId::new(2)));
        assert_eq!(desk.engine().classification(), Some(Classification::Wholesale));

        Ok(())
    }

    #[tokio::test]
    async fn select_customer_never_falls_back_to_another_customer() -> TestResult {
        let mut desk = loaded_desk().await;

        assert!(desk.select_customer("Rosa").is_some());

        let selected = desk.select_customer("Carmen");

        assert!(selected.is_none());
        assert!(desk.engine().customer().is_none());

        let selected = desk.select_customer("40000002").map(|c| c.id);

        assert_eq!(selected, Some(CustomerId::new(2)));

        Ok(())
    }

    #[tokio::test]
    async fn submit_sends_once_and_clears_cart() -> TestResult {
        let mut desk = loaded_desk().await;

        desk.select_customer("Rosa");
        desk.engine_mut().set_quantity(ProductId::new(1), 12)?;

        assert_eq!(desk.engine().cart().bonus_lines().count(), 1);

        let mut gateway = MockOrderGateway::new();
        gateway
            .expect_submit_order()
            .once()
            .withf(|order| {
                order.customer == CustomerId::new(1)
                    && order.seller == SellerId::new(3)
                    && order.details.len() == 1
                    && order.details[0].grants.len() == 1
            })
            .return_once(|_| Ok("¡Pedido creado exitosamente!".to_string()));

        let status = desk.submit(&gateway).await.clone();

        assert_eq!(
            status,
            SubmissionStatus::Success("¡Pedido creado exitosamente!".to_string())
        );
        assert!(desk.engine().cart().sale_lines().all(|l| l.quantity() == 0));
        assert_eq!(desk.engine().cart().bonus_lines().count(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn invalid_order_never_reaches_gateway() -> TestResult {
        let mut desk = loaded_desk().await;

        desk.engine_mut().set_quantity(ProductId::new(1), 5)?;

        let mut gateway = MockOrderGateway::new();
        gateway.expect_submit_order().never();

        let status = desk.submit(&gateway).await;

        assert_eq!(
            *status,
            SubmissionStatus::Failed("no customer selected".to_string())
        );

        Ok(())
    }

    #[tokio::test]
    async fn unacknowledged_result_blocks_resubmission() -> TestResult {
        let mut desk = loaded_desk().await;

        desk.select_customer("Rosa");
        desk.engine_mut().set_quantity(ProductId::new(2), 3)?;

        let mut failing = MockOrderGateway::new();
        failing
            .expect_submit_order()
            .once()
            .return_once(|_| Err(ApiError::server(422, "stock insuficiente")));

        let status = desk.submit(&failing).await.clone();

        assert_eq!(
            status,
            SubmissionStatus::Failed("server error 422: stock insuficiente".to_string())
        );
        assert_eq!(
            desk.engine().cart().sale_line(ProductId::new(2)).map(|l| l.quantity()),
            Some(3)
        );

        let mut idle = MockOrderGateway::new();
        idle.expect_submit_order().never();

        let status = desk.submit(&idle).await;

        assert_eq!(status, &SubmissionStatus::Failed("server error 422: stock insuficiente".to_string()));

        Ok(())
    }

    #[tokio::test]
    async fn long_server_errors_are_bounded() -> TestResult {
        let mut desk = loaded_desk().await;

        desk.select_customer("Rosa");
        desk.engine_mut().set_quantity(ProductId::new(2), 1)?;

        let body = "<html>".repeat(1_000);

        let mut gateway = MockOrderGateway::new();
        gateway
            .expect_submit_order()
            .once()
            .return_once(move |_| Err(ApiError::server(502, &body)));

        let SubmissionStatus::Failed(reason) = desk.submit(&gateway).await else {
            panic!("expected a failed submission");
        };

        assert!(reason.starts_with("server error 502: <html>"));
        assert!(reason.chars().count() <= MAX_REASON_LEN);

        Ok(())
    }
}
