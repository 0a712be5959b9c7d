use bebidas_app::{config::ClientConfig, context::AppContext, observability};
use clap::{Parser, Subcommand};

mod catalog;
mod customers;
mod order;
mod rules;

#[derive(Debug, Parser)]
#[command(name = "bebidas", about = "Bebidas del Perú order desk", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    config: ClientConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the product catalog
    Catalog,

    /// List, register and edit customers
    Customers(customers::CustomersCommand),

    /// List promotional bonus rules
    Rules,

    /// Compose and submit an order
    Order(order::OrderArgs),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        observability::init_subscriber(&self.config.logging)
            .map_err(|error| format!("failed to initialise logging: {error}"))?;

        let session = self.config.session.session();
        let context = AppContext::from_api_config(self.config.api);

        match self.command {
            Commands::Catalog => catalog::run(&context).await,
            Commands::Customers(command) => customers::run(&context, command).await,
            Commands::Rules => rules::run(&context).await,
            Commands::Order(args) => {
                let session = session.map_err(|error| error.to_string())?;

                order::run(&context, session, args).await
            }
        }
    }
}
