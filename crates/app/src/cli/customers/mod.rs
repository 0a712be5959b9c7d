use bebidas::customers::{Customer, match_customer};
use bebidas_app::{context::AppContext, gateways::CustomerDirectory};
use clap::{Args, Subcommand};

mod create;
mod fields;
mod list;
mod photos;
mod update;

#[derive(Debug, Args)]
pub(crate) struct CustomersCommand {
    #[command(subcommand)]
    command: CustomersSubcommand,
}

#[derive(Debug, Subcommand)]
enum CustomersSubcommand {
    /// List customers
    List(list::ListCustomersArgs),

    /// Register a new customer
    Create(create::CreateCustomerArgs),

    /// Edit an existing customer
    Update(update::UpdateCustomerArgs),

    /// Manage a customer's shop-front photos
    Photos(photos::PhotosCommand),
}

pub(crate) async fn run(context: &AppContext, command: CustomersCommand) -> Result<(), String> {
    match command.command {
        CustomersSubcommand::List(args) => list::run(context, args).await,
        CustomersSubcommand::Create(args) => {
            let message = create::run(context.registry.as_ref(), args).await?;

            println!("{message}");

            Ok(())
        }
        CustomersSubcommand::Update(args) => {
            let message =
                update::run(context.customers.as_ref(), context.registry.as_ref(), args).await?;

            println!("{message}");

            Ok(())
        }
        CustomersSubcommand::Photos(command) => {
            photos::run(context.customers.as_ref(), context.registry.as_ref(), command).await
        }
    }
}

/// Look up the one customer a criterion names; never settles for a partial result.
async fn resolve_customer(
    directory: &dyn CustomerDirectory,
    criterion: &str,
) -> Result<Customer, String> {
    let customers = directory
        .fetch_customers(Some(criterion.to_string()))
        .await
        .map_err(|error| format!("failed to search customers: {error}"))?;

    match_customer(&customers, criterion)
        .cloned()
        .ok_or_else(|| format!("no customer matches {criterion:?} by DNI, RUC or name"))
}
