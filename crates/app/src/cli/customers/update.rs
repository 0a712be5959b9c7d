use std::path::PathBuf;

use bebidas::customers::CustomerDraft;
use bebidas_app::gateways::{CustomerDirectory, CustomerRegistry};
use clap::Args;

use super::{fields::CustomerFields, resolve_customer};

#[derive(Debug, Args)]
pub(crate) struct UpdateCustomerArgs {
    /// DNI, RUC or name of the customer to edit
    #[arg(long)]
    customer: String,

    #[command(flatten)]
    fields: CustomerFields,

    /// New customer photo file
    #[arg(long)]
    photo: Option<PathBuf>,
}

pub(crate) async fn run(
    directory: &dyn CustomerDirectory,
    registry: &dyn CustomerRegistry,
    args: UpdateCustomerArgs,
) -> Result<String, String> {
    let customer = resolve_customer(directory, &args.customer).await?;

    let mut draft = CustomerDraft::from(&customer);

    args.fields.apply(&mut draft)?;

    registry
        .update_customer(customer.id, &draft, args.photo)
        .await
        .map_err(|error| format!("failed to update customer {}: {error}", customer.id))
}
