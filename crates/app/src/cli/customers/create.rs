use std::path::PathBuf;

use bebidas::customers::CustomerDraft;
use bebidas_app::{api::forms::CustomerPhotos, gateways::CustomerRegistry};
use clap::Args;

use super::fields::CustomerFields;

#[derive(Debug, Args)]
pub(crate) struct CreateCustomerArgs {
    #[command(flatten)]
    fields: CustomerFields,

    /// Customer photo file
    #[arg(long)]
    photo: Option<PathBuf>,

    /// Shop-front photo file; repeat for each photo
    #[arg(long = "facade")]
    facades: Vec<PathBuf>,
}

pub(crate) async fn run(
    registry: &dyn CustomerRegistry,
    args: CreateCustomerArgs,
) -> Result<String, String> {
    let mut draft = CustomerDraft::default();

    args.fields.apply(&mut draft)?;

    draft.validate().map_err(|error| error.to_string())?;

    let photos = CustomerPhotos {
        portrait: args.photo,
        facades: args.facades,
    };

    registry
        .create_customer(&draft, &photos)
        .await
        .map_err(|error| format!("failed to create customer: {error}"))
}
