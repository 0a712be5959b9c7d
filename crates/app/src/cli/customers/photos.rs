use std::path::PathBuf;

use bebidas_app::gateways::{CustomerDirectory, CustomerRegistry};
use clap::{Args, Subcommand};

use super::resolve_customer;

#[derive(Debug, Args)]
pub(crate) struct PhotosCommand {
    /// DNI, RUC or name of the customer
    #[arg(long)]
    customer: String,

    #[command(subcommand)]
    command: PhotosSubcommand,
}

#[derive(Debug, Subcommand)]
enum PhotosSubcommand {
    /// List the shop-front photos
    List,

    /// Upload a shop-front photo
    Add {
        /// Image file to upload
        path: PathBuf,
    },

    /// Delete a shop-front photo
    Remove {
        /// Stored file name, as shown by `list`
        file_name: String,
    },
}

pub(crate) async fn run(
    directory: &dyn CustomerDirectory,
    registry: &dyn CustomerRegistry,
    command: PhotosCommand,
) -> Result<(), String> {
    let customer = resolve_customer(directory, &command.customer).await?;

    match command.command {
        PhotosSubcommand::List => {
            let photos = registry
                .fetch_facade_photos(customer.id)
                .await
                .map_err(|error| format!("failed to fetch photos: {error}"))?;

            if photos.is_empty() {
                println!("no photos for {}", customer.full_name());
            }

            for photo in photos {
                println!("{:>5}  {}", photo.id, photo.file_name);
            }
        }
        PhotosSubcommand::Add { path } => {
            registry
                .upload_facade_photo(customer.id, path)
                .await
                .map_err(|error| format!("failed to upload photo: {error}"))?;

            println!("photo added for {}", customer.full_name());
        }
        PhotosSubcommand::Remove { file_name } => {
            registry
                .delete_facade_photo(customer.id, file_name)
                .await
                .map_err(|error| format!("failed to delete photo: {error}"))?;

            println!("photo removed for {}", customer.full_name());
        }
    }

    Ok(())
}
