use bebidas::pricing::soles;
use bebidas_app::context::AppContext;

pub(crate) async fn run(context: &AppContext) -> Result<(), String> {
    let products = context
        .catalog
        .fetch_catalog()
        .await
        .map_err(|error| format!("failed to fetch catalog: {error}"))?;

    if products.is_empty() {
        println!("no products found");
        return Ok(());
    }

    for product in products {
        println!("{:>5}  {} ({})", product.id, product.name, product.presentation);
        println!(
            "       retail {}  wholesale {}  stock {}",
            soles(product.retail_price),
            soles(product.wholesale_price),
            product.stock
        );
    }

    Ok(())
}
