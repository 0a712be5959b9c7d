use bebidas::customers::find_customer;
use bebidas_app::context::AppContext;
use clap::Args;

#[derive(Debug, Args)]
pub(crate) struct ListCustomersArgs {
    /// Only list customers matching this name or document number
    #[arg(long)]
    search: Option<String>,
}

pub(crate) async fn run(context: &AppContext, args: ListCustomersArgs) -> Result<(), String> {
    let customers = context
        .customers
        .fetch_customers(args.search.clone())
        .await
        .map_err(|error| format!("failed to fetch customers: {error}"))?;

    if customers.is_empty() {
        println!("no customers found");
        return Ok(());
    }

    let best = args
        .search
        .as_deref()
        .and_then(|search| find_customer(&customers, search))
        .map(|customer| customer.id);

    for customer in &customers {
        let marker = if Some(customer.id) == best { '*' } else { ' ' };

        println!(
            "{marker}{:>5}  {}  {} [{}]",
            customer.id,
            customer.code,
            customer.full_name(),
            customer.classification
        );
        println!(
            "       dni: {}  ruc: {}",
            customer.dni.as_deref().unwrap_or("-"),
            customer.tax.as_ref().map_or("-", |tax| tax.ruc.as_str())
        );
        println!("       {}", customer.address);
    }

    Ok(())
}
