use bebidas::{
    engine::{PricingEngine, SubmissionStatus},
    pricing::{line_amount, soles},
    products::ProductId,
    session::Session,
};
use bebidas_app::{context::AppContext, desk::OrderDesk};
use clap::Args;
use jiff::civil::Date;

#[derive(Debug, Args)]
pub(crate) struct OrderArgs {
    /// Customer DNI, RUC or name
    #[arg(long)]
    customer: String,

    /// Product and quantity as `<product_id>=<quantity>`; repeat for each product
    #[arg(long = "item", value_parser = parse_item, required = true)]
    items: Vec<(ProductId, i64)>,

    /// Requested delivery date (YYYY-MM-DD); defaults to tomorrow
    #[arg(long)]
    delivery_date: Option<Date>,

    /// Print the order payload instead of submitting it
    #[arg(long)]
    dry_run: bool,
}

pub(crate) async fn run(
    context: &AppContext,
    session: Session,
    args: OrderArgs,
) -> Result<(), String> {
    let (mut desk, report) = OrderDesk::load(session, context).await;

    for failure in &report.failures {
        eprintln!("warning: could not load {}: {}", failure.resource, failure.reason);
    }

    desk.search_customers(context.customers.as_ref(), Some(args.customer.clone()))
        .await
        .map_err(|error| format!("failed to search customers: {error}"))?;

    let customer = desk
        .select_customer(&args.customer)
        .map(|customer| format!("{} ({})", customer.full_name(), customer.classification))
        .ok_or_else(|| format!("no customer matches {:?} by DNI, RUC or name", args.customer))?;

    println!("customer: {customer}");

    let engine = desk.engine_mut();

    for (product, quantity) in args.items {
        engine
            .set_quantity(product, quantity)
            .map_err(|error| format!("cannot set product {product}: {error}"))?;
    }

    if let Some(date) = args.delivery_date {
        engine.set_delivery_date(date);
    }

    print_cart(engine);

    if args.dry_run {
        let order = engine
            .build_order_payload()
            .map_err(|error| format!("order is not valid: {error}"))?;

        let json = serde_json::to_string_pretty(&order)
            .map_err(|error| format!("failed to encode order: {error}"))?;

        println!("{json}");

        return Ok(());
    }

    match desk.submit(context.orders.as_ref()).await {
        SubmissionStatus::Success(message) => {
            println!("{message}");
            Ok(())
        }
        SubmissionStatus::Failed(reason) => Err(format!("order not submitted: {reason}")),
        status => Err(format!("order not submitted: unexpected status {status:?}")),
    }
}

fn print_cart(engine: &PricingEngine) {
    println!("delivery: {}", engine.delivery_date());

    for row in cart_rows(engine) {
        println!("{row}");
    }

    println!("subtotal: {}", soles(engine.subtotal()));
    println!("taxes: {}", soles(engine.taxes()));
    println!("total: {}", soles(engine.total()));
}

fn cart_rows(engine: &PricingEngine) -> Vec<String> {
    engine
        .lines()
        .iter()
        .filter(|line| line.quantity() > 0)
        .map(|line| {
            let product = line.product();

            if line.is_bonus() {
                return format!("  {:>5} x {}", line.quantity(), product.name);
            }

            format!(
                "  {:>5} x {} @ {} = {}",
                line.quantity(),
                product.name,
                soles(engine.effective_price(line)),
                soles(line_amount(product, line.quantity(), engine.classification()))
            )
        })
        .collect()
}

fn parse_item(value: &str) -> Result<(ProductId, i64), String> {
    let (product, quantity) = value
        .split_once('=')
        .ok_or_else(|| format!("expected <product_id>=<quantity>, got {value:?}"))?;

    let product = product
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("invalid product id {product:?}: {error}"))?;

    let quantity = quantity
        .trim()
        .parse::<i64>()
        .map_err(|error| format!("invalid quantity {quantity:?}: {error}"))?;

    Ok((ProductId::new(product), quantity))
}
