use bebidas::{
    bonuses::{BonusCondition, BonusRule},
    pricing::soles,
};
use bebidas_app::context::AppContext;

pub(crate) async fn run(context: &AppContext) -> Result<(), String> {
    let rules = context
        .rules
        .fetch_bonus_rules()
        .await
        .map_err(|error| format!("failed to fetch bonus rules: {error}"))?;

    if rules.is_empty() {
        println!("no bonus rules found");
        return Ok(());
    }

    for rule in rules {
        println!("{:>5}  {} [{}]", rule.id, rule.name, rule.condition.kind());
        println!("       when {}", describe_condition(&rule));
        println!(
            "       grants {} x {}",
            rule.bonus_quantity, rule.bonus_product.name
        );
    }

    Ok(())
}

fn describe_condition(rule: &BonusRule) -> String {
    match &rule.condition {
        BonusCondition::PerProductThreshold {
            product,
            min_quantity,
        } => format!("{min_quantity} or more units of product {product}"),
        BonusCondition::VolumeThreshold { products, scales } => {
            let mut products: Vec<_> = products.iter().map(|id| id.get()).collect();
            products.sort_unstable();

            let products = products
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");

            scales.first().map_or_else(
                || format!("never (no scale for products {products})"),
                |step| format!("{} or more units across products {products}", step.min_quantity),
            )
        }
        BonusCondition::SpendThreshold { product, min_spend } => {
            format!("{} or more spent on product {product}", soles(*min_spend))
        }
    }
}
