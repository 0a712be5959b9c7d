//! Test fixtures shared by the unit tests.

use rust_decimal::Decimal;

use crate::{
    bonuses::{BonusCondition, BonusProduct, BonusRule, RuleId, ScaleStep},
    customers::{Classification, Customer, CustomerId},
    products::{Product, ProductId},
};

pub(crate) fn product(id: u32, retail: Decimal, wholesale: Decimal) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Producto {id}"),
        description: format!("Descripción {id}"),
        presentation: "Caja x 12".to_string(),
        retail_price: retail,
        wholesale_price: wholesale,
        stock: 500,
        image: format!("/img/productos/{id}.png"),
    }
}

pub(crate) fn customer(id: u32, classification: Classification) -> Customer {
    Customer {
        id: CustomerId::new(id),
        code: format!("CLI-{id:04}"),
        first_name: "Rosa".to_string(),
        last_name: "Quispe Mamani".to_string(),
        address: "Jr. Ucayali 123".to_string(),
        district: Some("Pucallpa".to_string()),
        classification,
        dni: Some(format!("7000000{id}")),
        tax: None,
        phones: Vec::new(),
        coordinates: None,
        photo: None,
    }
}

fn rule(id: u32, bonus: u32, quantity: u32, condition: BonusCondition) -> BonusRule {
    BonusRule {
        id: RuleId::new(id),
        name: format!("Regla {id}"),
        bonus_product: BonusProduct {
            id: ProductId::new(bonus),
            name: format!("Producto {bonus}"),
            reference_price: Decimal::ONE,
        },
        bonus_quantity: quantity,
        condition,
    }
}

pub(crate) fn per_product_rule(
    id: u32,
    trigger: u32,
    min_quantity: u32,
    bonus: u32,
    quantity: u32,
) -> BonusRule {
    rule(
        id,
        bonus,
        quantity,
        BonusCondition::PerProductThreshold {
            product: ProductId::new(trigger),
            min_quantity,
        },
    )
}

pub(crate) fn volume_rule(
    id: u32,
    triggers: &[u32],
    steps: &[u32],
    bonus: u32,
    quantity: u32,
) -> BonusRule {
    rule(
        id,
        bonus,
        quantity,
        BonusCondition::VolumeThreshold {
            products: triggers.iter().copied().map(ProductId::new).collect(),
            scales: steps
                .iter()
                .map(|&min_quantity| ScaleStep {
                    min_quantity,
                    bonus: quantity,
                    packages: None,
                    unit_kind: None,
                })
                .collect(),
        },
    )
}

pub(crate) fn spend_rule(
    id: u32,
    trigger: u32,
    min_spend: Decimal,
    bonus: u32,
    quantity: u32,
) -> BonusRule {
    rule(
        id,
        bonus,
        quantity,
        BonusCondition::SpendThreshold {
            product: ProductId::new(trigger),
            min_spend,
        },
    )
}
