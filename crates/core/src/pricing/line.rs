use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::quote::DiscountPercent;

/// Air-freight surcharge in rupees per kilogram.
pub const FREIGHT_RATE_PER_KG: Decimal = Decimal::from_parts(150, 0, 0, false, 0);

/// Freight weights are entered in grams per unit length.
pub const GRAMS_PER_KG: Decimal = Decimal::ONE_THOUSAND;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinePricing {
    pub net_unit_price: Decimal,
    pub line_amount: Decimal,
    pub freight_per_unit: Decimal,
    pub freight_amount: Decimal,
}

/// Products outside the `Decimal` range price as zero, the same way an
/// unreadable discount prices at list.
fn product_or_zero(left: Decimal, right: Decimal) -> Decimal {
    left.checked_mul(right).unwrap_or(Decimal::ZERO)
}

pub fn freight_per_unit(freight_eligible: bool, weight_grams_per_unit: Decimal) -> Decimal {
    if freight_eligible {
        product_or_zero(weight_grams_per_unit / GRAMS_PER_KG, FREIGHT_RATE_PER_KG)
    } else {
        Decimal::ZERO
    }
}

pub fn price_line(
    unit_price: Decimal,
    discount: DiscountPercent,
    quantity: u32,
    freight_eligible: bool,
    freight_weight_per_unit: Decimal,
) -> LinePricing {
    let quantity = Decimal::from(quantity);
    let retained = Decimal::ONE
        .checked_sub(discount.value() / Decimal::ONE_HUNDRED)
        .unwrap_or(Decimal::ZERO);
    let net_unit_price = product_or_zero(unit_price, retained);
    let freight_per_unit = freight_per_unit(freight_eligible, freight_weight_per_unit);

    LinePricing {
        net_unit_price,
        line_amount: product_or_zero(net_unit_price, quantity),
        freight_per_unit,
        freight_amount: product_or_zero(freight_per_unit, quantity),
    }
}
