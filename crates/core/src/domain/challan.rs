use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::customer::CustomerRef;
use crate::domain::product::ProductId;
use crate::domain::quote::{DiscountPercent, QuotationId};
use crate::pricing::aggregate::accumulate;
use crate::pricing::line::price_line;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChallanId(pub u64);

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallanLine {
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub unit_price: Decimal,
    #[serde(default)]
    pub discount_percent: DiscountPercent,
}

impl ChallanLine {
    pub fn amount(&self) -> Decimal {
        price_line(self.unit_price, self.discount_percent, self.quantity, false, Decimal::ZERO)
            .line_amount
    }
}

/// Dispatch note for goods leaving the warehouse. Challans never carry freight.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryChallan {
    pub id: ChallanId,
    pub challan_date: NaiveDate,
    pub customer: CustomerRef,
    #[serde(default)]
    pub quotation_id: Option<QuotationId>,
    pub lines: Vec<ChallanLine>,
}

impl DeliveryChallan {
    pub fn total_quantity(&self) -> u64 {
        self.lines
            .iter()
            .fold(0, |total: u64, line| total.saturating_add(u64::from(line.quantity)))
    }

    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(ChallanLine::amount).fold(Decimal::ZERO, accumulate)
    }
}
