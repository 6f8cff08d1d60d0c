use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLine {
    pub description: String,
    pub physical_quantity: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingOrderLine {
    pub item_name: String,
    #[serde(default)]
    pub part_no: String,
    #[serde(default)]
    pub material_code: String,
    pub balance_quantity: Decimal,
    pub due_date: NaiveDate,
}
