//! Stock versus pending-order matching.
//!
//! Stock sheets and order books describe the same material in different free
//! text, so matching runs on normalized strings: lowercase ASCII letters and
//! digits only. Substring matching on short codes can produce false positives;
//! codes of two characters or fewer are ignored for that reason.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::stock::{PendingOrderLine, StockLine};
use crate::pricing::aggregate::accumulate;

pub const DEFAULT_HORIZON_DAYS: u64 = 30;

const MIN_CODE_LEN: usize = 3;

pub fn normalize(text: &str) -> String {
    text.to_lowercase().chars().filter(char::is_ascii_alphanumeric).collect()
}

fn code_matches(code: &str, normalized_description: &str) -> bool {
    let code = normalize(code);
    code.len() >= MIN_CODE_LEN && normalized_description.contains(&code)
}

pub fn matches_stock(stock_description: &str, order: &PendingOrderLine) -> bool {
    let description = normalize(stock_description);
    let item_name = normalize(&order.item_name);

    // An empty normalized name is a substring of everything and matches.
    let name_matches = description.contains(&item_name) || item_name.contains(&description);

    name_matches
        || code_matches(&order.part_no, &description)
        || code_matches(&order.material_code, &description)
}

pub fn match_orders<'a>(
    stock_description: &str,
    orders: &'a [PendingOrderLine],
) -> Vec<&'a PendingOrderLine> {
    orders.iter().filter(|order| matches_stock(stock_description, order)).collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandClass {
    Due,
    Scheduled,
}

pub fn classify_demand(
    order: &PendingOrderLine,
    today: NaiveDate,
    horizon_days: u64,
) -> DemandClass {
    let horizon_end = today.checked_add_days(Days::new(horizon_days)).unwrap_or(NaiveDate::MAX);
    if order.due_date <= horizon_end {
        DemandClass::Due
    } else {
        DemandClass::Scheduled
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeStock {
    pub free_stock: Decimal,
    pub shortage: Decimal,
}

pub fn compute_free_stock(physical_quantity: Decimal, due_quantity: Decimal) -> FreeStock {
    FreeStock {
        free_stock: physical_quantity.saturating_sub(due_quantity).max(Decimal::ZERO),
        shortage: due_quantity.saturating_sub(physical_quantity).max(Decimal::ZERO),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockPosition {
    pub description: String,
    pub physical_quantity: Decimal,
    pub matched_orders: Vec<PendingOrderLine>,
    pub due_quantity: Decimal,
    pub scheduled_quantity: Decimal,
    #[serde(flatten)]
    pub availability: FreeStock,
}

pub fn stock_position(
    line: &StockLine,
    orders: &[PendingOrderLine],
    today: NaiveDate,
    horizon_days: u64,
) -> StockPosition {
    let matched: Vec<PendingOrderLine> =
        match_orders(&line.description, orders).into_iter().cloned().collect();

    let mut due_quantity = Decimal::ZERO;
    let mut scheduled_quantity = Decimal::ZERO;
    for order in &matched {
        match classify_demand(order, today, horizon_days) {
            DemandClass::Due => due_quantity = accumulate(due_quantity, order.balance_quantity),
            DemandClass::Scheduled => {
                scheduled_quantity = accumulate(scheduled_quantity, order.balance_quantity)
            }
        }
    }

    StockPosition {
        description: line.description.clone(),
        physical_quantity: line.physical_quantity,
        matched_orders: matched,
        due_quantity,
        scheduled_quantity,
        availability: compute_free_stock(line.physical_quantity, due_quantity),
    }
}

pub fn stock_positions(
    lines: &[StockLine],
    orders: &[PendingOrderLine],
    today: NaiveDate,
    horizon_days: u64,
) -> Vec<StockPosition> {
    lines.iter().map(|line| stock_position(line, orders, today, horizon_days)).collect()
}

/// Positions whose near-term demand exceeds physical stock, worst first.
pub fn shortage_report(
    lines: &[StockLine],
    orders: &[PendingOrderLine],
    today: NaiveDate,
    horizon_days: u64,
) -> Vec<StockPosition> {
    let mut short: Vec<StockPosition> = stock_positions(lines, orders, today, horizon_days)
        .into_iter()
        .filter(|position| position.availability.shortage > Decimal::ZERO)
        .collect();
    short.sort_by(|left, right| right.availability.shortage.cmp(&left.availability.shortage));
    short
}
