use std::path::Path;

use chrono::NaiveDate;
use quotedesk_core::stock::{shortage_report, stock_positions, StockPosition};
use quotedesk_core::{PendingOrderLine, StockLine};
use serde::Serialize;

use crate::commands::{load_config, read_json, today, CommandResult};

#[derive(Serialize)]
struct StockReport {
    today: NaiveDate,
    horizon_days: u64,
    positions: Vec<StockPosition>,
    shortages: Vec<StockPosition>,
}

pub fn run(
    stock_path: &Path,
    orders_path: &Path,
    today_override: Option<NaiveDate>,
    horizon_days: Option<u64>,
) -> CommandResult {
    let config = match load_config("stock") {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let stock: Vec<StockLine> = match read_json("stock", stock_path) {
        Ok(stock) => stock,
        Err(failure) => return failure,
    };
    let orders: Vec<PendingOrderLine> = match read_json("stock", orders_path) {
        Ok(orders) => orders,
        Err(failure) => return failure,
    };

    let today = today_override.unwrap_or_else(today);
    let horizon_days = horizon_days.unwrap_or(config.planning.demand_horizon_days);
    let report = StockReport {
        today,
        horizon_days,
        positions: stock_positions(&stock, &orders, today, horizon_days),
        shortages: shortage_report(&stock, &orders, today, horizon_days),
    };

    let message = format!(
        "{} stock lines checked against {} pending orders, {} short",
        report.positions.len(),
        orders.len(),
        report.shortages.len()
    );
    CommandResult::report("stock", message, &report)
}
