use std::path::Path;

use chrono::NaiveDate;
use quotedesk_core::pricing::ResolvedPrice;
use quotedesk_core::{resolve_price, Product};
use serde::Serialize;
use tracing::warn;

use crate::commands::{read_json, CommandResult};

#[derive(Serialize)]
struct PriceReport<'a> {
    product_id: &'a str,
    date: NaiveDate,
    resolved: ResolvedPrice,
}

pub fn run(product_path: &Path, date: NaiveDate) -> CommandResult {
    let product: Product = match read_json("price", product_path) {
        Ok(product) => product,
        Err(failure) => return failure,
    };

    let resolved = resolve_price(&product.bands, date);
    let message = if resolved.is_missing() {
        warn!(
            event_name = "cli.price.missing_band",
            product_id = %product.id.0,
            date = %date,
            "product has no price bands"
        );
        format!("{} has no price bands; the line would be priced at zero", product.id.0)
    } else {
        format!("{} costs {} on {date}", product.id.0, resolved.unit_price)
    };

    let report = PriceReport { product_id: &product.id.0, date, resolved };
    CommandResult::report("price", message, &report)
}
