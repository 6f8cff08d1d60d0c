use std::path::Path;

use quotedesk_core::{PrintLayout, PrintSummary, Quotation};

use crate::commands::{load_config, read_json, CommandResult};

pub fn run(quotation_path: &Path, layout: Option<PrintLayout>) -> CommandResult {
    let config = match load_config("totals") {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let mut quotation: Quotation = match read_json("totals", quotation_path) {
        Ok(quotation) => quotation,
        Err(failure) => return failure,
    };
    quotation.ensure_lines();

    let layout = layout.unwrap_or(config.planning.default_layout);
    let summary = PrintSummary::build(&quotation, layout);
    let message = format!(
        "quotation {} totals {} ({})",
        summary.quotation_id, summary.printed_total, summary.amount_in_words
    );
    CommandResult::report("totals", message, &summary)
}
