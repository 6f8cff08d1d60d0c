use chrono::NaiveDate;
use quotedesk_core::pricing::aggregate::{
    filter_by_date_range, summarize_by_customer, summarize_by_sales_person, CustomerSummary,
    DateRange, SalesPersonSummary,
};
use quotedesk_core::{aggregate_by_status, StatusSummary};
use quotedesk_db::{open_store, QuotationRepository};
use serde::Serialize;

use crate::commands::{load_config, runtime, today, CommandResult, EXIT_STORE};

#[derive(Serialize)]
struct DashboardReport {
    range: DateRange,
    reference_date: NaiveDate,
    statuses: StatusSummary,
    customers: Vec<CustomerSummary>,
    sales_persons: Vec<SalesPersonSummary>,
}

pub fn run(range: DateRange, today_override: Option<NaiveDate>) -> CommandResult {
    let config = match load_config("dashboard") {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let runtime = match runtime("dashboard") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let loaded = runtime.block_on(async {
        let store = open_store(&config.store).await.map_err(|error| error.to_string())?;
        QuotationRepository::new(store).list().await.map_err(|error| error.to_string())
    });
    let quotations = match loaded {
        Ok(quotations) => quotations,
        Err(message) => {
            return CommandResult::failure("dashboard", "store_read", message, EXIT_STORE)
        }
    };

    let reference_date = today_override.unwrap_or_else(today);
    let in_range = filter_by_date_range(&quotations, range, reference_date);
    let report = DashboardReport {
        range,
        reference_date,
        statuses: aggregate_by_status(in_range.iter().copied()),
        customers: summarize_by_customer(in_range.iter().copied()),
        sales_persons: summarize_by_sales_person(in_range.iter().copied()),
    };

    let message = format!(
        "{} quotations worth {} in range",
        report.statuses.total.count, report.statuses.total.value
    );
    CommandResult::report("dashboard", message, &report)
}
