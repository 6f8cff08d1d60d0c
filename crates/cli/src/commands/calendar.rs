use std::collections::BTreeMap;

use chrono::NaiveDate;
use quotedesk_core::pricing::calendar::{events_by_day, events_for_month, CalendarEvent};
use quotedesk_db::{open_store, QuotationRepository};
use serde::Serialize;

use crate::commands::{load_config, runtime, CommandResult, EXIT_STORE};

#[derive(Serialize)]
struct CalendarReport {
    year: i32,
    month: u32,
    follow_up_days: u64,
    days: BTreeMap<NaiveDate, Vec<CalendarEvent>>,
}

pub fn run(year: i32, month: u32) -> CommandResult {
    let config = match load_config("calendar") {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let runtime = match runtime("calendar") {
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
            return CommandResult::failure("calendar", "store_read", message, EXIT_STORE)
        }
    };

    let follow_up_days = config.planning.follow_up_days;
    let events = events_for_month(&quotations, year, month, follow_up_days);
    let message = format!("{} reminders in {year}-{month:02}", events.len());
    let report = CalendarReport { year, month, follow_up_days, days: events_by_day(events) };
    CommandResult::report("calendar", message, &report)
}
