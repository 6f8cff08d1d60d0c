use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::quote::{Quotation, QuotationId, QuotationStatus};

pub const DEFAULT_FOLLOW_UP_DAYS: u64 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarEventKind {
    Created,
    FollowUp,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub date: NaiveDate,
    pub kind: CalendarEventKind,
    pub quotation_id: QuotationId,
    pub customer_name: String,
    pub status: QuotationStatus,
}

/// Every quotation lands on the calendar twice: on its document date and on
/// the follow-up date `follow_up_days` later.
pub fn schedule_events(quotation: &Quotation, follow_up_days: u64) -> Vec<CalendarEvent> {
    let event = |date: NaiveDate, kind: CalendarEventKind| CalendarEvent {
        date,
        kind,
        quotation_id: quotation.id,
        customer_name: quotation.customer.name.clone(),
        status: quotation.status.clone(),
    };

    let mut events = vec![event(quotation.document_date, CalendarEventKind::Created)];
    if let Some(follow_up) = quotation.document_date.checked_add_days(Days::new(follow_up_days)) {
        events.push(event(follow_up, CalendarEventKind::FollowUp));
    }
    events
}

/// Events falling inside the displayed month grid, in date order.
pub fn events_for_month<'a>(
    quotations: impl IntoIterator<Item = &'a Quotation>,
    year: i32,
    month: u32,
    follow_up_days: u64,
) -> Vec<CalendarEvent> {
    let mut events: Vec<CalendarEvent> = quotations
        .into_iter()
        .flat_map(|quotation| schedule_events(quotation, follow_up_days))
        .filter(|event| event.date.year() == year && event.date.month() == month)
        .collect();
    events.sort_by_key(|event| event.date);
    events
}

pub fn events_by_day(events: Vec<CalendarEvent>) -> BTreeMap<NaiveDate, Vec<CalendarEvent>> {
    let mut cells: BTreeMap<NaiveDate, Vec<CalendarEvent>> = BTreeMap::new();
    for event in events {
        cells.entry(event.date).or_default().push(event);
    }
    cells
}
