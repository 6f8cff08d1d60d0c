pub mod aggregate;
pub mod book;
pub mod calendar;
pub mod catalog;
pub mod line;
pub mod print;
pub mod words;

pub use aggregate::{
    aggregate_by_status, aggregate_totals, filter_by_date_range, summarize_by_customer,
    summarize_by_sales_person, CustomerSummary, DateRange, QuotationTotals, SalesPersonSummary,
    StatusSummary, Tally,
};
pub use book::{resolve_band, resolve_price, ResolvedPrice};
pub use calendar::{events_by_day, events_for_month, schedule_events, CalendarEvent};
pub use catalog::Catalog;
pub use line::{price_line, LinePricing, FREIGHT_RATE_PER_KG, GRAMS_PER_KG};
pub use print::{PrintLayout, PrintSummary};
pub use words::{to_indian_words, WordsFormatter};
