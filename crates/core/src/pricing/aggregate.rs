use std::collections::BTreeMap;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

use chrono::{Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::customer::{CustomerId, SalesPersonId};
use crate::domain::quote::{Quotation, QuotationLine, QuotationStatus};
use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotationTotals {
    pub total_quantity_ordered: u64,
    pub total_quantity_requested: u64,
    pub total_amount: Decimal,
    pub total_freight: Decimal,
}

/// Running-total addition that never panics: an addend that would push the
/// total outside the `Decimal` range is left out.
pub fn accumulate(total: Decimal, addend: Decimal) -> Decimal {
    total.checked_add(addend).unwrap_or(total)
}

impl QuotationTotals {
    pub fn grand_total(&self) -> Decimal {
        accumulate(self.total_amount, self.total_freight)
    }
}

impl Add for QuotationTotals {
    type Output = QuotationTotals;

    fn add(self, other: QuotationTotals) -> QuotationTotals {
        QuotationTotals {
            total_quantity_ordered: self
                .total_quantity_ordered
                .saturating_add(other.total_quantity_ordered),
            total_quantity_requested: self
                .total_quantity_requested
                .saturating_add(other.total_quantity_requested),
            total_amount: accumulate(self.total_amount, other.total_amount),
            total_freight: accumulate(self.total_freight, other.total_freight),
        }
    }
}

impl Sum for QuotationTotals {
    fn sum<I: Iterator<Item = QuotationTotals>>(iter: I) -> Self {
        iter.fold(QuotationTotals::default(), Add::add)
    }
}

impl<'a> From<&'a QuotationLine> for QuotationTotals {
    fn from(line: &'a QuotationLine) -> Self {
        let pricing = line.pricing();
        QuotationTotals {
            total_quantity_ordered: u64::from(line.quantity_ordered),
            total_quantity_requested: u64::from(line.quantity_requested),
            total_amount: pricing.line_amount,
            total_freight: pricing.freight_amount,
        }
    }
}

pub fn aggregate_totals<'a>(lines: impl IntoIterator<Item = &'a QuotationLine>) -> QuotationTotals {
    lines.into_iter().map(QuotationTotals::from).sum()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub count: u64,
    pub value: Decimal,
}

impl Tally {
    fn record(&mut self, value: Decimal) {
        self.count = self.count.saturating_add(1);
        self.value = accumulate(self.value, value);
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub total: Tally,
    pub per_status: BTreeMap<QuotationStatus, Tally>,
}

impl Default for StatusSummary {
    fn default() -> Self {
        let per_status = QuotationStatus::KNOWN
            .iter()
            .cloned()
            .map(|status| (status, Tally::default()))
            .collect();
        Self { total: Tally::default(), per_status }
    }
}

impl StatusSummary {
    fn record(&mut self, quotation: &Quotation) {
        let value = quotation.totals().total_amount;
        self.total.record(value);
        // Unrecognized statuses only count toward the overall tally.
        if let Some(tally) = self.per_status.get_mut(&quotation.status) {
            tally.record(value);
        }
    }

    pub fn tally(&self, status: &QuotationStatus) -> Tally {
        self.per_status.get(status).copied().unwrap_or_default()
    }
}

pub fn aggregate_by_status<'a>(
    quotations: impl IntoIterator<Item = &'a Quotation>,
) -> StatusSummary {
    let mut summary = StatusSummary::default();
    for quotation in quotations {
        summary.record(quotation);
    }
    summary
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRange {
    #[default]
    All,
    Week,
    Month,
    Year,
}

impl DateRange {
    /// First day of the window ending on `reference`, or `None` for `All`.
    pub fn start(self, reference: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::All => None,
            Self::Week => reference.checked_sub_days(Days::new(7)),
            Self::Month => reference.checked_sub_months(Months::new(1)),
            Self::Year => reference.checked_sub_months(Months::new(12)),
        }
    }
}

impl FromStr for DateRange {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(DomainError::InvariantViolation(format!(
                "unsupported date range `{other}` (expected all|week|month|year)"
            ))),
        }
    }
}

pub fn filter_by_date_range<'a>(
    quotations: impl IntoIterator<Item = &'a Quotation>,
    range: DateRange,
    reference: NaiveDate,
) -> Vec<&'a Quotation> {
    let Some(start) = range.start(reference) else {
        return quotations.into_iter().collect();
    };

    quotations
        .into_iter()
        .filter(|quotation| {
            start <= quotation.document_date && quotation.document_date <= reference
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub customer_id: CustomerId,
    pub customer_name: String,
    pub statuses: StatusSummary,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesPersonSummary {
    pub sales_person: Option<SalesPersonId>,
    pub statuses: StatusSummary,
}

/// Per-customer tallies, highest quoted value first.
pub fn summarize_by_customer<'a>(
    quotations: impl IntoIterator<Item = &'a Quotation>,
) -> Vec<CustomerSummary> {
    let mut grouped: BTreeMap<CustomerId, CustomerSummary> = BTreeMap::new();
    for quotation in quotations {
        grouped
            .entry(quotation.customer.id)
            .or_insert_with(|| CustomerSummary {
                customer_id: quotation.customer.id,
                customer_name: quotation.customer.name.clone(),
                statuses: StatusSummary::default(),
            })
            .statuses
            .record(quotation);
    }

    let mut summaries: Vec<CustomerSummary> = grouped.into_values().collect();
    summaries.sort_by(|left, right| right.statuses.total.value.cmp(&left.statuses.total.value));
    summaries
}

pub fn summarize_by_sales_person<'a>(
    quotations: impl IntoIterator<Item = &'a Quotation>,
) -> Vec<SalesPersonSummary> {
    let mut grouped: BTreeMap<Option<SalesPersonId>, StatusSummary> = BTreeMap::new();
    for quotation in quotations {
        grouped.entry(quotation.sales_person).or_default().record(quotation);
    }

    let mut summaries: Vec<SalesPersonSummary> = grouped
        .into_iter()
        .map(|(sales_person, statuses)| SalesPersonSummary { sales_person, statuses })
        .collect();
    summaries.sort_by(|left, right| right.statuses.total.value.cmp(&left.statuses.total.value));
    summaries
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::{
        aggregate_by_status, aggregate_totals, filter_by_date_range, summarize_by_customer,
        summarize_by_sales_person, DateRange, QuotationTotals, Tally,
    };
    use crate::domain::customer::{CustomerId, CustomerRef, SalesPersonId};
    use crate::domain::quote::{
        DiscountPercent, Quotation, QuotationId, QuotationLine, QuotationStatus,
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn line(unit_price: Decimal, discount: &str, quantity: u32) -> QuotationLine {
        QuotationLine {
            unit_price,
            discount_percent: DiscountPercent::parse_lenient(discount),
            quantity_ordered: quantity,
            quantity_requested: quantity + 10,
            ..Default::default()
        }
    }

    fn quotation(id: u64, customer: u64, status: QuotationStatus, amount: i64) -> Quotation {
        let mut quotation = Quotation::new(
            QuotationId(id),
            date(2025, 6, 15),
            CustomerRef { id: CustomerId(customer), name: format!("Customer {customer}") },
        );
        quotation.status = status;
        quotation.lines = vec![line(Decimal::new(amount, 0), "0", 1)];
        quotation
    }

    #[test]
    fn two_line_quotation_totals_match_hand_calculation() {
        let lines = vec![
            line(Decimal::new(12050, 2), "15", 100),
            line(Decimal::new(25075, 2), "20", 40),
        ];

        let totals = aggregate_totals(&lines);

        assert_eq!(totals.total_amount, Decimal::new(1826650, 2));
        assert_eq!(totals.total_quantity_ordered, 140);
        assert_eq!(totals.total_quantity_requested, 160);
        assert_eq!(totals.total_freight, Decimal::ZERO);
        assert_eq!(totals.grand_total(), Decimal::new(1826650, 2));
    }

    #[test]
    fn totals_are_additive_over_concatenation() {
        let mut first =
            vec![line(Decimal::new(4999, 2), "5", 12), line(Decimal::new(300, 0), "x", 2)];
        first[1].freight_eligible = true;
        first[1].freight_weight_per_unit = Decimal::new(220, 0);
        let second = vec![line(Decimal::new(75, 0), "110", 4)];

        let combined: Vec<QuotationLine> = first.iter().chain(second.iter()).cloned().collect();

        assert_eq!(
            aggregate_totals(&combined),
            aggregate_totals(&first) + aggregate_totals(&second)
        );
        assert_eq!(aggregate_totals(&Vec::new()), QuotationTotals::default());
    }

    #[test]
    fn overflowing_lines_never_panic_the_totals() {
        let lines = vec![
            line(Decimal::MAX, "0", 1),
            line(Decimal::MAX, "0", 1),
            line(Decimal::MAX, "0", 2),
        ];

        let totals = aggregate_totals(&lines);

        assert_eq!(totals.total_amount, Decimal::MAX);
        assert_eq!(totals.total_quantity_ordered, 4);
        assert_eq!(totals.grand_total(), Decimal::MAX);

        let quotations = vec![
            quotation(1, 1, QuotationStatus::Open, 10),
            Quotation { lines: lines.clone(), ..quotation(2, 1, QuotationStatus::Open, 0) },
        ];
        let summary = aggregate_by_status(&quotations);
        assert_eq!(summary.total.count, 2);
        assert_eq!(summary.total.value, Decimal::new(10, 0));
    }

    #[test]
    fn status_summary_buckets_known_statuses_and_counts_everything() {
        let quotations = vec![
            quotation(1, 1, QuotationStatus::Open, 100),
            quotation(2, 1, QuotationStatus::Open, 50),
            quotation(3, 2, QuotationStatus::PoReceived, 400),
            quotation(4, 2, QuotationStatus::Unrecognized("On Hold".to_string()), 25),
        ];

        let summary = aggregate_by_status(&quotations);

        assert_eq!(summary.total, Tally { count: 4, value: Decimal::new(575, 0) });
        assert_eq!(
            summary.tally(&QuotationStatus::Open),
            Tally { count: 2, value: Decimal::new(150, 0) }
        );
        assert_eq!(summary.tally(&QuotationStatus::Lost), Tally::default());
        assert_eq!(summary.per_status.len(), 5);
        let bucketed: u64 = summary.per_status.values().map(|tally| tally.count).sum();
        assert_eq!(bucketed, 3);
    }

    #[test]
    fn date_windows_are_inclusive_and_anchored_on_reference() {
        let reference = date(2025, 3, 31);
        let mut quotations = Vec::new();
        for (id, day) in [
            (1, date(2025, 3, 31)),
            (2, date(2025, 3, 24)),
            (3, date(2025, 3, 23)),
            (4, date(2025, 2, 28)),
            (5, date(2024, 3, 31)),
            (6, date(2024, 3, 30)),
            (7, date(2025, 4, 1)),
        ] {
            let mut entry = quotation(id, 1, QuotationStatus::Open, 10);
            entry.document_date = day;
            quotations.push(entry);
        }

        let ids = |range: DateRange| -> Vec<u64> {
            filter_by_date_range(&quotations, range, reference)
                .into_iter()
                .map(|quotation| quotation.id.0)
                .collect()
        };

        assert_eq!(ids(DateRange::Week), vec![1, 2]);
        assert_eq!(ids(DateRange::Month), vec![1, 2, 3, 4]);
        assert_eq!(ids(DateRange::Year), vec![1, 2, 3, 4, 5]);
        assert_eq!(ids(DateRange::All), vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn date_range_parses_dashboard_keywords() {
        assert_eq!("Month".parse::<DateRange>(), Ok(DateRange::Month));
        assert!("quarter".parse::<DateRange>().is_err());
    }

    #[test]
    fn customer_summaries_rank_by_value() {
        let quotations = vec![
            quotation(1, 1, QuotationStatus::Open, 100),
            quotation(2, 2, QuotationStatus::PoReceived, 900),
            quotation(3, 1, QuotationStatus::Lost, 200),
        ];

        let summaries = summarize_by_customer(&quotations);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].customer_id, CustomerId(2));
        assert_eq!(summaries[1].customer_name, "Customer 1");
        assert_eq!(summaries[1].statuses.total, Tally { count: 2, value: Decimal::new(300, 0) });
        assert_eq!(summaries[1].statuses.tally(&QuotationStatus::Lost).count, 1);
    }

    #[test]
    fn sales_person_summaries_group_unassigned_documents() {
        let mut assigned = quotation(1, 1, QuotationStatus::Open, 100);
        assigned.sales_person = Some(SalesPersonId(3));
        let quotations = vec![assigned, quotation(2, 1, QuotationStatus::Open, 40)];

        let summaries = summarize_by_sales_person(&quotations);

        assert_eq!(summaries[0].sales_person, Some(SalesPersonId(3)));
        assert_eq!(summaries[1].sales_person, None);
        assert_eq!(summaries[1].statuses.total.count, 1);
    }
}
