use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::quote::{DiscountPercent, Quotation, QuotationId};
use crate::errors::DomainError;
use crate::pricing::aggregate::QuotationTotals;
use crate::pricing::line::LinePricing;
use crate::pricing::words::{WordsFormatter, COMPACT_WORDS_CEILING, DEFAULT_WORDS_CEILING};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrintLayout {
    #[default]
    Standard,
    Discounted,
    WithAirfreight,
}

impl PrintLayout {
    pub fn words_ceiling(self) -> u64 {
        match self {
            Self::Standard | Self::Discounted => DEFAULT_WORDS_CEILING,
            Self::WithAirfreight => COMPACT_WORDS_CEILING,
        }
    }

    pub fn shows_discount(self) -> bool {
        matches!(self, Self::Discounted)
    }

    pub fn shows_freight(self) -> bool {
        matches!(self, Self::WithAirfreight)
    }
}

impl FromStr for PrintLayout {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "standard" => Ok(Self::Standard),
            "discounted" => Ok(Self::Discounted),
            "with_airfreight" | "airfreight" => Ok(Self::WithAirfreight),
            other => Err(DomainError::InvariantViolation(format!(
                "unsupported print layout `{other}` (expected standard|discounted|with-airfreight)"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintRow {
    pub serial_no: usize,
    pub description: String,
    pub quantity_ordered: u32,
    pub quantity_requested: u32,
    pub unit_price: Decimal,
    pub discount_percent: DiscountPercent,
    pub stock_status: String,
    pub freight_lead_time: String,
    pub pricing: LinePricing,
}

/// Read-only figures a print or export template embeds for one document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintSummary {
    pub quotation_id: QuotationId,
    pub layout: PrintLayout,
    pub rows: Vec<PrintRow>,
    pub totals: QuotationTotals,
    pub printed_total: Decimal,
    pub amount_in_words: String,
}

impl PrintSummary {
    pub fn build(quotation: &Quotation, layout: PrintLayout) -> Self {
        let rows: Vec<PrintRow> = quotation
            .numbered_lines()
            .map(|(serial_no, line)| PrintRow {
                serial_no,
                description: line.description.clone(),
                quantity_ordered: line.quantity_ordered,
                quantity_requested: line.quantity_requested,
                unit_price: line.unit_price,
                discount_percent: line.discount_percent,
                stock_status: line.stock_status.clone(),
                freight_lead_time: line.freight_lead_time.clone(),
                pricing: line.pricing(),
            })
            .collect();

        let totals = quotation.totals();
        let printed_total =
            if layout.shows_freight() { totals.grand_total() } else { totals.total_amount };
        let amount_in_words =
            WordsFormatter::with_ceiling(layout.words_ceiling()).format(printed_total);

        Self { quotation_id: quotation.id, layout, rows, totals, printed_total, amount_in_words }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::{PrintLayout, PrintSummary};
    use crate::domain::customer::{CustomerId, CustomerRef};
    use crate::domain::quote::{DiscountPercent, Quotation, QuotationId, QuotationLine};
    use crate::pricing::words::TOO_LARGE;

    fn quotation() -> Quotation {
        let mut quotation = Quotation::new(
            QuotationId(42),
            NaiveDate::from_ymd_opt(2025, 2, 10).expect("valid date"),
            CustomerRef { id: CustomerId(3), name: "Deccan Power Systems".to_string() },
        );
        quotation.lines = vec![
            QuotationLine {
                description: "Armoured cable 4C x 16".to_string(),
                unit_price: Decimal::new(1000, 0),
                discount_percent: DiscountPercent::parse_lenient("10"),
                quantity_ordered: 100,
                freight_eligible: true,
                freight_weight_per_unit: Decimal::new(400, 0),
                ..Default::default()
            },
            QuotationLine {
                description: "Cable gland 20mm".to_string(),
                unit_price: Decimal::new(50, 0),
                quantity_ordered: 20,
                ..Default::default()
            },
        ];
        quotation
    }

    #[test]
    fn standard_layout_prints_amount_without_freight() {
        let summary = PrintSummary::build(&quotation(), PrintLayout::Standard);

        assert_eq!(summary.rows.len(), 2);
        assert_eq!(summary.rows[1].serial_no, 2);
        assert_eq!(summary.printed_total, Decimal::new(91_000, 0));
        assert_eq!(summary.amount_in_words, "Rupees Ninety One Thousand Only");
    }

    #[test]
    fn airfreight_layout_adds_freight_to_printed_total() {
        let summary = PrintSummary::build(&quotation(), PrintLayout::WithAirfreight);

        assert_eq!(summary.totals.total_freight, Decimal::new(6_000, 0));
        assert_eq!(summary.printed_total, Decimal::new(97_000, 0));
        assert_eq!(summary.rows[0].pricing.freight_per_unit, Decimal::new(60, 0));
    }

    #[test]
    fn airfreight_layout_uses_the_lower_words_ceiling() {
        let mut quotation = quotation();
        quotation.lines[1].quantity_ordered = 300_000;

        let standard = PrintSummary::build(&quotation, PrintLayout::Standard);
        let airfreight = PrintSummary::build(&quotation, PrintLayout::WithAirfreight);

        assert_eq!(standard.amount_in_words, "Rupees One Crore Fifty Lakh Ninety Thousand Only");
        assert_eq!(airfreight.amount_in_words, TOO_LARGE);
    }

    #[test]
    fn layout_names_parse() {
        assert_eq!("with-airfreight".parse::<PrintLayout>(), Ok(PrintLayout::WithAirfreight));
        assert_eq!("Discounted".parse::<PrintLayout>(), Ok(PrintLayout::Discounted));
        assert!("landscape".parse::<PrintLayout>().is_err());
    }
}
