use std::fmt;

use chrono::NaiveDate;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::customer::{CustomerRef, SalesPersonId};
use crate::domain::product::{PriceSource, Product, ProductId};
use crate::errors::DomainError;
use crate::pricing::aggregate::{aggregate_totals, QuotationTotals};
use crate::pricing::book::{resolve_price, ResolvedPrice};
use crate::pricing::catalog::Catalog;
use crate::pricing::line::{price_line, LinePricing};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuotationId(pub u64);

impl fmt::Display for QuotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Id for a document saved for the first time: one past the highest id in use.
pub fn next_quotation_id<'a>(existing: impl IntoIterator<Item = &'a Quotation>) -> QuotationId {
    let max = existing.into_iter().map(|quotation| quotation.id.0).max().unwrap_or(0);
    QuotationId(max + 1)
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuotationStatus {
    Open,
    PoReceived,
    PartialPoReceived,
    Expired,
    Lost,
    Unrecognized(String),
}

impl QuotationStatus {
    pub const KNOWN: [QuotationStatus; 5] = [
        QuotationStatus::Open,
        QuotationStatus::PoReceived,
        QuotationStatus::PartialPoReceived,
        QuotationStatus::Expired,
        QuotationStatus::Lost,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Open => "Open",
            Self::PoReceived => "PO Received",
            Self::PartialPoReceived => "Partial PO Received",
            Self::Expired => "Expired",
            Self::Lost => "Lost",
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<&str> for QuotationStatus {
    fn from(value: &str) -> Self {
        match value.trim() {
            "Open" => Self::Open,
            "PO Received" => Self::PoReceived,
            "Partial PO Received" => Self::PartialPoReceived,
            "Expired" => Self::Expired,
            "Lost" => Self::Lost,
            other => Self::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for QuotationStatus {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<QuotationStatus> for String {
    fn from(value: QuotationStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for QuotationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discount percentage after the form boundary.
///
/// The authoring form keeps discounts as free text. Anything that does not
/// start with a number, and any negative value, is read as zero. Values above
/// 100 are kept as typed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct DiscountPercent(Decimal);

impl DiscountPercent {
    pub const ZERO: DiscountPercent = DiscountPercent(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Self(value.max(Decimal::ZERO))
    }

    pub fn parse_lenient(raw: &str) -> Self {
        let trimmed = raw.trim_start();
        let mut end = 0;
        let mut seen_digit = false;
        let mut seen_dot = false;

        for (offset, ch) in trimmed.char_indices() {
            let accepted = match ch {
                '+' | '-' => offset == 0,
                '.' if !seen_dot => {
                    seen_dot = true;
                    true
                }
                '0'..='9' => {
                    seen_digit = true;
                    true
                }
                _ => false,
            };
            if !accepted {
                break;
            }
            end = offset + ch.len_utf8();
        }

        if !seen_digit {
            return Self::ZERO;
        }

        let numeric = trimmed[..end].trim_end_matches('.');
        numeric.parse::<Decimal>().map(Self::new).unwrap_or(Self::ZERO)
    }

    pub fn value(self) -> Decimal {
        self.0
    }
}

impl From<Decimal> for DiscountPercent {
    fn from(value: Decimal) -> Self {
        Self::new(value)
    }
}

impl Serialize for DiscountPercent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Serialize::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for DiscountPercent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DiscountVisitor)
    }
}

struct DiscountVisitor;

impl<'de> Visitor<'de> for DiscountVisitor {
    type Value = DiscountPercent;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a discount percentage as a number or text")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(DiscountPercent::parse_lenient(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(DiscountPercent::new(Decimal::from(value)))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(DiscountPercent::new(Decimal::from(value)))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        Ok(Decimal::from_f64(value).map(DiscountPercent::new).unwrap_or(DiscountPercent::ZERO))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(DiscountPercent::ZERO)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(DiscountPercent::ZERO)
    }
}

fn default_price_source() -> PriceSource {
    PriceSource::List
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuotationLine {
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub description: String,
    /// MOQ: the quantity priced and dispatched.
    #[serde(default)]
    pub quantity_ordered: u32,
    /// REQ: what the customer originally asked for.
    #[serde(default)]
    pub quantity_requested: u32,
    #[serde(default)]
    pub unit_price: Decimal,
    #[serde(default = "default_price_source")]
    pub price_source: PriceSource,
    #[serde(default)]
    pub discount_percent: DiscountPercent,
    #[serde(default)]
    pub stock_status: String,
    #[serde(default)]
    pub freight_eligible: bool,
    #[serde(default)]
    pub freight_weight_per_unit: Decimal,
    #[serde(default)]
    pub freight_lead_time: String,
}

impl Default for QuotationLine {
    fn default() -> Self {
        Self {
            product_id: None,
            description: String::new(),
            quantity_ordered: 0,
            quantity_requested: 0,
            unit_price: Decimal::ZERO,
            price_source: PriceSource::List,
            discount_percent: DiscountPercent::ZERO,
            stock_status: String::new(),
            freight_eligible: false,
            freight_weight_per_unit: Decimal::ZERO,
            freight_lead_time: String::new(),
        }
    }
}

impl QuotationLine {
    pub fn pricing(&self) -> LinePricing {
        price_line(
            self.unit_price,
            self.discount_percent,
            self.quantity_ordered,
            self.freight_eligible,
            self.freight_weight_per_unit,
        )
    }

    /// Points the line at `product` and prices it as of `on_date`.
    pub fn apply_product(&mut self, product: &Product, on_date: NaiveDate) -> ResolvedPrice {
        self.product_id = Some(product.id.clone());
        self.description = product.description.clone();
        self.freight_weight_per_unit = product.weight_grams_per_unit;
        self.apply_price(resolve_price(&product.bands, on_date))
    }

    fn apply_price(&mut self, resolved: ResolvedPrice) -> ResolvedPrice {
        self.unit_price = resolved.unit_price;
        self.price_source = resolved.source;
        resolved
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotationTerms {
    #[serde(default)]
    pub price_basis: String,
    #[serde(default)]
    pub delivery: String,
    #[serde(default)]
    pub payment: String,
    #[serde(default)]
    pub validity: String,
    #[serde(default)]
    pub freight: String,
}

/// Line that could not be priced from the catalog and went to zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MissingPrice {
    pub serial_no: usize,
    pub product_id: ProductId,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quotation {
    pub id: QuotationId,
    pub document_date: NaiveDate,
    pub enquiry_date: NaiveDate,
    pub customer: CustomerRef,
    #[serde(default)]
    pub contact_person: String,
    #[serde(default)]
    pub contact_number: String,
    #[serde(default)]
    pub sales_person: Option<SalesPersonId>,
    #[serde(default)]
    pub terms: QuotationTerms,
    pub status: QuotationStatus,
    #[serde(default)]
    pub comments: String,
    pub lines: Vec<QuotationLine>,
}

impl Quotation {
    pub fn new(id: QuotationId, document_date: NaiveDate, customer: CustomerRef) -> Self {
        Self {
            id,
            document_date,
            enquiry_date: document_date,
            customer,
            contact_person: String::new(),
            contact_number: String::new(),
            sales_person: None,
            terms: QuotationTerms::default(),
            status: QuotationStatus::Open,
            comments: String::new(),
            lines: vec![QuotationLine::default()],
        }
    }

    pub fn add_line(&mut self, line: QuotationLine) {
        self.lines.push(line);
    }

    /// Removes a row. The last remaining row is blanked instead so the
    /// document always keeps one line.
    pub fn remove_line(&mut self, index: usize) -> Result<QuotationLine, DomainError> {
        let len = self.lines.len();
        if index >= len {
            return Err(DomainError::LineIndexOutOfRange { index, len });
        }
        if len == 1 {
            return Ok(std::mem::take(&mut self.lines[0]));
        }
        Ok(self.lines.remove(index))
    }

    pub fn line_mut(&mut self, index: usize) -> Result<&mut QuotationLine, DomainError> {
        let len = self.lines.len();
        self.lines.get_mut(index).ok_or(DomainError::LineIndexOutOfRange { index, len })
    }

    /// Lines with their 1-based serial numbers as printed.
    pub fn numbered_lines(&self) -> impl Iterator<Item = (usize, &QuotationLine)> {
        self.lines.iter().enumerate().map(|(index, line)| (index + 1, line))
    }

    pub fn totals(&self) -> QuotationTotals {
        aggregate_totals(&self.lines)
    }

    pub fn ensure_lines(&mut self) {
        if self.lines.is_empty() {
            self.lines.push(QuotationLine::default());
        }
    }

    pub fn set_line_product(
        &mut self,
        index: usize,
        product: &Product,
    ) -> Result<ResolvedPrice, DomainError> {
        let on_date = self.document_date;
        Ok(self.line_mut(index)?.apply_product(product, on_date))
    }

    /// Moves the document date and re-resolves every catalog-linked line.
    pub fn set_document_date(&mut self, date: NaiveDate, catalog: &Catalog) -> Vec<MissingPrice> {
        self.document_date = date;
        self.reprice_from_catalog(catalog)
    }

    pub fn reprice_from_catalog(&mut self, catalog: &Catalog) -> Vec<MissingPrice> {
        let on_date = self.document_date;
        let mut missing = Vec::new();

        for (index, line) in self.lines.iter_mut().enumerate() {
            let Some(product_id) = line.product_id.clone() else {
                continue;
            };
            let Some(product) = catalog.find(&product_id) else {
                continue;
            };
            let resolved = line.apply_price(resolve_price(&product.bands, on_date));
            if resolved.is_missing() {
                missing.push(MissingPrice { serial_no: index + 1, product_id });
            }
        }

        missing
    }
}
