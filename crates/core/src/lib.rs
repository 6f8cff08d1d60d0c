pub mod config;
pub mod domain;
pub mod errors;
pub mod pricing;
pub mod stock;

pub use domain::challan::{ChallanId, ChallanLine, DeliveryChallan};
pub use domain::customer::{Customer, CustomerId, CustomerRef, SalesPerson, SalesPersonId};
pub use domain::product::{restamp_bands, PriceBand, PriceSource, Product, ProductId};
pub use domain::quote::{
    next_quotation_id, DiscountPercent, MissingPrice, Quotation, QuotationId, QuotationLine,
    QuotationStatus, QuotationTerms,
};
pub use domain::stock::{PendingOrderLine, StockLine};
pub use errors::DomainError;
pub use pricing::{
    aggregate_by_status, aggregate_totals, price_line, resolve_price, to_indian_words, Catalog,
    PrintLayout, PrintSummary, QuotationTotals, StatusSummary,
};
