//! Effective-dated price lookup for catalog items.
//!
//! Band data entered by hand is not guaranteed to be contiguous, so lookup
//! falls back in a fixed order: a band covering the date, then the latest
//! band that already started, then the earliest band overall.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::{PriceBand, PriceSource};

pub fn resolve_band(bands: &[PriceBand], on_date: NaiveDate) -> Option<&PriceBand> {
    if let Some(covering) = bands.iter().find(|band| band.contains(on_date)) {
        return Some(covering);
    }

    // max_by_key keeps the last maximum; iterate in reverse so ties go to input order.
    let latest_started = bands
        .iter()
        .rev()
        .filter(|band| band.valid_from <= on_date)
        .max_by_key(|band| band.valid_from);
    if latest_started.is_some() {
        return latest_started;
    }

    bands.iter().min_by_key(|band| band.valid_from)
}

/// Date-time variant; only the calendar date takes part in the lookup.
pub fn resolve_band_at(bands: &[PriceBand], at: NaiveDateTime) -> Option<&PriceBand> {
    resolve_band(bands, at.date())
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPrice {
    pub unit_price: Decimal,
    pub source: PriceSource,
    pub band: Option<PriceBand>,
}

impl ResolvedPrice {
    pub fn missing() -> Self {
        Self { unit_price: Decimal::ZERO, source: PriceSource::List, band: None }
    }

    /// No band applied. Callers should warn before a zero-priced line is saved.
    pub fn is_missing(&self) -> bool {
        self.band.is_none()
    }
}

pub fn resolve_price(bands: &[PriceBand], on_date: NaiveDate) -> ResolvedPrice {
    match resolve_band(bands, on_date) {
        Some(band) => {
            let (unit_price, source) = band.effective_price();
            ResolvedPrice { unit_price, source, band: Some(band.clone()) }
        }
        None => ResolvedPrice::missing(),
    }
}
