use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

/// Upper bound stamped onto the most recent band of a product.
pub fn open_ended() -> NaiveDate {
    NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceSource {
    List,
    Special,
}

/// One effective-dated price for a catalog item.
///
/// Only one of `list_price` and `special_price` carries a value; the setters
/// zero the other side whenever a positive price is written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBand {
    pub list_price: Decimal,
    pub special_price: Decimal,
    pub valid_from: NaiveDate,
    pub valid_to: NaiveDate,
}

impl PriceBand {
    pub fn list(price: Decimal, valid_from: NaiveDate, valid_to: NaiveDate) -> Self {
        Self { list_price: price, special_price: Decimal::ZERO, valid_from, valid_to }
    }

    pub fn special(price: Decimal, valid_from: NaiveDate, valid_to: NaiveDate) -> Self {
        Self { list_price: Decimal::ZERO, special_price: price, valid_from, valid_to }
    }

    pub fn set_list_price(&mut self, price: Decimal) {
        self.list_price = price.max(Decimal::ZERO);
        if self.list_price > Decimal::ZERO {
            self.special_price = Decimal::ZERO;
        }
    }

    pub fn set_special_price(&mut self, price: Decimal) {
        self.special_price = price.max(Decimal::ZERO);
        if self.special_price > Decimal::ZERO {
            self.list_price = Decimal::ZERO;
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.valid_from <= date && date <= self.valid_to
    }

    /// Price a line inherits from this band, list price first.
    pub fn effective_price(&self) -> (Decimal, PriceSource) {
        if self.list_price > Decimal::ZERO {
            (self.list_price, PriceSource::List)
        } else {
            (self.special_price, PriceSource::Special)
        }
    }
}

/// Sorts bands by start date and re-derives every `valid_to`: each band ends
/// the day before its successor starts and the last one never ends.
pub fn restamp_bands(mut bands: Vec<PriceBand>) -> Result<Vec<PriceBand>, DomainError> {
    bands.sort_by_key(|band| band.valid_from);

    for pair in bands.windows(2) {
        if pair[0].valid_from == pair[1].valid_from {
            return Err(DomainError::DuplicateBandStart { valid_from: pair[1].valid_from });
        }
    }

    let starts: Vec<NaiveDate> = bands.iter().skip(1).map(|band| band.valid_from).collect();
    for (band, next_start) in bands.iter_mut().zip(starts) {
        band.valid_to = next_start.checked_sub_days(Days::new(1)).unwrap_or(next_start);
    }
    if let Some(last) = bands.last_mut() {
        last.valid_to = open_ended();
    }

    Ok(bands)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub item_code: String,
    pub description: String,
    #[serde(default)]
    pub part_no: String,
    #[serde(default)]
    pub material_code: String,
    /// Grams per unit length, used for air-freight surcharges.
    #[serde(default)]
    pub weight_grams_per_unit: Decimal,
    #[serde(default)]
    pub bands: Vec<PriceBand>,
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::{open_ended, restamp_bands, PriceBand, PriceSource};
    use crate::errors::DomainError;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn writing_a_list_price_clears_the_special_price() {
        let mut band = PriceBand::special(Decimal::new(95, 0), date(2025, 1, 1), open_ended());
        band.set_list_price(Decimal::new(110, 0));

        assert_eq!(band.list_price, Decimal::new(110, 0));
        assert_eq!(band.special_price, Decimal::ZERO);
        assert_eq!(band.effective_price(), (Decimal::new(110, 0), PriceSource::List));
    }

    #[test]
    fn writing_zero_keeps_the_other_price() {
        let mut band = PriceBand::list(Decimal::new(110, 0), date(2025, 1, 1), open_ended());
        band.set_special_price(Decimal::ZERO);

        assert_eq!(band.list_price, Decimal::new(110, 0));
    }

    #[test]
    fn band_with_no_prices_resolves_to_zero_special() {
        let band = PriceBand::list(Decimal::ZERO, date(2025, 1, 1), open_ended());
        assert_eq!(band.effective_price(), (Decimal::ZERO, PriceSource::Special));
    }

    #[test]
    fn restamp_sorts_and_chains_valid_to_dates() {
        let bands = vec![
            PriceBand::list(Decimal::new(120, 0), date(2025, 7, 1), date(2025, 7, 1)),
            PriceBand::list(Decimal::new(100, 0), date(2025, 1, 1), date(2025, 1, 1)),
            PriceBand::special(Decimal::new(90, 0), date(2025, 4, 1), date(2025, 4, 1)),
        ];

        let stamped = restamp_bands(bands).expect("distinct start dates");

        assert_eq!(stamped[0].valid_from, date(2025, 1, 1));
        assert_eq!(stamped[0].valid_to, date(2025, 3, 31));
        assert_eq!(stamped[1].valid_to, date(2025, 6, 30));
        assert_eq!(stamped[2].valid_to, open_ended());
    }

    #[test]
    fn restamp_rejects_two_bands_on_the_same_day() {
        let bands = vec![
            PriceBand::list(Decimal::new(120, 0), date(2025, 7, 1), open_ended()),
            PriceBand::list(Decimal::new(100, 0), date(2025, 7, 1), open_ended()),
        ];

        assert_eq!(
            restamp_bands(bands),
            Err(DomainError::DuplicateBandStart { valid_from: date(2025, 7, 1) })
        );
    }

    #[test]
    fn restamp_of_empty_list_is_empty() {
        assert_eq!(restamp_bands(Vec::new()), Ok(Vec::new()));
    }
}
