//! Rupee amounts in words for printed documents, grouped the Indian way
//! (crore, lakh, thousand, hundred).

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Largest integer amount spelled out by the standard print layouts.
pub const DEFAULT_WORDS_CEILING: u64 = 999_999_999;

/// Lower cap used by the air-freight layout (99,99,999).
pub const COMPACT_WORDS_CEILING: u64 = 9_999_999;

pub const TOO_LARGE: &str = "Number too large";

const ONES: [&str; 20] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Eleven",
    "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen", "Nineteen",
];

const TENS: [&str; 10] =
    ["", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety"];

const GROUPS: [(u64, &str); 3] = [(10_000_000, "Crore"), (100_000, "Lakh"), (1_000, "Thousand")];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WordsFormatter {
    ceiling: u64,
}

impl Default for WordsFormatter {
    fn default() -> Self {
        Self { ceiling: DEFAULT_WORDS_CEILING }
    }
}

impl WordsFormatter {
    pub fn with_ceiling(ceiling: u64) -> Self {
        Self { ceiling }
    }

    pub fn ceiling(&self) -> u64 {
        self.ceiling
    }

    /// Only the integer part is spelled out. Zero comes back as the bare word
    /// `Zero`, without the `Rupees ... Only` wrapper.
    pub fn format(&self, amount: Decimal) -> String {
        let whole = amount.trunc();
        let Some(magnitude) = whole.abs().to_u64() else {
            return TOO_LARGE.to_string();
        };
        if magnitude > self.ceiling {
            return TOO_LARGE.to_string();
        }
        if magnitude == 0 {
            return "Zero".to_string();
        }

        let sign = if whole.is_sign_negative() { "Minus " } else { "" };
        format!("Rupees {sign}{} Only", spell(magnitude))
    }
}

pub fn to_indian_words(amount: Decimal) -> String {
    WordsFormatter::default().format(amount)
}

fn spell(mut number: u64) -> String {
    let mut words: Vec<String> = Vec::new();

    for (size, label) in GROUPS {
        let count = number / size;
        number %= size;
        if count == 0 {
            continue;
        }
        // Crore counts above ninety nine are themselves grouped.
        let count_words = if count < 100 { below_hundred(count) } else { spell(count) };
        words.push(format!("{count_words} {label}"));
    }

    let hundreds = number / 100;
    let remainder = number % 100;
    if hundreds > 0 {
        words.push(format!("{} Hundred", ONES[hundreds as usize]));
    }
    if remainder > 0 {
        if !words.is_empty() {
            words.push("and".to_string());
        }
        words.push(below_hundred(remainder));
    }

    words.join(" ")
}

fn below_hundred(number: u64) -> String {
    let number = number as usize;
    if number < 20 {
        return ONES[number].to_string();
    }

    let (tens, ones) = (number / 10, number % 10);
    if ones == 0 {
        TENS[tens].to_string()
    } else {
        format!("{} {}", TENS[tens], ONES[ones])
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{to_indian_words, WordsFormatter, COMPACT_WORDS_CEILING, TOO_LARGE};

    #[test]
    fn zero_is_the_bare_word() {
        assert_eq!(to_indian_words(Decimal::ZERO), "Zero");
        assert_eq!(to_indian_words(Decimal::new(75, 2)), "Zero");
    }

    #[test]
    fn lakh_grouping() {
        let words = to_indian_words(Decimal::new(150_000, 0));
        assert!(words.contains("One Lakh Fifty Thousand"));
        assert_eq!(words, "Rupees One Lakh Fifty Thousand Only");
    }

    #[test]
    fn sub_hundred_remainder_is_joined_with_and() {
        assert_eq!(
            to_indian_words(Decimal::new(123, 0)),
            "Rupees One Hundred and Twenty Three Only"
        );
        assert_eq!(
            to_indian_words(Decimal::new(100_023, 0)),
            "Rupees One Lakh and Twenty Three Only"
        );
        assert_eq!(to_indian_words(Decimal::new(45, 0)), "Rupees Forty Five Only");
        assert_eq!(to_indian_words(Decimal::new(1_000, 0)), "Rupees One Thousand Only");
    }

    #[test]
    fn only_the_integer_part_is_spelled() {
        assert_eq!(
            to_indian_words(Decimal::new(1_826_650, 2)),
            "Rupees Eighteen Thousand Two Hundred and Sixty Six Only"
        );
    }

    #[test]
    fn full_range_up_to_the_ceiling() {
        assert_eq!(
            to_indian_words(Decimal::new(999_999_999, 0)),
            "Rupees Ninety Nine Crore Ninety Nine Lakh Ninety Nine Thousand Nine Hundred and \
             Ninety Nine Only"
        );
        assert_eq!(to_indian_words(Decimal::new(12_00_00_000, 0)), "Rupees Twelve Crore Only");
    }

    #[test]
    fn amounts_above_the_ceiling_return_the_sentinel() {
        assert_eq!(to_indian_words(Decimal::new(1_234_567_890, 0)), TOO_LARGE);
        assert_eq!(to_indian_words(Decimal::new(1_000_000_000, 0)), TOO_LARGE);
        assert_eq!(to_indian_words(Decimal::MAX), TOO_LARGE);
    }

    #[test]
    fn compact_ceiling_is_per_caller() {
        let compact = WordsFormatter::with_ceiling(COMPACT_WORDS_CEILING);

        assert_eq!(compact.format(Decimal::new(10_000_000, 0)), TOO_LARGE);
        assert_eq!(
            compact.format(Decimal::new(9_999_999, 0)),
            "Rupees Ninety Nine Lakh Ninety Nine Thousand Nine Hundred and Ninety Nine Only"
        );
    }

    #[test]
    fn custom_ceiling_above_the_crore_range_groups_the_crore_count() {
        let wide = WordsFormatter::with_ceiling(u64::MAX);

        assert_eq!(wide.format(Decimal::new(10_000_000_000, 0)), "Rupees One Thousand Crore Only");
        assert_eq!(
            wide.format(Decimal::new(1_234_500_000_000, 0)),
            "Rupees One Lakh Twenty Three Thousand Four Hundred and Fifty Crore Only"
        );
        assert_eq!(wide.format(Decimal::from(u64::MAX) + Decimal::ONE), TOO_LARGE);
        assert!(wide
            .format(Decimal::from(u64::MAX))
            .ends_with("Crore Ninety Five Lakh Fifty One Thousand Six Hundred and Fifteen Only"));
    }

    #[test]
    fn negative_amounts_are_marked_minus() {
        assert_eq!(to_indian_words(Decimal::new(-60, 0)), "Rupees Minus Sixty Only");
    }
}
