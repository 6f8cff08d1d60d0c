use std::str::FromStr;

use quotedesk_core::pricing::WordsFormatter;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::commands::{CommandResult, EXIT_INPUT};

#[derive(Serialize)]
struct WordsReport {
    amount: Decimal,
    ceiling: u64,
    words: String,
}

pub fn run(amount: &str, ceiling: Option<u64>) -> CommandResult {
    let amount = match Decimal::from_str(amount.trim()) {
        Ok(amount) => amount,
        Err(error) => {
            return CommandResult::failure(
                "words",
                "invalid_input",
                format!("`{amount}` is not a number: {error}"),
                EXIT_INPUT,
            )
        }
    };

    let formatter = ceiling.map(WordsFormatter::with_ceiling).unwrap_or_default();
    let words = formatter.format(amount);
    let report = WordsReport { amount, ceiling: formatter.ceiling(), words: words.clone() };
    CommandResult::report("words", words, &report)
}
