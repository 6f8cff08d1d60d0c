use chrono::NaiveDate;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("two price bands start on {valid_from}")]
    DuplicateBandStart { valid_from: NaiveDate },
    #[error("line index {index} is out of range for a quotation with {len} lines")]
    LineIndexOutOfRange { index: usize, len: usize },
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}
