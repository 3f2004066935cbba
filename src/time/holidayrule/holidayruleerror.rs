use chrono::NaiveDate;
use thiserror::Error;

/// Failure to turn a holiday spec into a concrete date.
#[derive(Debug, Error)]
pub enum HolidayRuleError {
    #[error("holiday '{name}': rule kind '{kind}' is not implemented")]
    UnsupportedRuleKind {
        name: String,
        kind: String
    },

    #[error("holiday '{name}': cannot parse rule text '{text}'")]
    UnparsableRuleText {
        name: String,
        text: String
    },

    #[error("holiday '{name}': rule '{text}' names no date in {year}")]
    NoSuchDate {
        name: String,
        text: String,
        year: i32
    },

    #[error("no date {n} workdays away from {horizon} within the supported date range")]
    DateOutOfRange {
        horizon: NaiveDate,
        n: i32
    },

    #[error("holiday spec does not decode: {0}")]
    InvalidSpec(#[from] serde_json::Error)
}
