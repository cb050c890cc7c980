//! Error taxonomy for ingestion and temporal queries.
use chrono::NaiveDate;
use thiserror::Error;

/// Why a decoded play tuple was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedReason {
    #[error("date {0:?} is not a valid YYYY-MM-DD calendar date")]
    UnparseableDate(String),
    #[error("quantity {0} is negative")]
    NegativeQuantity(i64),
    #[error("quantity {0} is not an integer")]
    NonIntegerQuantity(String),
    #[error("quantity {0} exceeds the per-record limit")]
    QuantityTooLarge(i64),
    #[error("game name is empty")]
    EmptyGameName,
}

/// Errors raised by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("malformed play record #{index}: {reason}")]
    MalformedRecord {
        index: usize,
        reason: MalformedReason,
    },
    #[error("no plays recorded; the history has no start date")]
    EmptyHistory,
    #[error("earliest play {start} is after the end date {end}")]
    StartAfterEnd { start: NaiveDate, end: NaiveDate },
}
