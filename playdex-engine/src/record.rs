//! Play record store: expands decoded tuples into individual play events.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{LOG_TARGET_INGEST, MAX_PLAY_QUANTITY, PLAY_DATE_FORMAT};
use crate::error::{EngineError, MalformedReason};

/// Quantity field as decoded, before it is checked to be a count.
///
/// Markup decoders hand over attribute text, so integer strings are
/// accepted; any other value is kept so the record can be rejected on its
/// own instead of failing the whole page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawQuantity {
    Count(i64),
    Text(String),
    Other(serde_json::Value),
}

impl RawQuantity {
    fn as_integer(&self) -> Result<i64, MalformedReason> {
        match self {
            Self::Count(value) => Ok(*value),
            Self::Text(text) => text
                .trim()
                .parse::<i64>()
                .map_err(|_| MalformedReason::NonIntegerQuantity(text.clone())),
            Self::Other(value) => Err(MalformedReason::NonIntegerQuantity(value.to_string())),
        }
    }
}

/// A decoded `(date, name, quantity)` tuple as handed over by the decoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPlayRecord {
    pub date: String,
    #[serde(rename = "name", alias = "game_name")]
    pub game_name: String,
    #[serde(default = "default_quantity")]
    pub quantity: RawQuantity,
}

fn default_quantity() -> RawQuantity {
    RawQuantity::Count(1)
}

impl RawPlayRecord {
    #[must_use]
    pub fn new(date: impl Into<String>, game_name: impl Into<String>, quantity: i64) -> Self {
        Self {
            date: date.into(),
            game_name: game_name.into(),
            quantity: RawQuantity::Count(quantity),
        }
    }

    fn parse(&self) -> Result<(NaiveDate, usize), MalformedReason> {
        let date = NaiveDate::parse_from_str(self.date.trim(), PLAY_DATE_FORMAT)
            .map_err(|_| MalformedReason::UnparseableDate(self.date.clone()))?;
        let raw = self.quantity.as_integer()?;
        if raw < 0 {
            return Err(MalformedReason::NegativeQuantity(raw));
        }
        if raw > MAX_PLAY_QUANTITY {
            return Err(MalformedReason::QuantityTooLarge(raw));
        }
        let quantity =
            usize::try_from(raw).map_err(|_| MalformedReason::QuantityTooLarge(raw))?;
        if self.game_name.is_empty() {
            return Err(MalformedReason::EmptyGameName);
        }
        Ok((date, quantity))
    }
}

/// One game session on one day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayEvent {
    pub date: NaiveDate,
    pub game_name: String,
}

/// Outcome of a bulk ingestion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub records_accepted: usize,
    pub events_added: usize,
    pub rejected: Vec<EngineError>,
}

impl IngestReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Append-only, in-memory sequence of play events.
#[derive(Debug, Clone, Default)]
pub struct PlayRecordStore {
    events: Vec<PlayEvent>,
    records_seen: usize,
}

impl PlayRecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate one record and append `quantity` events for it.
    ///
    /// Returns the number of events appended. Nothing is appended when the
    /// record is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MalformedRecord`] when the date does not parse,
    /// the quantity is not an integer in `0..=MAX_PLAY_QUANTITY`, the events
    /// cannot be allocated or the game name is empty.
    pub fn push_record(&mut self, record: &RawPlayRecord) -> Result<usize, EngineError> {
        let index = self.records_seen;
        self.records_seen += 1;
        let (date, quantity) = record
            .parse()
            .map_err(|reason| EngineError::MalformedRecord { index, reason })?;
        self.events
            .try_reserve(quantity)
            .map_err(|_| EngineError::MalformedRecord {
                index,
                reason: MalformedReason::QuantityTooLarge(record_quantity(quantity)),
            })?;
        let event = PlayEvent {
            date,
            game_name: record.game_name.clone(),
        };
        self.events.extend(std::iter::repeat_n(event, quantity));
        Ok(quantity)
    }

    /// Ingest a batch of records, skipping and logging malformed ones.
    pub fn ingest<I>(&mut self, records: I) -> IngestReport
    where
        I: IntoIterator<Item = RawPlayRecord>,
    {
        let mut report = IngestReport::default();
        for record in records {
            match self.push_record(&record) {
                Ok(added) => {
                    report.records_accepted += 1;
                    report.events_added += added;
                }
                Err(err) => {
                    log::warn!(target: LOG_TARGET_INGEST, "skipping record: {err}");
                    report.rejected.push(err);
                }
            }
        }
        log::debug!(
            target: LOG_TARGET_INGEST,
            "ingested {} records ({} events), rejected {}",
            report.records_accepted,
            report.events_added,
            report.rejected.len()
        );
        report
    }

    #[must_use]
    pub fn all_events(&self) -> &[PlayEvent] {
        &self.events
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Date of the earliest recorded play, if any.
    #[must_use]
    pub fn earliest_date(&self) -> Option<NaiveDate> {
        earliest_date(&self.events)
    }
}

fn record_quantity(quantity: usize) -> i64 {
    i64::try_from(quantity).unwrap_or(i64::MAX)
}

pub(crate) fn earliest_date(events: &[PlayEvent]) -> Option<NaiveDate> {
    events.iter().map(|event| event.date).min()
}
