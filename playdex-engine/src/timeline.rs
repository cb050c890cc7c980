//! Daily time series of play totals, distinct games and H-index.
//!
//! One sample per calendar day from the first recorded play through the end
//! date (inclusive), plus a changelog of the days on which the H-index set a
//! new maximum. Two strategies produce identical output:
//!
//! - [`SeriesStrategy::Recompute`] rebuilds the counts from scratch for every
//!   day, O(days × events).
//! - [`SeriesStrategy::Incremental`] sorts the events once and applies each
//!   day's plays to a running tally.
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::aggregate::{CountPerGame, count_as_of};
use crate::constants::LOG_TARGET_TIMELINE;
use crate::error::EngineError;
use crate::index::{distinct_game_count, games_at_or_above, h_index, total_plays};
use crate::record::{PlayEvent, earliest_date};

/// How the per-day counts are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesStrategy {
    /// Maintain a running tally fed by each day's plays
    #[default]
    Incremental,
    /// Re-aggregate the full history for every day
    Recompute,
}

/// Metrics for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub date: NaiveDate,
    pub total_plays: u64,
    pub distinct_games: usize,
    pub h_index: u32,
}

/// A day on which the H-index exceeded every earlier value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordEvent {
    pub date: NaiveDate,
    pub h_index: u32,
    /// Games with at least `h_index` plays on that day, sorted by name.
    pub games: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    pub points: Vec<TimeSeriesPoint>,
    pub records: Vec<RecordEvent>,
}

impl Timeline {
    #[must_use]
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    #[must_use]
    pub fn latest(&self) -> Option<&TimeSeriesPoint> {
        self.points.last()
    }

    /// Sample for `date`, if it lies inside the series.
    #[must_use]
    pub fn point_on(&self, date: NaiveDate) -> Option<&TimeSeriesPoint> {
        let start = self.start_date()?;
        let offset = usize::try_from((date - start).num_days()).ok()?;
        self.points.get(offset)
    }

    #[must_use]
    pub fn max_h_index(&self) -> u32 {
        self.records.last().map_or(0, |record| record.h_index)
    }
}

/// Build the series from the first play through `end_date`.
///
/// # Errors
///
/// Returns [`EngineError::EmptyHistory`] when `events` is empty and
/// [`EngineError::StartAfterEnd`] when every play lies after `end_date`.
pub fn build_timeline(
    events: &[PlayEvent],
    end_date: NaiveDate,
    strategy: SeriesStrategy,
) -> Result<Timeline, EngineError> {
    let start = earliest_date(events).ok_or(EngineError::EmptyHistory)?;
    if start > end_date {
        return Err(EngineError::StartAfterEnd {
            start,
            end: end_date,
        });
    }
    log::debug!(
        target: LOG_TARGET_TIMELINE,
        "building {strategy:?} timeline {start}..={end_date} over {} events",
        events.len()
    );

    let mut builder = SeriesBuilder::default();
    match strategy {
        SeriesStrategy::Recompute => {
            for day in start.iter_days().take_while(|day| *day <= end_date) {
                builder.sample(day, &count_as_of(events, day));
            }
        }
        SeriesStrategy::Incremental => {
            let mut by_date: Vec<&PlayEvent> = events.iter().collect();
            by_date.sort_by_key(|event| event.date);
            let mut pending = by_date.into_iter().peekable();
            let mut running = CountPerGame::new();
            for day in start.iter_days().take_while(|day| *day <= end_date) {
                while let Some(event) = pending.next_if(|event| event.date <= day) {
                    running.record_play(&event.game_name);
                }
                builder.sample(day, &running);
            }
        }
    }
    Ok(builder.finish())
}

/// Build the series through the local calendar date.
///
/// # Errors
///
/// See [`build_timeline`].
pub fn build_timeline_until_today(
    events: &[PlayEvent],
    strategy: SeriesStrategy,
) -> Result<Timeline, EngineError> {
    build_timeline(events, Local::now().date_naive(), strategy)
}

#[derive(Default)]
struct SeriesBuilder {
    timeline: Timeline,
    max_h: u32,
}

impl SeriesBuilder {
    fn sample(&mut self, date: NaiveDate, counts: &CountPerGame) {
        let h = h_index(counts);
        self.timeline.points.push(TimeSeriesPoint {
            date,
            total_plays: total_plays(counts),
            distinct_games: distinct_game_count(counts),
            h_index: h,
        });
        if h > self.max_h {
            self.max_h = h;
            let games = games_at_or_above(counts, h);
            log::info!(
                target: LOG_TARGET_TIMELINE,
                "{date}: new H-index {h} ({} games)",
                games.len()
            );
            self.timeline.records.push(RecordEvent {
                date,
                h_index: h,
                games,
            });
        }
    }

    fn finish(self) -> Timeline {
        self.timeline
    }
}
