//! Playdex Engine
//!
//! Aggregation and temporal index engine for personal board-game play logs.
//! Turns decoded `(date, game, quantity)` tuples into per-game play counts,
//! daily series of total plays, distinct games and H-index, and ranked
//! summaries. This crate performs no I/O; decoders plug in through
//! [`PlaySource`].

pub mod aggregate;
pub mod config;
pub mod constants;
pub mod error;
pub mod index;
pub mod record;
pub mod summary;
pub mod timeline;

// Re-export commonly used types
pub use aggregate::{CountPerGame, count_all, count_as_of};
pub use config::{ConfigError, Milestone, StatsConfig};
pub use error::{EngineError, MalformedReason};
pub use index::{count_at_or_above, distinct_game_count, games_at_or_above, h_index, total_plays};
pub use record::{IngestReport, PlayEvent, PlayRecordStore, RawPlayRecord, RawQuantity};
pub use summary::{
    MilestoneCount, RankedEntry, SummaryBlock, filtered_ranked_list, ranked_list, summary_block,
};
pub use timeline::{
    RecordEvent, SeriesStrategy, TimeSeriesPoint, Timeline, build_timeline,
    build_timeline_until_today,
};

use chrono::NaiveDate;

/// Trait for abstracting the decoding collaborator.
/// Implementations read play pages from wherever they live and hand back
/// decoded tuples.
pub trait PlaySource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load every decoded play record in source order.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying pages cannot be read or decoded.
    fn load_records(&self) -> Result<Vec<RawPlayRecord>, Self::Error>;
}

/// Play history plus configuration, answering every statistics query.
#[derive(Debug, Clone, Default)]
pub struct PlayStats {
    store: PlayRecordStore,
    config: StatsConfig,
}

impl PlayStats {
    #[must_use]
    pub fn new(config: StatsConfig) -> Self {
        Self {
            store: PlayRecordStore::new(),
            config,
        }
    }

    /// Build statistics from everything a source provides.
    ///
    /// Malformed records are skipped and listed in the returned report.
    ///
    /// # Errors
    ///
    /// Returns the source's error if loading fails.
    pub fn from_source<S: PlaySource>(
        source: &S,
        config: StatsConfig,
    ) -> Result<(Self, IngestReport), S::Error> {
        let records = source.load_records()?;
        let mut stats = Self::new(config);
        let report = stats.ingest(records);
        Ok((stats, report))
    }

    pub fn ingest<I>(&mut self, records: I) -> IngestReport
    where
        I: IntoIterator<Item = RawPlayRecord>,
    {
        self.store.ingest(records)
    }

    #[must_use]
    pub const fn store(&self) -> &PlayRecordStore {
        &self.store
    }

    #[must_use]
    pub const fn config(&self) -> &StatsConfig {
        &self.config
    }

    #[must_use]
    pub fn counts(&self) -> CountPerGame {
        count_all(self.store.all_events())
    }

    #[must_use]
    pub fn counts_as_of(&self, cutoff: NaiveDate) -> CountPerGame {
        count_as_of(self.store.all_events(), cutoff)
    }

    #[must_use]
    pub fn summary(&self) -> SummaryBlock {
        summary_block(&self.counts(), &self.config)
    }

    #[must_use]
    pub fn summary_as_of(&self, cutoff: NaiveDate) -> SummaryBlock {
        summary_block(&self.counts_as_of(cutoff), &self.config)
    }

    #[must_use]
    pub fn ranked(&self, limit: usize) -> Vec<RankedEntry> {
        ranked_list(&self.counts(), limit)
    }

    #[must_use]
    pub fn ranked_matching(&self, name_part: &str) -> Vec<RankedEntry> {
        filtered_ranked_list(&self.counts(), name_part)
    }

    /// Daily series through `end_date` using the configured strategy.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyHistory`] when nothing has been ingested and
    /// [`EngineError::StartAfterEnd`] when every play is after `end_date`.
    pub fn timeline(&self, end_date: NaiveDate) -> Result<Timeline, EngineError> {
        build_timeline(
            self.store.all_events(),
            end_date,
            self.config.series_strategy,
        )
    }

    /// Daily series through the local calendar date.
    ///
    /// # Errors
    ///
    /// See [`PlayStats::timeline`].
    pub fn timeline_until_today(&self) -> Result<Timeline, EngineError> {
        build_timeline_until_today(self.store.all_events(), self.config.series_strategy)
    }
}
