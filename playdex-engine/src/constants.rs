//! Centralized defaults for the play statistics engine.
//!
//! Milestone thresholds live here so the named defaults stay in one place;
//! callers override them through [`crate::config::StatsConfig`].

// Input format -------------------------------------------------------------
pub const PLAY_DATE_FORMAT: &str = "%Y-%m-%d";
/// Largest quantity a single decoded record may expand into.
pub const MAX_PLAY_QUANTITY: i64 = 1_000_000;

// Milestones ---------------------------------------------------------------
pub const DIME_LABEL: &str = "dimes";
pub const DIME_THRESHOLD: u32 = 10;
pub const FIVE_LABEL: &str = "fives";
pub const FIVE_THRESHOLD: u32 = 5;

// Logging targets ----------------------------------------------------------
pub(crate) const LOG_TARGET_INGEST: &str = "playdex::ingest";
pub(crate) const LOG_TARGET_TIMELINE: &str = "playdex::timeline";
