//! Engine configuration: milestone thresholds and series strategy.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::constants::{DIME_LABEL, DIME_THRESHOLD, FIVE_LABEL, FIVE_THRESHOLD};
use crate::timeline::SeriesStrategy;

/// A named "played at least N times" threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub label: String,
    pub threshold: u32,
}

impl Milestone {
    #[must_use]
    pub fn new(label: impl Into<String>, threshold: u32) -> Self {
        Self {
            label: label.into(),
            threshold,
        }
    }
}

/// Errors raised when configuration invariants are violated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("at least one milestone is required")]
    NoMilestones,
    #[error("milestone labels must not be empty")]
    EmptyLabel,
    #[error("milestone {label:?} has a zero threshold")]
    ZeroThreshold { label: String },
    #[error("milestone {label:?} is defined more than once")]
    DuplicateLabel { label: String },
    #[error("ranking milestone {label:?} does not name a configured milestone")]
    UnknownRankingMilestone { label: String },
    #[error("failed to parse configuration: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsConfig {
    #[serde(default = "StatsConfig::default_milestones")]
    pub milestones: Vec<Milestone>,
    /// Milestone whose game count sizes the ranked list of a summary block.
    #[serde(default = "StatsConfig::default_ranking_milestone")]
    pub ranking_milestone: String,
    #[serde(default)]
    pub series_strategy: SeriesStrategy,
}

impl StatsConfig {
    fn default_milestones() -> Vec<Milestone> {
        vec![
            Milestone::new(DIME_LABEL, DIME_THRESHOLD),
            Milestone::new(FIVE_LABEL, FIVE_THRESHOLD),
        ]
    }

    fn default_ranking_milestone() -> String {
        DIME_LABEL.to_string()
    }

    /// Parse and validate a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for invalid JSON and any validation
    /// error from [`StatsConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check milestone invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.milestones.is_empty() {
            return Err(ConfigError::NoMilestones);
        }
        let mut seen = HashSet::new();
        for milestone in &self.milestones {
            if milestone.label.trim().is_empty() {
                return Err(ConfigError::EmptyLabel);
            }
            if milestone.threshold == 0 {
                return Err(ConfigError::ZeroThreshold {
                    label: milestone.label.clone(),
                });
            }
            if !seen.insert(milestone.label.as_str()) {
                return Err(ConfigError::DuplicateLabel {
                    label: milestone.label.clone(),
                });
            }
        }
        if self.ranking().is_none() {
            return Err(ConfigError::UnknownRankingMilestone {
                label: self.ranking_milestone.clone(),
            });
        }
        Ok(())
    }

    /// The milestone named by `ranking_milestone`.
    #[must_use]
    pub fn ranking(&self) -> Option<&Milestone> {
        self.milestones
            .iter()
            .find(|milestone| milestone.label == self.ranking_milestone)
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            milestones: Self::default_milestones(),
            ranking_milestone: Self::default_ranking_milestone(),
            series_strategy: SeriesStrategy::default(),
        }
    }
}
