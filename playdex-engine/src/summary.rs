//! Ranked views and summary blocks over a [`CountPerGame`] snapshot.
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::aggregate::CountPerGame;
use crate::config::StatsConfig;
use crate::index::{count_at_or_above, distinct_game_count, h_index, total_plays};

/// One row of a ranked list. `rank` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub rank: usize,
    pub count: u32,
    pub name: String,
}

/// Number of games at or above a named threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneCount {
    pub label: String,
    pub threshold: u32,
    pub games: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryBlock {
    pub h_index: u32,
    pub total_plays: u64,
    pub distinct_games: usize,
    pub milestones: Vec<MilestoneCount>,
    pub top_games: Vec<RankedEntry>,
}

impl SummaryBlock {
    #[must_use]
    pub fn milestone(&self, label: &str) -> Option<&MilestoneCount> {
        self.milestones.iter().find(|m| m.label == label)
    }
}

fn by_count_then_name(a: &(&String, &u32), b: &(&String, &u32)) -> Ordering {
    b.1.cmp(a.1).then_with(|| a.0.cmp(b.0))
}

fn full_ranking(counts: &CountPerGame) -> Vec<RankedEntry> {
    let mut entries: Vec<(&String, &u32)> = counts.iter().collect();
    entries.sort_by(by_count_then_name);
    entries
        .into_iter()
        .enumerate()
        .map(|(position, (name, count))| RankedEntry {
            rank: position + 1,
            count: *count,
            name: name.clone(),
        })
        .collect()
}

/// Games ordered by count descending, ties by name ascending.
///
/// `limit == 0` returns every entry.
#[must_use]
pub fn ranked_list(counts: &CountPerGame, limit: usize) -> Vec<RankedEntry> {
    let mut ranking = full_ranking(counts);
    if limit > 0 {
        ranking.truncate(limit);
    }
    ranking
}

/// The full ranking restricted to names containing `name_part`, ignoring case.
/// Entries keep their rank in the unfiltered list.
#[must_use]
pub fn filtered_ranked_list(counts: &CountPerGame, name_part: &str) -> Vec<RankedEntry> {
    let needle = name_part.to_lowercase();
    full_ranking(counts)
        .into_iter()
        .filter(|entry| entry.name.to_lowercase().contains(&needle))
        .collect()
}

/// H-index, milestone counts and the top of the ranking.
///
/// The ranked list is sized by the ranking milestone's game count; a count of
/// zero lists every game, as `ranked_list` does for a zero limit.
#[must_use]
pub fn summary_block(counts: &CountPerGame, config: &StatsConfig) -> SummaryBlock {
    let milestones: Vec<MilestoneCount> = config
        .milestones
        .iter()
        .map(|milestone| MilestoneCount {
            label: milestone.label.clone(),
            threshold: milestone.threshold,
            games: count_at_or_above(counts, milestone.threshold),
        })
        .collect();
    let top_n = config
        .ranking()
        .map_or(0, |ranking| count_at_or_above(counts, ranking.threshold));
    SummaryBlock {
        h_index: h_index(counts),
        total_plays: total_plays(counts),
        distinct_games: distinct_game_count(counts),
        milestones,
        top_games: ranked_list(counts, top_n),
    }
}
