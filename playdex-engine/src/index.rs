//! Scalar metrics derived from a [`CountPerGame`] snapshot.
use crate::aggregate::CountPerGame;

/// Largest `h` such that at least `h` games were each played `h` times or more.
#[must_use]
pub fn h_index(counts: &CountPerGame) -> u32 {
    let mut sorted: Vec<u32> = counts.counts().collect();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    h_index_of_sorted(&sorted)
}

/// H-index of counts already sorted in descending order.
pub(crate) fn h_index_of_sorted(descending: &[u32]) -> u32 {
    let mut h = 0;
    for &count in descending {
        if count <= h {
            break;
        }
        h += 1;
    }
    h
}

#[must_use]
pub fn total_plays(counts: &CountPerGame) -> u64 {
    counts.counts().map(u64::from).sum()
}

#[must_use]
pub fn distinct_game_count(counts: &CountPerGame) -> usize {
    counts.len()
}

/// Number of games with at least `threshold` plays.
#[must_use]
pub fn count_at_or_above(counts: &CountPerGame, threshold: u32) -> usize {
    counts.counts().filter(|&count| count >= threshold).count()
}

/// Names of games with at least `threshold` plays, sorted by name.
#[must_use]
pub fn games_at_or_above(counts: &CountPerGame, threshold: u32) -> Vec<String> {
    let mut names: Vec<String> = counts
        .iter()
        .filter(|(_, count)| **count >= threshold)
        .map(|(name, _)| name.clone())
        .collect();
    names.sort();
    names
}
