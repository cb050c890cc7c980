//! Per-game play counts, over all history or as of a cutoff date.
use chrono::NaiveDate;
use std::collections::HashMap;
use std::collections::hash_map;

use crate::record::PlayEvent;

/// Mapping from game name to play count.
///
/// Iteration order carries no meaning; use [`crate::summary::ranked_list`]
/// for an ordered view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountPerGame {
    counts: HashMap<String, u32>,
}

impl CountPerGame {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, game_name: &str) -> Option<u32> {
        self.counts.get(game_name).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, u32> {
        self.counts.iter()
    }

    pub fn counts(&self) -> impl Iterator<Item = u32> + '_ {
        self.counts.values().copied()
    }

    pub(crate) fn record_play(&mut self, game_name: &str) {
        if let Some(count) = self.counts.get_mut(game_name) {
            *count = count.saturating_add(1);
        } else {
            self.counts.insert(game_name.to_string(), 1);
        }
    }
}

impl<'a> IntoIterator for &'a CountPerGame {
    type Item = (&'a String, &'a u32);
    type IntoIter = hash_map::Iter<'a, String, u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.iter()
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for CountPerGame {
    /// Build a mapping directly; zero counts are dropped so every key has at
    /// least one play.
    fn from_iter<T: IntoIterator<Item = (S, u32)>>(iter: T) -> Self {
        let counts = iter
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(name, count)| (name.into(), count))
            .collect();
        Self { counts }
    }
}

/// Count every event.
#[must_use]
pub fn count_all(events: &[PlayEvent]) -> CountPerGame {
    let mut tally = CountPerGame::new();
    for event in events {
        tally.record_play(&event.game_name);
    }
    tally
}

/// Count events dated on or before `cutoff`.
#[must_use]
pub fn count_as_of(events: &[PlayEvent], cutoff: NaiveDate) -> CountPerGame {
    let mut tally = CountPerGame::new();
    for event in events.iter().filter(|event| event.date <= cutoff) {
        tally.record_play(&event.game_name);
    }
    tally
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(date: NaiveDate, name: &str) -> PlayEvent {
        PlayEvent {
            date,
            game_name: name.to_string(),
        }
    }

    #[test]
    fn count_all_groups_by_name() {
        let events = vec![
            event(day(2020, 1, 1), "Chess"),
            event(day(2020, 1, 1), "Chess"),
            event(day(2020, 1, 1), "Chess"),
            event(day(2020, 1, 2), "Go"),
        ];
        let counts = count_all(&events);
        assert_eq!(counts.get("Chess"), Some(3));
        assert_eq!(counts.get("Go"), Some(1));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn count_as_of_includes_cutoff_day() {
        let cutoff = day(2020, 3, 10);
        let events = vec![
            event(cutoff, "Azul"),
            event(cutoff, "Azul"),
            event(day(2020, 3, 11), "Azul"),
        ];
        let counts = count_as_of(&events, cutoff);
        assert_eq!(counts.get("Azul"), Some(2));
    }

    #[test]
    fn count_as_of_before_history_is_empty() {
        let events = vec![event(day(2020, 3, 10), "Azul")];
        assert!(count_as_of(&events, day(2020, 3, 9)).is_empty());
        assert!(count_all(&[]).is_empty());
    }

    #[test]
    fn names_are_case_sensitive_keys() {
        let events = vec![event(day(2020, 1, 1), "catan"), event(day(2020, 1, 1), "Catan")];
        assert_eq!(count_all(&events).len(), 2);
    }

    #[test]
    fn from_iter_drops_zero_counts() {
        let counts: CountPerGame = [("A", 2), ("B", 0)].into_iter().collect();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts.get("B"), None);
    }
}
