use chrono::NaiveDate;
use playdex_engine::{
    CountPerGame, EngineError, PlayRecordStore, RawPlayRecord, SeriesStrategy, build_timeline,
    count_all, count_as_of, count_at_or_above, distinct_game_count, h_index, ranked_list,
    total_plays,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const GAMES: [&str; 8] = [
    "Agricola", "Azul", "Brass", "Carcassonne", "Hive", "Root", "Spirit Island", "Wingspan",
];

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn random_store(seed: u64, records: usize) -> PlayRecordStore {
    let mut rng = SmallRng::seed_from_u64(seed);
    let origin = day(2018, 1, 1);
    let rows: Vec<RawPlayRecord> = (0..records)
        .map(|_| {
            let date = origin + chrono::Days::new(rng.gen_range(0..120));
            let game = GAMES[rng.gen_range(0..GAMES.len())];
            RawPlayRecord::new(date.format("%Y-%m-%d").to_string(), game, rng.gen_range(0..4))
        })
        .collect();
    let mut store = PlayRecordStore::new();
    let report = store.ingest(rows);
    assert!(report.is_clean());
    store
}

#[test]
fn h_index_is_bounded_by_games_and_max_count() {
    for seed in 0..20 {
        let store = random_store(seed, 60);
        let counts = count_all(store.all_events());
        let max_count = counts.counts().max().unwrap_or(0);
        let h = h_index(&counts);
        let bound = u32::try_from(distinct_game_count(&counts))
            .unwrap()
            .min(max_count);
        assert!(h <= bound, "seed {seed}: h {h} exceeds bound {bound}");
        let h_games = u32::try_from(count_at_or_above(&counts, h)).unwrap();
        assert!(h_games >= h, "seed {seed}: fewer than {h} games reach {h}");
    }
}

#[test]
fn totals_equal_summed_counts() {
    let store = random_store(7, 80);
    let counts = count_all(store.all_events());
    let summed: u64 = counts.iter().map(|(_, count)| u64::from(*count)).sum();
    assert_eq!(summed, total_plays(&counts));
    assert_eq!(total_plays(&counts), store.len() as u64);
}

#[test]
fn series_metrics_never_decrease() {
    let store = random_store(11, 90);
    let timeline =
        build_timeline(store.all_events(), day(2018, 6, 1), SeriesStrategy::Incremental).unwrap();
    for pair in timeline.points.windows(2) {
        assert!(pair[1].total_plays >= pair[0].total_plays);
        assert!(pair[1].distinct_games >= pair[0].distinct_games);
        assert!(pair[1].h_index >= pair[0].h_index);
    }
}

#[test]
fn incremental_and_recompute_series_match() {
    for seed in [1, 2, 3, 42, 1337] {
        let store = random_store(seed, 70);
        let end = day(2018, 5, 15);
        let incremental =
            build_timeline(store.all_events(), end, SeriesStrategy::Incremental).unwrap();
        let recompute = build_timeline(store.all_events(), end, SeriesStrategy::Recompute).unwrap();
        assert_eq!(incremental, recompute, "seed {seed} diverged");
    }
}

#[test]
fn series_points_match_as_of_snapshots() {
    let store = random_store(5, 50);
    let timeline =
        build_timeline(store.all_events(), day(2018, 5, 1), SeriesStrategy::Incremental).unwrap();
    for point in timeline.points.iter().step_by(9) {
        let counts = count_as_of(store.all_events(), point.date);
        assert_eq!(point.total_plays, total_plays(&counts));
        assert_eq!(point.distinct_games, distinct_game_count(&counts));
        assert_eq!(point.h_index, h_index(&counts));
    }
}

#[test]
fn records_agree_with_series_maxima() {
    let store = random_store(23, 100);
    let timeline =
        build_timeline(store.all_events(), day(2018, 6, 1), SeriesStrategy::Incremental).unwrap();
    let mut max_h = 0;
    let mut expected = Vec::new();
    for point in &timeline.points {
        if point.h_index > max_h {
            max_h = point.h_index;
            expected.push((point.date, point.h_index));
        }
    }
    let actual: Vec<_> = timeline
        .records
        .iter()
        .map(|record| (record.date, record.h_index))
        .collect();
    assert_eq!(actual, expected);
    for record in &timeline.records {
        let counts = count_as_of(store.all_events(), record.date);
        assert_eq!(record.games.len(), count_at_or_above(&counts, record.h_index));
        let mut sorted = record.games.clone();
        sorted.sort();
        assert_eq!(record.games, sorted);
    }
}

#[test]
fn chess_and_go_scenario() {
    let mut store = PlayRecordStore::new();
    store.ingest(vec![
        RawPlayRecord::new("2020-01-01", "Chess", 3),
        RawPlayRecord::new("2020-01-02", "Go", 1),
    ]);
    assert_eq!(store.len(), 4);
    let counts = count_all(store.all_events());
    let expected: CountPerGame = [("Chess", 3), ("Go", 1)].into_iter().collect();
    assert_eq!(counts, expected);
    assert_eq!(h_index(&counts), 1);
}

#[test]
fn empty_history_only_fails_temporal_queries() {
    let store = PlayRecordStore::new();
    let counts = count_all(store.all_events());
    assert_eq!(h_index(&counts), 0);
    assert_eq!(total_plays(&counts), 0);
    assert!(ranked_list(&counts, 0).is_empty());
    assert_eq!(
        build_timeline(store.all_events(), day(2020, 1, 1), SeriesStrategy::Recompute),
        Err(EngineError::EmptyHistory)
    );
}

#[test]
fn ranking_is_stable_across_calls() {
    let store = random_store(99, 60);
    let counts = count_all(store.all_events());
    assert_eq!(ranked_list(&counts, 0), ranked_list(&counts, 0));
}
