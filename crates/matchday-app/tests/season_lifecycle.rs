// Integration tests for the league store.
//
// These drive a season from creation to a finished table through the public
// API, persisting through SQLite between steps the way the command line does.

use chrono::NaiveDate;

use matchday_app::db::Database;
use matchday_app::import::{import_file, ImportKind};
use matchday_app::search::search;
use matchday_app::store::{FixtureUpdate, LeagueStore, NewSeason, StoreError};
use matchday_core::model::FixtureId;
use matchday_core::schedule::Ruleset;
use matchday_core::standings::compute_standings;

// ===========================================================================
// Test helpers
// ===========================================================================

/// Fixture directory path (relative to the crate root, which is the cwd for
/// `cargo test`).
const FIXTURES: &str = "tests/fixtures";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn teams(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Load, apply `f`, save: one command-line invocation.
fn with_store<T>(db: &Database, f: impl FnOnce(&mut LeagueStore) -> T) -> T {
    let mut store = db.load_store().unwrap().unwrap_or_default();
    let out = f(&mut store);
    db.save_store(&store).unwrap();
    out
}

fn assert_table_matches_fixtures(store: &LeagueStore, league: &str, season: &str) {
    let s = store.season(league, season).unwrap();
    assert_eq!(s.standings, compute_standings(&s.teams, &s.fixtures));
    assert!(s.standings.iter().all(|r| r.is_consistent()));
}

// ===========================================================================
// Tests
// ===========================================================================

#[test]
fn double_round_robin_season_end_to_end() {
    let db = Database::open(":memory:").unwrap();

    let (league, season) = with_store(&db, |store| {
        let league = store.add_league("Parks League").unwrap();
        let mut new = NewSeason::new("Winter", teams(&["Ash", "Birch", "Cedar", "Damson", "Elm"]));
        new.start_month = 9;
        new.end_month = 2;
        let season = store.add_season(&league, new).unwrap();
        (league, season)
    });

    let count = with_store(&db, |store| {
        store
            .generate_fixtures(&league, &season, Ruleset::DoubleRoundRobin, date(2024, 6, 1))
            .unwrap()
    });
    assert_eq!(count, 20);

    // Play every fixture as a home win.
    with_store(&db, |store| {
        let ids: Vec<FixtureId> = store
            .season(&league, &season)
            .unwrap()
            .fixtures
            .iter()
            .map(|f| f.id.clone())
            .collect();
        for id in ids {
            store.record_result(&league, &season, &id, 1, 0).unwrap();
        }
    });

    let store = db.load_store().unwrap().unwrap();
    let s = store.season(&league, &season).unwrap();
    assert!(s.fixtures.iter().all(|f| f.date >= date(2024, 10, 1)));
    assert!(s.fixtures.iter().all(|f| f.date <= date(2025, 3, 31)));

    // Every team played 8, won its 4 home games and lost its 4 away games.
    for row in &s.standings {
        assert_eq!(row.played, 8, "{}", row.team);
        assert_eq!(row.won, 4, "{}", row.team);
        assert_eq!(row.lost, 4, "{}", row.team);
        assert_eq!(row.points, 12, "{}", row.team);
    }
    // All level: roster order decides.
    let order: Vec<&str> = s.standings.iter().map(|r| r.team.as_str()).collect();
    assert_eq!(order, vec!["Ash", "Birch", "Cedar", "Damson", "Elm"]);
    assert_table_matches_fixtures(&store, &league, &season);
}

#[test]
fn editor_changes_keep_table_current() {
    let db = Database::open(":memory:").unwrap();
    let store = db.load_or_init_store(&Default::default()).unwrap();
    let league = store.leagues()[0].id.clone();
    let season = store.leagues()[0].seasons[0].id.clone();

    with_store(&db, |store| {
        let id = FixtureId::new("5");
        for (field, raw) in [("played", "yes"), ("homeScore", "0"), ("awayScore", "5 ")] {
            let update = FixtureUpdate::parse(field, raw).unwrap();
            store.update_fixture(&league, &season, &id, update).unwrap();
        }
    });

    let store = db.load_store().unwrap().unwrap();
    let standings = store.standings(&league, &season).unwrap();
    assert_eq!(standings[0].team, "SKY BLUE");
    assert_eq!(standings[0].goal_difference, 5);
    assert_table_matches_fixtures(&store, &league, &season);
}

#[test]
fn renamed_team_is_found_by_search() {
    let mut store = LeagueStore::default();
    store.initialize();
    let league = store.leagues()[0].id.clone();
    let season = store.leagues()[0].seasons[0].id.clone();

    store.rename_team(&league, &season, "RED", "CRIMSON").unwrap();
    let s = store.season(&league, &season).unwrap();

    assert!(search(s, "red").is_empty());
    let results = search(s, "crim");
    assert_eq!(results.teams.len(), 1);
    assert_eq!(results.fixtures.len(), 2);
    assert_table_matches_fixtures(&store, &league, &season);
}

#[test]
fn imported_table_overrides_until_next_result() {
    let mut store = LeagueStore::default();
    store.initialize();
    let league = store.leagues()[0].id.clone();
    let season = store.leagues()[0].seasons[0].id.clone();

    let rows = import_file(
        std::path::Path::new(FIXTURES).join("standings.csv").as_path(),
        ImportKind::Standings,
    )
    .unwrap();
    assert_eq!(rows.len(), 9);
    store.override_standings(&league, &season, rows).unwrap();
    assert_eq!(store.standings(&league, &season).unwrap()[4].team, "PURPLE");

    store
        .record_result(&league, &season, &FixtureId::new("6"), 0, 0)
        .unwrap();
    assert_table_matches_fixtures(&store, &league, &season);
}

#[test]
fn removing_league_cascades() {
    let mut store = LeagueStore::default();
    store.initialize();
    let league = store.leagues()[0].id.clone();
    let season = store.leagues()[0].seasons[0].id.clone();

    store.remove_league(&league).unwrap();
    assert!(matches!(
        store.season(&league, &season),
        Err(StoreError::LeagueNotFound(_))
    ));
}
