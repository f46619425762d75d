// Integration tests: generated calendars fed straight into the standings
// calculator.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, Weekday};

use matchday_core::model::{Fixture, KickoffTime, Team};
use matchday_core::schedule::{generate_fixtures, Ruleset, ScheduleRequest, ScheduleWindow};
use matchday_core::standings::compute_standings;

fn names(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("Club {i}")).collect()
}

fn request(n: usize, ruleset: Ruleset) -> ScheduleRequest {
    ScheduleRequest {
        teams: names(n),
        window: ScheduleWindow::new(8, 4, 2024),
        match_days: vec![Weekday::Sat, Weekday::Sun],
        match_times: vec![
            KickoffTime::from_hm(11, 0).unwrap(),
            KickoffTime::afternoon(),
        ],
        ruleset,
    }
}

/// Deterministic scores that vary by fixture.
fn play_all(fixtures: &mut [Fixture]) {
    for (i, f) in fixtures.iter_mut().enumerate() {
        f.played = true;
        f.home_score = (i % 4) as u32;
        f.away_score = (i % 3) as u32;
    }
}

#[test]
fn full_season_table_is_consistent() {
    for n in [4usize, 7, 10] {
        let req = request(n, Ruleset::DoubleRoundRobin);
        let mut fixtures = generate_fixtures(&req).unwrap();
        play_all(&mut fixtures);

        let teams: Vec<Team> = req.teams.iter().map(Team::new).collect();
        let table = compute_standings(&teams, &fixtures);

        assert_eq!(table.len(), n);
        for row in &table {
            assert!(row.is_consistent(), "{row:?}");
            assert_eq!(row.played as usize, 2 * (n - 1), "{}", row.team);
        }

        // Goals in equal goals out across the league.
        let scored: u32 = table.iter().map(|r| r.goals_for).sum();
        let conceded: u32 = table.iter().map(|r| r.goals_against).sum();
        assert_eq!(scored, conceded);

        for pair in table.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(
                (a.points, a.goal_difference, a.goals_for)
                    >= (b.points, b.goal_difference, b.goals_for)
            );
        }
    }
}

#[test]
fn no_team_plays_twice_in_one_slot() {
    let fixtures = generate_fixtures(&request(8, Ruleset::RoundRobin)).unwrap();
    let mut busy: HashMap<(NaiveDate, KickoffTime), HashSet<&str>> = HashMap::new();
    for f in &fixtures {
        let slot = busy.entry((f.date, f.time)).or_default();
        assert!(slot.insert(f.home_team.as_str()));
        assert!(slot.insert(f.away_team.as_str()));
    }
}

#[test]
fn fixtures_fall_on_allowed_days_inside_window() {
    use chrono::Datelike;
    let fixtures = generate_fixtures(&request(12, Ruleset::DoubleRoundRobin)).unwrap();
    let first = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
    let last = NaiveDate::from_ymd_opt(2025, 5, 31).unwrap();
    for f in &fixtures {
        assert!(matches!(f.date.weekday(), Weekday::Sat | Weekday::Sun));
        assert!(f.date >= first && f.date <= last);
    }
    // Slots are handed out in order until the calendar wraps.
    let slots: Vec<_> = fixtures.iter().map(|f| (f.date, f.time)).collect();
    let wrap = slots.windows(2).filter(|w| w[1] < w[0]).count();
    assert!(wrap <= 2);
}

#[test]
fn ranking_ignores_fixture_order() {
    let req = request(6, Ruleset::RoundRobin);
    let mut fixtures = generate_fixtures(&req).unwrap();
    play_all(&mut fixtures);
    let teams: Vec<Team> = req.teams.iter().map(Team::new).collect();

    let forward = compute_standings(&teams, &fixtures);
    fixtures.reverse();
    let backward = compute_standings(&teams, &fixtures);
    assert_eq!(forward, backward);
}
