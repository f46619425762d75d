// Sample league used to seed an empty store.

use chrono::{NaiveDate, Weekday};

use matchday_core::model::{Fixture, FixtureId, KickoffTime, League, Season, Team};
use matchday_core::standings::compute_standings;

const TEAMS: [&str; 9] = [
    "BLUE", "WHITE", "RED", "PURPLE", "ORANGE", "GREEN", "SKY BLUE", "YELLOW", "PINK",
];

/// (id, home, away, date, kickoff hour, score if played)
type SampleFixture = (
    &'static str,
    &'static str,
    &'static str,
    (i32, u32, u32),
    u32,
    Option<(u32, u32)>,
);

const FIXTURES: [SampleFixture; 6] = [
    ("1", "BLUE", "RED", (2023, 10, 15), 15, Some((3, 1))),
    ("2", "WHITE", "PURPLE", (2023, 10, 15), 17, Some((2, 2))),
    ("3", "YELLOW", "GREEN", (2023, 10, 22), 15, Some((1, 3))),
    ("4", "ORANGE", "PINK", (2023, 10, 22), 17, Some((4, 2))),
    ("5", "BLUE", "SKY BLUE", (2023, 10, 29), 15, None),
    ("6", "RED", "WHITE", (2023, 10, 29), 17, None),
];

/// A nine-team community league part way through its season, with the
/// table already computed from the played fixtures.
pub fn sample_league() -> League {
    let teams: Vec<Team> = TEAMS.iter().map(|name| Team::new(*name)).collect();

    let fixtures: Vec<Fixture> = FIXTURES
        .iter()
        .filter_map(|&(id, home, away, (y, m, d), hour, score)| {
            let date = NaiveDate::from_ymd_opt(y, m, d)?;
            let time = KickoffTime::from_hm(hour, 0)?;
            let mut fixture = Fixture::scheduled(FixtureId::new(id), home, away, date, time);
            if let Some((home_score, away_score)) = score {
                fixture.played = true;
                fixture.home_score = home_score;
                fixture.away_score = away_score;
            }
            Some(fixture)
        })
        .collect();

    let standings = compute_standings(&teams, &fixtures);

    League {
        id: "1".to_string(),
        name: "WELL FOUNDATION COMMUNITY LEAGUE".to_string(),
        seasons: vec![Season {
            id: "1".to_string(),
            name: "Season 13".to_string(),
            teams,
            fixtures,
            standings,
            start_month: 8,
            end_month: 4,
            match_days: vec![Weekday::Sun],
            match_times: [15, 17]
                .into_iter()
                .filter_map(|h| KickoffTime::from_hm(h, 0))
                .collect(),
            next_fixture_seq: 0,
        }],
    }
}
