// Single-field edits for fixtures, standings rows and settings, as sent by
// table editors that only know a column name and the text typed into it.

use chrono::{NaiveDate, Weekday};

use matchday_core::model::{Fixture, KickoffTime, MatchDetails};
use matchday_core::standings::TeamStanding;

use super::{LeagueSettings, StoreError};

// ---------------------------------------------------------------------------
// Lenient number parsing
// ---------------------------------------------------------------------------

/// Read the leading integer of `raw`, the way a form field is coerced:
/// surrounding whitespace and trailing junk are ignored, and text with no
/// leading digits reads as 0.
pub fn parse_int_lenient(raw: &str) -> i64 {
    let s = raw.trim();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let value: i64 = rest[..digits_end].parse().unwrap_or(0);
    if negative {
        -value
    } else {
        value
    }
}

/// [`parse_int_lenient`] clamped to a non-negative count.
pub fn parse_count_lenient(raw: &str) -> u32 {
    u32::try_from(parse_int_lenient(raw).max(0)).unwrap_or(u32::MAX)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "on" => Some(true),
        "false" | "no" | "n" | "0" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Field names are matched without case, `_` or `-`, so `homeScore`,
/// `home_score` and `home-score` all name the same column.
fn normalize(field: &str) -> String {
    field
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

fn invalid(field: &str, raw: &str) -> StoreError {
    StoreError::InvalidField {
        field: field.to_string(),
        value: raw.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureUpdate {
    HomeTeam(String),
    AwayTeam(String),
    Date(NaiveDate),
    Time(KickoffTime),
    Played(bool),
    HomeScore(u32),
    AwayScore(u32),
    MatchDetails(Option<MatchDetails>),
}

impl FixtureUpdate {
    /// Build an update from an editor column and its raw text.
    ///
    /// Scores never fail to parse: anything without a leading number is 0.
    /// Dates are `YYYY-MM-DD`, times `HH:MM`, and match detail is JSON (an
    /// empty string clears it).
    pub fn parse(field: &str, raw: &str) -> Result<Self, StoreError> {
        match normalize(field).as_str() {
            "hometeam" | "home" => Ok(FixtureUpdate::HomeTeam(raw.trim().to_string())),
            "awayteam" | "away" => Ok(FixtureUpdate::AwayTeam(raw.trim().to_string())),
            "date" => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map(FixtureUpdate::Date)
                .map_err(|_| invalid(field, raw)),
            "time" => raw
                .parse()
                .map(FixtureUpdate::Time)
                .map_err(|_| invalid(field, raw)),
            "played" => parse_flag(raw)
                .map(FixtureUpdate::Played)
                .ok_or_else(|| invalid(field, raw)),
            "homescore" => Ok(FixtureUpdate::HomeScore(parse_count_lenient(raw))),
            "awayscore" => Ok(FixtureUpdate::AwayScore(parse_count_lenient(raw))),
            "matchdetails" => {
                if raw.trim().is_empty() {
                    Ok(FixtureUpdate::MatchDetails(None))
                } else {
                    serde_json::from_str(raw)
                        .map(|d| FixtureUpdate::MatchDetails(Some(d)))
                        .map_err(|_| invalid(field, raw))
                }
            }
            _ => Err(StoreError::UnknownField(field.to_string())),
        }
    }

    pub fn apply(self, fixture: &mut Fixture) {
        match self {
            FixtureUpdate::HomeTeam(team) => fixture.home_team = team,
            FixtureUpdate::AwayTeam(team) => fixture.away_team = team,
            FixtureUpdate::Date(date) => fixture.date = date,
            FixtureUpdate::Time(time) => fixture.time = time,
            FixtureUpdate::Played(played) => fixture.played = played,
            FixtureUpdate::HomeScore(score) => fixture.home_score = score,
            FixtureUpdate::AwayScore(score) => fixture.away_score = score,
            FixtureUpdate::MatchDetails(details) => fixture.match_details = details,
        }
    }
}

// ---------------------------------------------------------------------------
// Standings rows
// ---------------------------------------------------------------------------

/// A hand edit to one cell of the league table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StandingUpdate {
    Team(String),
    Played(u32),
    Won(u32),
    Drawn(u32),
    Lost(u32),
    GoalsFor(u32),
    GoalsAgainst(u32),
    GoalDifference(i64),
    Points(u32),
}

impl StandingUpdate {
    /// Columns are the table headings: `Team`, `P`, `W`, `D`, `L`, `GF`,
    /// `GA`, `GD`, `PTS`. Numbers are coerced like fixture scores.
    pub fn parse(column: &str, raw: &str) -> Result<Self, StoreError> {
        let update = match normalize(column).as_str() {
            "team" => StandingUpdate::Team(raw.trim().to_string()),
            "p" => StandingUpdate::Played(parse_count_lenient(raw)),
            "w" => StandingUpdate::Won(parse_count_lenient(raw)),
            "d" => StandingUpdate::Drawn(parse_count_lenient(raw)),
            "l" => StandingUpdate::Lost(parse_count_lenient(raw)),
            "gf" => StandingUpdate::GoalsFor(parse_count_lenient(raw)),
            "ga" => StandingUpdate::GoalsAgainst(parse_count_lenient(raw)),
            "gd" => StandingUpdate::GoalDifference(parse_int_lenient(raw)),
            "pts" => StandingUpdate::Points(parse_count_lenient(raw)),
            _ => return Err(StoreError::UnknownField(column.to_string())),
        };
        Ok(update)
    }

    pub fn apply(self, row: &mut TeamStanding) {
        match self {
            StandingUpdate::Team(team) => row.team = team,
            StandingUpdate::Played(v) => row.played = v,
            StandingUpdate::Won(v) => row.won = v,
            StandingUpdate::Drawn(v) => row.drawn = v,
            StandingUpdate::Lost(v) => row.lost = v,
            StandingUpdate::GoalsFor(v) => row.goals_for = v,
            StandingUpdate::GoalsAgainst(v) => row.goals_against = v,
            StandingUpdate::GoalDifference(v) => row.goal_difference = v,
            StandingUpdate::Points(v) => row.points = v,
        }
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsUpdate {
    LeagueName(String),
    SeasonNumber(String),
    DefaultMatchDay(Weekday),
    DefaultMatchTime(KickoffTime),
}

impl SettingsUpdate {
    pub fn parse(field: &str, raw: &str) -> Result<Self, StoreError> {
        match normalize(field).as_str() {
            "leaguename" => Ok(SettingsUpdate::LeagueName(raw.trim().to_string())),
            "seasonnumber" => Ok(SettingsUpdate::SeasonNumber(raw.trim().to_string())),
            "defaultmatchday" => raw
                .trim()
                .parse()
                .map(SettingsUpdate::DefaultMatchDay)
                .map_err(|_| invalid(field, raw)),
            "defaultmatchtime" => raw
                .parse()
                .map(SettingsUpdate::DefaultMatchTime)
                .map_err(|_| invalid(field, raw)),
            _ => Err(StoreError::UnknownField(field.to_string())),
        }
    }

    pub fn apply(self, settings: &mut LeagueSettings) {
        match self {
            SettingsUpdate::LeagueName(name) => settings.league_name = name,
            SettingsUpdate::SeasonNumber(number) => settings.season_number = number,
            SettingsUpdate::DefaultMatchDay(day) => settings.default_match_day = day,
            SettingsUpdate::DefaultMatchTime(time) => settings.default_match_time = time,
        }
    }
}
