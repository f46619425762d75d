// League store: every league, season, team and fixture the app manages,
// plus the global settings. Fixture changes always rebuild the season's
// standings before returning.

mod update;

pub use update::{
    parse_count_lenient, parse_int_lenient, FixtureUpdate, SettingsUpdate, StandingUpdate,
};

use std::collections::{BTreeMap, HashSet};

use chrono::{NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use matchday_core::model::{Fixture, FixtureId, KickoffTime, League, MatchDetails, Season, Team};
use matchday_core::schedule::{self, Ruleset, ScheduleError, ScheduleRequest, ScheduleWindow};
use matchday_core::standings::{compute_player_stats, compute_standings, PlayerStats, TeamStanding};

use crate::sample;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("league not found: {0}")]
    LeagueNotFound(String),

    #[error("season {season} not found in league {league}")]
    SeasonNotFound { league: String, season: String },

    #[error("fixture not found: {0}")]
    FixtureNotFound(String),

    #[error("team not found: {0}")]
    TeamNotFound(String),

    #[error("team `{0}` is already in this season")]
    DuplicateTeam(String),

    #[error("team `{team}` still appears in {fixtures} fixture(s)")]
    TeamInUse { team: String, fixtures: usize },

    #[error("team `{team}` has {count} captains; pick one")]
    MultipleCaptains { team: String, count: usize },

    #[error("{what} name must not be empty")]
    EmptyName { what: &'static str },

    #[error("invalid season `{field}`: {message}")]
    InvalidSeason { field: &'static str, message: String },

    #[error("invalid value {value:?} for field `{field}`")]
    InvalidField { field: String, value: String },

    #[error("unknown field `{0}`")]
    UnknownField(String),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

// ---------------------------------------------------------------------------
// Settings and new-season input
// ---------------------------------------------------------------------------

/// App-wide preferences shown on the settings page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueSettings {
    pub league_name: String,
    pub season_number: String,
    pub default_match_day: Weekday,
    pub default_match_time: KickoffTime,
}

impl Default for LeagueSettings {
    fn default() -> Self {
        Self {
            league_name: "Soccer League Manager".to_string(),
            season_number: "1".to_string(),
            default_match_day: Weekday::Sat,
            default_match_time: KickoffTime::afternoon(),
        }
    }
}

/// Input for [`LeagueStore::add_season`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSeason {
    pub name: String,
    pub teams: Vec<String>,
    pub start_month: u32,
    pub end_month: u32,
    pub match_days: Vec<Weekday>,
    pub match_times: Vec<KickoffTime>,
}

impl NewSeason {
    /// A calendar-year season playing Saturdays at 15:00.
    pub fn new(name: impl Into<String>, teams: Vec<String>) -> Self {
        Self {
            name: name.into(),
            teams,
            start_month: 0,
            end_month: 11,
            match_days: vec![Weekday::Sat],
            match_times: vec![KickoffTime::afternoon()],
        }
    }

    fn validate(&self) -> Result<(), StoreError> {
        let fail = |field, message: String| Err(StoreError::InvalidSeason { field, message });

        if self.name.trim().is_empty() {
            return fail("name", "must not be empty".into());
        }
        if self.teams.len() < 2 {
            return fail("teams", format!("need at least 2 teams, got {}", self.teams.len()));
        }
        let mut seen = HashSet::new();
        for team in &self.teams {
            if !seen.insert(team.as_str()) {
                return fail("teams", format!("`{team}` is listed twice"));
            }
        }
        if self.match_days.is_empty() {
            return fail("match_days", "select at least one match day".into());
        }
        if self.match_times.is_empty() {
            return fail("match_times", "select at least one match time".into());
        }
        for (field, month) in [("start_month", self.start_month), ("end_month", self.end_month)] {
            if month > 11 {
                return fail(field, format!("must be between 0 and 11, got {month}"));
            }
        }
        Ok(())
    }
}

/// Split comma-separated team names, trimming each and dropping blanks.
pub fn parse_team_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Store-unique id: `{prefix}_{timestamp}_{seq}`.
fn next_id(seq: &mut u64, prefix: &str, taken: impl Fn(&str) -> bool) -> String {
    let stamp = Utc::now().format("%Y%m%d_%H%M%S");
    loop {
        *seq += 1;
        let id = format!("{prefix}_{stamp}_{seq}");
        if !taken(&id) {
            return id;
        }
    }
}

fn refresh_standings(season: &mut Season) {
    season.standings = compute_standings(&season.teams, &season.fixtures);
}

// ---------------------------------------------------------------------------
// LeagueStore
// ---------------------------------------------------------------------------

/// All leagues plus settings. Serialized whole as one JSON document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueStore {
    #[serde(default)]
    leagues: Vec<League>,
    #[serde(default)]
    settings: LeagueSettings,
    #[serde(skip)]
    id_seq: u64,
}

impl LeagueStore {
    pub fn new(settings: LeagueSettings) -> Self {
        Self {
            leagues: Vec::new(),
            settings,
            id_seq: 0,
        }
    }

    /// Seed the sample league when the store holds no leagues. Returns
    /// whether anything was added.
    pub fn initialize(&mut self) -> bool {
        if !self.leagues.is_empty() {
            return false;
        }
        let league = sample::sample_league();
        info!("Seeding empty store with sample league `{}`", league.name);
        self.leagues.push(league);
        true
    }

    // -- Lookups -------------------------------------------------------------

    pub fn leagues(&self) -> &[League] {
        &self.leagues
    }

    pub fn league(&self, league_id: &str) -> Result<&League, StoreError> {
        self.leagues
            .iter()
            .find(|l| l.id == league_id)
            .ok_or_else(|| StoreError::LeagueNotFound(league_id.to_string()))
    }

    fn league_mut(&mut self, league_id: &str) -> Result<&mut League, StoreError> {
        self.leagues
            .iter_mut()
            .find(|l| l.id == league_id)
            .ok_or_else(|| StoreError::LeagueNotFound(league_id.to_string()))
    }

    pub fn season(&self, league_id: &str, season_id: &str) -> Result<&Season, StoreError> {
        self.league(league_id)?
            .season(season_id)
            .ok_or_else(|| StoreError::SeasonNotFound {
                league: league_id.to_string(),
                season: season_id.to_string(),
            })
    }

    fn season_mut(&mut self, league_id: &str, season_id: &str) -> Result<&mut Season, StoreError> {
        self.league_mut(league_id)?
            .season_mut(season_id)
            .ok_or_else(|| StoreError::SeasonNotFound {
                league: league_id.to_string(),
                season: season_id.to_string(),
            })
    }

    // -- Leagues -------------------------------------------------------------

    pub fn add_league(&mut self, name: &str) -> Result<String, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName { what: "league" });
        }
        let leagues = &self.leagues;
        let id = next_id(&mut self.id_seq, "league", |c| leagues.iter().any(|l| l.id == c));
        self.leagues.push(League {
            id: id.clone(),
            name: name.to_string(),
            seasons: Vec::new(),
        });
        info!("Added league `{name}` ({id})");
        Ok(id)
    }

    pub fn rename_league(&mut self, league_id: &str, name: &str) -> Result<(), StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName { what: "league" });
        }
        let league = self.league_mut(league_id)?;
        info!("Renamed league `{}` to `{name}`", league.name);
        league.name = name.to_string();
        Ok(())
    }

    /// Remove a league with all its seasons.
    pub fn remove_league(&mut self, league_id: &str) -> Result<League, StoreError> {
        let idx = self
            .leagues
            .iter()
            .position(|l| l.id == league_id)
            .ok_or_else(|| StoreError::LeagueNotFound(league_id.to_string()))?;
        let league = self.leagues.remove(idx);
        info!(
            "Removed league `{}` and {} season(s)",
            league.name,
            league.seasons.len()
        );
        Ok(league)
    }

    // -- Seasons -------------------------------------------------------------

    pub fn add_season(&mut self, league_id: &str, mut new: NewSeason) -> Result<String, StoreError> {
        new.name = new.name.trim().to_string();
        new.teams = new
            .teams
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        new.validate()?;

        let leagues = &self.leagues;
        let id = next_id(&mut self.id_seq, "season", |c| {
            leagues.iter().any(|l| l.season(c).is_some())
        });

        let teams: Vec<Team> = new.teams.into_iter().map(Team::new).collect();
        let mut season = Season {
            id: id.clone(),
            name: new.name,
            teams,
            fixtures: Vec::new(),
            standings: Vec::new(),
            start_month: new.start_month,
            end_month: new.end_month,
            match_days: new.match_days,
            match_times: new.match_times,
            next_fixture_seq: 0,
        };
        refresh_standings(&mut season);

        let league = self.league_mut(league_id)?;
        info!(
            "Added season `{}` with {} teams to league `{}`",
            season.name,
            season.teams.len(),
            league.name
        );
        league.seasons.push(season);
        Ok(id)
    }

    pub fn remove_season(&mut self, league_id: &str, season_id: &str) -> Result<Season, StoreError> {
        let league = self.league_mut(league_id)?;
        let idx = league
            .seasons
            .iter()
            .position(|s| s.id == season_id)
            .ok_or_else(|| StoreError::SeasonNotFound {
                league: league_id.to_string(),
                season: season_id.to_string(),
            })?;
        let season = league.seasons.remove(idx);
        info!("Removed season `{}` from league `{}`", season.name, league.name);
        Ok(season)
    }

    // -- Teams ---------------------------------------------------------------

    /// Add comma-separated team names to a season's roster. Nothing is added
    /// if any name is already taken. Returns the names added.
    pub fn add_teams(
        &mut self,
        league_id: &str,
        season_id: &str,
        input: &str,
    ) -> Result<Vec<String>, StoreError> {
        let names = parse_team_list(input);
        let season = self.season_mut(league_id, season_id)?;

        let mut seen: HashSet<&str> = season.teams.iter().map(|t| t.name.as_str()).collect();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(StoreError::DuplicateTeam(name.clone()));
            }
        }

        season.teams.extend(names.iter().cloned().map(Team::new));
        refresh_standings(season);
        info!("Added {} team(s) to season `{}`", names.len(), season.name);
        Ok(names)
    }

    /// Rename a team everywhere in the season: roster, fixtures, match
    /// detail and standings. Returns the number of fixtures touched.
    pub fn rename_team(
        &mut self,
        league_id: &str,
        season_id: &str,
        old: &str,
        new: &str,
    ) -> Result<usize, StoreError> {
        let new = new.trim();
        if new.is_empty() {
            return Err(StoreError::EmptyName { what: "team" });
        }
        let season = self.season_mut(league_id, season_id)?;
        if !season.has_team(old) {
            return Err(StoreError::TeamNotFound(old.to_string()));
        }
        if old == new {
            return Ok(0);
        }
        if season.has_team(new) {
            return Err(StoreError::DuplicateTeam(new.to_string()));
        }

        for team in season.teams.iter_mut().filter(|t| t.name == old) {
            team.name = new.to_string();
        }

        let mut touched = 0;
        for fixture in &mut season.fixtures {
            if fixture.rename_team(old, new) {
                touched += 1;
            }
            if let Some(details) = fixture.match_details.as_mut() {
                let players = details
                    .home_goals
                    .iter_mut()
                    .chain(details.away_goals.iter_mut())
                    .map(|g| &mut g.player)
                    .chain(details.penalties.iter_mut().map(|p| &mut p.player));
                for player in players.filter(|p| p.team == old) {
                    player.team = new.to_string();
                }
            }
        }

        refresh_standings(season);
        info!("Renamed team `{old}` to `{new}` in {touched} fixture(s)");
        Ok(touched)
    }

    pub fn team(&self, league_id: &str, season_id: &str, name: &str) -> Result<&Team, StoreError> {
        self.season(league_id, season_id)?
            .teams
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| StoreError::TeamNotFound(name.to_string()))
    }

    /// Save a team from the squad editor. A changed name is carried through
    /// the season as in [`rename_team`](Self::rename_team) and the squad
    /// replaces the old one. Players without an id get one. Returns the
    /// number of fixtures a rename touched.
    pub fn update_team(
        &mut self,
        league_id: &str,
        season_id: &str,
        old: &str,
        mut team: Team,
    ) -> Result<usize, StoreError> {
        team.name = team.name.trim().to_string();
        for player in &mut team.players {
            player.name = player.name.trim().to_string();
            if player.name.is_empty() {
                return Err(StoreError::EmptyName { what: "player" });
            }
        }
        let captains = team.players.iter().filter(|p| p.is_captain).count();
        if captains > 1 {
            return Err(StoreError::MultipleCaptains {
                team: team.name,
                count: captains,
            });
        }
        self.team(league_id, season_id, old)?;

        let touched = self.rename_team(league_id, season_id, old, &team.name)?;

        let taken: HashSet<String> = team.players.iter().map(|p| p.id.clone()).collect();
        for player in team.players.iter_mut().filter(|p| p.id.is_empty()) {
            player.id = next_id(&mut self.id_seq, "player", |c| taken.contains(c));
        }

        let season = self.season_mut(league_id, season_id)?;
        let slot = season
            .teams
            .iter_mut()
            .find(|t| t.name == team.name)
            .ok_or_else(|| StoreError::TeamNotFound(team.name.clone()))?;
        info!("Saved squad of {} player(s) for `{}`", team.players.len(), team.name);
        *slot = team;
        Ok(touched)
    }

    /// Drop a team from the roster. Refused while any fixture names it.
    pub fn remove_team(&mut self, league_id: &str, season_id: &str, team: &str) -> Result<(), StoreError> {
        let season = self.season_mut(league_id, season_id)?;
        if !season.has_team(team) {
            return Err(StoreError::TeamNotFound(team.to_string()));
        }
        let fixtures = season.fixtures.iter().filter(|f| f.involves(team)).count();
        if fixtures > 0 {
            return Err(StoreError::TeamInUse {
                team: team.to_string(),
                fixtures,
            });
        }
        season.teams.retain(|t| t.name != team);
        refresh_standings(season);
        info!("Removed team `{team}` from season `{}`", season.name);
        Ok(())
    }

    // -- Fixtures ------------------------------------------------------------

    /// Replace the season's fixtures with a freshly generated calendar. The
    /// season window is anchored on `today`'s year.
    pub fn generate_fixtures(
        &mut self,
        league_id: &str,
        season_id: &str,
        ruleset: Ruleset,
        today: NaiveDate,
    ) -> Result<usize, StoreError> {
        let season = self.season_mut(league_id, season_id)?;
        let request = ScheduleRequest {
            teams: season.team_names(),
            window: ScheduleWindow::for_anchor(season.start_month, season.end_month, today),
            match_days: season.match_days.clone(),
            match_times: season.match_times.clone(),
            ruleset,
        };
        let fixtures = schedule::generate_fixtures(&request)?;

        if season.played_count() > 0 {
            warn!(
                "Regenerating fixtures for `{}` discards {} played result(s)",
                season.name,
                season.played_count()
            );
        }
        let count = fixtures.len();
        season.fixtures = fixtures;
        refresh_standings(season);
        Ok(count)
    }

    /// Add a blank fixture between the first two roster teams on `date` at
    /// the default kickoff time.
    pub fn add_fixture(
        &mut self,
        league_id: &str,
        season_id: &str,
        date: NaiveDate,
    ) -> Result<FixtureId, StoreError> {
        let time = self.settings.default_match_time;
        let season = self.season_mut(league_id, season_id)?;
        let (home, away) = match season.teams.as_slice() {
            [home, away, ..] => (home.name.clone(), away.name.clone()),
            teams => {
                return Err(ScheduleError::NotEnoughTeams { count: teams.len() }.into());
            }
        };

        let id = season.allocate_fixture_id();
        let mut fixture = Fixture::scheduled(id.clone(), home, away, date, time);
        fixture.match_details = Some(MatchDetails::default());
        season.fixtures.push(fixture);
        refresh_standings(season);
        info!("Added fixture {id} to season `{}`", season.name);
        Ok(id)
    }

    pub fn update_fixture(
        &mut self,
        league_id: &str,
        season_id: &str,
        fixture_id: &FixtureId,
        update: FixtureUpdate,
    ) -> Result<(), StoreError> {
        let season = self.season_mut(league_id, season_id)?;
        let fixture = season
            .fixture_mut(fixture_id)
            .ok_or_else(|| StoreError::FixtureNotFound(fixture_id.to_string()))?;
        update.apply(fixture);
        refresh_standings(season);
        Ok(())
    }

    /// Mark a fixture played with the given score.
    pub fn record_result(
        &mut self,
        league_id: &str,
        season_id: &str,
        fixture_id: &FixtureId,
        home_score: u32,
        away_score: u32,
    ) -> Result<(), StoreError> {
        let season = self.season_mut(league_id, season_id)?;
        let fixture = season
            .fixture_mut(fixture_id)
            .ok_or_else(|| StoreError::FixtureNotFound(fixture_id.to_string()))?;
        fixture.played = true;
        fixture.home_score = home_score;
        fixture.away_score = away_score;
        info!(
            "Result {} {home_score}-{away_score} {}",
            fixture.home_team, fixture.away_team
        );
        refresh_standings(season);
        Ok(())
    }

    pub fn remove_fixture(
        &mut self,
        league_id: &str,
        season_id: &str,
        fixture_id: &FixtureId,
    ) -> Result<Fixture, StoreError> {
        let season = self.season_mut(league_id, season_id)?;
        let idx = season
            .fixtures
            .iter()
            .position(|f| &f.id == fixture_id)
            .ok_or_else(|| StoreError::FixtureNotFound(fixture_id.to_string()))?;
        let fixture = season.fixtures.remove(idx);
        refresh_standings(season);
        info!("Removed fixture {fixture_id} from season `{}`", season.name);
        Ok(fixture)
    }

    /// Swap in a whole fixture list, as saved from the fixtures editor.
    pub fn replace_fixtures(
        &mut self,
        league_id: &str,
        season_id: &str,
        fixtures: Vec<Fixture>,
    ) -> Result<(), StoreError> {
        let season = self.season_mut(league_id, season_id)?;
        season.fixtures = fixtures;
        refresh_standings(season);
        Ok(())
    }

    // -- Standings -----------------------------------------------------------

    pub fn recalculate_standings(
        &mut self,
        league_id: &str,
        season_id: &str,
    ) -> Result<&[TeamStanding], StoreError> {
        let season = self.season_mut(league_id, season_id)?;
        refresh_standings(season);
        Ok(season.standings.as_slice())
    }

    pub fn standings(&self, league_id: &str, season_id: &str) -> Result<&[TeamStanding], StoreError> {
        Ok(self.season(league_id, season_id)?.standings.as_slice())
    }

    pub fn player_stats(
        &self,
        league_id: &str,
        season_id: &str,
    ) -> Result<BTreeMap<String, PlayerStats>, StoreError> {
        Ok(compute_player_stats(&self.season(league_id, season_id)?.fixtures))
    }

    /// Replace the table wholesale, e.g. from an imported spreadsheet. The
    /// rows stand until the next fixture change rebuilds them.
    pub fn override_standings(
        &mut self,
        league_id: &str,
        season_id: &str,
        rows: Vec<TeamStanding>,
    ) -> Result<(), StoreError> {
        let season = self.season_mut(league_id, season_id)?;
        warn!(
            "Standings for `{}` overridden by hand with {} row(s)",
            season.name,
            rows.len()
        );
        season.standings = rows;
        Ok(())
    }

    /// Hand-edit one cell of the table.
    pub fn update_standing(
        &mut self,
        league_id: &str,
        season_id: &str,
        team: &str,
        update: StandingUpdate,
    ) -> Result<(), StoreError> {
        let season = self.season_mut(league_id, season_id)?;
        let row = season
            .standings
            .iter_mut()
            .find(|r| r.team == team)
            .ok_or_else(|| StoreError::TeamNotFound(team.to_string()))?;
        update.apply(row);
        Ok(())
    }

    // -- Settings ------------------------------------------------------------

    pub fn settings(&self) -> &LeagueSettings {
        &self.settings
    }

    pub fn update_settings(&mut self, update: SettingsUpdate) {
        update.apply(&mut self.settings);
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
