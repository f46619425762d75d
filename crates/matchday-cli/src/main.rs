// matchday command line.
//
// Every invocation:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config, copying defaults on first run
// 3. Open the database and load the league store (seeded when new)
// 4. Run one command against the store
// 5. Save the store if the command changed it, then print the report

mod table;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::{Local, NaiveDate, Weekday};
use clap::{Parser, Subcommand};
use tracing::info;

use matchday_app::config::{self, Config};
use matchday_app::db::Database;
use matchday_app::import::{import_file, ImportKind};
use matchday_app::search::search;
use matchday_app::store::{
    parse_team_list, FixtureUpdate, LeagueStore, NewSeason, SettingsUpdate, StandingUpdate,
};
use matchday_core::model::{Fixture, FixtureId, KickoffTime, Position, SquadMember};
use matchday_core::schedule::Ruleset;

#[derive(Parser)]
#[command(name = "matchday")]
#[command(about = "Run amateur football leagues: fixtures, results and tables", long_about = None)]
struct Cli {
    /// Directory holding defaults/ and config/ (logs are written here too)
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

/// Leagues and seasons are named by id or by exact name, ignoring case.
#[derive(Subcommand)]
enum Command {
    /// List leagues and their seasons
    Leagues,
    /// Create a league
    AddLeague { name: String },
    /// Rename a league
    RenameLeague { league: String, name: String },
    /// Delete a league and all its seasons
    RemoveLeague { league: String },
    /// Create a season
    AddSeason {
        league: String,
        name: String,
        /// Comma-separated team names
        #[arg(long)]
        teams: String,
        /// First month of play, 0 = January (default from config)
        #[arg(long)]
        start_month: Option<u32>,
        /// Last month of play, 0 = January (default from config)
        #[arg(long)]
        end_month: Option<u32>,
        /// Comma-separated weekdays, e.g. Sat,Sun (default from config)
        #[arg(long, value_delimiter = ',')]
        match_days: Vec<Weekday>,
        /// Comma-separated kickoff times, e.g. 15:00,17:00 (default from config)
        #[arg(long, value_delimiter = ',')]
        match_times: Vec<KickoffTime>,
    },
    /// Delete a season
    RemoveSeason { league: String, season: String },
    /// Add comma-separated teams to a season
    AddTeams { league: String, season: String, teams: String },
    /// Rename a team in the roster, fixtures and table
    RenameTeam {
        league: String,
        season: String,
        old: String,
        new: String,
    },
    /// Remove a team that has no fixtures
    RemoveTeam { league: String, season: String, team: String },
    /// Show a team's squad
    Squad { league: String, season: String, team: String },
    /// Edit a team's name and squad
    EditTeam {
        league: String,
        season: String,
        team: String,
        /// New team name
        #[arg(long)]
        name: Option<String>,
        /// Add a player as NAME[:POSITION[:AGE]], e.g. "Ann Lee:GK:24"
        #[arg(long = "add", value_parser = parse_squad_member)]
        add: Vec<SquadMember>,
        /// Remove a player by name
        #[arg(long = "remove")]
        remove: Vec<String>,
        /// Make this player captain
        #[arg(long)]
        captain: Option<String>,
    },
    /// List the available competition formats
    Rulesets,
    /// Replace a season's fixtures with a generated calendar
    Generate {
        league: String,
        season: String,
        /// round-robin or double-round-robin (default from config)
        #[arg(long)]
        ruleset: Option<Ruleset>,
        /// Date whose year anchors the season window (default: today)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// List a season's fixtures
    Fixtures {
        league: String,
        season: String,
        /// Only fixtures not yet played
        #[arg(long)]
        unplayed: bool,
    },
    /// Add a blank fixture between the first two teams
    AddFixture {
        league: String,
        season: String,
        /// YYYY-MM-DD
        date: NaiveDate,
    },
    /// Set one field of a fixture (homeTeam, awayTeam, date, time, played,
    /// homeScore, awayScore, matchDetails)
    EditFixture {
        league: String,
        season: String,
        fixture: String,
        field: String,
        value: String,
    },
    /// Record a played result
    #[command(name = "result")]
    RecordResult {
        league: String,
        season: String,
        fixture: String,
        home: u32,
        away: u32,
    },
    /// Delete a fixture
    RemoveFixture {
        league: String,
        season: String,
        fixture: String,
    },
    /// Show the league table
    Standings { league: String, season: String },
    /// Show player statistics from match detail
    Players { league: String, season: String },
    /// Set one cell of the league table by hand (Team, P, W, D, L, GF, GA,
    /// GD, PTS). Stands until the next fixture change.
    EditStanding {
        league: String,
        season: String,
        team: String,
        column: String,
        value: String,
    },
    /// Rebuild the league table from the fixtures, dropping manual edits
    Recalculate { league: String, season: String },
    /// Import a spreadsheet export: standings, fixtures or players
    Import {
        kind: ImportKind,
        league: String,
        season: String,
        file: PathBuf,
    },
    /// Find teams and fixtures by name
    Search {
        league: String,
        season: String,
        query: String,
    },
    /// Show settings, or change one (leagueName, seasonNumber,
    /// defaultMatchDay, defaultMatchTime)
    Settings {
        field: Option<String>,
        value: Option<String>,
    },
    /// Delete all saved data and start again from the sample league
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

/// What a command printed and whether the store needs saving.
struct Report {
    text: String,
    modified: bool,
    /// Wipe the database before saving.
    reset: bool,
}

impl Report {
    fn show(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            modified: false,
            reset: false,
        }
    }

    fn changed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            modified: true,
            reset: false,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.config_dir)?;

    let config = config::load_config(&cli.config_dir).context("failed to load configuration")?;
    let db = Database::open(&config.db_path).context("failed to open database")?;
    info!("Database opened at {}", config.db_path.display());

    let mut store = db
        .load_or_init_store(&config.settings)
        .context("failed to load league store")?;

    let today = Local::now().date_naive();
    let report = execute(cli.command, &mut store, &config, today)?;

    if report.reset {
        db.clear().context("failed to clear database")?;
    }
    if report.modified {
        db.save_store(&store).context("failed to save league store")?;
    }
    println!("{}", report.text);
    Ok(())
}

fn execute(
    command: Command,
    store: &mut LeagueStore,
    config: &Config,
    today: NaiveDate,
) -> anyhow::Result<Report> {
    let report = match command {
        Command::Leagues => Report::show(table::leagues(store.leagues())),

        Command::AddLeague { name } => {
            let id = store.add_league(&name)?;
            Report::changed(format!("Added league {} [{id}]", name.trim()))
        }

        Command::RenameLeague { league, name } => {
            let league = resolve_league(store, &league)?;
            store.rename_league(&league, &name)?;
            Report::changed(format!("Renamed league [{league}] to {}", name.trim()))
        }

        Command::RemoveLeague { league } => {
            let league = resolve_league(store, &league)?;
            let removed = store.remove_league(&league)?;
            Report::changed(format!(
                "Removed league {} and {} season(s)",
                removed.name,
                removed.seasons.len()
            ))
        }

        Command::AddSeason {
            league,
            name,
            teams,
            start_month,
            end_month,
            match_days,
            match_times,
        } => {
            let league = resolve_league(store, &league)?;
            let defaults = &config.schedule;
            let new = NewSeason {
                name,
                teams: parse_team_list(&teams),
                start_month: start_month.unwrap_or(defaults.start_month),
                end_month: end_month.unwrap_or(defaults.end_month),
                match_days: if match_days.is_empty() {
                    defaults.match_days.clone()
                } else {
                    match_days
                },
                match_times: if match_times.is_empty() {
                    defaults.match_times.clone()
                } else {
                    match_times
                },
            };
            let season = store.add_season(&league, new)?;
            Report::changed(format!("Added season [{season}]"))
        }

        Command::RemoveSeason { league, season } => {
            let (league, season) = resolve_season(store, &league, &season)?;
            let removed = store.remove_season(&league, &season)?;
            Report::changed(format!("Removed season {}", removed.name))
        }

        Command::AddTeams {
            league,
            season,
            teams,
        } => {
            let (league, season) = resolve_season(store, &league, &season)?;
            let added = store.add_teams(&league, &season, &teams)?;
            if added.is_empty() {
                Report::show("No team names given.")
            } else {
                Report::changed(format!("Added {}", added.join(", ")))
            }
        }

        Command::RenameTeam {
            league,
            season,
            old,
            new,
        } => {
            let (league, season) = resolve_season(store, &league, &season)?;
            let touched = store.rename_team(&league, &season, &old, &new)?;
            Report::changed(format!(
                "Renamed {old} to {} in {touched} fixture(s)",
                new.trim()
            ))
        }

        Command::RemoveTeam {
            league,
            season,
            team,
        } => {
            let (league, season) = resolve_season(store, &league, &season)?;
            store.remove_team(&league, &season, &team)?;
            Report::changed(format!("Removed {team}"))
        }

        Command::Squad {
            league,
            season,
            team,
        } => {
            let (league, season) = resolve_season(store, &league, &season)?;
            Report::show(table::squad(store.team(&league, &season, &team)?))
        }

        Command::EditTeam {
            league,
            season,
            team: old,
            name,
            add,
            remove,
            captain,
        } => {
            let (league, season) = resolve_season(store, &league, &season)?;
            let mut team = store.team(&league, &season, &old)?.clone();
            if let Some(name) = name {
                team.name = name;
            }
            for gone in &remove {
                let before = team.players.len();
                team.players.retain(|p| &p.name != gone);
                if team.players.len() == before {
                    bail!("{old} has no player named `{gone}`");
                }
            }
            team.players.extend(add);
            if let Some(captain) = captain {
                if !team.appoint_captain(captain.trim()) {
                    bail!("{old} has no player named `{}`", captain.trim());
                }
            }
            let new_name = team.name.trim().to_string();
            store.update_team(&league, &season, &old, team)?;
            Report::changed(table::squad(store.team(&league, &season, &new_name)?))
        }

        Command::Rulesets => Report::show(table::rulesets()),

        Command::Generate {
            league,
            season,
            ruleset,
            today: anchor,
        } => {
            let (league, season) = resolve_season(store, &league, &season)?;
            let ruleset = ruleset.unwrap_or(config.schedule.ruleset);
            let count = store
                .generate_fixtures(&league, &season, ruleset, anchor.unwrap_or(today))
                .with_context(|| format!("could not generate {ruleset} fixtures"))?;
            let fixtures: Vec<&Fixture> = store.season(&league, &season)?.fixtures.iter().collect();
            Report::changed(format!(
                "Generated {count} {ruleset} fixtures\n\n{}",
                table::fixtures(&fixtures)
            ))
        }

        Command::Fixtures {
            league,
            season,
            unplayed,
        } => {
            let (league, season) = resolve_season(store, &league, &season)?;
            let mut fixtures: Vec<&Fixture> = store
                .season(&league, &season)?
                .fixtures
                .iter()
                .filter(|f| !(unplayed && f.played))
                .collect();
            fixtures.sort_by_key(|f| (f.date, f.time));
            Report::show(table::fixtures(&fixtures))
        }

        Command::AddFixture {
            league,
            season,
            date,
        } => {
            let (league, season) = resolve_season(store, &league, &season)?;
            let id = store.add_fixture(&league, &season, date)?;
            Report::changed(format!("Added fixture {id}"))
        }

        Command::EditFixture {
            league,
            season,
            fixture,
            field,
            value,
        } => {
            let (league, season) = resolve_season(store, &league, &season)?;
            let update = FixtureUpdate::parse(&field, &value)?;
            store.update_fixture(&league, &season, &FixtureId::new(fixture.as_str()), update)?;
            Report::changed(format!("Updated {field} of fixture {fixture}"))
        }

        Command::RecordResult {
            league,
            season,
            fixture,
            home,
            away,
        } => {
            let (league, season) = resolve_season(store, &league, &season)?;
            store.record_result(&league, &season, &FixtureId::new(fixture), home, away)?;
            Report::changed(table::standings(store.standings(&league, &season)?))
        }

        Command::RemoveFixture {
            league,
            season,
            fixture,
        } => {
            let (league, season) = resolve_season(store, &league, &season)?;
            let removed = store.remove_fixture(&league, &season, &FixtureId::new(fixture))?;
            Report::changed(format!(
                "Removed fixture {} v {}",
                removed.home_team, removed.away_team
            ))
        }

        Command::Standings { league, season } => {
            let (league, season) = resolve_season(store, &league, &season)?;
            Report::show(table::standings(store.standings(&league, &season)?))
        }

        Command::Players { league, season } => {
            let (league, season) = resolve_season(store, &league, &season)?;
            Report::show(table::players(&store.player_stats(&league, &season)?))
        }

        Command::EditStanding {
            league,
            season,
            team,
            column,
            value,
        } => {
            let (league, season) = resolve_season(store, &league, &season)?;
            let update = StandingUpdate::parse(&column, &value)?;
            store.update_standing(&league, &season, &team, update)?;
            Report::changed(table::standings(store.standings(&league, &season)?))
        }

        Command::Recalculate { league, season } => {
            let (league, season) = resolve_season(store, &league, &season)?;
            Report::changed(table::standings(store.recalculate_standings(&league, &season)?))
        }

        Command::Import {
            kind,
            league,
            season,
            file,
        } => {
            let (league, season) = resolve_season(store, &league, &season)?;
            let rows = import_file(&file, kind)
                .with_context(|| format!("failed to import {}", file.display()))?;
            let count = rows.len();
            store.override_standings(&league, &season, rows)?;
            Report::changed(format!(
                "Imported {count} row(s)\n\n{}",
                table::standings(store.standings(&league, &season)?)
            ))
        }

        Command::Search {
            league,
            season,
            query,
        } => {
            let (league, season) = resolve_season(store, &league, &season)?;
            let results = search(store.season(&league, &season)?, &query);
            Report::show(table::search(&query, &results))
        }

        Command::Settings { field, value } => match (field, value) {
            (Some(field), Some(value)) => {
                store.update_settings(SettingsUpdate::parse(&field, &value)?);
                Report::changed(format!("Set {field} to {}", value.trim()))
            }
            (Some(field), None) => bail!("missing value for setting `{field}`"),
            _ => {
                let s = store.settings();
                Report::show(format!(
                    "League name:        {}\nSeason number:      {}\nDefault match day:  {}\nDefault match time: {}",
                    s.league_name, s.season_number, s.default_match_day, s.default_match_time
                ))
            }
        },

        Command::Reset { yes } => {
            if !yes {
                bail!("reset deletes every league; run again with --yes to confirm");
            }
            *store = LeagueStore::new(config.settings.clone());
            store.initialize();
            Report {
                text: "All data cleared; sample league restored.".to_string(),
                modified: true,
                reset: true,
            }
        }
    };
    Ok(report)
}

/// `NAME[:POSITION[:AGE]]`. Age defaults to 18.
fn parse_squad_member(raw: &str) -> Result<SquadMember, String> {
    let mut parts = raw.split(':').map(str::trim);
    let name = parts.next().unwrap_or_default();
    if name.is_empty() {
        return Err("player name must not be empty".to_string());
    }
    let position: Position = parts.next().unwrap_or_default().parse()?;
    let age = match parts.next() {
        None | Some("") => 18,
        Some(age) => age.parse().map_err(|_| format!("invalid age `{age}`"))?,
    };
    if parts.next().is_some() {
        return Err(format!("expected NAME[:POSITION[:AGE]], got `{raw}`"));
    }
    Ok(SquadMember::new(name, position, age))
}

/// League id for `key`, matching ids first and then names.
fn resolve_league(store: &LeagueStore, key: &str) -> anyhow::Result<String> {
    let key = key.trim();
    if let Ok(league) = store.league(key) {
        return Ok(league.id.clone());
    }
    let found: Vec<_> = store
        .leagues()
        .iter()
        .filter(|l| l.name.eq_ignore_ascii_case(key))
        .collect();
    match found.as_slice() {
        [league] => Ok(league.id.clone()),
        [] => bail!("no league with id or name `{key}`"),
        _ => bail!("more than one league is named `{key}`; use its id"),
    }
}

/// (league id, season id) for the given keys.
fn resolve_season(
    store: &LeagueStore,
    league_key: &str,
    season_key: &str,
) -> anyhow::Result<(String, String)> {
    let league_id = resolve_league(store, league_key)?;
    let league = store.league(&league_id)?;
    let key = season_key.trim();
    if let Some(season) = league.season(key) {
        return Ok((league_id, season.id.clone()));
    }
    let found: Vec<_> = league
        .seasons
        .iter()
        .filter(|s| s.name.eq_ignore_ascii_case(key))
        .collect();
    match found.as_slice() {
        [season] => Ok((league_id, season.id.clone())),
        [] => bail!("no season with id or name `{key}` in {}", league.name),
        _ => bail!("more than one season is named `{key}`; use its id"),
    }
}

fn init_tracing(base_dir: &Path) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = base_dir.join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("matchday.log"))
        .context("failed to open log file")?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("matchday=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use matchday_app::config::ScheduleDefaults;
    use matchday_app::store::LeagueSettings;

    fn test_config() -> Config {
        Config {
            settings: LeagueSettings::default(),
            schedule: ScheduleDefaults {
                start_month: 8,
                end_month: 4,
                match_days: vec![Weekday::Sat],
                match_times: vec![KickoffTime::afternoon()],
                ruleset: Ruleset::RoundRobin,
            },
            db_path: PathBuf::from(":memory:"),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
    }

    fn run(store: &mut LeagueStore, args: &[&str]) -> anyhow::Result<Report> {
        let cli = Cli::try_parse_from(std::iter::once("matchday").chain(args.iter().copied()))?;
        execute(cli.command, store, &test_config(), today())
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn season_commands_accept_names() {
        let mut store = LeagueStore::default();
        run(&mut store, &["add-league", "Parks League"]).unwrap();
        let report = run(
            &mut store,
            &["add-season", "parks league", "Autumn", "--teams", "Ash, Birch, Cedar, Damson"],
        )
        .unwrap();
        assert!(report.modified);

        let season = &store.leagues()[0].seasons[0];
        assert_eq!(season.teams.len(), 4);
        assert_eq!((season.start_month, season.end_month), (8, 4));

        let report = run(&mut store, &["generate", "Parks League", "Autumn"]).unwrap();
        assert!(report.text.starts_with("Generated 6 round-robin fixtures"));
        let fixtures = &store.leagues()[0].seasons[0].fixtures;
        let window_start = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        assert!(fixtures.iter().all(|f| f.date >= window_start));
    }

    #[test]
    fn season_options_override_config() {
        let mut store = LeagueStore::default();
        run(&mut store, &["add-league", "L"]).unwrap();
        run(
            &mut store,
            &[
                "add-season", "L", "S", "--teams", "A,B", "--start-month", "0", "--end-month",
                "2", "--match-days", "Sat,Sun", "--match-times", "10:00,12:30",
            ],
        )
        .unwrap();
        let season = &store.leagues()[0].seasons[0];
        assert_eq!(season.match_days, vec![Weekday::Sat, Weekday::Sun]);
        assert_eq!(season.match_times.len(), 2);
        assert_eq!(season.end_month, 2);
    }

    #[test]
    fn result_updates_table() {
        let mut store = LeagueStore::default();
        store.initialize();
        let report = run(&mut store, &["result", "1", "Season 13", "5", "0", "2"]).unwrap();
        assert!(report.modified);
        let standings = store.standings("1", "1").unwrap();
        assert_eq!(standings[0].team, "ORANGE");
        assert!(standings.iter().any(|r| r.team == "SKY BLUE" && r.points == 3));
    }

    #[test]
    fn read_only_commands_do_not_save() {
        let mut store = LeagueStore::default();
        store.initialize();
        for args in [
            vec!["leagues"],
            vec!["standings", "1", "1"],
            vec!["fixtures", "1", "1", "--unplayed"],
            vec!["players", "1", "1"],
            vec!["search", "1", "1", "blue"],
            vec!["rulesets"],
            vec!["settings"],
            vec!["squad", "1", "1", "BLUE"],
        ] {
            let report = run(&mut store, &args).unwrap();
            assert!(!report.modified, "{args:?}");
        }
    }

    #[test]
    fn unplayed_filter() {
        let mut store = LeagueStore::default();
        store.initialize();
        let report = run(&mut store, &["fixtures", "1", "1", "--unplayed"]).unwrap();
        // Header, rule, two unplayed fixtures.
        assert_eq!(report.text.lines().count(), 4);
    }

    #[test]
    fn edit_fixture_uses_field_names() {
        let mut store = LeagueStore::default();
        store.initialize();
        run(&mut store, &["edit-fixture", "1", "1", "6", "time", "18:30"]).unwrap();
        let fixture = store.season("1", "1").unwrap().fixtures[5].clone();
        assert_eq!(fixture.time.to_string(), "18:30");
        assert!(run(&mut store, &["edit-fixture", "1", "1", "6", "venue", "x"]).is_err());
    }

    #[test]
    fn elimination_is_reported() {
        let mut store = LeagueStore::default();
        store.initialize();
        let err = run(
            &mut store,
            &["generate", "1", "1", "--ruleset", "single-elimination"],
        )
        .err()
        .unwrap();
        assert!(format!("{err:#}").contains("not yet implemented"));
    }

    #[test]
    fn unknown_league_is_reported() {
        let mut store = LeagueStore::default();
        let err = run(&mut store, &["standings", "nope", "1"]).err().unwrap();
        assert!(err.to_string().contains("no league"));
    }

    #[test]
    fn settings_can_be_changed() {
        let mut store = LeagueStore::default();
        let report = run(&mut store, &["settings", "seasonNumber", "14"]).unwrap();
        assert!(report.modified);
        assert_eq!(store.settings().season_number, "14");
        assert!(run(&mut store, &["settings", "seasonNumber"]).is_err());
    }

    #[test]
    fn edit_team_builds_squad() {
        let mut store = LeagueStore::default();
        store.initialize();
        let report = run(
            &mut store,
            &["edit-team", "1", "1", "BLUE", "--add", "Ann:GK:24", "--add", "Bo", "--captain", "Ann"],
        )
        .unwrap();
        assert!(report.modified);
        assert!(report.text.contains("(C)"));
        let blue = store.team("1", "1", "BLUE").unwrap();
        assert_eq!(blue.players.len(), 2);
        assert_eq!(blue.captain().unwrap().name, "Ann");
        assert_eq!(blue.players[1].age, 18);

        run(
            &mut store,
            &["edit-team", "1", "1", "BLUE", "--name", "NAVY", "--remove", "Bo", "--captain", "Ann"],
        )
        .unwrap();
        let navy = store.team("1", "1", "NAVY").unwrap();
        assert_eq!(navy.players.len(), 1);
        let season = store.season("1", "1").unwrap();
        assert!(season.fixtures.iter().all(|f| !f.involves("BLUE")));

        assert!(run(&mut store, &["edit-team", "1", "1", "NAVY", "--captain", "Zed"]).is_err());
        assert!(run(&mut store, &["edit-team", "1", "1", "NAVY", "--remove", "Zed"]).is_err());
        assert!(run(&mut store, &["edit-team", "1", "1", "NAVY", "--add", "Cy:striker"]).is_err());
        assert!(run(&mut store, &["edit-team", "1", "1", "NAVY", "--add", "Cy:FW:old"]).is_err());
    }

    #[test]
    fn squad_member_argument() {
        let member = parse_squad_member(" Ann Lee : df : 30 ").unwrap();
        assert_eq!(member.name, "Ann Lee");
        assert_eq!(member.position, Position::Defender);
        assert_eq!(member.age, 30);
        assert!(parse_squad_member(":GK").is_err());
        assert!(parse_squad_member("Ann:GK:20:x").is_err());
    }

    #[test]
    fn edit_standing_then_recalculate() {
        let mut store = LeagueStore::default();
        store.initialize();
        run(&mut store, &["edit-standing", "1", "1", "PINK", "PTS", "40"]).unwrap();
        let pink = |store: &LeagueStore| {
            store.standings("1", "1").unwrap().iter().find(|r| r.team == "PINK").unwrap().points
        };
        assert_eq!(pink(&store), 40);
        assert!(run(&mut store, &["edit-standing", "1", "1", "PINK", "XG", "1"]).is_err());
        assert!(run(&mut store, &["edit-standing", "1", "1", "NOBODY", "P", "1"]).is_err());

        let report = run(&mut store, &["recalculate", "1", "1"]).unwrap();
        assert!(report.modified);
        let standings = store.standings("1", "1").unwrap();
        assert_eq!(standings[0].team, "ORANGE");
        assert_eq!(pink(&store), 0);
    }

    #[test]
    fn import_by_kind() {
        let dir = std::env::temp_dir().join("matchday_cli_import");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("table.csv");
        std::fs::write(&file, "League table\nTeam,P,W,D,L,GF,GA,GD,PTS\nPINK,9,9,0,0,20,1,19,27\n").unwrap();
        let path = file.to_str().unwrap();

        let mut store = LeagueStore::default();
        store.initialize();
        let report = run(&mut store, &["import", "standings", "1", "1", path]).unwrap();
        assert!(report.text.starts_with("Imported 1 row(s)"));
        assert_eq!(store.standings("1", "1").unwrap()[0].team, "PINK");

        let err = run(&mut store, &["import", "fixtures", "1", "1", path]).err().unwrap();
        assert!(format!("{err:#}").contains("not yet implemented"));
        assert!(run(&mut store, &["import", "results", "1", "1", path]).is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn reset_needs_confirmation() {
        let mut store = LeagueStore::default();
        store.initialize();
        run(&mut store, &["add-league", "Extra"]).unwrap();
        assert!(run(&mut store, &["reset"]).is_err());
        assert_eq!(store.leagues().len(), 2);

        let report = run(&mut store, &["reset", "--yes"]).unwrap();
        assert!(report.reset && report.modified);
        assert_eq!(store.leagues().len(), 1);
        assert_eq!(store.leagues()[0].name, "WELL FOUNDATION COMMUNITY LEAGUE");
    }
}
