// Configuration loading and parsing (config/matchday.toml).

use std::path::{Path, PathBuf};

use chrono::Weekday;
use serde::Deserialize;
use thiserror::Error;

use matchday_core::model::KickoffTime;
use matchday_core::schedule::Ruleset;

use crate::store::LeagueSettings;

/// Name of the single config file, both in `defaults/` and `config/`.
pub const CONFIG_FILE: &str = "matchday.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    /// Initial settings for a fresh store.
    pub settings: LeagueSettings,
    pub schedule: ScheduleDefaults,
    pub db_path: PathBuf,
}

/// Defaults offered when creating a season or generating fixtures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleDefaults {
    pub start_month: u32,
    pub end_month: u32,
    pub match_days: Vec<Weekday>,
    pub match_times: Vec<KickoffTime>,
    pub ruleset: Ruleset,
}

// ---------------------------------------------------------------------------
// matchday.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for matchday.toml. Day, time and ruleset
/// values stay strings until `validate` so errors can name the field.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    settings: SettingsSection,
    schedule: ScheduleSection,
    #[serde(default)]
    database: DatabaseSection,
}

#[derive(Debug, Clone, Deserialize)]
struct SettingsSection {
    league_name: String,
    season_number: String,
    default_match_day: String,
    default_match_time: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ScheduleSection {
    start_month: u32,
    end_month: u32,
    match_days: Vec<String>,
    match_times: Vec<String>,
    ruleset: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DatabaseSection {
    path: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/matchday.toml` relative to `base_dir`.
///
/// Does not copy defaults; `load_config` does that first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let config = validate(file, base_dir)?;
    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or pass --config-dir",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }

        let target = config_dir.join(file_name);
        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            // Never overwrite a user's edited copy.
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Copy missing defaults into `base_dir/config/` and load the result.
pub fn load_config(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_config_files(base_dir)?;
    load_config_from(base_dir)
}

/// Default database location when the config leaves `database.path` out.
pub fn default_db_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "matchday")
        .map(|dirs| dirs.data_dir().join("matchday.db"))
        .unwrap_or_else(|| PathBuf::from("matchday.db"))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

fn parse_weekday(field: &str, raw: &str) -> Result<Weekday, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| invalid(field, format!("`{raw}` is not a day of the week")))
}

fn parse_kickoff(field: &str, raw: &str) -> Result<KickoffTime, ConfigError> {
    raw.parse()
        .map_err(|_| invalid(field, format!("`{raw}` is not an HH:MM time")))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(file: ConfigFile, base_dir: &Path) -> Result<Config, ConfigError> {
    let settings = &file.settings;
    if settings.league_name.trim().is_empty() {
        return Err(invalid("settings.league_name", "must not be empty"));
    }
    let default_match_day =
        parse_weekday("settings.default_match_day", &settings.default_match_day)?;
    let default_match_time =
        parse_kickoff("settings.default_match_time", &settings.default_match_time)?;

    let schedule = &file.schedule;
    for (field, value) in [
        ("schedule.start_month", schedule.start_month),
        ("schedule.end_month", schedule.end_month),
    ] {
        if value > 11 {
            return Err(invalid(field, format!("must be between 0 and 11, got {value}")));
        }
    }

    if schedule.match_days.is_empty() {
        return Err(invalid("schedule.match_days", "must list at least one day"));
    }
    let match_days = schedule
        .match_days
        .iter()
        .map(|d| parse_weekday("schedule.match_days", d))
        .collect::<Result<Vec<_>, _>>()?;

    if schedule.match_times.is_empty() {
        return Err(invalid("schedule.match_times", "must list at least one time"));
    }
    let match_times = schedule
        .match_times
        .iter()
        .map(|t| parse_kickoff("schedule.match_times", t))
        .collect::<Result<Vec<_>, _>>()?;

    let ruleset: Ruleset = schedule
        .ruleset
        .parse()
        .map_err(|e: matchday_core::schedule::ScheduleError| {
            invalid("schedule.ruleset", e.to_string())
        })?;

    let db_path = match file.database.path.as_deref() {
        Some(p) if p.trim().is_empty() => {
            return Err(invalid("database.path", "must not be empty when set"));
        }
        Some(":memory:") => PathBuf::from(":memory:"),
        Some(p) if Path::new(p).is_relative() => base_dir.join(p),
        Some(p) => PathBuf::from(p),
        None => default_db_path(),
    };

    Ok(Config {
        settings: LeagueSettings {
            league_name: settings.league_name.trim().to_string(),
            season_number: settings.season_number.trim().to_string(),
            default_match_day,
            default_match_time,
        },
        schedule: ScheduleDefaults {
            start_month: schedule.start_month,
            end_month: schedule.end_month,
            match_days,
            match_times,
            ruleset,
        },
        db_path,
    })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Helper: the workspace root holding `defaults/`, whether tests run from
    /// the crate directory or the workspace root.
    fn project_root() -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        cwd.ancestors()
            .find(|dir| dir.join("defaults").join(CONFIG_FILE).exists())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| panic!("Cannot locate defaults/ directory from CWD {:?}", cwd))
    }

    /// Helper: a scratch dir with `config/matchday.toml` holding `text`.
    fn config_with(name: &str, text: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config").join(CONFIG_FILE), text).unwrap();
        tmp
    }

    fn default_text() -> String {
        fs::read_to_string(project_root().join("defaults").join(CONFIG_FILE)).unwrap()
    }

    fn expect_field(err: ConfigError, expected: &str) {
        match err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, expected),
            other => panic!("expected ValidationError for {expected}, got: {other}"),
        }
    }

    #[test]
    fn load_valid_config_from_defaults() {
        let tmp = config_with("matchday_config_valid", &default_text());
        let config = load_config_from(&tmp).expect("should load default config");

        assert_eq!(config.settings.league_name, "Soccer League Manager");
        assert_eq!(config.settings.season_number, "1");
        assert_eq!(config.settings.default_match_day, Weekday::Sat);
        assert_eq!(config.settings.default_match_time.to_string(), "15:00");

        assert_eq!(config.schedule.start_month, 0);
        assert_eq!(config.schedule.end_month, 11);
        assert_eq!(config.schedule.match_days, vec![Weekday::Sat]);
        assert_eq!(config.schedule.match_times.len(), 1);
        assert_eq!(config.schedule.ruleset, Ruleset::RoundRobin);

        assert_eq!(config.db_path, tmp.join("matchday.db"));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_database_section_uses_data_dir() {
        let text = default_text().replace("[database]\npath = \"matchday.db\"", "");
        let tmp = config_with("matchday_config_no_db", &text);
        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.db_path, default_db_path());
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_month_out_of_range() {
        let text = default_text().replace("start_month = 0", "start_month = 12");
        let tmp = config_with("matchday_config_bad_month", &text);
        expect_field(load_config_from(&tmp).unwrap_err(), "schedule.start_month");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_empty_match_days() {
        let text = default_text().replace("match_days = [\"Saturday\"]", "match_days = []");
        let tmp = config_with("matchday_config_no_days", &text);
        expect_field(load_config_from(&tmp).unwrap_err(), "schedule.match_days");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_unknown_weekday() {
        let text = default_text().replace("match_days = [\"Saturday\"]", "match_days = [\"Caturday\"]");
        let tmp = config_with("matchday_config_bad_day", &text);
        expect_field(load_config_from(&tmp).unwrap_err(), "schedule.match_days");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_bad_match_time() {
        let text = default_text().replace("match_times = [\"15:00\"]", "match_times = [\"3pm\"]");
        let tmp = config_with("matchday_config_bad_time", &text);
        expect_field(load_config_from(&tmp).unwrap_err(), "schedule.match_times");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_bad_default_match_time() {
        let text = default_text().replace("default_match_time = \"15:00\"", "default_match_time = \"99:00\"");
        let tmp = config_with("matchday_config_bad_default_time", &text);
        expect_field(load_config_from(&tmp).unwrap_err(), "settings.default_match_time");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_unknown_ruleset() {
        let text = default_text().replace("ruleset = \"round-robin\"", "ruleset = \"swiss\"");
        let tmp = config_with("matchday_config_bad_ruleset", &text);
        expect_field(load_config_from(&tmp).unwrap_err(), "schedule.ruleset");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_blank_database_path() {
        let text = default_text().replace("path = \"matchday.db\"", "path = \" \"");
        let tmp = config_with("matchday_config_blank_db", &text);
        expect_field(load_config_from(&tmp).unwrap_err(), "database.path");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_config() {
        let tmp = std::env::temp_dir().join("matchday_config_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();

        match load_config_from(&tmp).unwrap_err() {
            ConfigError::FileNotFound { path } => assert!(path.ends_with(CONFIG_FILE)),
            other => panic!("expected FileNotFound, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = config_with("matchday_config_invalid_toml", "this is not valid [[[ toml");
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ParseError { path, .. } => assert!(path.ends_with(CONFIG_FILE)),
            other => panic!("expected ParseError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_copies_missing_files() {
        let tmp = std::env::temp_dir().join("matchday_config_ensure_copies");
        let _ = fs::remove_dir_all(&tmp);
        let defaults_dir = tmp.join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::write(defaults_dir.join(CONFIG_FILE), default_text()).unwrap();
        fs::write(defaults_dir.join("matchday.toml.example"), "# template\n").unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert_eq!(copied.len(), 1);
        assert!(tmp.join("config").join(CONFIG_FILE).exists());
        assert!(!tmp.join("config/matchday.toml.example").exists());

        // Copy-then-load works end to end.
        assert!(load_config(&tmp).is_ok());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_skips_existing() {
        let tmp = std::env::temp_dir().join("matchday_config_ensure_skips");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("defaults").join(CONFIG_FILE), default_text()).unwrap();
        fs::write(tmp.join("config").join(CONFIG_FILE), "# custom\n").unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert!(copied.is_empty());
        let content = fs::read_to_string(tmp.join("config").join(CONFIG_FILE)).unwrap();
        assert_eq!(content, "# custom\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = std::env::temp_dir().join("matchday_config_both_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        match ensure_config_files(&tmp).unwrap_err() {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains("neither defaults/ nor config/"));
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }
}
