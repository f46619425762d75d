// Spreadsheet import: standings tables exported as CSV.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, warn};

use matchday_core::standings::TeamStanding;

use crate::store::{parse_count_lenient, parse_int_lenient};

/// Cells a standings row needs before it is read: Team through GD.
const MIN_ROW_CELLS: usize = 8;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("no header row starting with `Team` found")]
    MissingHeader,

    #[error("{kind} import is not yet implemented")]
    NotImplemented { kind: ImportKind },

    #[error("unknown import kind `{0}`")]
    UnknownKind(String),
}

/// What a spreadsheet holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Standings,
    Fixtures,
    Players,
}

impl ImportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportKind::Standings => "standings",
            ImportKind::Fixtures => "fixtures",
            ImportKind::Players => "players",
        }
    }
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImportKind {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standings" => Ok(ImportKind::Standings),
            "fixtures" => Ok(ImportKind::Fixtures),
            "players" => Ok(ImportKind::Players),
            _ => Err(ImportError::UnknownKind(s.to_string())),
        }
    }
}

/// Read a standings table exported from a spreadsheet.
///
/// Any banner lines before the header are skipped; the header is the first
/// row whose first cell is `Team`. Each following row is
/// `Team,P,W,D,L,GF,GA,GD,PTS`. Blank or non-numeric cells read as 0, and
/// rows with too few cells or no team name are dropped.
pub fn parse_standings_csv(text: &str) -> Result<Vec<TeamStanding>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut header_seen = false;
    let mut rows = Vec::new();

    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let cell = |i: usize| record.get(i).unwrap_or("");

        if !header_seen {
            header_seen = cell(0).eq_ignore_ascii_case("team");
            if !header_seen {
                debug!("skipping banner line {}", line + 1);
            }
            continue;
        }

        if record.len() < MIN_ROW_CELLS {
            warn!(
                "skipping standings line {}: {} cell(s), need {MIN_ROW_CELLS}",
                line + 1,
                record.len()
            );
            continue;
        }
        if cell(0).is_empty() {
            warn!("skipping standings line {}: no team name", line + 1);
            continue;
        }

        rows.push(TeamStanding {
            team: cell(0).to_string(),
            played: parse_count_lenient(cell(1)),
            won: parse_count_lenient(cell(2)),
            drawn: parse_count_lenient(cell(3)),
            lost: parse_count_lenient(cell(4)),
            goals_for: parse_count_lenient(cell(5)),
            goals_against: parse_count_lenient(cell(6)),
            goal_difference: parse_int_lenient(cell(7)),
            points: parse_count_lenient(cell(8)),
        });
    }

    if !header_seen {
        return Err(ImportError::MissingHeader);
    }
    Ok(rows)
}

/// Import a spreadsheet file of the given kind. Only standings are
/// supported so far.
pub fn import_file(path: &Path, kind: ImportKind) -> Result<Vec<TeamStanding>, ImportError> {
    if kind != ImportKind::Standings {
        return Err(ImportError::NotImplemented { kind });
    }
    let text = std::fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_standings_csv(&text)
}
