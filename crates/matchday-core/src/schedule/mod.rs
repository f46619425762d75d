// Fixture generation: round-robin pairings laid onto the season's allowed
// weekdays and kickoff times.

mod pairing;
mod slots;

pub use pairing::{round_robin_rounds, Pairing, BYE};
pub use slots::{slot_dates, ScheduleWindow, SlotCursor};

use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::model::{Fixture, FixtureId, KickoffTime};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("{ruleset} fixture generation is not yet implemented")]
    NotImplemented { ruleset: Ruleset },

    #[error("unknown ruleset `{0}`")]
    UnknownRuleset(String),

    #[error("at least 2 teams are needed to generate fixtures, got {count}")]
    NotEnoughTeams { count: usize },

    #[error("no match days selected")]
    NoMatchDays,

    #[error("no match times selected")]
    NoMatchTimes,

    #[error("{field} must be a month between 0 and 11, got {value}")]
    InvalidMonth { field: &'static str, value: u32 },

    #[error("no allowed match day falls inside the season window")]
    NoSlotDates,
}

// ---------------------------------------------------------------------------
// Rulesets
// ---------------------------------------------------------------------------

/// Competition format used to build a season's calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ruleset {
    /// Every team plays every other team once.
    RoundRobin,
    /// Every team plays every other team twice, home and away.
    DoubleRoundRobin,
    SingleElimination,
    DoubleElimination,
}

impl Ruleset {
    pub const ALL: [Ruleset; 4] = [
        Ruleset::RoundRobin,
        Ruleset::DoubleRoundRobin,
        Ruleset::SingleElimination,
        Ruleset::DoubleElimination,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Ruleset::RoundRobin => "round-robin",
            Ruleset::DoubleRoundRobin => "double-round-robin",
            Ruleset::SingleElimination => "single-elimination",
            Ruleset::DoubleElimination => "double-elimination",
        }
    }

    /// One-line description shown next to the ruleset picker.
    pub fn description(&self) -> &'static str {
        match self {
            Ruleset::RoundRobin => "Each team plays against every other team once.",
            Ruleset::DoubleRoundRobin => {
                "Each team plays against every other team twice (home and away)."
            }
            Ruleset::SingleElimination => "Teams are eliminated after a single loss.",
            Ruleset::DoubleElimination => "Teams are eliminated after two losses.",
        }
    }

    pub fn is_implemented(&self) -> bool {
        matches!(self, Ruleset::RoundRobin | Ruleset::DoubleRoundRobin)
    }
}

impl fmt::Display for Ruleset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ruleset {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Ruleset::ALL
            .into_iter()
            .find(|r| r.as_str() == wanted)
            .ok_or_else(|| ScheduleError::UnknownRuleset(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Everything the generator needs to build a season calendar.
#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    /// Team names in roster order.
    pub teams: Vec<String>,
    pub window: ScheduleWindow,
    pub match_days: Vec<Weekday>,
    /// Kickoff times, cycled in this order.
    pub match_times: Vec<KickoffTime>,
    pub ruleset: Ruleset,
}

/// Build the fixture list for a season.
///
/// Pairings come from [`round_robin_rounds`] and are assigned slots in round
/// order. For a double round-robin every first-leg fixture is followed, after
/// the whole first pass, by its mirrored return leg on the next free slots.
/// When pairings outnumber slots the calendar is reused from the start.
pub fn generate_fixtures(request: &ScheduleRequest) -> Result<Vec<Fixture>, ScheduleError> {
    validate(request)?;

    let dates = slot_dates(&request.window, &request.match_days);
    let mut cursor =
        SlotCursor::new(&dates, &request.match_times).ok_or(ScheduleError::NoSlotDates)?;

    let mut fixtures = Vec::new();
    for round in round_robin_rounds(&request.teams) {
        for pairing in round {
            let (date, time) = cursor.next_slot();
            fixtures.push(Fixture::scheduled(
                FixtureId::first_leg(pairing.round, pairing.position),
                pairing.home,
                pairing.away,
                date,
                time,
            ));
        }
    }

    if request.ruleset == Ruleset::DoubleRoundRobin {
        let first_legs = fixtures.len();
        for i in 0..first_legs {
            let (date, time) = cursor.next_slot();
            let return_leg = fixtures[i].return_leg(date, time);
            fixtures.push(return_leg);
        }
    }

    if fixtures.len() > dates.len() * request.match_times.len() {
        info!(
            "{} fixtures exceed {} available slots; slots were reused",
            fixtures.len(),
            dates.len() * request.match_times.len()
        );
    }
    info!(
        "Generated {} fixtures for {} teams using {}",
        fixtures.len(),
        request.teams.len(),
        request.ruleset
    );

    Ok(fixtures)
}

fn validate(request: &ScheduleRequest) -> Result<(), ScheduleError> {
    if !request.ruleset.is_implemented() {
        return Err(ScheduleError::NotImplemented {
            ruleset: request.ruleset,
        });
    }
    if request.teams.len() < 2 {
        return Err(ScheduleError::NotEnoughTeams {
            count: request.teams.len(),
        });
    }
    if request.match_days.is_empty() {
        return Err(ScheduleError::NoMatchDays);
    }
    if request.match_times.is_empty() {
        return Err(ScheduleError::NoMatchTimes);
    }
    for (field, value) in [
        ("start month", request.window.start_month),
        ("end month", request.window.end_month),
    ] {
        if value > 11 {
            return Err(ScheduleError::InvalidMonth { field, value });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
