// League, season, team and fixture records.
//
// Field names serialize in camelCase so a saved store keeps the same JSON
// shape the web front end reads.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use crate::standings::TeamStanding;

// ---------------------------------------------------------------------------
// Kickoff time
// ---------------------------------------------------------------------------

/// A kickoff time of day, written and read as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KickoffTime(NaiveTime);

impl KickoffTime {
    const FORMAT: &'static str = "%H:%M";

    /// Build a kickoff time from hour and minute. Returns `None` when either
    /// component is out of range.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// The customary 15:00 kickoff.
    pub fn afternoon() -> Self {
        Self(NaiveTime::from_hms_opt(15, 0, 0).unwrap_or_default())
    }
}

impl fmt::Display for KickoffTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

impl FromStr for KickoffTime {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), Self::FORMAT).map(Self)
    }
}

impl Serialize for KickoffTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for KickoffTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse()
            .map_err(|e| de::Error::custom(format!("invalid kickoff time {raw:?}: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Teams and players
// ---------------------------------------------------------------------------

/// Playing position on a squad sheet. Serialized as the short code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    #[default]
    #[serde(rename = "")]
    Unassigned,
    #[serde(rename = "GK")]
    Goalkeeper,
    #[serde(rename = "DF")]
    Defender,
    #[serde(rename = "MF")]
    Midfielder,
    #[serde(rename = "FW")]
    Forward,
}

impl Position {
    pub fn code(&self) -> &'static str {
        match self {
            Position::Unassigned => "",
            Position::Goalkeeper => "GK",
            Position::Defender => "DF",
            Position::Midfielder => "MF",
            Position::Forward => "FW",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Position {
    type Err = String;

    /// Accepts the short code or the full name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" => Ok(Position::Unassigned),
            "gk" | "goalkeeper" => Ok(Position::Goalkeeper),
            "df" | "defender" => Ok(Position::Defender),
            "mf" | "midfielder" => Ok(Position::Midfielder),
            "fw" | "forward" => Ok(Position::Forward),
            other => Err(format!("unknown position `{other}` (expected GK, DF, MF or FW)")),
        }
    }
}

/// One player on a team's squad sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SquadMember {
    /// Assigned by the store when a member is first saved.
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub age: u32,
    #[serde(default)]
    pub is_captain: bool,
}

impl SquadMember {
    pub fn new(name: impl Into<String>, position: Position, age: u32) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            position,
            age,
            is_captain: false,
        }
    }
}

/// A team in a season's roster. The display name is the team's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    /// Squad sheet. Stores saved before squads existed load with none.
    #[serde(default)]
    pub players: Vec<SquadMember>,
}

impl Team {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            players: Vec::new(),
        }
    }

    pub fn captain(&self) -> Option<&SquadMember> {
        self.players.iter().find(|p| p.is_captain)
    }

    /// Make the named player captain and every other player not.
    /// Returns false, changing nothing, when no player has that name.
    pub fn appoint_captain(&mut self, name: &str) -> bool {
        if !self.players.iter().any(|p| p.name == name) {
            return false;
        }
        for player in &mut self.players {
            player.is_captain = player.name == name;
        }
        true
    }
}

/// A player referenced from match detail. Statistics are keyed by `name`,
/// so two players sharing a name share one stats line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub team: String,
}

impl Player {
    pub fn new(name: impl Into<String>, team: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            team: team.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Match detail
// ---------------------------------------------------------------------------

/// A goal event. Goals are listed under the side they count for, so an own
/// goal sits in the benefiting team's list while `player` names the
/// defender who scored it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub player: Player,
    #[serde(default)]
    pub is_own_goal: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PenaltyKind {
    /// Temporary suspension.
    SinBin,
    /// Expulsion.
    RedCard,
}

impl fmt::Display for PenaltyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PenaltyKind::SinBin => write!(f, "sin-bin"),
            PenaltyKind::RedCard => write!(f, "red card"),
        }
    }
}

/// A disciplinary event. No effect on the score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Penalty {
    pub player: Player,
    #[serde(rename = "type")]
    pub kind: PenaltyKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDetails {
    #[serde(default)]
    pub home_goals: Vec<Goal>,
    #[serde(default)]
    pub away_goals: Vec<Goal>,
    #[serde(default)]
    pub penalties: Vec<Penalty>,
}

impl MatchDetails {
    /// All goal events, home list first.
    pub fn goals(&self) -> impl Iterator<Item = &Goal> {
        self.home_goals.iter().chain(self.away_goals.iter())
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Opaque fixture identity, unique within a season.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixtureId(String);

impl FixtureId {
    const RETURN_PREFIX: &'static str = "return-";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id of a generated first-leg fixture: `{round}-{position}`.
    pub fn first_leg(round: usize, position: usize) -> Self {
        Self(format!("{round}-{position}"))
    }

    /// Id of the return leg mirroring this fixture.
    pub fn return_leg(&self) -> Self {
        Self(format!("{}{}", Self::RETURN_PREFIX, self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FixtureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One scheduled match. Scores only count once `played` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    pub id: FixtureId,
    pub home_team: String,
    pub away_team: String,
    pub date: NaiveDate,
    pub time: KickoffTime,
    pub played: bool,
    #[serde(default)]
    pub home_score: u32,
    #[serde(default)]
    pub away_score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_details: Option<MatchDetails>,
}

impl Fixture {
    /// A new, unplayed fixture with zero scores and no match detail.
    pub fn scheduled(
        id: FixtureId,
        home_team: impl Into<String>,
        away_team: impl Into<String>,
        date: NaiveDate,
        time: KickoffTime,
    ) -> Self {
        Self {
            id,
            home_team: home_team.into(),
            away_team: away_team.into(),
            date,
            time,
            played: false,
            home_score: 0,
            away_score: 0,
            match_details: None,
        }
    }

    /// The unplayed return leg of this fixture with home and away swapped.
    pub fn return_leg(&self, date: NaiveDate, time: KickoffTime) -> Self {
        Self::scheduled(
            self.id.return_leg(),
            self.away_team.clone(),
            self.home_team.clone(),
            date,
            time,
        )
    }

    /// `(home, away)` score when the match has been played.
    pub fn result(&self) -> Option<(u32, u32)> {
        self.played.then_some((self.home_score, self.away_score))
    }

    pub fn involves(&self, team: &str) -> bool {
        self.home_team == team || self.away_team == team
    }

    /// Replace every reference to `old` with `new`. Returns whether anything
    /// changed.
    pub fn rename_team(&mut self, old: &str, new: &str) -> bool {
        let mut changed = false;
        if self.home_team == old {
            self.home_team = new.to_string();
            changed = true;
        }
        if self.away_team == old {
            self.away_team = new.to_string();
            changed = true;
        }
        changed
    }
}

// ---------------------------------------------------------------------------
// Seasons and leagues
// ---------------------------------------------------------------------------

/// A season owns its teams and fixtures. `standings` is a cache rebuilt from
/// the fixtures after every fixture change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub id: String,
    pub name: String,
    pub teams: Vec<Team>,
    #[serde(default)]
    pub fixtures: Vec<Fixture>,
    #[serde(default)]
    pub standings: Vec<TeamStanding>,
    /// First month of play, 0 = January.
    pub start_month: u32,
    /// Last month of play, inclusive. Earlier than `start_month` means the
    /// season runs into the next year.
    pub end_month: u32,
    #[serde(rename = "defaultMatchDays")]
    pub match_days: Vec<Weekday>,
    #[serde(rename = "defaultMatchTimes")]
    pub match_times: Vec<KickoffTime>,
    /// Sequence for manually added fixture ids.
    #[serde(default)]
    pub next_fixture_seq: u64,
}

impl Season {
    pub fn team_names(&self) -> Vec<String> {
        self.teams.iter().map(|t| t.name.clone()).collect()
    }

    pub fn has_team(&self, name: &str) -> bool {
        self.teams.iter().any(|t| t.name == name)
    }

    pub fn fixture(&self, id: &FixtureId) -> Option<&Fixture> {
        self.fixtures.iter().find(|f| &f.id == id)
    }

    pub fn fixture_mut(&mut self, id: &FixtureId) -> Option<&mut Fixture> {
        self.fixtures.iter_mut().find(|f| &f.id == id)
    }

    /// Allocate a fixture id for a manually added fixture. Never hands out
    /// the same id twice for this season.
    pub fn allocate_fixture_id(&mut self) -> FixtureId {
        loop {
            self.next_fixture_seq += 1;
            let id = FixtureId::new(format!("manual-{}", self.next_fixture_seq));
            if self.fixture(&id).is_none() {
                return id;
            }
        }
    }

    pub fn played_count(&self) -> usize {
        self.fixtures.iter().filter(|f| f.played).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct League {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub seasons: Vec<Season>,
}

impl League {
    pub fn season(&self, id: &str) -> Option<&Season> {
        self.seasons.iter().find(|s| s.id == id)
    }

    pub fn season_mut(&mut self, id: &str) -> Option<&mut Season> {
        self.seasons.iter_mut().find(|s| s.id == id)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
