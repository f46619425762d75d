// Standings table and player statistics, rebuilt from a season's fixtures.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{Fixture, PenaltyKind, Team};

pub const WIN_POINTS: u32 = 3;
pub const DRAW_POINTS: u32 = 1;

// ---------------------------------------------------------------------------
// Team standings
// ---------------------------------------------------------------------------

/// One row of the league table. Serialized with the short column headings
/// used by the table views and standings spreadsheets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStanding {
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "P")]
    pub played: u32,
    #[serde(rename = "W")]
    pub won: u32,
    #[serde(rename = "D")]
    pub drawn: u32,
    #[serde(rename = "L")]
    pub lost: u32,
    #[serde(rename = "GF")]
    pub goals_for: u32,
    #[serde(rename = "GA")]
    pub goals_against: u32,
    #[serde(rename = "GD")]
    pub goal_difference: i64,
    #[serde(rename = "PTS")]
    pub points: u32,
}

impl TeamStanding {
    /// A zeroed row.
    pub fn new(team: impl Into<String>) -> Self {
        Self {
            team: team.into(),
            played: 0,
            won: 0,
            drawn: 0,
            lost: 0,
            goals_for: 0,
            goals_against: 0,
            goal_difference: 0,
            points: 0,
        }
    }

    /// Add one played match from this team's point of view. Counters
    /// saturate at `u32::MAX` rather than wrap.
    pub fn record_result(&mut self, scored: u32, conceded: u32) {
        self.played = self.played.saturating_add(1);
        self.goals_for = self.goals_for.saturating_add(scored);
        self.goals_against = self.goals_against.saturating_add(conceded);

        match scored.cmp(&conceded) {
            Ordering::Greater => {
                self.won = self.won.saturating_add(1);
                self.points = self.points.saturating_add(WIN_POINTS);
            }
            Ordering::Equal => {
                self.drawn = self.drawn.saturating_add(1);
                self.points = self.points.saturating_add(DRAW_POINTS);
            }
            Ordering::Less => self.lost = self.lost.saturating_add(1),
        }
    }

    pub fn refresh_goal_difference(&mut self) {
        self.goal_difference = i64::from(self.goals_for) - i64::from(self.goals_against);
    }

    /// `P = W + D + L` and `GD = GF - GA`.
    pub fn is_consistent(&self) -> bool {
        let decided = u64::from(self.won) + u64::from(self.drawn) + u64::from(self.lost);
        u64::from(self.played) == decided
            && self.goal_difference == i64::from(self.goals_for) - i64::from(self.goals_against)
    }
}

type CmpFunc = fn(&TeamStanding, &TeamStanding) -> Ordering;

fn compare_points(a: &TeamStanding, b: &TeamStanding) -> Ordering {
    b.points.cmp(&a.points)
}

fn compare_goal_difference(a: &TeamStanding, b: &TeamStanding) -> Ordering {
    b.goal_difference.cmp(&a.goal_difference)
}

fn compare_goals_for(a: &TeamStanding, b: &TeamStanding) -> Ordering {
    b.goals_for.cmp(&a.goals_for)
}

/// Ranking criteria in priority order. Rows equal on all of them keep their
/// roster order.
const RANKING: [CmpFunc; 3] = [compare_points, compare_goal_difference, compare_goals_for];

fn compare_rows(a: &TeamStanding, b: &TeamStanding) -> Ordering {
    RANKING
        .iter()
        .map(|cmp| cmp(a, b))
        .find(|ord| *ord != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

/// Build the ranked table for `teams` from the played fixtures.
///
/// Every roster team gets a row even with nothing played. A fixture side
/// naming a team outside the roster is skipped; the other side still counts.
pub fn compute_standings(teams: &[Team], fixtures: &[Fixture]) -> Vec<TeamStanding> {
    let mut rows: Vec<TeamStanding> = Vec::with_capacity(teams.len());
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(teams.len());
    for team in teams {
        if !index.contains_key(team.name.as_str()) {
            index.insert(team.name.as_str(), rows.len());
            rows.push(TeamStanding::new(team.name.as_str()));
        }
    }

    for fixture in fixtures {
        let Some((home_score, away_score)) = fixture.result() else {
            continue;
        };

        match index.get(fixture.home_team.as_str()) {
            Some(&i) => rows[i].record_result(home_score, away_score),
            None => debug!(
                "fixture {}: home team '{}' not in roster, skipped",
                fixture.id, fixture.home_team
            ),
        }
        match index.get(fixture.away_team.as_str()) {
            Some(&i) => rows[i].record_result(away_score, home_score),
            None => debug!(
                "fixture {}: away team '{}' not in roster, skipped",
                fixture.id, fixture.away_team
            ),
        }
    }

    for row in &mut rows {
        row.refresh_goal_difference();
    }

    // Stable: ties on every criterion keep roster order.
    rows.sort_by(compare_rows);
    rows
}

// ---------------------------------------------------------------------------
// Player statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub goals: u32,
    /// Reserved: no match event records assists yet.
    pub assists: u32,
    pub own_goals: u32,
    pub sin_bins: u32,
    pub red_cards: u32,
}

impl PlayerStats {
    pub fn record_goal(&mut self, own_goal: bool) {
        if own_goal {
            self.own_goals += 1;
        } else {
            self.goals += 1;
        }
    }

    pub fn record_penalty(&mut self, kind: PenaltyKind) {
        match kind {
            PenaltyKind::SinBin => self.sin_bins += 1,
            PenaltyKind::RedCard => self.red_cards += 1,
        }
    }
}

/// Aggregate goal and discipline events from played fixtures, keyed by
/// player name.
pub fn compute_player_stats(fixtures: &[Fixture]) -> BTreeMap<String, PlayerStats> {
    let mut stats: BTreeMap<String, PlayerStats> = BTreeMap::new();

    for fixture in fixtures.iter().filter(|f| f.played) {
        let Some(details) = &fixture.match_details else {
            continue;
        };

        for goal in details.goals() {
            stats
                .entry(goal.player.name.clone())
                .or_default()
                .record_goal(goal.is_own_goal);
        }
        for penalty in &details.penalties {
            stats
                .entry(penalty.player.name.clone())
                .or_default()
                .record_penalty(penalty.kind);
        }
    }

    stats
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
