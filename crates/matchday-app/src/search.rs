// Case-insensitive lookup of teams and fixtures within a season.

use matchday_core::model::{Fixture, Season};
use matchday_core::standings::TeamStanding;

#[derive(Debug, Default)]
pub struct SearchResults<'a> {
    /// Matching rows of the league table.
    pub teams: Vec<&'a TeamStanding>,
    /// Fixtures where either side matches.
    pub fixtures: Vec<&'a Fixture>,
}

impl SearchResults<'_> {
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty() && self.fixtures.is_empty()
    }
}

/// Substring search over the season's table and fixture list. A blank
/// query matches nothing.
pub fn search<'a>(season: &'a Season, query: &str) -> SearchResults<'a> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return SearchResults::default();
    }
    let matches = |name: &str| name.to_lowercase().contains(&needle);

    SearchResults {
        teams: season
            .standings
            .iter()
            .filter(|row| matches(&row.team))
            .collect(),
        fixtures: season
            .fixtures
            .iter()
            .filter(|f| matches(&f.home_team) || matches(&f.away_team))
            .collect(),
    }
}
