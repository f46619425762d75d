// Plain-text tables for terminal output.

use std::collections::BTreeMap;

use matchday_app::search::SearchResults;
use matchday_core::model::{Fixture, League, Team};
use matchday_core::schedule::Ruleset;
use matchday_core::standings::{PlayerStats, TeamStanding};

const RULE: char = '─';

fn rule(width: usize) -> String {
    RULE.to_string().repeat(width)
}

/// Width of the widest name, never narrower than its heading.
fn name_width<'a>(heading: &str, names: impl Iterator<Item = &'a str>) -> usize {
    names
        .map(|n| n.chars().count())
        .max()
        .unwrap_or(0)
        .max(heading.len())
}

pub fn leagues(leagues: &[League]) -> String {
    if leagues.is_empty() {
        return "No leagues yet. Add one with `matchday add-league <name>`.".to_string();
    }
    let mut lines = Vec::new();
    for league in leagues {
        lines.push(format!("{}  [{}]", league.name, league.id));
        if league.seasons.is_empty() {
            lines.push("  (no seasons)".to_string());
        }
        for season in &league.seasons {
            lines.push(format!(
                "  {}  [{}]  {} teams, {}/{} played",
                season.name,
                season.id,
                season.teams.len(),
                season.played_count(),
                season.fixtures.len()
            ));
        }
    }
    lines.join("\n")
}

pub fn standings(rows: &[TeamStanding]) -> String {
    let w = name_width("Team", rows.iter().map(|r| r.team.as_str()));
    let header = format!(
        "{:>3}  {:<w$}  {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>4} {:>4}",
        "#", "Team", "P", "W", "D", "L", "GF", "GA", "GD", "PTS"
    );
    let mut lines = vec![header.clone(), rule(header.chars().count())];
    for (pos, r) in rows.iter().enumerate() {
        lines.push(format!(
            "{:>3}  {:<w$}  {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>4} {:>4}",
            pos + 1,
            r.team,
            r.played,
            r.won,
            r.drawn,
            r.lost,
            r.goals_for,
            r.goals_against,
            r.goal_difference,
            r.points
        ));
    }
    lines.join("\n")
}

fn score(fixture: &Fixture) -> String {
    match fixture.result() {
        Some((home, away)) => format!("{home} - {away}"),
        None => "v".to_string(),
    }
}

pub fn fixtures(fixtures: &[&Fixture]) -> String {
    if fixtures.is_empty() {
        return "No fixtures.".to_string();
    }
    let id_w = name_width("Id", fixtures.iter().map(|f| f.id.as_str()));
    let home_w = name_width("Home", fixtures.iter().map(|f| f.home_team.as_str()));
    let header = format!(
        "{:<id_w$}  {:<10}  {:<5}  {:>home_w$}  {:^7}  {}",
        "Id", "Date", "Time", "Home", "Score", "Away"
    );
    let mut lines = vec![header.clone(), rule(header.chars().count())];
    for f in fixtures {
        lines.push(format!(
            "{:<id_w$}  {:<10}  {:<5}  {:>home_w$}  {:^7}  {}",
            f.id.as_str(),
            f.date.format("%Y-%m-%d").to_string(),
            f.time.to_string(),
            f.home_team,
            score(f),
            f.away_team
        ));
    }
    lines.join("\n")
}

pub fn players(stats: &BTreeMap<String, PlayerStats>) -> String {
    if stats.is_empty() {
        return "No player events recorded.".to_string();
    }
    let w = name_width("Player", stats.keys().map(String::as_str));
    let header = format!(
        "{:<w$}  {:>5} {:>7} {:>9} {:>8} {:>5}",
        "Player", "Goals", "Assists", "Own goals", "Sin-bins", "Reds"
    );
    let mut lines = vec![header.clone(), rule(header.chars().count())];
    for (name, s) in stats {
        lines.push(format!(
            "{:<w$}  {:>5} {:>7} {:>9} {:>8} {:>5}",
            name, s.goals, s.assists, s.own_goals, s.sin_bins, s.red_cards
        ));
    }
    lines.join("\n")
}

pub fn squad(team: &Team) -> String {
    if team.players.is_empty() {
        return format!("{} has no players listed.", team.name);
    }
    let w = name_width("Player", team.players.iter().map(|p| p.name.as_str()));
    let header = format!("{:<w$}  {:<3}  {:>3}", "Player", "Pos", "Age");
    let mut lines = vec![team.name.clone(), header.clone(), rule(header.chars().count())];
    for p in &team.players {
        let captain = if p.is_captain { "(C)" } else { "" };
        let line = format!("{:<w$}  {:<3}  {:>3}  {captain}", p.name, p.position.code(), p.age);
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}

pub fn search(query: &str, results: &SearchResults<'_>) -> String {
    if results.is_empty() {
        return format!("Nothing matches \"{}\".", query.trim());
    }
    let mut sections = Vec::new();
    if !results.teams.is_empty() {
        let rows: Vec<TeamStanding> = results.teams.iter().map(|r| (*r).clone()).collect();
        sections.push(format!("Teams\n{}", standings(&rows)));
    }
    if !results.fixtures.is_empty() {
        sections.push(format!("Fixtures\n{}", fixtures(&results.fixtures)));
    }
    sections.join("\n\n")
}

pub fn rulesets() -> String {
    Ruleset::ALL
        .iter()
        .map(|r| {
            let note = if r.is_implemented() { "" } else { " (not yet available)" };
            format!("{:<20} {}{note}", r.as_str(), r.description())
        })
        .collect::<Vec<_>>()
        .join("\n")
}
