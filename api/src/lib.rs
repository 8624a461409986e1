pub mod bracket;
pub mod client;
pub mod seeding;
pub mod sheet;
pub mod standings;

use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of the published-sheet wire format
// ---------------------------------------------------------------------------

/// Placeholder shown wherever a participant is not yet determined.
pub const TBD: &str = "TBD";

/// Number of seeded playoff positions (ten-team league).
pub const SEED_COUNT: usize = 10;

/// Case-insensitive lookup key for a team name. Display names keep their
/// sheet casing; lookups go through this.
pub fn team_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// "Final", "FINAL (10 inn)", "final - forfeit" all mark a completed game.
pub fn status_is_final(status: &str) -> bool {
    status.trim().to_lowercase().starts_with("final")
}

/// Numeric coercion for sheet cells that should hold a score.
/// Blank or non-numeric cells are absent, not zero.
pub fn to_num(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// URL-safe slug for a team name: `&` becomes "and", any other run of
/// non-alphanumeric characters collapses to a single `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.trim().to_lowercase().replace('&', "and").chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_owned()
}

#[derive(Debug, Clone, Default)]
pub struct Team {
    pub name: String,
    pub slug: String,
    pub logo: Option<String>,
    pub color: Option<String>,
}

/// Immutable per-cycle roster snapshot. Built fresh from the teams feed each
/// render cycle and passed explicitly to the engines that need it.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    teams: Vec<Team>,
    by_key: HashMap<String, usize>,
}

impl Roster {
    pub fn new(teams: Vec<Team>) -> Self {
        let mut roster =
            Roster { teams: Vec::with_capacity(teams.len()), by_key: HashMap::new() };
        for team in teams {
            let key = team_key(&team.name);
            if key.is_empty() || roster.by_key.contains_key(&key) {
                continue;
            }
            roster.by_key.insert(key, roster.teams.len());
            roster.teams.push(team);
        }
        roster
    }

    pub fn get(&self, name: &str) -> Option<&Team> {
        self.by_key.get(&team_key(name)).map(|&i| &self.teams[i])
    }

    /// Sheet-cased display name for a team, looked up case-insensitively.
    pub fn canonical(&self, name: &str) -> Option<&str> {
        self.get(name).map(|t| t.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_key.contains_key(&team_key(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.teams.iter().map(|t| t.name.as_str())
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

/// One regular-season game row. Scores stay optional: only a finalized game
/// with both scores present counts toward standings.
#[derive(Debug, Clone, Default)]
pub struct GameResult {
    pub team_a: String,
    pub team_b: String,
    pub score_a: Option<f64>,
    pub score_b: Option<f64>,
    pub status: String,
    /// Sheet-formatted date string; used only for seed gating, never standings.
    pub date: String,
}

impl GameResult {
    pub fn is_final(&self) -> bool {
        status_is_final(&self.status)
    }

    /// Finalized, two distinct non-empty teams, two numeric scores.
    pub fn counts_for_standings(&self) -> bool {
        self.is_final()
            && self.score_a.is_some()
            && self.score_b.is_some()
            && !self.team_a.trim().is_empty()
            && !self.team_b.trim().is_empty()
            && team_key(&self.team_a) != team_key(&self.team_b)
    }
}
