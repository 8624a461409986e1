//! Standings engine: folds finalized game results into per-team records and
//! head-to-head pair records. Everything is recomputed from scratch each
//! render cycle; nothing here persists between runs.

use crate::{GameResult, Roster, team_key};
use log::debug;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamStanding {
    pub team: String,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub runs_for: f64,
    pub runs_against: f64,
    /// runs_for − runs_against, derived after all games are folded in.
    pub run_diff: f64,
    /// (wins + 0.5·ties) / games played; 0.0 with no games, never NaN.
    pub win_pct: f64,
}

impl TeamStanding {
    fn new(team: &str) -> Self {
        TeamStanding { team: team.trim().to_owned(), ..Default::default() }
    }

    pub fn games_played(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    fn finish(&mut self) {
        self.run_diff = self.runs_for - self.runs_against;
        let played = self.games_played();
        self.win_pct = if played > 0 {
            (f64::from(self.wins) + 0.5 * f64::from(self.ties)) / f64::from(played)
        } else {
            0.0
        };
    }
}

/// Wins and ties between exactly one unordered pair of teams.
/// `first`/`second` follow the lexicographic order of the pair key.
#[derive(Debug, Clone, Copy, Default)]
pub struct PairRecord {
    pub first_wins: u32,
    pub second_wins: u32,
    pub ties: u32,
}

/// Head-to-head results keyed by the unordered team pair, canonicalized by
/// lexicographic order of the case-folded names. Tie-break input only.
#[derive(Debug, Clone, Default)]
pub struct HeadToHead {
    pairs: HashMap<(String, String), PairRecord>,
}

impl HeadToHead {
    fn pair_key(a: &str, b: &str) -> (String, String) {
        let (ka, kb) = (team_key(a), team_key(b));
        if ka <= kb { (ka, kb) } else { (kb, ka) }
    }

    fn record_game(&mut self, team_a: &str, team_b: &str, score_a: f64, score_b: f64) {
        let key = Self::pair_key(team_a, team_b);
        let a_is_first = team_key(team_a) == key.0;
        let rec = self.pairs.entry(key).or_default();
        if score_a == score_b {
            rec.ties += 1;
        } else if (score_a > score_b) == a_is_first {
            rec.first_wins += 1;
        } else {
            rec.second_wins += 1;
        }
    }

    /// Net meeting margin for `a` against `b`: positive when `a` won more of
    /// their meetings, negative when `b` did. None if the pair never met.
    pub fn margin(&self, a: &str, b: &str) -> Option<i64> {
        let key = Self::pair_key(a, b);
        let a_is_first = team_key(a) == key.0;
        let rec = self.pairs.get(&key)?;
        let diff = i64::from(rec.first_wins) - i64::from(rec.second_wins);
        Some(if a_is_first { diff } else { -diff })
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Per-cycle standings snapshot: team name → record, plus the head-to-head
/// ledger the seeding resolver consults for two-team ties.
#[derive(Debug, Clone, Default)]
pub struct StandingsTable {
    by_key: HashMap<String, TeamStanding>,
    pub head_to_head: HeadToHead,
}

impl StandingsTable {
    pub fn get(&self, team: &str) -> Option<&TeamStanding> {
        self.by_key.get(&team_key(team))
    }

    pub fn iter(&self) -> impl Iterator<Item = &TeamStanding> {
        self.by_key.values()
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    fn entry(&mut self, name: &str, roster: &Roster) -> &mut TeamStanding {
        let display = roster.canonical(name).unwrap_or(name.trim()).to_owned();
        self.by_key
            .entry(team_key(name))
            .or_insert_with(|| TeamStanding::new(&display))
    }
}

/// Fold game results into standings. Every roster team starts at zero; teams
/// that only appear in game rows are added on the fly. Rows that are not
/// finalized, lack a team name, or lack a numeric score are skipped, never
/// errors.
pub fn compute_standings(roster: &Roster, games: &[GameResult]) -> StandingsTable {
    let mut table = StandingsTable::default();
    for name in roster.names() {
        table.by_key.insert(team_key(name), TeamStanding::new(name));
    }

    for game in games {
        if !game.is_final() {
            continue;
        }
        if !game.counts_for_standings() {
            debug!(
                "skipping unusable final row: {:?} vs {:?} ({:?}-{:?})",
                game.team_a, game.team_b, game.score_a, game.score_b
            );
            continue;
        }
        let (score_a, score_b) = match (game.score_a, game.score_b) {
            (Some(a), Some(b)) => (a, b),
            _ => continue,
        };

        {
            let a = table.entry(&game.team_a, roster);
            a.runs_for += score_a;
            a.runs_against += score_b;
            if score_a > score_b {
                a.wins += 1;
            } else if score_b > score_a {
                a.losses += 1;
            } else {
                a.ties += 1;
            }
        }
        {
            let b = table.entry(&game.team_b, roster);
            b.runs_for += score_b;
            b.runs_against += score_a;
            if score_b > score_a {
                b.wins += 1;
            } else if score_a > score_b {
                b.losses += 1;
            } else {
                b.ties += 1;
            }
        }

        table.head_to_head.record_game(&game.team_a, &game.team_b, score_a, score_b);
    }

    for standing in table.by_key.values_mut() {
        standing.finish();
    }
    table
}
