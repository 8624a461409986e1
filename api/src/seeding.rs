//! Seeding resolver: orders teams into seeds 1..N from the standings table.
//!
//! Tie-break policy (the one canonical policy; earlier site variants are
//! superseded):
//!   1) win% (W + 0.5·T) / GP, descending
//!   2) head-to-head, only when exactly two teams share a win% — and when it
//!      is decisive the cascade stops there
//!   3) run differential, descending
//!   4) runs for, descending
//!   5) runs against, ascending
//!   6) team name, ascending (final deterministic fallback)

use crate::standings::{StandingsTable, TeamStanding};
use crate::{GameResult, SEED_COUNT, TBD};
use chrono::{Days, NaiveDate};
use std::collections::HashSet;

/// Opening Day of the 2026 season.
pub fn opening_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 4, 11).expect("static calendar date")
}

/// Week 7 starts six full weeks after Opening Day; seeds stay hidden until
/// then.
pub fn week7_start() -> NaiveDate {
    opening_day() + Days::new(6 * 7)
}

/// Readiness condition for publishing authoritative seeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedGate {
    /// Seeds are always visible.
    Open,
    /// Seeds are hidden on days strictly before the given date.
    UntilDate(NaiveDate),
    /// Seeds are hidden until at least `n` distinct game dates have gone
    /// final.
    MinCompletedDates(usize),
}

impl Default for SeedGate {
    fn default() -> Self {
        SeedGate::UntilDate(week7_start())
    }
}

impl SeedGate {
    pub fn is_gated(&self, today: NaiveDate, games: &[GameResult]) -> bool {
        match self {
            SeedGate::Open => false,
            SeedGate::UntilDate(date) => today < *date,
            SeedGate::MinCompletedDates(needed) => {
                let completed: HashSet<&str> = games
                    .iter()
                    .filter(|g| g.is_final() && !g.date.trim().is_empty())
                    .map(|g| g.date.trim())
                    .collect();
                completed.len() < *needed
            }
        }
    }
}

/// Ordered seed table, seed 1 first. While gated, authoritative lookups
/// return nothing and the ranking is only reachable as a preview.
#[derive(Debug, Clone, Default)]
pub struct SeedTable {
    ordered: Vec<String>,
    gated: bool,
}

impl SeedTable {
    /// Authoritative lookup. None while gated or when `seed` is out of range.
    pub fn team(&self, seed: usize) -> Option<&str> {
        if self.gated || seed == 0 {
            return None;
        }
        self.ordered.get(seed - 1).map(String::as_str)
    }

    /// The team a bye box shows for this seed: the seeded team, or TBD.
    pub fn display(&self, seed: usize) -> &str {
        self.team(seed).unwrap_or(TBD)
    }

    /// Computed ranking regardless of gating. Preview only, never
    /// authoritative seeding.
    pub fn preview(&self) -> &[String] {
        &self.ordered
    }

    pub fn is_gated(&self) -> bool {
        self.gated
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// The caption the bracket page shows under the seed list.
    pub fn note(&self) -> String {
        if self.gated {
            return "Bracket is shown in TBD mode until Week 7 (after Week 6 is complete)."
                .to_owned();
        }
        let preview = self
            .ordered
            .iter()
            .take(SEED_COUNT)
            .enumerate()
            .map(|(i, team)| format!("S{}: {}", i + 1, team))
            .collect::<Vec<_>>()
            .join(" \u{2022} ");
        if preview.is_empty() { String::new() } else { format!("Current seeding: {preview}") }
    }
}

/// Rank every team in the standings into a seed order. The ranking itself is
/// always computed; `gated` only hides it from authoritative lookups.
pub fn compute_seeds(standings: &StandingsTable, gated: bool) -> SeedTable {
    let mut rows: Vec<&TeamStanding> = standings.iter().collect();
    // Primary key plus a stable name fallback so tie groups form
    // deterministically regardless of hash order.
    rows.sort_by(|a, b| {
        b.win_pct.total_cmp(&a.win_pct).then_with(|| a.team.cmp(&b.team))
    });

    let mut ordered: Vec<String> = Vec::with_capacity(rows.len());
    let mut i = 0;
    while i < rows.len() {
        let mut j = i + 1;
        while j < rows.len() && rows[j].win_pct == rows[i].win_pct {
            j += 1;
        }
        let mut group = rows[i..j].to_vec();

        // Head-to-head settles a tied pair — and only a pair. When it is
        // decisive no further criteria are consulted.
        if group.len() == 2 {
            if let Some(margin) = standings.head_to_head.margin(&group[0].team, &group[1].team) {
                if margin != 0 {
                    if margin < 0 {
                        group.swap(0, 1);
                    }
                    ordered.extend(group.iter().map(|s| s.team.clone()));
                    i = j;
                    continue;
                }
            }
        }

        group.sort_by(|a, b| {
            b.run_diff
                .total_cmp(&a.run_diff)
                .then_with(|| b.runs_for.total_cmp(&a.runs_for))
                .then_with(|| a.runs_against.total_cmp(&b.runs_against))
                .then_with(|| a.team.cmp(&b.team))
        });
        ordered.extend(group.iter().map(|s| s.team.clone()));
        i = j;
    }

    SeedTable { ordered, gated }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standings::compute_standings;
    use crate::{Roster, Team};

    fn roster(names: &[&str]) -> Roster {
        Roster::new(
            names
                .iter()
                .map(|n| Team { name: (*n).to_owned(), ..Default::default() })
                .collect(),
        )
    }

    fn final_game(a: &str, b: &str, sa: f64, sb: f64) -> GameResult {
        GameResult {
            team_a: a.into(),
            team_b: b.into(),
            score_a: Some(sa),
            score_b: Some(sb),
            status: "Final".into(),
            ..Default::default()
        }
    }

    #[test]
    fn unique_win_pcts_rank_by_win_pct_alone() {
        let games = vec![
            final_game("Red", "Blue", 5.0, 2.0),
            final_game("Red", "Green", 4.0, 1.0),
            final_game("Blue", "Green", 3.0, 2.0),
        ];
        let table = compute_standings(&roster(&["Red", "Blue", "Green"]), &games);
        let seeds = compute_seeds(&table, false);
        assert_eq!(seeds.preview(), ["Red", "Blue", "Green"]);
        assert_eq!(seeds.team(1), Some("Red"));
        assert_eq!(seeds.team(3), Some("Green"));
    }

    #[test]
    fn two_team_tie_goes_to_head_to_head_winner_despite_run_diff() {
        // Red and Blue both 1-1. Blue has the hugely better run differential,
        // but Red won the meeting, so Red seeds higher.
        let games = vec![
            final_game("Red", "Blue", 2.0, 1.0),
            final_game("Blue", "Green", 20.0, 0.0),
            final_game("Delta", "Red", 3.0, 2.0),
            final_game("Delta", "Green", 5.0, 0.0),
        ];
        let table = compute_standings(&roster(&["Red", "Blue", "Green", "Delta"]), &games);
        let seeds = compute_seeds(&table, false);
        let red_pos = seeds.preview().iter().position(|t| t == "Red").unwrap();
        let blue_pos = seeds.preview().iter().position(|t| t == "Blue").unwrap();
        assert!(red_pos < blue_pos, "head-to-head winner must seed higher");
    }

    #[test]
    fn three_team_tie_never_consults_head_to_head() {
        // Rock/Paper/Scissors beat each other in a cycle, all 1-1. Ranking
        // must come from the secondary cascade (run diff), not head-to-head.
        let games = vec![
            final_game("Rock", "Scissors", 10.0, 0.0),
            final_game("Scissors", "Paper", 3.0, 2.0),
            final_game("Paper", "Rock", 4.0, 3.0),
        ];
        let table = compute_standings(&roster(&["Rock", "Paper", "Scissors"]), &games);
        let seeds = compute_seeds(&table, false);
        // Run diffs: Rock +9, Paper 0, Scissors -9.
        assert_eq!(seeds.preview(), ["Rock", "Paper", "Scissors"]);
    }

    #[test]
    fn tied_pair_with_even_head_to_head_falls_through_to_run_diff() {
        // Red and Blue split their two meetings; Blue's differential is
        // better, so Blue ranks higher.
        let games = vec![
            final_game("Red", "Blue", 1.0, 0.0),
            final_game("Blue", "Red", 8.0, 0.0),
        ];
        let table = compute_standings(&roster(&["Red", "Blue"]), &games);
        let seeds = compute_seeds(&table, false);
        assert_eq!(seeds.preview(), ["Blue", "Red"]);
    }

    #[test]
    fn name_is_the_last_resort_tie_break() {
        let table = compute_standings(&roster(&["Zebras", "Aardvarks"]), &[]);
        let seeds = compute_seeds(&table, false);
        assert_eq!(seeds.preview(), ["Aardvarks", "Zebras"]);
    }

    #[test]
    fn sample_weekend_of_results_produces_expected_seed_order() {
        let games = vec![
            final_game("Red", "Blue", 5.0, 2.0),
            final_game("Green", "Yellow", 3.0, 3.0),
            final_game("Red", "Green", 4.0, 1.0),
        ];
        let table = compute_standings(&roster(&["Red", "Blue", "Green", "Yellow"]), &games);
        let seeds = compute_seeds(&table, false);
        assert_eq!(seeds.preview(), ["Red", "Yellow", "Green", "Blue"]);
    }

    #[test]
    fn determinism_over_repeated_runs() {
        let games = vec![
            final_game("A", "B", 3.0, 3.0),
            final_game("C", "D", 2.0, 2.0),
            final_game("A", "C", 1.0, 1.0),
        ];
        let ros = roster(&["A", "B", "C", "D"]);
        let first = compute_seeds(&compute_standings(&ros, &games), false);
        for _ in 0..10 {
            let again = compute_seeds(&compute_standings(&ros, &games), false);
            assert_eq!(first.preview(), again.preview());
        }
    }

    #[test]
    fn gated_table_hides_every_seed_but_keeps_the_preview() {
        let games = vec![final_game("Red", "Blue", 5.0, 2.0)];
        let table = compute_standings(&roster(&["Red", "Blue"]), &games);
        let seeds = compute_seeds(&table, true);
        for seed in 1..=SEED_COUNT {
            assert_eq!(seeds.team(seed), None);
            assert_eq!(seeds.display(seed), TBD);
        }
        assert_eq!(seeds.preview(), ["Red", "Blue"]);
        assert!(seeds.note().contains("TBD mode until Week 7"));
    }

    #[test]
    fn seed_zero_and_out_of_range_are_unresolved() {
        let table = compute_standings(&roster(&["Red"]), &[]);
        let seeds = compute_seeds(&table, false);
        assert_eq!(seeds.team(0), None);
        assert_eq!(seeds.team(2), None);
    }

    #[test]
    fn calendar_gate_opens_on_week7() {
        let gate = SeedGate::default();
        let day_before = week7_start().pred_opt().unwrap();
        assert!(gate.is_gated(day_before, &[]));
        assert!(!gate.is_gated(week7_start(), &[]));
    }

    #[test]
    fn completed_dates_gate_counts_distinct_final_dates() {
        let mut games = vec![
            GameResult { date: "4/11".into(), ..final_game("A", "B", 1.0, 0.0) },
            GameResult { date: "4/11".into(), ..final_game("C", "D", 2.0, 0.0) },
            GameResult { date: "4/18".into(), ..final_game("A", "C", 3.0, 0.0) },
            // Scheduled games contribute nothing.
            GameResult {
                date: "4/25".into(),
                status: "Scheduled".into(),
                ..final_game("B", "D", 0.0, 0.0)
            },
        ];
        let today = opening_day();
        let gate = SeedGate::MinCompletedDates(3);
        assert!(gate.is_gated(today, &games));

        games.push(GameResult { date: "4/25".into(), ..final_game("B", "D", 4.0, 2.0) });
        assert!(!gate.is_gated(today, &games));
    }

    #[test]
    fn ungated_note_previews_the_seed_order() {
        let games = vec![final_game("Red", "Blue", 5.0, 2.0)];
        let table = compute_standings(&roster(&["Red", "Blue"]), &games);
        let seeds = compute_seeds(&table, false);
        let note = seeds.note();
        assert!(note.starts_with("Current seeding: S1: Red"));
        assert!(note.contains("S2: Blue"));
    }
}
