//! Plain-text presentation of resolved league state. Everything here only
//! formats; all decisions were made upstream by the engines.

use std::fmt::Write;
use wbl_api::TBD;
use wbl_api::bracket::{CHAMPIONSHIP_ROUNDS, CONSOLATION_ROUNDS, SlotTable};
use wbl_api::seeding::SeedTable;
use wbl_api::standings::StandingsTable;

/// Standings in seed-preview order: Team, W-L-T, runs, differential, win%.
pub fn standings_table(standings: &StandingsTable, seeds: &SeedTable) -> String {
    let name_width = seeds
        .preview()
        .iter()
        .map(|t| t.len())
        .chain(std::iter::once("Team".len()))
        .max()
        .unwrap_or(4);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<name_width$}  {:>3} {:>3} {:>3}  {:>5} {:>6} {:>6}  {:>5}",
        "Team", "W", "L", "T", "RF", "RA", "RD", "Pct"
    );
    for team in seeds.preview() {
        let Some(s) = standings.get(team) else { continue };
        let _ = writeln!(
            out,
            "{:<name_width$}  {:>3} {:>3} {:>3}  {:>5} {:>6} {:>6}  {:>5.3}",
            s.team, s.wins, s.losses, s.ties, s.runs_for, s.runs_against, s.run_diff, s.win_pct
        );
    }
    out
}

pub fn championship_bracket(seeds: &SeedTable, slots: &SlotTable) -> String {
    let mut out = String::from("Championship\n");
    for round in &CHAMPIONSHIP_ROUNDS {
        let _ = writeln!(out, "  {}", round.title);
        if round.title == "Round 1" {
            // True bracket alignment: byes interleave with the two play-in
            // games, S1 above 147 and S2 above 146.
            let _ = writeln!(out, "    {}", bye_line(1, seeds));
            let _ = writeln!(out, "    {}", game_line(147, slots));
            let _ = writeln!(out, "    {}", bye_line(2, seeds));
            let _ = writeln!(out, "    {}", game_line(146, slots));
        } else {
            for &id in round.slots {
                let _ = writeln!(out, "    {}", game_line(id, slots));
            }
        }
    }
    out
}

pub fn consolation_bracket(slots: &SlotTable) -> String {
    let mut out = String::from("Consolation\n");
    for round in &CONSOLATION_ROUNDS {
        let _ = writeln!(out, "  {}", round.title);
        for &id in round.slots {
            let _ = writeln!(out, "    {}", game_line(id, slots));
        }
    }
    out
}

fn bye_line(seed: usize, seeds: &SeedTable) -> String {
    format!("S{seed} \u{2022} Bye        {}", seeds.display(seed))
}

/// One game box as a line. A slot the sheet never defined renders as an
/// empty TBD matchup, same as the site.
fn game_line(id: u32, slots: &SlotTable) -> String {
    let Some(slot) = slots.get(id) else {
        return format!("[{id}] {TBD} vs {TBD}");
    };

    let team_a = display_side(slot.resolved_a.as_deref());
    let team_b = display_side(slot.resolved_b.as_deref());

    let mut line = if slot.is_final() {
        format!(
            "[{id}] {team_a} {} \u{2014} {team_b} {}  (Final)",
            score(slot.score_a),
            score(slot.score_b)
        )
    } else {
        let status = if slot.status.trim().is_empty() { "Scheduled" } else { slot.status.trim() };
        format!("[{id}] {team_a} vs {team_b}  ({status})")
    };

    let meta: Vec<&str> = [&slot.date, &slot.time, &slot.field]
        .into_iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if !meta.is_empty() {
        let _ = write!(line, "  {}", meta.join(" \u{2022} "));
    }
    line
}

fn display_side(resolved: Option<&str>) -> &str {
    match resolved {
        Some(name) if !name.is_empty() => name,
        _ => TBD,
    }
}

fn score(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wbl_api::bracket::SlotRef;
    use wbl_api::seeding::compute_seeds;
    use wbl_api::standings::compute_standings;
    use wbl_api::{GameResult, Roster, Team};

    fn fixtures() -> (StandingsTable, SeedTable) {
        let roster = Roster::new(vec![
            Team { name: "Red".into(), ..Default::default() },
            Team { name: "Blue".into(), ..Default::default() },
        ]);
        let games = vec![GameResult {
            team_a: "Red".into(),
            team_b: "Blue".into(),
            score_a: Some(5.0),
            score_b: Some(2.0),
            status: "Final".into(),
            ..Default::default()
        }];
        let standings = compute_standings(&roster, &games);
        let seeds = compute_seeds(&standings, false);
        (standings, seeds)
    }

    #[test]
    fn standings_render_in_seed_order() {
        let (standings, seeds) = fixtures();
        let table = standings_table(&standings, &seeds);
        let red_at = table.find("Red").unwrap();
        let blue_at = table.find("Blue").unwrap();
        assert!(red_at < blue_at);
        assert!(table.contains("1.000"));
    }

    #[test]
    fn undefined_slot_renders_as_tbd_matchup() {
        let slots = SlotTable::new(vec![]);
        assert_eq!(game_line(150, &slots), "[150] TBD vs TBD");
    }

    #[test]
    fn final_slot_shows_scores_and_meta() {
        let slots = SlotTable::new(vec![wbl_api::bracket::BracketSlot {
            id: 146,
            team_a: SlotRef::parse("S1"),
            team_b: SlotRef::parse("S2"),
            status: "Final".into(),
            score_a: Some(3.0),
            score_b: Some(1.0),
            date: "5/30".into(),
            time: "9:00 AM".into(),
            field: "Field 2".into(),
            resolved_a: Some("Red".into()),
            resolved_b: Some("Blue".into()),
        }]);
        let line = game_line(146, &slots);
        assert!(line.contains("Red 3"), "{line}");
        assert!(line.contains("Blue 1"), "{line}");
        assert!(line.contains("(Final)"), "{line}");
        assert!(line.contains("5/30 \u{2022} 9:00 AM \u{2022} Field 2"), "{line}");
    }

    #[test]
    fn pending_slot_shows_status_without_scores() {
        let slots = SlotTable::new(vec![wbl_api::bracket::BracketSlot {
            id: 148,
            team_a: SlotRef::parse("W146"),
            team_b: SlotRef::parse("W147"),
            ..Default::default()
        }]);
        let line = game_line(148, &slots);
        assert_eq!(line, "[148] TBD vs TBD  (Scheduled)");
    }

    #[test]
    fn championship_layout_interleaves_byes_with_play_in_games() {
        let (_, seeds) = fixtures();
        let out = championship_bracket(&seeds, &SlotTable::new(vec![]));
        let s1 = out.find("S1 \u{2022} Bye").unwrap();
        let g147 = out.find("[147]").unwrap();
        let s2 = out.find("S2 \u{2022} Bye").unwrap();
        let g146 = out.find("[146]").unwrap();
        assert!(s1 < g147 && g147 < s2 && s2 < g146);
        assert!(out.contains("Semifinals"));
        assert!(out.contains("[150]"));
    }

    #[test]
    fn consolation_has_no_final_column() {
        let out = consolation_bracket(&SlotTable::new(vec![]));
        assert!(out.contains("Round 1"));
        assert!(out.contains("Round 2"));
        assert!(!out.contains("Championship"));
        for id in [151, 152, 153, 154, 155] {
            assert!(out.contains(&format!("[{id}]")));
        }
    }
}
