mod render;

use anyhow::Context;
use chrono::Local;
use log::debug;
use wbl_api::client::{LeagueSheets, SheetConfig};
use wbl_api::seeding::{self, SeedGate};
use wbl_api::standings;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Page {
    /// Standings, seed note, and both brackets.
    #[default]
    Everything,
    StandingsOnly,
    SeedsOnly,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Some(page) = handle_cli_args() else {
        return Ok(());
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let client = LeagueSheets::new(SheetConfig::from_env());
    debug!("fetching teams, games, and playoffs feeds");
    // All three feeds must land before anything renders; the first failure
    // aborts the whole render cycle. A re-run is the retry mechanism.
    let (roster, games, mut slots) = tokio::try_join!(
        client.fetch_roster(),
        client.fetch_games(),
        client.fetch_playoffs(),
    )
    .context("failed to load league sheets")?;
    debug!("loaded {} teams, {} game rows, {} playoff slots", roster.len(), games.len(), slots.len());

    let standings = standings::compute_standings(&roster, &games);
    let gate = SeedGate::default();
    let today = Local::now().date_naive();
    let seeds = seeding::compute_seeds(&standings, gate.is_gated(today, &games));
    slots.resolve(&seeds, &roster);

    match page {
        Page::StandingsOnly => print!("{}", render::standings_table(&standings, &seeds)),
        Page::SeedsOnly => println!("{}", seeds.note()),
        Page::Everything => {
            print!("{}", render::standings_table(&standings, &seeds));
            println!();
            println!("{}", seeds.note());
            println!();
            print!("{}", render::championship_bracket(&seeds, &slots));
            println!();
            print!("{}", render::consolation_bracket(&slots));
        }
    }

    Ok(())
}

/// Hand-rolled args: this stays a zero-flag tool apart from page selection.
/// None means we already handled the invocation (help/version).
fn handle_cli_args() -> Option<Page> {
    let mut page = Page::Everything;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{}", usage_text());
                return None;
            }
            "-V" | "--version" => {
                println!("wbl-bracket {}", env!("CARGO_PKG_VERSION"));
                return None;
            }
            "--standings" => page = Page::StandingsOnly,
            "--seeds" => page = Page::SeedsOnly,
            other => {
                eprintln!("Unknown argument: {other}\n\n{}", usage_text());
                std::process::exit(2);
            }
        }
    }
    Some(page)
}

fn usage_text() -> &'static str {
    "wbl-bracket - WBL standings and playoff bracket viewer

Usage:
  wbl-bracket              Standings, seeding note, and both brackets
  wbl-bracket --standings  Standings table only
  wbl-bracket --seeds      Seeding note only

Environment:
  WBL_TEAMS_CSV      Teams feed URL, or a local CSV snapshot path
  WBL_GAMES_CSV      Games feed URL, or a local CSV snapshot path
  WBL_PLAYOFFS_CSV   Playoffs feed URL, or a local CSV snapshot path
  RUST_LOG           Log filter (default: warn)"
}
