use crate::bracket::{BracketSlot, SlotRef, SlotTable};
use crate::sheet::{GameRow, PlayoffRow, TeamRow, parse_rows};
use crate::{GameResult, Roster, Team, slugify, to_num};
use log::debug;
use reqwest::Client;
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub type ApiResult<T> = Result<T, ApiError>;

// Published CSV endpoints for the league spreadsheet. Each tab publishes as
// its own gid.
const SHEET_BASE: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vQ2NIyT2nQ0ymcFxNTG9qv-YsoQMSs01UPMYdYGVqcprvj5r5y6eA-Fcot73iVVjzM1QU6mUuvk82Kf/pub";
const TEAMS_GID: &str = "0";
const GAMES_GID: &str = "1880527815";
const PLAYOFFS_GID: &str = "126919836";

fn sheet_url(gid: &str) -> String {
    format!("{SHEET_BASE}?gid={gid}&single=true&output=csv")
}

/// Where the three feeds come from. Defaults to the league's published
/// sheet; each URL can be overridden via env var, and a value without an
/// http(s) scheme is read as a local CSV snapshot file.
#[derive(Debug, Clone)]
pub struct SheetConfig {
    pub teams_url: String,
    pub games_url: String,
    pub playoffs_url: String,
}

impl Default for SheetConfig {
    fn default() -> Self {
        SheetConfig {
            teams_url: sheet_url(TEAMS_GID),
            games_url: sheet_url(GAMES_GID),
            playoffs_url: sheet_url(PLAYOFFS_GID),
        }
    }
}

impl SheetConfig {
    pub fn from_env() -> Self {
        let mut config = SheetConfig::default();
        for (var, slot) in [
            ("WBL_TEAMS_CSV", &mut config.teams_url),
            ("WBL_GAMES_CSV", &mut config.games_url),
            ("WBL_PLAYOFFS_CSV", &mut config.playoffs_url),
        ] {
            if let Ok(value) = std::env::var(var)
                && !value.trim().is_empty()
            {
                *slot = value.trim().to_owned();
            }
        }
        config
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Csv(csv::Error, String),
    Snapshot(std::io::Error, String),
    MissingUrl(&'static str),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "Feed error for {url}: {e}"),
            ApiError::Csv(e, url) => write!(f, "CSV error for {url}: {e}"),
            ApiError::Snapshot(e, path) => write!(f, "Snapshot error for {path}: {e}"),
            ApiError::MissingUrl(feed) => write!(f, "Missing CSV URL for {feed} feed"),
        }
    }
}

impl std::error::Error for ApiError {}

/// League sheet client. One fetch per feed per render cycle — no caching,
/// no retries; a reload is the retry mechanism.
#[derive(Debug, Clone)]
pub struct LeagueSheets {
    client: Client,
    timeout: Duration,
    config: SheetConfig,
}

impl Default for LeagueSheets {
    fn default() -> Self {
        Self::new(SheetConfig::default())
    }
}

impl LeagueSheets {
    pub fn new(config: SheetConfig) -> Self {
        LeagueSheets {
            client: Client::builder()
                .user_agent("wbl-bracket/0.1 (terminal bracket viewer)")
                .build()
                .unwrap_or_default(),
            timeout: Duration::from_secs(10),
            config,
        }
    }

    /// Fetch the teams tab into a roster snapshot.
    pub async fn fetch_roster(&self) -> ApiResult<Roster> {
        let url = self.config.teams_url.clone();
        let text = self.get_csv(&url, "teams").await?;
        let rows: Vec<TeamRow> = parse_rows(&text).map_err(|e| ApiError::Csv(e, url))?;
        Ok(Roster::new(rows.into_iter().filter_map(map_team_row).collect()))
    }

    /// Fetch the regular-season games tab.
    pub async fn fetch_games(&self) -> ApiResult<Vec<GameResult>> {
        let url = self.config.games_url.clone();
        let text = self.get_csv(&url, "games").await?;
        let rows: Vec<GameRow> = parse_rows(&text).map_err(|e| ApiError::Csv(e, url))?;
        Ok(rows.into_iter().map(map_game_row).collect())
    }

    /// Fetch the playoffs tab into a slot table. Rows without a usable
    /// integer id are dropped, not errors.
    pub async fn fetch_playoffs(&self) -> ApiResult<SlotTable> {
        let url = self.config.playoffs_url.clone();
        let text = self.get_csv(&url, "playoffs").await?;
        let rows: Vec<PlayoffRow> = parse_rows(&text).map_err(|e| ApiError::Csv(e, url))?;
        Ok(SlotTable::new(rows.into_iter().filter_map(map_playoff_row).collect()))
    }

    async fn get_csv(&self, url: &str, feed: &'static str) -> ApiResult<String> {
        if url.is_empty() {
            return Err(ApiError::MissingUrl(feed));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return std::fs::read_to_string(url)
                .map_err(|e| ApiError::Snapshot(e, url.to_owned()));
        }

        // Published sheets sit behind an aggressive CDN; bust it with a
        // timestamp param the way the site does.
        let sep = if url.contains('?') { '&' } else { '?' };
        let bust = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let busted = format!("{url}{sep}t={bust}");

        let response = self
            .client
            .get(&busted)
            .header("Cache-Control", "no-store")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res.text().await.map_err(|e| ApiError::Api(e, url.to_owned())),
            Err(e) => Err(ApiError::Api(e, url.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping: sheet wire rows → clean domain types
// ---------------------------------------------------------------------------

fn map_team_row(row: TeamRow) -> Option<Team> {
    let name = row.team_name.trim().to_owned();
    if name.is_empty() {
        return None;
    }
    let slug = if row.team_slug.trim().is_empty() {
        slugify(&name)
    } else {
        row.team_slug.trim().to_owned()
    };
    Some(Team {
        name,
        slug,
        logo: non_empty(row.team_logo),
        color: non_empty(row.team_color),
    })
}

fn map_game_row(row: GameRow) -> GameResult {
    GameResult {
        score_a: to_num(&row.score_a),
        score_b: to_num(&row.score_b),
        team_a: row.team_a,
        team_b: row.team_b,
        status: row.status,
        date: row.date,
    }
}

fn map_playoff_row(row: PlayoffRow) -> Option<BracketSlot> {
    let id = match row.game_id.trim().parse::<u32>() {
        Ok(id) => id,
        Err(_) => {
            debug!("dropping playoff row without integer id: {:?}", row.game_id);
            return None;
        }
    };
    Some(BracketSlot {
        id,
        team_a: SlotRef::parse(&row.team_a),
        team_b: SlotRef::parse(&row.team_b),
        score_a: to_num(&row.score_a),
        score_b: to_num(&row.score_b),
        status: row.status,
        date: row.date,
        time: row.time,
        field: row.field,
        resolved_a: None,
        resolved_b: None,
    })
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_owned()) }
}
