//! Published-sheet raw wire rows — serde shapes for the three CSV feeds.
//! These map to the clean domain types via the mapping fns in client.rs.

use serde::Deserialize;
use serde::de::DeserializeOwned;

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct TeamRow {
    #[serde(rename = "TeamName")]
    pub team_name: String,
    #[serde(rename = "TeamSlug")]
    pub team_slug: String,
    #[serde(rename = "TeamLogo")]
    pub team_logo: String,
    #[serde(rename = "TeamColor")]
    pub team_color: String,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct GameRow {
    #[serde(rename = "TeamA")]
    pub team_a: String,
    #[serde(rename = "TeamB")]
    pub team_b: String,
    #[serde(rename = "ScoreA")]
    pub score_a: String,
    #[serde(rename = "ScoreB")]
    pub score_b: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Date")]
    pub date: String,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct PlayoffRow {
    /// The id column has drifted across sheet revisions.
    #[serde(rename = "GameID", alias = "GameId", alias = "Game")]
    pub game_id: String,
    #[serde(rename = "TeamA")]
    pub team_a: String,
    #[serde(rename = "TeamB")]
    pub team_b: String,
    #[serde(rename = "ScoreA")]
    pub score_a: String,
    #[serde(rename = "ScoreB")]
    pub score_b: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "Field")]
    pub field: String,
}

/// Parse one CSV feed into wire rows. Rows whose cells are all blank are
/// dropped (published sheets pad with empty lines).
pub fn parse_rows<T>(text: &str) -> Result<Vec<T>, csv::Error>
where
    T: DeserializeOwned + Default,
{
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    let headers = normalize_headers(reader.headers()?);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        rows.push(record.deserialize(Some(&headers))?);
    }
    Ok(rows)
}

/// Sheet headers arrive with stray spaces ("Team Name") and occasionally a
/// BOM on the first column; squeeze both out so they match the serde names.
fn normalize_headers(headers: &csv::StringRecord) -> csv::StringRecord {
    headers
        .iter()
        .map(|h| {
            h.trim_start_matches('\u{feff}')
                .split_whitespace()
                .collect::<String>()
        })
        .collect()
}
