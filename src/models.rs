use serde::Deserialize;
use serde_json::Value;

use crate::error::{GameBarError, Result};

// ---------------------------------------------------------------------------
// Schedule document
// ---------------------------------------------------------------------------

/// Top level of the `/v1/schedule` response.  Game records are kept as raw
/// JSON because every field inside them is optional in practice.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    #[serde(default)]
    pub total_games: u64,
    #[serde(default)]
    pub dates: Vec<ScheduleDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleDate {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub games: Vec<Value>,
}

impl ScheduleResponse {
    /// Raw game records of the first scheduled date.
    ///
    /// The record count has to agree with `totalGames`; anything else means
    /// the document is not the one we asked for.
    pub fn games(&self) -> Result<&[Value]> {
        if self.total_games == 0 {
            return Ok(&[]);
        }
        let first = self.dates.first().ok_or_else(|| GameBarError::SourceData {
            message: format!("{} games announced but no dates", self.total_games),
        })?;
        if first.games.len() as u64 != self.total_games {
            return Err(GameBarError::SourceData {
                message: format!(
                    "{} games announced but {} listed",
                    self.total_games,
                    first.games.len()
                ),
            });
        }
        Ok(&first.games)
    }
}

// ---------------------------------------------------------------------------
// Game records
// ---------------------------------------------------------------------------

pub const UNKNOWN_TITLE: &str = "Unknown";

/// Display-ready summary of one scheduled game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub key: i64,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
}

/// Size of the editorial image cut to pick out of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageCut {
    pub width: u32,
    pub height: u32,
}

impl Default for ImageCut {
    fn default() -> Self {
        Self {
            width: 320,
            height: 180,
        }
    }
}

impl GameRecord {
    /// Resolve a raw schedule record.  Missing pieces degrade to placeholder
    /// text instead of failing.
    ///
    /// A record without `gamePk` gets the key `-(position + 1)` so its cache
    /// file cannot collide with a real game's.
    pub fn from_json(position: usize, json: &Value, cut: ImageCut) -> Self {
        let key = json
            .get("gamePk")
            .and_then(Value::as_i64)
            .unwrap_or_else(|| {
                tracing::warn!(position, "game record has no gamePk");
                -(position as i64) - 1
            });

        Self {
            key,
            title: resolve_title(json),
            description: resolve_description(json),
            image_url: resolve_image(json, cut),
        }
    }
}

/// Parse every record of a schedule, in order.
pub fn parse_games(records: &[Value], cut: ImageCut) -> Vec<GameRecord> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| GameRecord::from_json(i, r, cut))
        .collect()
}

fn str_at<'a>(json: &'a Value, pointer: &str) -> Option<&'a str> {
    json.pointer(pointer).and_then(Value::as_str)
}

fn resolve_title(json: &Value) -> String {
    let (Some(home), Some(away), Some(date)) = (
        str_at(json, "/teams/home/team/name"),
        str_at(json, "/teams/away/team/name"),
        str_at(json, "/officialDate"),
    ) else {
        return UNKNOWN_TITLE.to_string();
    };

    let mut title = format!("{date} {away} at {home}");
    let double_header = str_at(json, "/doubleHeader").is_some_and(|d| d != "N");
    if double_header {
        if let Some(number) = json.get("gameNumber").filter(|n| n.is_number()) {
            title.push_str(&format!(" (Game {number})"));
        }
    }
    title
}

fn resolve_description(json: &Value) -> String {
    if let Some(headline) = str_at(json, "/content/editorial/recap/mlb/headline") {
        return headline.to_string();
    }

    let scores = (
        json.pointer("/teams/away/score").and_then(Value::as_i64),
        json.pointer("/teams/home/score").and_then(Value::as_i64),
        str_at(json, "/teams/home/team/name"),
        str_at(json, "/teams/away/team/name"),
    );
    match scores {
        (Some(away_score), Some(home_score), Some(home), Some(away)) => {
            let winner = if home_score > away_score { home } else { away };
            format!("{away_score}-{home_score} {winner}")
        }
        _ => String::new(),
    }
}

fn resolve_image(json: &Value, cut: ImageCut) -> Option<String> {
    json.pointer("/content/editorial/recap/mlb/media/image/cuts")
        .and_then(Value::as_array)?
        .iter()
        .find(|c| {
            c.get("width").and_then(Value::as_u64) == Some(u64::from(cut.width))
                && c.get("height").and_then(Value::as_u64) == Some(u64::from(cut.height))
        })
        .and_then(|c| c.get("src"))
        .and_then(Value::as_str)
        .map(str::to_string)
}
