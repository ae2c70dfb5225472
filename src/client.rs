use reqwest::blocking::{Client, Response};
use std::fs::{self, File};
use std::path::Path;

use crate::error::{GameBarError, Result};
use crate::models::ScheduleResponse;
use crate::pipeline::ImageTransfer;

// ---------------------------------------------------------------------------
// Request parameters
// ---------------------------------------------------------------------------

/// Parameters for the schedule endpoint.
pub struct ScheduleParams {
    /// `YYYY-MM-DD`
    pub date: String,
    pub sport_id: u32,
    /// Sub-resources to inline; the recap carries headlines and image cuts.
    pub hydrate: String,
}

impl Default for ScheduleParams {
    fn default() -> Self {
        Self {
            date: "2018-06-10".into(),
            sport_id: 1,
            hydrate: "game(content(editorial(recap))),decisions".into(),
        }
    }
}

impl ScheduleParams {
    fn query(&self) -> Vec<(String, String)> {
        vec![
            ("hydrate".into(), self.hydrate.clone()),
            ("date".into(), self.date.clone()),
            ("sportId".into(), self.sport_id.to_string()),
        ]
    }
}

// ---------------------------------------------------------------------------
// Public client
// ---------------------------------------------------------------------------

/// Blocking client for the MLB stats API, also used to fetch images into the
/// cache directory.
///
/// ```no_run
/// use gamebar::{ScheduleParams, StatsClient};
///
/// let client = StatsClient::new("http://statsapi.mlb.com/api/v1/schedule").unwrap();
/// let schedule = client.schedule(&ScheduleParams::default()).unwrap();
/// println!("{} games", schedule.total_games);
/// ```
pub struct StatsClient {
    schedule_url: String,
    http: Client,
}

impl StatsClient {
    /// * `schedule_url` – full URL of the schedule endpoint
    pub fn new(schedule_url: &str) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        let http = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("gamebar/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            schedule_url: schedule_url.to_string(),
            http,
        })
    }

    /// Map non-2xx statuses to [`GameBarError::Api`] and parse the body.
    fn handle_response(&self, response: Response) -> Result<serde_json::Value> {
        let status = response.status().as_u16();

        let data: serde_json::Value = response
            .json()
            .unwrap_or_else(|_| serde_json::Value::Object(serde_json::Map::new()));

        if (200..300).contains(&status) {
            return Ok(data);
        }

        let message = data
            .get("message")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {status}"));
        Err(GameBarError::Api { status, message })
    }

    /// Fetch the schedule for one day.
    pub fn schedule(&self, params: &ScheduleParams) -> Result<ScheduleResponse> {
        let resp = self
            .http
            .get(&self.schedule_url)
            .query(&params.query())
            .send()?;
        let data = self.handle_response(resp)?;
        serde_json::from_value(data).map_err(|e| GameBarError::SourceData {
            message: format!("Deserialization error: {e}"),
        })
    }

    /// Stream `url` into `dest`.  A partially written file is removed.
    pub fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let transfer_error = |message: String| GameBarError::Transfer {
            url: url.to_string(),
            message,
        };

        let mut response = self
            .http
            .get(url)
            .send()
            .map_err(|e| transfer_error(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(transfer_error(format!("HTTP {status}")));
        }

        let mut file = File::create(dest)
            .map_err(|e| transfer_error(format!("cannot open {}: {e}", dest.display())))?;
        if let Err(e) = response.copy_to(&mut file) {
            drop(file);
            let _ = fs::remove_file(dest);
            return Err(transfer_error(e.to_string()));
        }
        tracing::debug!(url, dest = %dest.display(), "downloaded");
        Ok(())
    }
}

impl ImageTransfer for StatsClient {
    fn fetch(&self, url: &str, dest: &Path) -> Result<()> {
        self.download(url, dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_query_carries_every_parameter() {
        let params = ScheduleParams {
            date: "2019-04-01".into(),
            sport_id: 11,
            ..Default::default()
        };
        let query = params.query();
        assert!(query.contains(&("date".into(), "2019-04-01".into())));
        assert!(query.contains(&("sportId".into(), "11".into())));
        assert!(query
            .iter()
            .any(|(k, v)| k == "hydrate" && v.contains("editorial(recap)")));
    }

    #[test]
    fn unreachable_host_is_a_transfer_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let dest = dir.path().join("1.jpg");
        let client = StatsClient::new("http://127.0.0.1:9/schedule").unwrap();

        let err = client
            .download("http://127.0.0.1:9/nothing.jpg", &dest)
            .unwrap_err();
        assert!(matches!(err, GameBarError::Transfer { .. }));
        assert!(!dest.exists());
    }
}
