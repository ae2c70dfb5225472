//! Kiosk configuration.
//!
//! Loaded from a TOML file (every field has a default, so a partial file or
//! no file at all is fine) and then overridden by command-line flags.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cache_window::WindowPolicy;
use crate::error::{GameBarError, Result};

pub const DEFAULT_SCHEDULE_URL: &str = "http://statsapi.mlb.com/api/v1/schedule";
pub const DEFAULT_BACKGROUND_URL: &str =
    "http://mlb.mlb.com/mlb/images/devices/ballpark/1920x1080/1.jpg";
pub const DEFAULT_IMAGE_URL: &str = "http://mlb.mlb.com/mlb/images/devices/ballpark/1920x1080/3.jpg";

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the schedule and the shared images come from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub schedule_url: String,
    /// Schedule date, `YYYY-MM-DD`.
    pub date: String,
    pub sport_id: u32,
    pub background_url: String,
    /// Fetched for games whose record carries no usable image.
    pub default_image_url: String,
    /// Size of the image cut picked out of each game record.
    pub image_width: u32,
    pub image_height: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            schedule_url: DEFAULT_SCHEDULE_URL.to_string(),
            date: "2018-06-10".to_string(),
            sport_id: 1,
            background_url: DEFAULT_BACKGROUND_URL.to_string(),
            default_image_url: DEFAULT_IMAGE_URL.to_string(),
            image_width: 320,
            image_height: 180,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Number of games shown at once.
    pub page_size: usize,
    /// Pause at the end of every frame.
    pub frame_delay_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: 6,
            frame_delay_ms: 250,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Session cache directory; removed at clean shutdown.
    pub dir: PathBuf,
    /// Items before the window kept on disk.
    pub prefetch_before: usize,
    /// Items after the window kept on disk.
    pub prefetch_after: usize,
    /// Items on either side of the window kept decoded.
    pub decode_margin: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("cache"),
            prefetch_before: 2,
            prefetch_after: 2,
            decode_margin: 0,
        }
    }
}

impl CacheConfig {
    pub fn window_policy(&self) -> WindowPolicy {
        WindowPolicy {
            prefetch_before: self.prefetch_before,
            prefetch_after: self.prefetch_after,
            decode_margin: self.decode_margin,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub file: PathBuf,
    /// `tracing_subscriber::EnvFilter` directive string.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("gamebar.log"),
            filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or return defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(|e| GameBarError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        let config: Config = toml::from_str(&contents).map_err(|e| GameBarError::Config {
            message: format!("Failed to parse {}: {e}", path.display()),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.display.page_size == 0 {
            return Err(GameBarError::Config {
                message: "display.page_size must be at least 1".into(),
            });
        }
        if self.api.image_width == 0 || self.api.image_height == 0 {
            return Err(GameBarError::Config {
                message: "api.image_width and api.image_height must be non-zero".into(),
            });
        }
        Ok(())
    }
}
