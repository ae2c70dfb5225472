use std::path::PathBuf;

use thiserror::Error;

/// Error type for GameBar operations.
///
/// - `RequestFailed`: network/transport errors (wraps `reqwest::Error`)
/// - `Api`: any non-2xx status code from the stats API
/// - `Transfer`: an image could not be fetched into the cache directory
/// - `Decode`: a cached file is not a usable image
/// - `Delete`: a cached file could not be removed
/// - `SourceData`: the schedule document is malformed
/// - `TierViolation`: a file eviction was requested while its texture is live
/// - `Config`: the configuration file is unreadable or invalid
#[derive(Debug, Error)]
pub enum GameBarError {
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Transfer of {url} failed: {message}")]
    Transfer { url: String, message: String },

    #[error("Could not decode {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },

    #[error("Could not delete {}: {source}", path.display())]
    Delete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed source data: {message}")]
    SourceData { message: String },

    #[error("Game {key} is still decoded in memory")]
    TierViolation { key: i64 },

    #[error("Invalid config: {message}")]
    Config { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GameBarError>;
