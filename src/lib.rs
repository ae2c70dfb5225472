//! GameBar: a kiosk carousel of baseball game summaries.
//!
//! Games for one day are fetched from the MLB stats API and shown
//! `page_size` at a time.  Each game's image moves between three tiers
//! (not fetched, cached on disk, decoded in memory) as the visible window
//! scrolls, so only the images around the window occupy disk and memory.
//!
//! # Quick Start
//!
//! ```no_run
//! use gamebar::{
//!     parse_games, Carousel, ImageCut, ImagePipeline, ImageTextureLoader, ScheduleParams,
//!     StatsClient, WindowPolicy,
//! };
//! use std::path::Path;
//!
//! let client = StatsClient::new("http://statsapi.mlb.com/api/v1/schedule").unwrap();
//! let schedule = client.schedule(&ScheduleParams::default()).unwrap();
//! let games = parse_games(schedule.games().unwrap(), ImageCut::default());
//!
//! let pipeline = ImagePipeline::new(
//!     Box::new(client),
//!     Box::new(ImageTextureLoader::new(320, 180)),
//!     gamebar::config::DEFAULT_IMAGE_URL,
//! );
//! let mut carousel = Carousel::new(games, Path::new("cache"), 6, WindowPolicy::default(), pipeline);
//! carousel.refresh_cache();
//! carousel.move_right();
//! ```

pub mod cache_window;
pub mod carousel;
pub mod client;
pub mod config;
pub mod error;
pub mod item;
pub mod models;
pub mod pipeline;
pub mod scroll;
pub mod session;
pub mod texture;
pub mod tui;

#[cfg(test)]
pub(crate) mod testing;

// Re-export the main public types at the crate root for convenience.
pub use cache_window::{apply_window, target_tier, ScanReport, WindowPolicy};
pub use carousel::Carousel;
pub use client::{ScheduleParams, StatsClient};
pub use config::Config;
pub use error::{GameBarError, Result};
pub use item::{ImageSource, Item, Tier};
pub use models::{parse_games, GameRecord, ImageCut, ScheduleResponse};
pub use pipeline::{ImagePipeline, ImageTransfer, TextureLoader};
pub use scroll::{MoveOutcome, ScrollState};
pub use session::CacheSession;
pub use texture::{ImageTextureLoader, Texture};
