//! One carousel entry and the lifecycle of its image.
//!
//! An item's image lives in one of three tiers:
//!
//! ```text
//! Unfetched  <->  CachedOnDisk  <->  DecodedInMemory
//! ```
//!
//! Every transition moves one step at a time; a decoded texture always has
//! its cache file underneath it, and the file is only removed after the
//! texture has been released.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{GameBarError, Result};
use crate::models::GameRecord;
use crate::pipeline::ImagePipeline;
use crate::texture::Texture;

/// File name of the shared fallback image inside the cache directory.
pub const DEFAULT_IMAGE_FILE: &str = "default.jpg";

/// Path of the shared fallback image for a cache directory.
pub fn default_image_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join(DEFAULT_IMAGE_FILE)
}

/// Cache tier of an item's image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    Unfetched,
    CachedOnDisk,
    DecodedInMemory,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Tier::Unfetched => "unfetched",
            Tier::CachedOnDisk => "cached",
            Tier::DecodedInMemory => "decoded",
        })
    }
}

/// Where an item's image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// The game's own editorial image.
    Remote(String),
    /// The shared fallback image; its file is never deleted by an item.
    SharedDefault,
}

enum Residency {
    Unfetched,
    OnDisk,
    InMemory(Texture),
}

pub struct Item {
    key: i64,
    title: String,
    description: String,
    source: ImageSource,
    cache_path: PathBuf,
    residency: Residency,
    /// Set when the last decode attempt failed. Blocks on-demand retries
    /// from the render path until a scan decodes the item again.
    failed_decode: bool,
}

impl Item {
    pub fn new(record: GameRecord, cache_dir: &Path) -> Self {
        let (source, cache_path) = match record.image_url {
            Some(url) => (
                ImageSource::Remote(url),
                cache_dir.join(format!("{}.jpg", record.key)),
            ),
            None => (ImageSource::SharedDefault, default_image_path(cache_dir)),
        };
        Self {
            key: record.key,
            title: record.title,
            description: record.description,
            source,
            cache_path,
            residency: Residency::Unfetched,
            failed_decode: false,
        }
    }

    pub fn key(&self) -> i64 {
        self.key
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    pub fn uses_shared_default(&self) -> bool {
        self.source == ImageSource::SharedDefault
    }

    pub fn tier(&self) -> Tier {
        match self.residency {
            Residency::Unfetched => Tier::Unfetched,
            Residency::OnDisk => Tier::CachedOnDisk,
            Residency::InMemory(_) => Tier::DecodedInMemory,
        }
    }

    /// The decoded texture, if the item is in memory.  Never triggers I/O.
    pub fn loaded_texture(&self) -> Option<&Texture> {
        match &self.residency {
            Residency::InMemory(texture) => Some(texture),
            _ => None,
        }
    }

    /// Fetch the image into the cache directory.
    ///
    /// A file already present at the cache path is adopted without a
    /// transfer; this is how items share the fallback image.
    pub fn cache_to_disk(&mut self, pipeline: &ImagePipeline) -> Result<()> {
        if !matches!(self.residency, Residency::Unfetched) {
            return Ok(());
        }

        if !self.cache_path.exists() {
            let url = match &self.source {
                ImageSource::Remote(url) => url.as_str(),
                ImageSource::SharedDefault => pipeline.default_url(),
            };
            pipeline.transfer().fetch(url, &self.cache_path)?;
        }

        self.residency = Residency::OnDisk;
        tracing::debug!(key = self.key, path = %self.cache_path.display(), "cached");
        Ok(())
    }

    /// Delete the cache file and demote to `Unfetched`.
    ///
    /// Refuses with `TierViolation` while the texture is still decoded.  The
    /// shared fallback file is left in place.
    pub fn evict_from_disk(&mut self) -> Result<()> {
        match self.residency {
            Residency::Unfetched => return Ok(()),
            Residency::InMemory(_) => return Err(GameBarError::TierViolation { key: self.key }),
            Residency::OnDisk => {}
        }

        if let ImageSource::Remote(_) = self.source {
            match fs::remove_file(&self.cache_path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(source) => {
                    return Err(GameBarError::Delete {
                        path: self.cache_path.clone(),
                        source,
                    })
                }
            }
        }

        self.residency = Residency::Unfetched;
        tracing::debug!(key = self.key, "evicted from disk");
        Ok(())
    }

    /// Decode the cached file into a texture, fetching it first if needed.
    ///
    /// On failure the item is left in the tier it started from; a file that
    /// was fetched by this call but does not decode is removed again.
    pub fn decode_to_memory(&mut self, pipeline: &ImagePipeline) -> Result<()> {
        if matches!(self.residency, Residency::InMemory(_)) {
            return Ok(());
        }

        if matches!(self.residency, Residency::OnDisk) && !self.cache_path.exists() {
            tracing::warn!(key = self.key, path = %self.cache_path.display(), "cache file vanished, refetching");
            self.residency = Residency::Unfetched;
        }

        let fetched_here = matches!(self.residency, Residency::Unfetched);
        let transferred = fetched_here && !self.cache_path.exists();
        if let Err(e) = self.cache_to_disk(pipeline) {
            self.failed_decode = true;
            return Err(e);
        }

        match pipeline.loader().load(&self.cache_path) {
            Ok(texture) => {
                self.residency = Residency::InMemory(texture);
                self.failed_decode = false;
                tracing::debug!(key = self.key, "decoded");
                Ok(())
            }
            Err(e) => {
                self.failed_decode = true;
                if fetched_here {
                    if let Err(rollback) = self.evict_from_disk() {
                        tracing::warn!(key = self.key, error = %rollback, "could not discard undecodable file");
                    }
                }
                // A broken fallback would be reused by every item; drop it so
                // the next attempt downloads it again.
                if transferred && self.uses_shared_default() {
                    if let Err(rm) = fs::remove_file(&self.cache_path) {
                        tracing::warn!(key = self.key, error = %rm, "could not discard undecodable fallback image");
                    }
                }
                Err(e)
            }
        }
    }

    /// Release the texture and demote to `CachedOnDisk`.
    pub fn evict_from_memory(&mut self) {
        if matches!(self.residency, Residency::InMemory(_)) {
            self.residency = Residency::OnDisk;
            tracing::debug!(key = self.key, "released texture");
        }
    }

    /// The texture to draw, decoding on demand.
    ///
    /// Returns `None` when decoding fails; after a failure no further
    /// on-demand attempt is made until [`Item::decode_to_memory`] is called
    /// again.
    pub fn texture(&mut self, pipeline: &ImagePipeline) -> Option<&Texture> {
        if self.loaded_texture().is_none() && !self.failed_decode {
            if let Err(e) = self.decode_to_memory(pipeline) {
                tracing::warn!(key = self.key, error = %e, "image unavailable");
            }
        }
        self.loaded_texture()
    }

    /// Whether the last decode attempt failed.
    pub fn has_failed_decode(&self) -> bool {
        self.failed_decode
    }

    /// Force the item down to `Unfetched`, memory first.
    pub fn release(&mut self) -> Result<()> {
        self.evict_from_memory();
        self.evict_from_disk()
    }
}

impl Drop for Item {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            tracing::warn!(key = self.key, error = %e, "cache file left behind");
        }
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("source", &self.source)
            .field("tier", &self.tier())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{item, pipeline, FakeTransfer};

    #[test]
    fn cache_to_disk_is_idempotent() {
        let dir = tempfile::TempDir::new().unwrap();
        let (transfer, log) = FakeTransfer::new();
        let pipeline = pipeline(transfer);
        let mut game = item(7, dir.path(), Some("http://img/7.jpg"));

        game.cache_to_disk(&pipeline).unwrap();
        let first = fs::read(game.cache_path()).unwrap();
        game.cache_to_disk(&pipeline).unwrap();

        assert_eq!(game.tier(), Tier::CachedOnDisk);
        assert_eq!(fs::read(game.cache_path()).unwrap(), first);
        assert_eq!(log.borrow().as_slice(), ["http://img/7.jpg"]);
    }

    #[test]
    fn failed_transfer_stays_unfetched() {
        let dir = tempfile::TempDir::new().unwrap();
        let (transfer, _log) = FakeTransfer::new();
        let pipeline = pipeline(transfer.failing("http://img/7.jpg"));
        let mut game = item(7, dir.path(), Some("http://img/7.jpg"));

        let err = game.cache_to_disk(&pipeline).unwrap_err();
        assert!(matches!(err, GameBarError::Transfer { .. }));
        assert_eq!(game.tier(), Tier::Unfetched);
        assert!(!game.cache_path().exists());
    }

    #[test]
    fn decode_promotes_through_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let (transfer, log) = FakeTransfer::new();
        let pipeline = pipeline(transfer);
        let mut game = item(7, dir.path(), Some("http://img/7.jpg"));

        game.decode_to_memory(&pipeline).unwrap();
        assert_eq!(game.tier(), Tier::DecodedInMemory);
        assert!(game.cache_path().exists());
        assert!(game.loaded_texture().is_some());

        game.decode_to_memory(&pipeline).unwrap();
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn evict_from_disk_refuses_while_decoded() {
        let dir = tempfile::TempDir::new().unwrap();
        let (transfer, _log) = FakeTransfer::new();
        let pipeline = pipeline(transfer);
        let mut game = item(7, dir.path(), Some("http://img/7.jpg"));
        game.decode_to_memory(&pipeline).unwrap();

        let err = game.evict_from_disk().unwrap_err();
        assert!(matches!(err, GameBarError::TierViolation { key: 7 }));
        assert_eq!(game.tier(), Tier::DecodedInMemory);
        assert!(game.cache_path().exists());

        game.evict_from_memory();
        assert_eq!(game.tier(), Tier::CachedOnDisk);
        game.evict_from_disk().unwrap();
        assert_eq!(game.tier(), Tier::Unfetched);
        assert!(!game.cache_path().exists());
    }

    #[test]
    fn shared_default_is_never_deleted() {
        let dir = tempfile::TempDir::new().unwrap();
        let (transfer, log) = FakeTransfer::new();
        let pipeline = pipeline(transfer);
        let mut first = item(1, dir.path(), None);
        let mut second = item(2, dir.path(), None);

        assert!(first.uses_shared_default());
        assert_eq!(first.cache_path(), default_image_path(dir.path()));
        assert_eq!(first.cache_path(), second.cache_path());

        first.cache_to_disk(&pipeline).unwrap();
        second.cache_to_disk(&pipeline).unwrap();
        assert_eq!(log.borrow().as_slice(), [crate::testing::DEFAULT_URL]);

        first.evict_from_disk().unwrap();
        assert_eq!(first.tier(), Tier::Unfetched);
        assert!(default_image_path(dir.path()).exists());

        drop(second);
        assert!(default_image_path(dir.path()).exists());
    }

    #[test]
    fn corrupt_download_rolls_back_to_unfetched() {
        let dir = tempfile::TempDir::new().unwrap();
        let (transfer, _log) = FakeTransfer::new();
        let pipeline = pipeline(transfer.corrupt("http://img/7.jpg"));
        let mut game = item(7, dir.path(), Some("http://img/7.jpg"));

        let err = game.decode_to_memory(&pipeline).unwrap_err();
        assert!(matches!(err, GameBarError::Decode { .. }));
        assert_eq!(game.tier(), Tier::Unfetched);
        assert!(!game.cache_path().exists());
    }

    #[test]
    fn undecodable_cached_file_stays_cached() {
        let dir = tempfile::TempDir::new().unwrap();
        let (transfer, log) = FakeTransfer::new();
        let pipeline = pipeline(transfer);
        let mut game = item(7, dir.path(), Some("http://img/7.jpg"));
        game.cache_to_disk(&pipeline).unwrap();
        fs::write(game.cache_path(), b"truncated").unwrap();

        let err = game.decode_to_memory(&pipeline).unwrap_err();
        assert!(matches!(err, GameBarError::Decode { .. }));
        assert_eq!(game.tier(), Tier::CachedOnDisk);
        assert!(game.cache_path().exists());
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn failed_delete_keeps_the_tier() {
        let dir = tempfile::TempDir::new().unwrap();
        let (transfer, _log) = FakeTransfer::new();
        let pipeline = pipeline(transfer);
        let mut game = item(7, dir.path(), Some("http://img/7.jpg"));
        game.cache_to_disk(&pipeline).unwrap();
        fs::remove_file(game.cache_path()).unwrap();
        fs::create_dir(game.cache_path()).unwrap();

        let err = game.evict_from_disk().unwrap_err();
        assert!(matches!(err, GameBarError::Delete { .. }));
        assert_eq!(game.tier(), Tier::CachedOnDisk);

        fs::remove_dir(game.cache_path()).unwrap();
    }

    #[test]
    fn undecodable_fallback_is_fetched_again() {
        let dir = tempfile::TempDir::new().unwrap();
        let (transfer, log) = FakeTransfer::new();
        let pipeline = pipeline(transfer.corrupt(crate::testing::DEFAULT_URL));
        let mut game = item(1, dir.path(), None);

        assert!(game.decode_to_memory(&pipeline).is_err());
        assert_eq!(game.tier(), Tier::Unfetched);
        assert!(!default_image_path(dir.path()).exists());

        assert!(game.decode_to_memory(&pipeline).is_err());
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn on_demand_texture_does_not_retry_after_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let (transfer, log) = FakeTransfer::new();
        let pipeline = pipeline(transfer.failing("http://img/7.jpg"));
        let mut game = item(7, dir.path(), Some("http://img/7.jpg"));

        assert!(game.texture(&pipeline).is_none());
        assert!(game.texture(&pipeline).is_none());
        assert!(game.has_failed_decode());
        assert_eq!(log.borrow().len(), 1);

        // An explicit decode (as a window scan does) tries again.
        assert!(game.decode_to_memory(&pipeline).is_err());
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn texture_loads_on_demand() {
        let dir = tempfile::TempDir::new().unwrap();
        let (transfer, _log) = FakeTransfer::new();
        let pipeline = pipeline(transfer);
        let mut game = item(7, dir.path(), Some("http://img/7.jpg"));

        assert!(game.texture(&pipeline).is_some());
        assert_eq!(game.tier(), Tier::DecodedInMemory);
    }

    #[test]
    fn vanished_file_is_fetched_again() {
        let dir = tempfile::TempDir::new().unwrap();
        let (transfer, log) = FakeTransfer::new();
        let pipeline = pipeline(transfer);
        let mut game = item(7, dir.path(), Some("http://img/7.jpg"));
        game.cache_to_disk(&pipeline).unwrap();
        fs::remove_file(game.cache_path()).unwrap();

        game.decode_to_memory(&pipeline).unwrap();
        assert_eq!(game.tier(), Tier::DecodedInMemory);
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn drop_releases_both_tiers() {
        let dir = tempfile::TempDir::new().unwrap();
        let (transfer, _log) = FakeTransfer::new();
        let pipeline = pipeline(transfer);
        let mut game = item(7, dir.path(), Some("http://img/7.jpg"));
        game.decode_to_memory(&pipeline).unwrap();
        let path = game.cache_path().to_path_buf();

        drop(game);
        assert!(!path.exists());
    }
}
