//! Seams between the cache logic and the outside world: fetching an image
//! into the cache directory, and decoding a cached file.

use std::path::Path;

use crate::error::Result;
use crate::texture::Texture;

/// Fetches a remote image into a local file.  Blocking.
pub trait ImageTransfer {
    fn fetch(&self, url: &str, dest: &Path) -> Result<()>;
}

/// Decodes a local file into a renderable texture.
pub trait TextureLoader {
    fn load(&self, path: &Path) -> Result<Texture>;
}

/// The services an item needs to move between tiers.
pub struct ImagePipeline {
    transfer: Box<dyn ImageTransfer>,
    loader: Box<dyn TextureLoader>,
    default_url: String,
}

impl ImagePipeline {
    /// * `default_url` – fetched for items whose record has no image of its own
    pub fn new(
        transfer: Box<dyn ImageTransfer>,
        loader: Box<dyn TextureLoader>,
        default_url: impl Into<String>,
    ) -> Self {
        Self {
            transfer,
            loader,
            default_url: default_url.into(),
        }
    }

    pub fn transfer(&self) -> &dyn ImageTransfer {
        self.transfer.as_ref()
    }

    pub fn loader(&self) -> &dyn TextureLoader {
        self.loader.as_ref()
    }

    pub fn default_url(&self) -> &str {
        &self.default_url
    }
}
