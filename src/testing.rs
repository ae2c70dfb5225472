//! Test doubles shared by the unit tests.

use image::{ImageFormat, Rgba, RgbaImage};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::rc::Rc;

use crate::error::{GameBarError, Result};
use crate::item::Item;
use crate::models::GameRecord;
use crate::pipeline::{ImagePipeline, ImageTransfer};
use crate::texture::ImageTextureLoader;

pub(crate) const DEFAULT_URL: &str = "http://img/default.jpg";

pub(crate) type FetchLog = Rc<RefCell<Vec<String>>>;

/// Writes a small PNG for every fetch and records the URLs it was asked for.
pub(crate) struct FakeTransfer {
    log: FetchLog,
    failing: HashSet<String>,
    corrupt: HashSet<String>,
}

impl FakeTransfer {
    pub(crate) fn new() -> (Self, FetchLog) {
        let log = FetchLog::default();
        let transfer = Self {
            log: log.clone(),
            failing: HashSet::new(),
            corrupt: HashSet::new(),
        };
        (transfer, log)
    }

    pub(crate) fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    pub(crate) fn corrupt(mut self, url: &str) -> Self {
        self.corrupt.insert(url.to_string());
        self
    }
}

impl ImageTransfer for FakeTransfer {
    fn fetch(&self, url: &str, dest: &Path) -> Result<()> {
        self.log.borrow_mut().push(url.to_string());
        if self.failing.contains(url) {
            return Err(GameBarError::Transfer {
                url: url.to_string(),
                message: "connection refused".into(),
            });
        }
        let bytes = if self.corrupt.contains(url) {
            b"not an image".to_vec()
        } else {
            png_bytes()
        };
        fs::write(dest, bytes).map_err(|e| GameBarError::Transfer {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

pub(crate) fn png_bytes() -> Vec<u8> {
    let img = RgbaImage::from_pixel(4, 4, Rgba([200, 30, 30, 255]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .expect("encoding a 4x4 png");
    out.into_inner()
}

pub(crate) fn pipeline(transfer: FakeTransfer) -> ImagePipeline {
    ImagePipeline::new(
        Box::new(transfer),
        Box::new(ImageTextureLoader::new(320, 180)),
        DEFAULT_URL,
    )
}

pub(crate) fn record(key: i64, image_url: Option<&str>) -> GameRecord {
    GameRecord {
        key,
        title: format!("Game {key}"),
        description: String::new(),
        image_url: image_url.map(str::to_string),
    }
}

pub(crate) fn item(key: i64, cache_dir: &Path, image_url: Option<&str>) -> Item {
    Item::new(record(key, image_url), cache_dir)
}

/// `count` items that each have their own image at `http://img/<key>.jpg`.
pub(crate) fn items(count: usize, cache_dir: &Path) -> Vec<Item> {
    (0..count as i64)
        .map(|k| item(k, cache_dir, Some(&format!("http://img/{k}.jpg"))))
        .collect()
}
