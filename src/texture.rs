//! Decoded, renderable game images.

use image::{imageops::FilterType, ImageReader, RgbaImage};
use std::path::Path;

use crate::error::{GameBarError, Result};
use crate::pipeline::TextureLoader;

/// An owned RGBA bitmap ready to be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pixels: RgbaImage,
}

impl Texture {
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// RGB at `(x, y)`, clamped to the bitmap edges.
    pub fn rgb_at(&self, x: u32, y: u32) -> [u8; 3] {
        let x = x.min(self.width().saturating_sub(1));
        let y = y.min(self.height().saturating_sub(1));
        let [r, g, b, _] = self.pixels.get_pixel(x, y).0;
        [r, g, b]
    }

    /// Nearest-neighbour sample at fractional coordinates in `[0, 1)`.
    pub fn sample(&self, u: f32, v: f32) -> [u8; 3] {
        let x = (u * self.width() as f32) as u32;
        let y = (v * self.height() as f32) as u32;
        self.rgb_at(x, y)
    }
}

/// Decodes cache files with the `image` crate, downsampled so that no texture
/// is larger than `max_width` x `max_height`.
#[derive(Debug, Clone, Copy)]
pub struct ImageTextureLoader {
    pub max_width: u32,
    pub max_height: u32,
}

impl ImageTextureLoader {
    pub fn new(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width,
            max_height,
        }
    }
}

impl TextureLoader for ImageTextureLoader {
    fn load(&self, path: &Path) -> Result<Texture> {
        let decode_error = |message: String| GameBarError::Decode {
            path: path.to_path_buf(),
            message,
        };
        // Cache files are always named `.jpg`; sniff the real format.
        let decoded = ImageReader::open(path)
            .and_then(|r| r.with_guessed_format())
            .map_err(|e| decode_error(e.to_string()))?
            .decode()
            .map_err(|e| decode_error(e.to_string()))?;
        let bounded = if decoded.width() > self.max_width || decoded.height() > self.max_height {
            decoded.resize(self.max_width, self.max_height, FilterType::Triangle)
        } else {
            decoded
        };
        Ok(Texture::from_rgba(bounded.to_rgba8()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::fs;

    fn write_png(path: &Path, width: u32, height: u32) {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        img.save_with_format(path, ImageFormat::Png).unwrap();
    }

    #[test]
    fn large_images_are_bounded() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("big.png");
        write_png(&path, 640, 360);

        let texture = ImageTextureLoader::new(320, 180).load(&path).unwrap();
        assert_eq!((texture.width(), texture.height()), (320, 180));
        assert_eq!(texture.rgb_at(0, 0), [10, 20, 30]);
    }

    #[test]
    fn small_images_are_kept_as_is() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("small.png");
        write_png(&path, 8, 4);

        let texture = ImageTextureLoader::new(320, 180).load(&path).unwrap();
        assert_eq!((texture.width(), texture.height()), (8, 4));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("broken.jpg");
        fs::write(&path, b"definitely not a jpeg").unwrap();

        let err = ImageTextureLoader::new(320, 180).load(&path).unwrap_err();
        assert!(matches!(err, GameBarError::Decode { .. }));
    }

    #[test]
    fn sampling_clamps_to_edges() {
        let texture = Texture::from_rgba(RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255])));
        assert_eq!(texture.sample(0.999, 0.999), [1, 2, 3]);
        assert_eq!(texture.rgb_at(50, 50), [1, 2, 3]);
    }
}
