// src/decoder.rs
//! Image decoding for pixmaps.
//!
//! Decoders hand back an 8-bit greyscale grid; colour images are converted
//! with the usual luma weighting. Thresholding to black/white is the widget's
//! business, not the decoder's.

use crate::error::{DisplayError, Result};
use log::debug;
use std::path::Path;

/// Row-major 8-bit greyscale pixels, 0 = black, 255 = white.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreyImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl GreyImage {
    /// Fails with `InvalidGeometry` if `pixels` does not hold `width × height` values.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        if pixels.len() != width as usize * height as usize {
            return Err(DisplayError::InvalidGeometry(format!(
                "{}x{} image needs {} pixels, got {}",
                width,
                height,
                width as usize * height as usize,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Applies `f` to every pixel.
    pub fn map(&self, f: impl Fn(u8) -> u8) -> GreyImage {
        GreyImage {
            width: self.width,
            height: self.height,
            pixels: self.pixels.iter().copied().map(f).collect(),
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        (x < self.width && y < self.height)
            .then(|| self.pixels[y as usize * self.width as usize + x as usize])
    }
}

/// Capability: read an image file into a greyscale grid.
pub trait ImageDecoder {
    fn decode(&self, path: &Path) -> Result<GreyImage>;
}

/// PNG, BMP and JPEG through the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateDecoder;

impl ImageDecoder for ImageCrateDecoder {
    fn decode(&self, path: &Path) -> Result<GreyImage> {
        let decoded = ::image::open(path).map_err(|e| DisplayError::ImageDecode {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let luma = decoded.to_luma8();
        let (width, height) = luma.dimensions();
        debug!(
            "ImageCrateDecoder: Decoded {} ({}x{})",
            path.display(),
            width,
            height
        );
        GreyImage::new(width, height, luma.into_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grey_image_checks_pixel_count() {
        assert!(GreyImage::new(2, 2, vec![0; 3]).is_err());
        let image = GreyImage::new(2, 1, vec![10, 20]).unwrap();
        assert_eq!(image.get(1, 0), Some(20));
        assert_eq!(image.get(2, 0), None);
    }

    #[test]
    fn decodes_png_to_grey() {
        let path =
            std::env::temp_dir().join(format!("serdisp-ui-decoder-{}.png", std::process::id()));
        let source =
            ::image::GrayImage::from_fn(3, 2, |x, _| ::image::Luma([if x == 0 { 0 } else { 255 }]));
        source.save(&path).unwrap();

        let image = ImageCrateDecoder.decode(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!((image.width(), image.height()), (3, 2));
        assert_eq!(image.get(0, 1), Some(0));
        assert_eq!(image.get(2, 1), Some(255));
    }

    #[test]
    fn missing_file_is_decode_error() {
        let err = ImageCrateDecoder.decode(Path::new("/nonexistent/logo.png"));
        assert!(matches!(err, Err(DisplayError::ImageDecode { .. })));
    }
}
