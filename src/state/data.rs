/// Pixel buffers that flow between the UI shell and the filter core
///
/// `SourceImage` is the immutable input, shared by `Arc` so a render never
/// copies it. `FilteredImage` is produced fresh by every render.

use std::path::Path;

use iced::widget::image::Handle;
use image::{Rgba, RgbaImage};

use crate::color;
use crate::error::ImageError;

/// Build an RGBA8 image from an exactly sized, non-empty buffer
fn checked_rgba(width: u32, height: u32, bytes: Vec<u8>) -> Result<RgbaImage, ImageError> {
    if width == 0 || height == 0 {
        return Err(ImageError::Empty);
    }

    let expected = width as usize * height as usize * 4;
    let actual = bytes.len();
    if actual != expected {
        return Err(ImageError::BufferSize { expected, actual });
    }

    RgbaImage::from_raw(width, height, bytes).ok_or(ImageError::BufferSize { expected, actual })
}

/// Immutable, non-empty RGBA8 input image
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    pixels: RgbaImage,
}

impl SourceImage {
    /// Wrap a tightly packed RGBA8 buffer
    pub fn from_rgba(width: u32, height: u32, bytes: Vec<u8>) -> Result<Self, ImageError> {
        Ok(Self {
            pixels: checked_rgba(width, height, bytes)?,
        })
    }

    /// Decode any format the `image` crate understands
    pub fn open(path: &Path) -> Result<Self, ImageError> {
        let decoded = image::open(path).map_err(|e| ImageError::Decode(e.to_string()))?;
        let pixels = decoded.into_rgba8();
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(ImageError::Empty);
        }
        Ok(Self { pixels })
    }

    /// Single-colour image
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::Empty);
        }
        Ok(Self {
            pixels: RgbaImage::from_pixel(width, height, Rgba(rgba)),
        })
    }

    /// Built-in image shown when no file is given: hue sweeps left to right,
    /// lightness top (light) to bottom (dark), full saturation
    pub fn test_pattern(width: u32, height: u32) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::Empty);
        }

        let pixels = RgbaImage::from_fn(width, height, |x, y| {
            let hue = x as f32 / width as f32;
            let lightness = 1.0 - (y as f32 + 0.5) / height as f32;
            let (r, g, b) = color::hsl_to_rgb(color::Hsl {
                h: hue,
                s: 1.0,
                l: lightness,
            });
            Rgba([
                color::to_unorm8(r),
                color::to_unorm8(g),
                color::to_unorm8(b),
                255,
            ])
        });
        Ok(Self { pixels })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Tightly packed RGBA8 bytes, row-major
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels.get_pixel(x, y).0
    }

    /// Image handle for displaying the unfiltered source
    pub fn to_handle(&self) -> Handle {
        Handle::from_rgba(self.width(), self.height(), self.pixels.as_raw().clone())
    }
}

/// Output of one render call; same dimensions as its source
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredImage {
    pixels: RgbaImage,
}

impl FilteredImage {
    /// Wrap rendered RGBA8 bytes
    pub fn from_rgba(width: u32, height: u32, bytes: Vec<u8>) -> Result<Self, ImageError> {
        Ok(Self {
            pixels: checked_rgba(width, height, bytes)?,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    /// Reinterpret as a source, e.g. to filter the result again
    pub fn into_source(self) -> SourceImage {
        SourceImage { pixels: self.pixels }
    }

    pub fn into_handle(self) -> Handle {
        let (width, height) = self.pixels.dimensions();
        Handle::from_rgba(width, height, self.pixels.into_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_dimensions() {
        assert_eq!(SourceImage::from_rgba(0, 4, vec![]), Err(ImageError::Empty));
        assert_eq!(SourceImage::solid(3, 0, [0, 0, 0, 255]), Err(ImageError::Empty));
        assert_eq!(SourceImage::test_pattern(0, 0), Err(ImageError::Empty));
    }

    #[test]
    fn test_rejects_wrong_buffer_size() {
        let err = SourceImage::from_rgba(2, 2, vec![0; 15]).unwrap_err();
        assert_eq!(err, ImageError::BufferSize { expected: 16, actual: 15 });
    }

    #[test]
    fn test_solid_fills_every_pixel() {
        let img = SourceImage::solid(2, 3, [255, 0, 0, 255]).unwrap();
        assert_eq!(img.dimensions(), (2, 3));
        assert_eq!(img.as_bytes().len(), 2 * 3 * 4);
        assert!(img.as_bytes().chunks_exact(4).all(|p| p == [255, 0, 0, 255]));
    }

    #[test]
    fn test_pattern_is_opaque_and_varied() {
        let img = SourceImage::test_pattern(64, 32).unwrap();
        assert!(img.as_bytes().chunks_exact(4).all(|p| p[3] == 255));
        // Top row is lighter than the bottom row
        let top = img.pixel(0, 0);
        let bottom = img.pixel(0, 31);
        assert!(top.iter().take(3).map(|&c| c as u32).sum::<u32>()
            > bottom.iter().take(3).map(|&c| c as u32).sum::<u32>());
        // Hue changes along a row
        assert_ne!(img.pixel(0, 16), img.pixel(32, 16));
    }

    #[test]
    fn test_filtered_round_trips_into_source() {
        let bytes: Vec<u8> = (0..16).collect();
        let filtered = FilteredImage::from_rgba(2, 2, bytes.clone()).unwrap();
        let source = filtered.into_source();
        assert_eq!(source.as_bytes(), bytes.as_slice());
    }
}
