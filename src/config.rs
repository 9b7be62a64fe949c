/// Command line options
///
/// Everything has a default, so running with no arguments shows the built-in
/// test pattern filtered on the high-performance GPU.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use iced_wgpu::wgpu;

use crate::error::ImageError;
use crate::state::data::SourceImage;

/// Size of the built-in test pattern
pub const TEST_PATTERN_SIZE: (u32, u32) = (768, 512);

#[derive(Parser, Debug, Clone)]
#[command(name = "hsl-filter-demo", version, about = "GPU HSL filter driven by three sliders")]
pub struct Args {
    /// Source image to filter (defaults to a built-in test pattern)
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// GPU adapter power preference
    #[arg(long, value_enum, default_value_t = Power::High)]
    pub power: Power,

    /// Skip the GPU and filter on the CPU
    #[arg(long)]
    pub cpu: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Power {
    Low,
    High,
}

impl Power {
    pub fn preference(self) -> wgpu::PowerPreference {
        match self {
            Power::Low => wgpu::PowerPreference::LowPower,
            Power::High => wgpu::PowerPreference::HighPerformance,
        }
    }
}

impl Args {
    /// Load the image named on the command line, or build the test pattern
    pub fn load_source(&self) -> Result<SourceImage, ImageError> {
        match &self.image {
            Some(path) => SourceImage::open(path),
            None => SourceImage::test_pattern(TEST_PATTERN_SIZE.0, TEST_PATTERN_SIZE.1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["hsl-filter-demo"]).unwrap();
        assert_eq!(args.image, None);
        assert_eq!(args.power, Power::High);
        assert!(!args.cpu);
        assert_eq!(args.power.preference(), wgpu::PowerPreference::HighPerformance);
    }

    #[test]
    fn test_flags() {
        let args = Args::try_parse_from(["hsl-filter-demo", "--power", "low", "--cpu", "--image", "photo.png"])
            .unwrap();
        assert_eq!(args.power, Power::Low);
        assert!(args.cpu);
        assert_eq!(args.image, Some(PathBuf::from("photo.png")));
    }

    #[test]
    fn test_rejects_unknown_power() {
        assert!(Args::try_parse_from(["hsl-filter-demo", "--power", "medium"]).is_err());
    }

    #[test]
    fn test_default_source_is_test_pattern() {
        let args = Args::try_parse_from(["hsl-filter-demo"]).unwrap();
        let source = args.load_source().unwrap();
        assert_eq!(source.dimensions(), TEST_PATTERN_SIZE);
    }

    #[test]
    fn test_missing_image_is_decode_error() {
        let args = Args::try_parse_from(["hsl-filter-demo", "--image", "/nonexistent/picture.png"]).unwrap();
        assert!(matches!(args.load_source(), Err(ImageError::Decode(_))));
    }
}
