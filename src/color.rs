/// HSL colour math on the CPU
///
/// This module mirrors the compute kernel in `gpu/shaders.rs` step for step:
/// - RGB <-> HSL conversion (hue normalised to 0..1)
/// - Multiplicative HSL adjustment
/// - A `CpuReference` filter backend built on the two
///
/// Values operate directly on the stored 8-bit encoding; no gamma
/// linearisation is applied, matching the `Rgba8Unorm` textures on the GPU.

use crate::error::RenderError;
use crate::filter::FilterBackend;
use crate::state::data::{FilteredImage, SourceImage};
use crate::state::params::FilterParameters;

/// HSL colour with every component in 0..1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

/// Convert normalised RGB to HSL
pub fn rgb_to_hsl(r: f32, g: f32, b: f32) -> Hsl {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) * 0.5;
    let delta = max - min;

    // Achromatic
    if delta <= 0.0 {
        return Hsl { h: 0.0, s: 0.0, l };
    }

    let s = if l < 0.5 {
        delta / (max + min)
    } else {
        delta / (2.0 - max - min)
    };

    let h = if max == r {
        (g - b) / delta + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };

    Hsl { h: h / 6.0, s, l }
}

/// Convert HSL back to normalised RGB
pub fn hsl_to_rgb(hsl: Hsl) -> (f32, f32, f32) {
    let Hsl { h, s, l } = hsl;

    if s <= 0.0 {
        return (l, l, l);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    (
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    )
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Scale each HSL component by its multiplier. Hue wraps around the wheel;
/// saturation and lightness clamp to 0..1.
pub fn adjust(hsl: Hsl, params: &FilterParameters) -> Hsl {
    let h = hsl.h * params.hue;
    Hsl {
        h: h - h.floor(),
        s: (hsl.s * params.saturation).clamp(0.0, 1.0),
        l: (hsl.l * params.lightness).clamp(0.0, 1.0),
    }
}

pub fn from_unorm8(value: u8) -> f32 {
    value as f32 / 255.0
}

/// Quantise to 8 bits, rounding to nearest like a unorm texture store
pub fn to_unorm8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Apply the HSL multipliers to one RGBA8 pixel; alpha passes through
pub fn filter_pixel(rgba: [u8; 4], params: &FilterParameters) -> [u8; 4] {
    let hsl = rgb_to_hsl(from_unorm8(rgba[0]), from_unorm8(rgba[1]), from_unorm8(rgba[2]));
    let (r, g, b) = hsl_to_rgb(adjust(hsl, params));
    [to_unorm8(r), to_unorm8(g), to_unorm8(b), rgba[3]]
}

/// Filter backend that runs the kernel formula on the CPU
#[derive(Debug, Default, Clone, Copy)]
pub struct CpuReference;

impl FilterBackend for CpuReference {
    fn name(&self) -> &str {
        "cpu"
    }

    fn render(&self, source: &SourceImage, params: &FilterParameters) -> Result<FilteredImage, RenderError> {
        let mut out = Vec::with_capacity(source.as_bytes().len());
        for pixel in source.as_bytes().chunks_exact(4) {
            out.extend_from_slice(&filter_pixel([pixel[0], pixel[1], pixel[2], pixel[3]], params));
        }

        let (width, height) = source.dimensions();
        FilteredImage::from_rgba(width, height, out).map_err(|e| RenderError::Allocation(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::params::Channel;

    const RED: [u8; 4] = [255, 0, 0, 255];

    fn params(hue: f32, saturation: f32, lightness: f32) -> FilterParameters {
        FilterParameters { hue, saturation, lightness }
    }

    #[test]
    fn test_primary_conversions() {
        let red = rgb_to_hsl(1.0, 0.0, 0.0);
        assert_eq!(red, Hsl { h: 0.0, s: 1.0, l: 0.5 });

        let green = rgb_to_hsl(0.0, 1.0, 0.0);
        assert!((green.h - 1.0 / 3.0).abs() < 1e-6);

        let blue = rgb_to_hsl(0.0, 0.0, 1.0);
        assert!((blue.h - 2.0 / 3.0).abs() < 1e-6);

        let grey = rgb_to_hsl(0.25, 0.25, 0.25);
        assert_eq!(grey.s, 0.0);
        assert_eq!(grey.l, 0.25);
    }

    #[test]
    fn test_unity_is_identity_for_every_byte_level() {
        let unity = FilterParameters::default();
        for v in (0..=255u16).step_by(5) {
            let v = v as u8;
            for pixel in [[v, 0, 0, 255], [v, v / 2, 255 - v, 128], [v, v, v, 7]] {
                assert_eq!(filter_pixel(pixel, &unity), pixel, "pixel {:?}", pixel);
            }
        }
    }

    #[test]
    fn test_solid_red_unity_exact() {
        let source = SourceImage::solid(2, 2, RED).unwrap();
        let out = CpuReference.render(&source, &FilterParameters::default()).unwrap();
        assert_eq!(out.dimensions(), (2, 2));
        assert_eq!(out.as_bytes(), source.as_bytes());
    }

    #[test]
    fn test_solid_red_desaturated_is_grey() {
        let source = SourceImage::solid(2, 2, RED).unwrap();
        let out = CpuReference.render(&source, &params(1.0, 0.0, 1.0)).unwrap();

        // Red has HSL lightness 0.5, which quantises to 128
        for pixel in out.as_bytes().chunks_exact(4) {
            assert_eq!(pixel, [128, 128, 128, 255]);
        }
    }

    #[test]
    fn test_zero_lightness_is_black() {
        let source = SourceImage::test_pattern(16, 8).unwrap();
        let out = CpuReference.render(&source, &params(1.0, 1.0, 0.0)).unwrap();
        assert!(out.as_bytes().chunks_exact(4).all(|p| p[..3] == [0, 0, 0] && p[3] == 255));
    }

    #[test]
    fn test_zero_saturation_desaturates_everything() {
        let source = SourceImage::test_pattern(32, 16).unwrap();
        let out = CpuReference.render(&source, &params(1.0, 0.0, 1.0)).unwrap();
        assert!(out.as_bytes().chunks_exact(4).all(|p| p[0] == p[1] && p[1] == p[2]));
    }

    #[test]
    fn test_unity_idempotent() {
        let source = SourceImage::test_pattern(24, 12).unwrap();
        let unity = FilterParameters::default();

        let once = CpuReference.render(&source, &unity).unwrap();
        let twice = CpuReference.render(&once.clone().into_source(), &unity).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once.as_bytes(), source.as_bytes());
    }

    #[test]
    fn test_zero_hue_collapses_to_red() {
        let zero_hue = params(0.0, 1.0, 1.0);
        assert_eq!(filter_pixel([0, 0, 255, 255], &zero_hue), [255, 0, 0, 255]);
        assert_eq!(filter_pixel([0, 255, 0, 255], &zero_hue), [255, 0, 0, 255]);

        // Saturation and lightness survive, only the hue angle goes to 0
        let source = SourceImage::test_pattern(32, 16).unwrap();
        let out = CpuReference.render(&source, &zero_hue).unwrap();
        for (before, after) in source.as_bytes().chunks_exact(4).zip(out.as_bytes().chunks_exact(4)) {
            let hsl = rgb_to_hsl(from_unorm8(after[0]), from_unorm8(after[1]), from_unorm8(after[2]));
            let original = rgb_to_hsl(from_unorm8(before[0]), from_unorm8(before[1]), from_unorm8(before[2]));
            assert!(after[0] >= after[1] && after[1].abs_diff(after[2]) <= 1, "pixel {:?}", after);
            assert!((hsl.l - original.l).abs() <= 1.0 / 255.0);
        }
    }

    #[test]
    fn test_hue_wraps() {
        // Blue (h = 2/3) doubled lands on 4/3, which wraps to green (1/3)
        let mut p = FilterParameters::default();
        p.set(Channel::Hue, 2.0).unwrap();
        assert_eq!(filter_pixel([0, 0, 255, 255], &p), [0, 255, 0, 255]);
    }

    #[test]
    fn test_saturation_and_lightness_clamp() {
        let adjusted = adjust(Hsl { h: 0.2, s: 0.8, l: 0.9 }, &params(1.0, 2.0, 2.0));
        assert_eq!(adjusted.s, 1.0);
        assert_eq!(adjusted.l, 1.0);
    }

    #[test]
    fn test_dimensions_preserved() {
        for (w, h) in [(1, 1), (3, 7), (17, 5)] {
            let source = SourceImage::test_pattern(w, h).unwrap();
            let out = CpuReference.render(&source, &params(0.3, 1.7, 0.8)).unwrap();
            assert_eq!(out.dimensions(), (w, h));
        }
    }
}
