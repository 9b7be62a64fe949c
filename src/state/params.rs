/// HSL multipliers applied by the filter
///
/// Each multiplier is nominally in [0, 2] with 1.0 meaning "no change".
/// Sliders run over 0..1 and map onto that range with `value * 2`, so the
/// slider midpoint is the unity point.

use std::fmt;

use crate::error::ParameterError;

/// Slider position that maps to a multiplier of 1.0
pub const SLIDER_MIDPOINT: f32 = 0.5;

/// Map a raw slider position (0..1) onto a multiplier (0..2)
pub fn slider_to_multiplier(raw: f32) -> f32 {
    raw * 2.0
}

/// Inverse of [`slider_to_multiplier`]
pub fn multiplier_to_slider(multiplier: f32) -> f32 {
    multiplier / 2.0
}

/// Which HSL component a slider controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Hue,
    Saturation,
    Lightness,
}

impl Channel {
    /// All channels in slider order
    pub const ALL: [Channel; 3] = [Channel::Hue, Channel::Saturation, Channel::Lightness];

    pub fn label(self) -> &'static str {
        match self {
            Channel::Hue => "Hue",
            Channel::Saturation => "Saturation",
            Channel::Lightness => "Lightness",
        }
    }

    /// Parameter slot in the kernel uniform
    pub fn kernel_index(self) -> usize {
        match self {
            Channel::Hue => 0,
            Channel::Saturation => 1,
            Channel::Lightness => 2,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The three multipliers owned by the filter core
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParameters {
    /// Hue multiplier; the scaled hue wraps around the colour wheel
    pub hue: f32,

    /// Saturation multiplier; 0.0 = fully desaturated
    pub saturation: f32,

    /// Lightness multiplier; 0.0 = black
    pub lightness: f32,
}

impl Default for FilterParameters {
    /// Unity on every channel (no adjustment)
    fn default() -> Self {
        Self {
            hue: 1.0,
            saturation: 1.0,
            lightness: 1.0,
        }
    }
}

impl FilterParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, channel: Channel) -> f32 {
        match channel {
            Channel::Hue => self.hue,
            Channel::Saturation => self.saturation,
            Channel::Lightness => self.lightness,
        }
    }

    /// Set one multiplier; non-finite values are rejected and leave the
    /// parameters untouched
    pub fn set(&mut self, channel: Channel, value: f32) -> Result<(), ParameterError> {
        if !value.is_finite() {
            return Err(ParameterError::NonFinite { channel, value });
        }

        let slot = match channel {
            Channel::Hue => &mut self.hue,
            Channel::Saturation => &mut self.saturation,
            Channel::Lightness => &mut self.lightness,
        };
        *slot = value;
        Ok(())
    }

    /// Multipliers in kernel binding order (hue, saturation, lightness)
    pub fn as_array(&self) -> [f32; 3] {
        let mut out = [0.0; 3];
        for channel in Channel::ALL {
            out[channel.kernel_index()] = self.get(channel);
        }
        out
    }

    /// True when every multiplier is exactly 1.0
    pub fn is_unity(&self) -> bool {
        *self == Self::default()
    }

    /// Back to unity on every channel
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
