/// Error types for the filter core and its inputs
///
/// GPU failures are split in two: `ResourceCreationError` covers the one-time
/// device and pipeline setup, `RenderError` covers a single render call and is
/// always recoverable (the caller keeps its previous image).

use thiserror::Error;

use crate::state::params::Channel;

/// Device, queue or pipeline could not be created
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResourceCreationError {
    #[error("no suitable GPU adapter found")]
    NoAdapter,

    #[error("failed to create GPU device: {0}")]
    Device(String),

    #[error("failed to build compute pipeline: {0}")]
    Pipeline(String),
}

/// A single render call failed; prior output stays valid
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RenderError {
    #[error("image {width}x{height} exceeds the device texture limit of {max}")]
    TextureTooLarge { width: u32, height: u32, max: u32 },

    #[error("readback of {size} bytes exceeds the device buffer limit of {max}")]
    BufferTooLarge { size: u64, max: u64 },

    #[error("GPU allocation failed: {0}")]
    Allocation(String),

    #[error("compute dispatch failed: {0}")]
    Dispatch(String),

    #[error("failed to read back filtered pixels: {0}")]
    Readback(String),

    #[error("backend returned {actual_width}x{actual_height}, expected {width}x{height}")]
    SizeMismatch {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },
}

/// Source image could not be constructed
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ImageError {
    #[error("image has zero width or height")]
    Empty,

    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("failed to decode image: {0}")]
    Decode(String),
}

/// Rejected parameter update
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParameterError {
    #[error("{channel} multiplier must be finite, got {value}")]
    NonFinite { channel: Channel, value: f32 },
}
