//! GPU compute-shader HSL image filter with a three-slider UI
//!
//! - `filter` - the filter core and the `FilterBackend` seam
//! - `gpu` - wgpu compute pipeline running the HSL kernel
//! - `color` - CPU rendition of the same kernel
//! - `state` - parameters, pixel buffers, render ordering
//! - `app` / `ui` - the iced window

pub mod app;
pub mod color;
pub mod config;
pub mod error;
pub mod filter;
pub mod gpu;
pub mod state;
pub mod ui;

pub use app::{FilterDemo, Message};
