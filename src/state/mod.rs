/// State management module
///
/// This module holds the data model shared by the UI shell and the filter:
/// - Pixel buffers for source and filtered images (data.rs)
/// - HSL multipliers and the slider mapping (params.rs)
/// - Ordering of background render results (sequence.rs)

pub mod data;
pub mod params;
pub mod sequence;
