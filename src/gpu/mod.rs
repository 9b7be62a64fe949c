/// GPU-accelerated HSL filtering
///
/// This module runs the HSL kernel on the GPU using wgpu compute shaders.
///
/// Architecture:
/// - `shaders.rs` - WGSL kernel source
/// - `workgroup.rs` - work-group and dispatch grid sizing
/// - `pipeline.rs` - device, pipeline and per-render dispatch

pub mod pipeline;
pub mod shaders;
pub mod workgroup;

pub use pipeline::HslPipeline;
