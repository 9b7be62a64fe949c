/// wgpu compute pipeline for the HSL filter
///
/// Device, queue and compute pipeline are created once and shared across
/// renders. Each render allocates its own textures, uniform and readback
/// buffer:
/// - Upload the source into an `Rgba8Unorm` texture
/// - Dispatch the kernel over a grid rounded up to whole work-groups
/// - Copy the storage texture into a mappable buffer and strip row padding
///
/// Renders are serialized on the device: wgpu error scopes form one stack
/// per device, so two overlapping renders would read each other's errors.

use std::sync::Mutex;

// Use wgpu from iced to avoid dependency conflicts
use iced_wgpu::wgpu;
use tracing::{debug, error, info};
use wgpu::util::DeviceExt;

use super::shaders;
use super::workgroup::WorkgroupSize;
use crate::error::{RenderError, ResourceCreationError};
use crate::filter::FilterBackend;
use crate::state::data::{FilteredImage, SourceImage};
use crate::state::params::FilterParameters;

/// Multipliers in a GPU-friendly layout
/// Must match the WGSL `HslParams` struct (16 bytes)
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct GpuHslParams {
    hue: f32,
    saturation: f32,
    lightness: f32,
    _padding: f32,
}

impl From<&FilterParameters> for GpuHslParams {
    fn from(params: &FilterParameters) -> Self {
        let [hue, saturation, lightness] = params.as_array();
        Self {
            hue,
            saturation,
            lightness,
            _padding: 0.0,
        }
    }
}

/// Compute pipeline for the HSL kernel
pub struct HslPipeline {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    workgroup: WorkgroupSize,
    adapter_name: String,
    backend: wgpu::Backend,
    /// Held for the whole of `run`
    render_lock: Mutex<()>,
}

// Manual Debug implementation (wgpu types don't implement Debug)
impl std::fmt::Debug for HslPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HslPipeline")
            .field("adapter", &self.adapter_name)
            .field("backend", &self.backend)
            .field("workgroup", &self.workgroup)
            .finish_non_exhaustive()
    }
}

impl HslPipeline {
    /// Acquire a device and build the compute pipeline
    pub async fn new(power_preference: wgpu::PowerPreference) -> Result<Self, ResourceCreationError> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(ResourceCreationError::NoAdapter)?;

        let adapter_info = adapter.get_info();
        info!(
            name = %adapter_info.name,
            backend = ?adapter_info.backend,
            "GPU adapter selected"
        );

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("HSL Filter Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits()),
                },
                None,
            )
            .await
            .map_err(|e| ResourceCreationError::Device(e.to_string()))?;

        // Errors we don't capture in a scope get logged instead of panicking
        device.on_uncaptured_error(Box::new(|e| {
            error!(error = %e, "uncaptured wgpu error");
        }));

        let workgroup = WorkgroupSize::from_limits(&device.limits());
        debug!(width = workgroup.width, height = workgroup.height, "work-group size");

        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("HSL Kernel"),
            source: wgpu::ShaderSource::Wgsl(shaders::hsl_kernel(workgroup).into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("HSL Bind Group Layout"),
            entries: &[
                // Input texture
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                // Output storage texture
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::StorageTexture {
                        access: wgpu::StorageTextureAccess::WriteOnly,
                        format: wgpu::TextureFormat::Rgba8Unorm,
                        view_dimension: wgpu::TextureViewDimension::D2,
                    },
                    count: None,
                },
                // Multipliers
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<GpuHslParams>() as u64),
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("HSL Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("HSL Compute Pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: shaders::ENTRY_POINT,
        });

        if let Some(e) = device.pop_error_scope().await {
            return Err(ResourceCreationError::Pipeline(e.to_string()));
        }

        info!("✅ HSL compute pipeline ready");

        Ok(Self {
            device,
            queue,
            pipeline,
            bind_group_layout,
            workgroup,
            adapter_name: adapter_info.name,
            backend: adapter_info.backend,
            render_lock: Mutex::new(()),
        })
    }

    /// Blocking variant of [`HslPipeline::new`]
    pub fn new_blocking(power_preference: wgpu::PowerPreference) -> Result<Self, ResourceCreationError> {
        pollster::block_on(Self::new(power_preference))
    }

    pub fn adapter_name(&self) -> &str {
        &self.adapter_name
    }

    pub fn workgroup(&self) -> WorkgroupSize {
        self.workgroup
    }

    /// Run the kernel over `source` and read the result back.
    /// Blocks until the GPU has finished.
    pub fn run(&self, source: &SourceImage, params: &FilterParameters) -> Result<FilteredImage, RenderError> {
        let (width, height) = source.dimensions();
        let padded_bytes_per_row = check_limits(&self.device.limits(), width, height)?;
        let unpadded_bytes_per_row = width * 4;

        // The guard protects no data, so a panic elsewhere doesn't invalidate it
        let _guard = self.render_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let texture_size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        // ---- Allocation ----
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);

        let input_texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("HSL Input Texture"),
            size: texture_size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let output_texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("HSL Output Texture"),
            size: texture_size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::STORAGE_BINDING | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });

        let output_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("HSL Readback Buffer"),
            size: padded_bytes_per_row as u64 * height as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        // Pop both scopes before bailing so the stack stays balanced
        let out_of_memory = pollster::block_on(self.device.pop_error_scope());
        let invalid = pollster::block_on(self.device.pop_error_scope());
        if let Some(e) = out_of_memory.or(invalid) {
            return Err(RenderError::Allocation(e.to_string()));
        }

        // ---- Upload + dispatch ----
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);

        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &input_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            source.as_bytes(),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(unpadded_bytes_per_row),
                rows_per_image: Some(height),
            },
            texture_size,
        );

        let uniform_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("HSL Params Uniform Buffer"),
            contents: bytemuck::bytes_of(&GpuHslParams::from(params)),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let input_view = input_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let output_view = output_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("HSL Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&input_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&output_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: uniform_buffer.as_entire_binding(),
                },
            ],
        });

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("HSL Encoder"),
        });

        let (groups_x, groups_y) = self.workgroup.grid_for(width, height);
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("HSL Compute Pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups(groups_x, groups_y, 1);
        }

        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &output_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &output_buffer,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            texture_size,
        );

        self.queue.submit(Some(encoder.finish()));

        if let Some(e) = pollster::block_on(self.device.pop_error_scope()) {
            return Err(RenderError::Dispatch(e.to_string()));
        }

        debug!(groups_x, groups_y, "HSL kernel dispatched");

        // ---- Readback ----
        let buffer_slice = output_buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = self.device.poll(wgpu::Maintain::Wait);

        rx.recv()
            .map_err(|e| RenderError::Readback(e.to_string()))?
            .map_err(|e| RenderError::Readback(e.to_string()))?;

        let data = buffer_slice.get_mapped_range();
        let mut output = Vec::with_capacity(unpadded_bytes_per_row as usize * height as usize);
        for row in data.chunks_exact(padded_bytes_per_row as usize) {
            output.extend_from_slice(&row[..unpadded_bytes_per_row as usize]);
        }

        drop(data);
        output_buffer.unmap();

        FilteredImage::from_rgba(width, height, output).map_err(|e| RenderError::Readback(e.to_string()))
    }
}

/// Reject images the device can't hold before touching it.
/// Returns the 256-byte aligned readback row pitch.
fn check_limits(limits: &wgpu::Limits, width: u32, height: u32) -> Result<u32, RenderError> {
    let max = limits.max_texture_dimension_2d;
    if width > max || height > max {
        return Err(RenderError::TextureTooLarge { width, height, max });
    }

    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    let padded_bytes_per_row = (width * 4).div_ceil(align) * align;

    let size = padded_bytes_per_row as u64 * height as u64;
    if size > limits.max_buffer_size {
        return Err(RenderError::BufferTooLarge {
            size,
            max: limits.max_buffer_size,
        });
    }

    Ok(padded_bytes_per_row)
}

impl FilterBackend for HslPipeline {
    fn name(&self) -> &str {
        "gpu"
    }

    fn render(&self, source: &SourceImage, params: &FilterParameters) -> Result<FilteredImage, RenderError> {
        self.run(source, params)
    }
}
