/// Work-group and dispatch grid sizing
///
/// wgpu does not report a per-pipeline execution width, so the group width is
/// fixed at a value that maps well onto common SIMD widths and the height is
/// whatever the device's invocation limit leaves over (`max_invocations / w`). The dispatch grid is
/// rounded up so the whole image is covered.

use iced_wgpu::wgpu;

/// Preferred number of invocations along x in one work-group
pub const EXECUTION_WIDTH: u32 = 16;

/// Threads per work-group along x and y
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkgroupSize {
    pub width: u32,
    pub height: u32,
}

impl WorkgroupSize {
    /// `EXECUTION_WIDTH` wide (or less if the device says so), as tall as the
    /// remaining invocation budget allows
    pub fn from_limits(limits: &wgpu::Limits) -> Self {
        let width = EXECUTION_WIDTH
            .min(limits.max_compute_workgroup_size_x)
            .min(limits.max_compute_invocations_per_workgroup)
            .max(1);
        let height = (limits.max_compute_invocations_per_workgroup / width)
            .min(limits.max_compute_workgroup_size_y)
            .max(1);

        Self { width, height }
    }

    /// Number of work-groups needed to cover a `width` x `height` image
    pub fn grid_for(&self, width: u32, height: u32) -> (u32, u32) {
        (width.div_ceil(self.width), height.div_ceil(self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits_give_16x16() {
        let size = WorkgroupSize::from_limits(&wgpu::Limits::default());
        assert_eq!(size, WorkgroupSize { width: 16, height: 16 });
    }

    #[test]
    fn test_height_fills_invocation_budget() {
        let limits = wgpu::Limits {
            max_compute_invocations_per_workgroup: 1024,
            max_compute_workgroup_size_y: 1024,
            ..wgpu::Limits::default()
        };
        let size = WorkgroupSize::from_limits(&limits);
        assert_eq!(size, WorkgroupSize { width: 16, height: 64 });
    }

    #[test]
    fn test_height_capped_by_axis_limit() {
        let limits = wgpu::Limits {
            max_compute_invocations_per_workgroup: 1024,
            max_compute_workgroup_size_y: 32,
            ..wgpu::Limits::default()
        };
        let size = WorkgroupSize::from_limits(&limits);
        assert_eq!(size, WorkgroupSize { width: 16, height: 32 });
    }

    #[test]
    fn test_downlevel_limits_respected() {
        let limits = wgpu::Limits::downlevel_webgl2_defaults();
        let size = WorkgroupSize::from_limits(&limits);
        assert!(size.width * size.height <= limits.max_compute_invocations_per_workgroup.max(1));
        assert!(size.width >= 1 && size.height >= 1);
    }

    #[test]
    fn test_small_invocation_budget() {
        let limits = wgpu::Limits {
            max_compute_invocations_per_workgroup: 64,
            ..wgpu::Limits::default()
        };
        let size = WorkgroupSize::from_limits(&limits);
        assert_eq!(size, WorkgroupSize { width: 16, height: 4 });
    }

    #[test]
    fn test_grid_covers_exact_multiples() {
        let size = WorkgroupSize { width: 16, height: 16 };
        assert_eq!(size.grid_for(64, 32), (4, 2));
    }

    #[test]
    fn test_grid_rounds_up_partial_groups() {
        let size = WorkgroupSize { width: 16, height: 8 };
        assert_eq!(size.grid_for(17, 9), (2, 2));
        assert_eq!(size.grid_for(1, 1), (1, 1));
        assert_eq!(size.grid_for(2, 2), (1, 1));

        let (gx, gy) = size.grid_for(1000, 333);
        assert!(gx * size.width >= 1000 && (gx - 1) * size.width < 1000);
        assert!(gy * size.height >= 333 && (gy - 1) * size.height < 333);
    }
}
