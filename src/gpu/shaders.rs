/// WGSL compute kernel for the HSL filter
///
/// One invocation per pixel. Each invocation reads its input texel, converts
/// it to HSL, scales hue/saturation/lightness by the uniform multipliers and
/// writes the result to the same coordinate of the output texture. Invocations
/// are independent, so execution order does not matter.
///
/// The work-group size is not known until the device limits are, so the
/// source is a template with `{WORKGROUP_X}` / `{WORKGROUP_Y}` placeholders.

use super::workgroup::WorkgroupSize;

/// Kernel entry point name
pub const ENTRY_POINT: &str = "hsl_multiplier";

const HSL_KERNEL_TEMPLATE: &str = r#"
// Multipliers, indices 0/1/2 = hue/saturation/lightness
struct HslParams {
    hue: f32,
    saturation: f32,
    lightness: f32,
    _padding: f32,
}

@group(0) @binding(0)
var input_texture: texture_2d<f32>;

@group(0) @binding(1)
var output_texture: texture_storage_2d<rgba8unorm, write>;

@group(0) @binding(2)
var<uniform> params: HslParams;

// RGB (0..1) to HSL with every component in 0..1
fn rgb_to_hsl(c: vec3<f32>) -> vec3<f32> {
    let max_c = max(max(c.r, c.g), c.b);
    let min_c = min(min(c.r, c.g), c.b);
    let l = (max_c + min_c) * 0.5;
    let delta = max_c - min_c;

    if delta <= 0.0 {
        return vec3<f32>(0.0, 0.0, l);
    }

    var s: f32;
    if l < 0.5 {
        s = delta / (max_c + min_c);
    } else {
        s = delta / (2.0 - max_c - min_c);
    }

    var h: f32;
    if max_c == c.r {
        h = (c.g - c.b) / delta + select(0.0, 6.0, c.g < c.b);
    } else if max_c == c.g {
        h = (c.b - c.r) / delta + 2.0;
    } else {
        h = (c.r - c.g) / delta + 4.0;
    }

    return vec3<f32>(h / 6.0, s, l);
}

fn hue_to_rgb(p: f32, q: f32, t_in: f32) -> f32 {
    var t = t_in;
    if t < 0.0 {
        t = t + 1.0;
    }
    if t > 1.0 {
        t = t - 1.0;
    }

    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 0.5 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    return p;
}

fn hsl_to_rgb(hsl: vec3<f32>) -> vec3<f32> {
    let h = hsl.x;
    let s = hsl.y;
    let l = hsl.z;

    if s <= 0.0 {
        return vec3<f32>(l);
    }

    var q: f32;
    if l < 0.5 {
        q = l * (1.0 + s);
    } else {
        q = l + s - l * s;
    }
    let p = 2.0 * l - q;

    return vec3<f32>(
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0)
    );
}

@compute @workgroup_size({WORKGROUP_X}, {WORKGROUP_Y}, 1)
fn hsl_multiplier(@builtin(global_invocation_id) gid: vec3<u32>) {
    let dims = textureDimensions(input_texture);

    // The grid is rounded up to whole work-groups; skip the overhang
    if gid.x >= dims.x || gid.y >= dims.y {
        return;
    }

    let coords = vec2<i32>(gid.xy);
    let src = textureLoad(input_texture, coords, 0);

    let hsl = rgb_to_hsl(src.rgb);
    let adjusted = vec3<f32>(
        fract(hsl.x * params.hue),
        clamp(hsl.y * params.saturation, 0.0, 1.0),
        clamp(hsl.z * params.lightness, 0.0, 1.0)
    );

    textureStore(output_texture, coords, vec4<f32>(hsl_to_rgb(adjusted), src.a));
}
"#;

/// Kernel source with the work-group size filled in
pub fn hsl_kernel(size: WorkgroupSize) -> String {
    HSL_KERNEL_TEMPLATE
        .replace("{WORKGROUP_X}", &size.width.to_string())
        .replace("{WORKGROUP_Y}", &size.height.to_string())
}
