/// Color-space metrics used by the edge detectors.
///
/// All inputs are RGB triples with components nominally in 0.0-1.0.
/// Metrics:
///
/// - luminance: BT.601 weighted sum (0.299 R + 0.587 G + 0.114 B)
/// - saturation: max channel minus min channel
/// - hue: six-sector hexagonal hue in [0, 1), with wraparound distance

use glam::Vec3;

/// BT.601 luminance weights, also used to weight per-channel color
/// differences in the color detector.
pub const LUMA_WEIGHTS: Vec3 = Vec3::new(0.299, 0.587, 0.114);

/// Chroma below this is treated as achromatic; hue degenerates to 0.
const CHROMA_EPSILON: f32 = 1e-4;

#[inline]
pub fn luminance(c: Vec3) -> f32 {
    c.dot(LUMA_WEIGHTS)
}

/// Chroma: max channel minus min channel.
#[inline]
pub fn saturation(c: Vec3) -> f32 {
    c.max_element() - c.min_element()
}

/// Hexagonal hue in [0, 1). Near-zero chroma returns 0 instead of
/// dividing by zero.
pub fn hue(c: Vec3) -> f32 {
    let max = c.max_element();
    let min = c.min_element();
    let chroma = max - min;
    if chroma < CHROMA_EPSILON {
        return 0.0;
    }

    let sector = if max == c.x {
        ((c.y - c.z) / chroma).rem_euclid(6.0)
    } else if max == c.y {
        (c.z - c.x) / chroma + 2.0
    } else {
        (c.x - c.y) / chroma + 4.0
    };
    sector / 6.0
}

/// Circular hue distance: red at 0.02 and red at 0.98 are 0.04 apart,
/// not 0.96.
#[inline]
pub fn hue_diff(a: f32, b: f32) -> f32 {
    let d = (a - b).abs();
    d.min(1.0 - d)
}

/// Cubic Hermite ramp: 0 below `lower`, 1 above `upper`, smooth in between.
#[inline]
pub fn smoothstep(lower: f32, upper: f32, x: f32) -> f32 {
    let t = ((x - lower) / (upper - lower)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// GLSL-style fract: always in [0, 1), even for negative input.
#[inline]
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}
