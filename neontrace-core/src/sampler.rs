/// Boundary-safe neighborhood sampling.
///
/// Textures are addressed by normalized UV coordinates. Taps landing
/// outside [0,1] on either axis return black instead of wrapping or
/// clamping, so screen-edge content never bleeds into edge strength.

use glam::{Vec2, Vec3};
use image::{RgbImage, RgbaImage};

use crate::config::OutlineConfig;

/// An addressable 2D RGB field sampled by normalized coordinate.
/// Filtering is the host's choice; the built-in impls are nearest-texel.
pub trait Texture {
    fn dimensions(&self) -> (u32, u32);

    /// Sample at a UV already known to be inside [0,1] on both axes.
    fn sample(&self, uv: Vec2) -> Vec3;
}

#[inline]
fn texel_index(coord: f32, size: u32) -> u32 {
    ((coord * size as f32).floor() as i64).clamp(0, size as i64 - 1) as u32
}

impl Texture for RgbImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn sample(&self, uv: Vec2) -> Vec3 {
        let x = texel_index(uv.x, self.width());
        let y = texel_index(uv.y, self.height());
        let p = self.get_pixel(x, y);
        Vec3::new(
            p[0] as f32 / 255.0,
            p[1] as f32 / 255.0,
            p[2] as f32 / 255.0,
        )
    }
}

impl Texture for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn sample(&self, uv: Vec2) -> Vec3 {
        let x = texel_index(uv.x, self.width());
        let y = texel_index(uv.y, self.height());
        let p = self.get_pixel(x, y);
        Vec3::new(
            p[0] as f32 / 255.0,
            p[1] as f32 / 255.0,
            p[2] as f32 / 255.0,
        )
    }
}

/// Everything one pixel evaluation may read: the source image, the optional
/// region mask, the frame's configuration, and the animation clock. All
/// per-pixel stages are methods on this and are pure with respect to it.
pub struct Frame<'a, S: Texture> {
    pub source: &'a S,
    pub mask: Option<&'a RgbImage>,
    pub config: &'a OutlineConfig,
    pub time: f32,
}

impl<'a, S: Texture> Frame<'a, S> {
    pub fn new(
        source: &'a S,
        mask: Option<&'a RgbImage>,
        config: &'a OutlineConfig,
        time: f32,
    ) -> Self {
        Self {
            source,
            mask,
            config,
            time,
        }
    }

    #[inline]
    pub fn in_bounds(uv: Vec2) -> bool {
        uv.x >= 0.0 && uv.x <= 1.0 && uv.y >= 0.0 && uv.y <= 1.0
    }

    /// Boundary-safe source fetch: black outside [0,1].
    #[inline]
    pub fn tap(&self, uv: Vec2) -> Vec3 {
        if Self::in_bounds(uv) {
            self.source.sample(uv)
        } else {
            Vec3::ZERO
        }
    }

    /// Texel offset mapping `edge_thickness` pixels to UV space,
    /// widened by 1.5 when `wide` is set.
    #[inline]
    pub fn texel(&self) -> Vec2 {
        let base = Vec2::splat(self.config.edge_thickness) / self.config.screen_size;
        if self.config.wide {
            base * 1.5
        } else {
            base
        }
    }
}

/// Cardinal directions, shared by the 4-tap path, the adaptive-threshold
/// probe and the smoothing stage.
pub const CARDINALS: [Vec2; 4] = [
    Vec2::new(1.0, 0.0),
    Vec2::new(-1.0, 0.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(0.0, -1.0),
];

/// Cross + diagonal directions, shared by the 8-tap path and dilation.
pub const CROSS_DIAGONAL: [Vec2; 8] = [
    Vec2::new(1.0, 0.0),
    Vec2::new(-1.0, 0.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(0.0, -1.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(1.0, -1.0),
    Vec2::new(-1.0, 1.0),
    Vec2::new(-1.0, -1.0),
];

/// Generate exactly the ordered tap offsets (in UV units) for the
/// configured topology:
///
/// - `multi_sampling` off: fixed 4-tap cross
/// - on: 8 taps, or 12 with `high_quality`
/// - `circular`: evenly spaced angles on a circle of the texel radius
/// - otherwise: cross + diagonals, plus 2x-radius cardinals for taps 9-12
pub fn tap_offsets(texel: Vec2, config: &OutlineConfig) -> Vec<Vec2> {
    if !config.multi_sampling {
        return CARDINALS.iter().map(|d| *d * texel).collect();
    }

    let count = if config.high_quality { 12 } else { 8 };

    if config.circular {
        (0..count)
            .map(|i| {
                let angle = i as f32 * std::f32::consts::TAU / count as f32;
                Vec2::new(angle.cos(), angle.sin()) * texel
            })
            .collect()
    } else {
        let mut offsets: Vec<Vec2> = CROSS_DIAGONAL.iter().map(|d| *d * texel).collect();
        if count == 12 {
            offsets.extend(CARDINALS.iter().map(|d| *d * texel * 2.0));
        }
        offsets
    }
}
