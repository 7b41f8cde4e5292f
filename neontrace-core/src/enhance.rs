/// Post-detection enhancement of the scalar edge-strength field:
/// smoothing, dilation, dithering.
///
/// Smoothing and dilation re-invoke the full combined detection at
/// neighboring coordinates, so each sees the union of all enabled methods.
/// Detection is pure, which makes the recomputation redundant but safe; no
/// caching is attempted.

use glam::Vec2;

use crate::color::fract;
use crate::sampler::{Frame, Texture, CARDINALS, CROSS_DIAGONAL};

/// Neighbor strengths are damped before the dilation max.
const DILATION_ATTENUATION: f32 = 0.7;

/// Fixed hash constants, kept bit-for-bit for visual parity with the
/// established dither pattern.
const HASH_VEC: Vec2 = Vec2::new(12.9898, 78.233);
const HASH_SCALE: f32 = 43758.5453;

impl<S: Texture> Frame<'_, S> {
    /// Mild box blur of the strength field: 4 cardinal neighbors at half
    /// the texel offset, weight 0.25 each against 1.0 for the center.
    /// Out-of-bounds neighbors drop out of both numerator and denominator.
    /// No-op when disabled or the center strength is already 0.
    pub fn smooth(&self, strength: f32, uv: Vec2) -> f32 {
        if !self.config.edge_smoothing || strength == 0.0 {
            return strength;
        }

        let half = self.texel() * 0.5;
        let mut acc = strength;
        let mut weight = 1.0;
        for dir in CARDINALS {
            let neighbor = uv + dir * half;
            if Self::in_bounds(neighbor) {
                acc += 0.25 * self.combined_strength(neighbor);
                weight += 0.25;
            }
        }
        acc / weight
    }

    /// Expand edges outward by taking the max over 8 cross+diagonal
    /// neighbors scaled by `dilation_radius`, each attenuated by 0.7.
    /// Single-pass: at most one capped ring of expansion per frame, not an
    /// iterative morphological dilation. Never decreases the input.
    pub fn dilate(&self, uv: Vec2, strength: f32) -> f32 {
        if !self.config.edge_dilation || strength <= 0.0 {
            return strength;
        }

        let reach = self.texel() * self.config.dilation_radius;
        let mut result = strength;
        for dir in CROSS_DIAGONAL {
            let neighbor = self.combined_strength(uv + dir * reach);
            result = result.max(neighbor * DILATION_ATTENUATION);
        }
        result
    }

    /// Screen-space dithering of the strength field. The dither value is
    /// centered around zero, scaled by `dither_strength`, added to the
    /// input and clamped to [0,1]. No-op when disabled.
    ///
    /// Simple mode: checkerboard parity plus a low-amplitude sine
    /// cross-term. Advanced mode additionally blends in a diagonal-stripe
    /// parity term (ratio 0.3) and a hash noise term (ratio 0.2).
    pub fn dither(&self, strength: f32, screen_uv: Vec2) -> f32 {
        if !self.config.dithered_edges {
            return strength;
        }

        let coord = screen_uv * self.config.screen_size / self.config.dither_scale;
        let checker = ((coord.x.floor() + coord.y.floor()) as i32).rem_euclid(2) as f32;
        let cross = 0.1
            * (coord.x * std::f32::consts::PI).sin()
            * (coord.y * std::f32::consts::PI).sin();

        let pattern = if self.config.advanced_dither {
            let stripe = (((coord.x + coord.y) * 0.5).floor() as i32).rem_euclid(2) as f32;
            let noise = fract(coord.dot(HASH_VEC).sin() * HASH_SCALE);
            let mut d = checker;
            d += (stripe - d) * 0.3;
            d += (noise - d) * 0.2;
            d + cross
        } else {
            checker + cross
        };

        (strength + (pattern - 0.5) * self.config.dither_strength).clamp(0.0, 1.0)
    }
}
