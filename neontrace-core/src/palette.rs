/// Edge color resolution: the built-in neon palette, mask-driven palette
/// selection, and the time-based animation blend.

use glam::{Vec2, Vec3};

use crate::sampler::{Frame, Texture};

/// Built-in 15-entry neon palette for mask-driven multicolor edges.
/// Indices beyond the table fall back to white.
pub const NEON_PALETTE: [Vec3; 15] = [
    Vec3::new(0.0, 1.0, 1.0),  // 0  electric cyan
    Vec3::new(1.0, 0.1, 0.1),  // 1  neon red
    Vec3::new(0.1, 1.0, 0.2),  // 2  neon green
    Vec3::new(0.2, 0.4, 1.0),  // 3  electric blue
    Vec3::new(1.0, 0.0, 1.0),  // 4  hot magenta
    Vec3::new(1.0, 0.95, 0.1), // 5  neon yellow
    Vec3::new(1.0, 0.5, 0.0),  // 6  neon orange
    Vec3::new(0.6, 0.2, 1.0),  // 7  ultraviolet
    Vec3::new(1.0, 0.3, 0.6),  // 8  hot pink
    Vec3::new(0.7, 1.0, 0.1),  // 9  acid lime
    Vec3::new(0.0, 0.9, 0.7),  // 10 aqua teal
    Vec3::new(1.0, 0.75, 0.2), // 11 amber
    Vec3::new(0.6, 0.9, 1.0),  // 12 ice blue
    Vec3::new(0.8, 0.7, 1.0),  // 13 lavender
    Vec3::new(0.5, 1.0, 0.8),  // 14 mint
];

/// Palette lookup with the white fallback for out-of-range indices.
#[inline]
pub fn palette_color(index: usize) -> Vec3 {
    NEON_PALETTE.get(index).copied().unwrap_or(Vec3::ONE)
}

/// Map a mask pixel to a palette index by per-channel threshold priority.
/// First match wins, red checked first: R > 0.5 selects 1, else G > 0.5
/// selects 2, else B > 0.5 selects 3, else 0.
#[inline]
pub fn mask_index(mask: Vec3) -> usize {
    if mask.x > 0.5 {
        1
    } else if mask.y > 0.5 {
        2
    } else if mask.z > 0.5 {
        3
    } else {
        0
    }
}

/// Parse a hex color string like "#FF20AB" or "FF20AB" into a normalized
/// RGB triple.
pub fn parse_hex(s: &str) -> Result<Vec3, String> {
    let s = s.strip_prefix('#').unwrap_or(s);
    if s.len() != 6 {
        return Err(format!("Invalid hex color '{}': expected 6 hex digits", s));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&s[range], 16).map_err(|_| format!("Invalid hex color '{}'", s))
    };
    let r = channel(0..2)?;
    let g = channel(2..4)?;
    let b = channel(4..6)?;
    Ok(Vec3::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
    ))
}

impl<S: Texture> Frame<'_, S> {
    /// Final edge color for a pixel: palette entry selected by the mask
    /// when mask mode is on (configured `edge_color` when no mask is
    /// bound), otherwise `edge_color`; optionally pulsed toward
    /// `animation_color` by a sine of the frame clock.
    pub fn resolve_color(&self, uv: Vec2) -> Vec3 {
        let base = if self.config.use_mask_texture {
            match self.mask {
                Some(mask) => palette_color(mask_index(mask.sample(uv))),
                None => self.config.edge_color,
            }
        } else {
            self.config.edge_color
        };

        if self.config.animate_edges {
            let pulse = 0.5 + 0.5 * (self.time * self.config.animation_speed).sin();
            base.lerp(self.config.animation_color, pulse)
        } else {
            base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutlineConfig;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_palette_fallback_is_white() {
        assert_eq!(palette_color(14), NEON_PALETTE[14]);
        assert_eq!(palette_color(15), Vec3::ONE);
        assert_eq!(palette_color(99), Vec3::ONE);
    }

    #[test]
    fn test_mask_priority_red_first() {
        // Red and green both above threshold: red wins.
        assert_eq!(mask_index(Vec3::new(0.9, 0.9, 0.0)), 1);
        assert_eq!(mask_index(Vec3::new(0.0, 0.9, 0.9)), 2);
        assert_eq!(mask_index(Vec3::new(0.0, 0.0, 0.9)), 3);
        assert_eq!(mask_index(Vec3::new(0.2, 0.3, 0.4)), 0);
    }

    #[test]
    fn test_parse_hex() {
        let c = parse_hex("#FF0000").unwrap();
        assert_eq!(c, Vec3::X);
        let c = parse_hex("00FF00").unwrap();
        assert_eq!(c, Vec3::Y);
        assert!(parse_hex("ZZZZZZ").is_err());
        assert!(parse_hex("#FFF").is_err());
    }

    #[test]
    fn test_resolve_without_mask_uses_edge_color() {
        let img = RgbImage::new(2, 2);
        let config = OutlineConfig {
            edge_color: Vec3::new(0.25, 0.5, 0.75),
            ..OutlineConfig::default()
        };
        let frame = Frame::new(&img, None, &config, 0.0);
        assert_eq!(frame.resolve_color(Vec2::splat(0.5)), config.edge_color);
    }

    #[test]
    fn test_resolve_mask_picks_palette_entry() {
        let img = RgbImage::new(2, 2);
        let mask = RgbImage::from_pixel(2, 2, Rgb([255, 0, 0]));
        let config = OutlineConfig {
            use_mask_texture: true,
            ..OutlineConfig::default()
        };
        let frame = Frame::new(&img, Some(&mask), &config, 0.0);
        assert_eq!(frame.resolve_color(Vec2::splat(0.5)), NEON_PALETTE[1]);
    }

    #[test]
    fn test_resolve_mask_mode_without_mask_degrades() {
        let img = RgbImage::new(2, 2);
        let config = OutlineConfig {
            use_mask_texture: true,
            edge_color: Vec3::Z,
            ..OutlineConfig::default()
        };
        let frame = Frame::new(&img, None, &config, 0.0);
        assert_eq!(frame.resolve_color(Vec2::splat(0.5)), Vec3::Z);
    }

    #[test]
    fn test_resolve_time_invariant_without_animation() {
        let img = RgbImage::new(2, 2);
        let config = OutlineConfig {
            edge_color: Vec3::X,
            ..OutlineConfig::default()
        };
        let early = Frame::new(&img, None, &config, 0.0);
        let late = Frame::new(&img, None, &config, 100.0);
        let uv = Vec2::splat(0.5);
        assert_eq!(early.resolve_color(uv), late.resolve_color(uv));
    }

    #[test]
    fn test_animation_blends_toward_partner_color() {
        let img = RgbImage::new(2, 2);
        let config = OutlineConfig {
            edge_color: Vec3::ZERO,
            animate_edges: true,
            animation_speed: 1.0,
            animation_color: Vec3::ONE,
            ..OutlineConfig::default()
        };
        let uv = Vec2::splat(0.5);

        // sin(0) = 0: halfway blend.
        let at_zero = Frame::new(&img, None, &config, 0.0);
        assert!((at_zero.resolve_color(uv) - Vec3::splat(0.5)).length() < 1e-6);

        // sin(pi/2) = 1: fully at the animation color.
        let at_peak = Frame::new(&img, None, &config, std::f32::consts::FRAC_PI_2);
        assert!((at_peak.resolve_color(uv) - Vec3::ONE).length() < 1e-3);
    }
}
