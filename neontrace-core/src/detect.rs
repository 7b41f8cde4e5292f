/// The four edge detectors (color, luminance, saturation, hue), the
/// adaptive threshold, and their max-combination.
///
/// All four detectors share one structure: sample the center, diff against
/// every tap of the configured topology, reduce, then ramp through a smooth
/// threshold. The reduction is deliberately asymmetric between paths: the
/// 4-tap cross sums the divergences, the 8/12-tap paths take the maximum.
/// Each detector returns exactly 0 without sampling when its toggle is off.

use glam::{Vec2, Vec3};

use crate::color::{hue, hue_diff, luminance, saturation, smoothstep, LUMA_WEIGHTS};
use crate::sampler::{tap_offsets, Frame, Texture, CARDINALS};

impl<S: Texture> Frame<'_, S> {
    /// Local-contrast threshold modulation. Probes 4 cardinal neighbors at
    /// twice the texel offset and scales the base threshold by
    /// `1 + 2 * mean luminance-weighted difference`, so busy regions need a
    /// stronger signal to register as edges. Identity when disabled.
    pub fn adapt_threshold(&self, uv: Vec2, base_threshold: f32) -> f32 {
        if !self.config.adaptive_threshold {
            return base_threshold;
        }

        let center = self.tap(uv);
        let probe = self.texel() * 2.0;
        let mut contrast = 0.0;
        for dir in CARDINALS {
            let neighbor = self.tap(uv + dir * probe);
            contrast += (center - neighbor).abs().dot(LUMA_WEIGHTS);
        }
        contrast /= CARDINALS.len() as f32;

        base_threshold * (1.0 + contrast * 2.0)
    }

    /// Shared detector body: reduce per-tap differences and ramp through
    /// smoothstep(threshold/2, adapted threshold, raw).
    fn detect_with(&self, uv: Vec2, threshold: f32, diff: impl Fn(Vec3, Vec3) -> f32) -> f32 {
        let center = self.tap(uv);
        let offsets = tap_offsets(self.texel(), self.config);

        let raw = if self.config.multi_sampling {
            offsets
                .iter()
                .map(|o| diff(center, self.tap(uv + *o)))
                .fold(0.0, f32::max)
        } else {
            offsets.iter().map(|o| diff(center, self.tap(uv + *o))).sum()
        };

        let upper = self.adapt_threshold(uv, threshold);
        smoothstep(threshold * 0.5, upper, raw)
    }

    /// Perceptual color divergence: per-channel absolute differences
    /// weighted by the luminance coefficients before reduction.
    pub fn detect_color(&self, uv: Vec2) -> f32 {
        if !self.config.use_color {
            return 0.0;
        }
        self.detect_with(uv, self.config.color_threshold, |a, b| {
            (a - b).abs().dot(LUMA_WEIGHTS)
        })
    }

    pub fn detect_luminance(&self, uv: Vec2) -> f32 {
        if !self.config.use_luminance {
            return 0.0;
        }
        self.detect_with(uv, self.config.luminance_threshold, |a, b| {
            (luminance(a) - luminance(b)).abs()
        })
    }

    pub fn detect_saturation(&self, uv: Vec2) -> f32 {
        if !self.config.use_saturation {
            return 0.0;
        }
        self.detect_with(uv, self.config.saturation_threshold, |a, b| {
            (saturation(a) - saturation(b)).abs()
        })
    }

    /// Hue differences use the circular wraparound distance.
    pub fn detect_hue(&self, uv: Vec2) -> f32 {
        if !self.config.use_hue {
            return 0.0;
        }
        self.detect_with(uv, self.config.hue_threshold, |a, b| {
            hue_diff(hue(a), hue(b))
        })
    }

    /// Union of the enabled methods: a pixel is an edge if any method fires.
    /// Smoothing and dilation re-invoke this at neighbor coordinates so they
    /// see the fully combined signal.
    pub fn combined_strength(&self, uv: Vec2) -> f32 {
        self.detect_color(uv)
            .max(self.detect_luminance(uv))
            .max(self.detect_saturation(uv))
            .max(self.detect_hue(uv))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutlineConfig;
    use image::{Rgb, RgbImage};

    /// 4x4 image, left half black, right half white.
    fn step_image() -> RgbImage {
        let mut img = RgbImage::new(4, 4);
        for y in 0..4 {
            for x in 2..4 {
                img.put_pixel(x, y, Rgb([255, 255, 255]));
            }
        }
        img
    }

    fn config_for(img: &RgbImage) -> OutlineConfig {
        OutlineConfig {
            screen_size: Vec2::new(img.width() as f32, img.height() as f32),
            ..OutlineConfig::default()
        }
    }

    fn uv(x: u32, y: u32, img: &RgbImage) -> Vec2 {
        Vec2::new(
            (x as f32 + 0.5) / img.width() as f32,
            (y as f32 + 0.5) / img.height() as f32,
        )
    }

    #[test]
    fn test_disabled_toggles_return_zero() {
        let img = step_image();
        let config = OutlineConfig {
            use_color: false,
            ..config_for(&img)
        };
        let frame = Frame::new(&img, None, &config, 0.0);
        let at_edge = uv(1, 1, &img);
        assert_eq!(frame.detect_color(at_edge), 0.0);
        assert_eq!(frame.detect_luminance(at_edge), 0.0);
        assert_eq!(frame.detect_saturation(at_edge), 0.0);
        assert_eq!(frame.detect_hue(at_edge), 0.0);
        assert_eq!(frame.combined_strength(at_edge), 0.0);
    }

    #[test]
    fn test_uniform_image_no_edges() {
        let img = RgbImage::from_pixel(4, 4, Rgb([128, 128, 128]));
        let config = OutlineConfig {
            use_luminance: true,
            use_saturation: true,
            use_hue: true,
            ..config_for(&img)
        };
        let frame = Frame::new(&img, None, &config, 0.0);
        for y in 1..3 {
            for x in 1..3 {
                assert_eq!(frame.combined_strength(uv(x, y, &img)), 0.0);
            }
        }
    }

    #[test]
    fn test_step_edge_fires_color_detector() {
        let img = step_image();
        let config = config_for(&img);
        let frame = Frame::new(&img, None, &config, 0.0);
        // Column 1 borders the white half: right tap diverges fully.
        assert_eq!(frame.detect_color(uv(1, 1, &img)), 1.0);
        // Column 2 borders the black half symmetrically.
        assert_eq!(frame.detect_color(uv(2, 1, &img)), 1.0);
    }

    #[test]
    fn test_luminance_detector_on_step() {
        let img = step_image();
        let config = OutlineConfig {
            use_color: false,
            use_luminance: true,
            ..config_for(&img)
        };
        let frame = Frame::new(&img, None, &config, 0.0);
        assert_eq!(frame.detect_luminance(uv(1, 1, &img)), 1.0);
    }

    #[test]
    fn test_multi_sampling_uses_max_reduction() {
        // A single bright pixel next to the center produces the same raw
        // value whether 1 or 2 taps land on it under max reduction, but a
        // larger one under sum. Verify the multi path still saturates.
        let img = step_image();
        let config = OutlineConfig {
            multi_sampling: true,
            high_quality: true,
            ..config_for(&img)
        };
        let frame = Frame::new(&img, None, &config, 0.0);
        assert_eq!(frame.detect_color(uv(1, 1, &img)), 1.0);
    }

    #[test]
    fn test_hue_detector_wraparound_quiet() {
        // Two reds straddling the hue wrap point differ by ~0.04, well under
        // the threshold: no edge despite the numeric hue discontinuity.
        let mut img = RgbImage::from_pixel(4, 4, Rgb([255, 0, 13]));
        for y in 0..4 {
            for x in 2..4 {
                img.put_pixel(x, y, Rgb([255, 13, 0]));
            }
        }
        let config = OutlineConfig {
            use_color: false,
            use_hue: true,
            ..config_for(&img)
        };
        let frame = Frame::new(&img, None, &config, 0.0);
        assert_eq!(frame.detect_hue(uv(1, 1, &img)), 0.0);
    }

    #[test]
    fn test_adaptive_threshold_identity_when_disabled() {
        let img = step_image();
        let config = config_for(&img);
        let frame = Frame::new(&img, None, &config, 0.0);
        assert_eq!(frame.adapt_threshold(uv(1, 1, &img), 0.15), 0.15);
    }

    #[test]
    fn test_adaptive_threshold_never_decreases() {
        let flat = RgbImage::from_pixel(8, 8, Rgb([100, 100, 100]));
        let mut busy = flat.clone();
        for y in 0..8 {
            for x in 0..8 {
                let v = ((x * 53 + y * 97) % 256) as u8;
                busy.put_pixel(x, y, Rgb([v, v, v]));
            }
        }
        let config = OutlineConfig {
            adaptive_threshold: true,
            screen_size: Vec2::new(8.0, 8.0),
            ..OutlineConfig::default()
        };
        let center = Vec2::splat(0.5 + 0.5 / 8.0);

        let f_flat = Frame::new(&flat, None, &config, 0.0);
        let f_busy = Frame::new(&busy, None, &config, 0.0);
        let t_flat = f_flat.adapt_threshold(center, 0.15);
        let t_busy = f_busy.adapt_threshold(center, 0.15);
        assert!((t_flat - 0.15).abs() < 1e-6);
        assert!(t_busy > t_flat);
    }

    #[test]
    fn test_detector_monotonic_in_divergence() {
        // Raise the contrast of the right half step by step; the detector
        // output must never decrease.
        let config = OutlineConfig {
            use_color: false,
            use_luminance: true,
            screen_size: Vec2::new(4.0, 4.0),
            ..OutlineConfig::default()
        };
        let mut prev = 0.0;
        for level in [0u8, 16, 32, 64, 128, 255] {
            let mut img = RgbImage::new(4, 4);
            for y in 0..4 {
                for x in 2..4 {
                    img.put_pixel(x, y, Rgb([level, level, level]));
                }
            }
            let frame = Frame::new(&img, None, &config, 0.0);
            let s = frame.detect_luminance(uv(1, 1, &img));
            assert!(s >= prev, "level {} regressed: {} < {}", level, s, prev);
            prev = s;
        }
    }
}
