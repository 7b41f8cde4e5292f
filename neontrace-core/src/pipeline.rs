/// Per-pixel pipeline and frame driver:
/// detect + combine -> smooth -> dilate -> lighting modulation ->
/// global strength scale -> dither -> clamp -> resolve color -> composite.

use std::path::Path;

use glam::{Vec2, Vec3, Vec4};
use image::{Rgba, RgbaImage};

use crate::color::luminance;
use crate::config::OutlineConfig;
use crate::exif_orientation::apply_exif_orientation;
use crate::sampler::{Frame, Texture};

/// Lighting modulation never extinguishes edges completely, even in fully
/// lit regions.
const MODULATION_FLOOR: f32 = 0.1;

impl<S: Texture> Frame<'_, S> {
    /// Strength multiplier from local scene brightness: boosted up to
    /// `1 + 0.5 * strength` in dark regions, damped down to
    /// `1 - 0.3 * strength` in bright ones, floored at 0.1.
    /// Returns 1.0 when disabled.
    pub fn lighting_modulation(&self, uv: Vec2) -> f32 {
        if !self.config.lighting_modulation {
            return 1.0;
        }
        let l = luminance(self.tap(uv));
        let s = self.config.lighting_modulation_strength;
        let dark = 1.0 + s * 0.5;
        let bright = 1.0 - s * 0.3;
        (dark + (bright - dark) * l).max(MODULATION_FLOOR)
    }

    /// Mode priority: edge-only, then sharpening, else blend.
    fn composite(&self, original: Vec3, edge_color: Vec3, strength: f32) -> Vec4 {
        let config = self.config;
        if config.edge_only {
            edge_color.extend(strength)
        } else if config.sharpening {
            (original + edge_color * strength * config.sharpening_strength).extend(1.0)
        } else {
            original.lerp(edge_color, strength).extend(1.0)
        }
    }

    /// Evaluate the full pipeline for one pixel. `uv` addresses the source
    /// texture; `screen_uv` addresses the render target (they coincide for
    /// a full-screen pass) and drives the dither pattern.
    pub fn render_pixel(&self, uv: Vec2, screen_uv: Vec2) -> Vec4 {
        let original = self.tap(uv);

        let mut strength = self.combined_strength(uv);
        strength = self.smooth(strength, uv);
        strength = self.dilate(uv, strength);
        strength *= self.lighting_modulation(uv);
        strength *= self.config.edge_strength;
        strength = self.dither(strength, screen_uv);
        strength = strength.clamp(0.0, 1.0);

        let edge_color = self.resolve_color(uv);
        self.composite(original, edge_color, strength)
    }
}

#[inline]
fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

/// Run the filter over every pixel of the source, sampling at texel
/// centers. Each pixel is independent; the evaluation order carries no
/// meaning.
pub fn render_frame<S: Texture>(
    source: &S,
    mask: Option<&image::RgbImage>,
    config: &OutlineConfig,
    time: f32,
) -> RgbaImage {
    let (width, height) = source.dimensions();
    let frame = Frame::new(source, mask, config, time);
    let mut out = RgbaImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let uv = Vec2::new(
                (x as f32 + 0.5) / width as f32,
                (y as f32 + 0.5) / height as f32,
            );
            let px = frame.render_pixel(uv, uv);
            out.put_pixel(x, y, Rgba([to_u8(px.x), to_u8(px.y), to_u8(px.z), to_u8(px.w)]));
        }
    }

    out
}

/// Process a single image file: load, EXIF-orient, filter, save as RGBA
/// PNG (edge-only output keeps its transparency). Acts as the host here,
/// so it synchronizes `screen_size` to the actual image dimensions before
/// rendering.
pub fn process_file(
    input: &Path,
    output: &Path,
    mask: Option<&Path>,
    config: &OutlineConfig,
    time: f32,
) -> Result<(), Box<dyn std::error::Error>> {
    let img = image::open(input)?;
    let img = apply_exif_orientation(img, input);
    let source = img.to_rgb8();

    let mask_img = match mask {
        Some(path) => Some(image::open(path)?.to_rgb8()),
        None => None,
    };

    let mut config = config.clone();
    config.screen_size = Vec2::new(source.width() as f32, source.height() as f32);

    let result = render_frame(&source, mask_img.as_ref(), &config, time);
    result.save(output)?;
    Ok(())
}
