/// Filter configuration: detection toggles, thresholds, appearance,
/// sampling topology, render mode, enhancement stages, animation.
///
/// The config is owned by the host, immutable for the duration of a frame,
/// and read-only to every stage. No field is validated here: pathological
/// values (negative thresholds, zero dither scale) degrade silently and
/// sanitizing them is the host's job.

use glam::{Vec2, Vec3};

#[derive(Debug, Clone)]
pub struct OutlineConfig {
    // Detection methods
    pub use_color: bool,
    pub use_luminance: bool,
    pub use_saturation: bool,
    pub use_hue: bool,
    pub color_threshold: f32,
    pub luminance_threshold: f32,
    pub saturation_threshold: f32,
    pub hue_threshold: f32,

    // Appearance
    pub edge_color: Vec3,
    pub edge_strength: f32,
    /// Edge thickness in pixels; mapped to a texel offset via `screen_size`.
    pub edge_thickness: f32,

    // Sampling topology
    pub multi_sampling: bool,
    pub high_quality: bool,
    pub circular: bool,
    pub wide: bool,

    // Render mode, consulted in priority order: edge_only, then sharpening,
    // else blend.
    pub edge_only: bool,
    pub sharpening: bool,
    pub sharpening_strength: f32,

    // Enhancement stages
    pub edge_smoothing: bool,
    pub edge_dilation: bool,
    pub dilation_radius: f32,
    pub dithered_edges: bool,
    pub advanced_dither: bool,
    pub dither_scale: f32,
    pub dither_strength: f32,

    // Animation
    pub animate_edges: bool,
    pub animation_speed: f32,
    pub animation_color: Vec3,

    // Adaptation
    pub lighting_modulation: bool,
    pub lighting_modulation_strength: f32,
    pub adaptive_threshold: bool,

    // Region mask
    pub use_mask_texture: bool,

    /// Viewport resolution in pixels. Must match the actual render-target
    /// resolution for `edge_thickness` to map correctly; the core cannot
    /// detect a mismatch.
    pub screen_size: Vec2,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            use_color: true,
            use_luminance: false,
            use_saturation: false,
            use_hue: false,
            color_threshold: 0.15,
            luminance_threshold: 0.1,
            saturation_threshold: 0.15,
            hue_threshold: 0.1,

            edge_color: Vec3::ZERO,
            edge_strength: 1.0,
            edge_thickness: 1.0,

            multi_sampling: false,
            high_quality: false,
            circular: false,
            wide: false,

            edge_only: false,
            sharpening: false,
            sharpening_strength: 0.5,

            edge_smoothing: false,
            edge_dilation: false,
            dilation_radius: 1.0,
            dithered_edges: false,
            advanced_dither: false,
            dither_scale: 4.0,
            dither_strength: 0.1,

            animate_edges: false,
            animation_speed: 2.0,
            animation_color: Vec3::new(1.0, 0.0, 1.0),

            lighting_modulation: false,
            lighting_modulation_strength: 0.5,
            adaptive_threshold: false,

            use_mask_texture: false,

            screen_size: Vec2::new(512.0, 512.0),
        }
    }
}

impl OutlineConfig {
    /// Clean dark outline on color discontinuities (the defaults).
    pub fn outline() -> Self {
        Self::default()
    }

    /// Pen-and-ink look: thick black luminance edges blended over the image.
    pub fn ink() -> Self {
        Self {
            use_color: false,
            use_luminance: true,
            luminance_threshold: 0.08,
            edge_thickness: 2.0,
            edge_smoothing: true,
            ..Self::default()
        }
    }

    /// Glowing contour on a transparent background: dilated, smoothed,
    /// pulsing between cyan and magenta.
    pub fn neon() -> Self {
        Self {
            use_luminance: true,
            edge_color: Vec3::new(0.0, 1.0, 1.0),
            edge_only: true,
            edge_smoothing: true,
            edge_dilation: true,
            dilation_radius: 1.5,
            animate_edges: true,
            ..Self::default()
        }
    }

    /// Rough pencil-sketch texture from advanced dithering.
    pub fn sketch() -> Self {
        Self {
            use_color: false,
            use_luminance: true,
            dithered_edges: true,
            advanced_dither: true,
            dither_strength: 0.4,
            ..Self::default()
        }
    }

    /// Cartoon sharpening: edges added back on top of the source with
    /// adaptive thresholds to tame busy regions.
    pub fn toon() -> Self {
        Self {
            sharpening: true,
            sharpening_strength: 0.8,
            adaptive_threshold: true,
            ..Self::default()
        }
    }

    /// High-quality circular sampling with lighting-adaptive strength.
    pub fn scan() -> Self {
        Self {
            use_luminance: true,
            use_saturation: true,
            multi_sampling: true,
            high_quality: true,
            circular: true,
            wide: true,
            lighting_modulation: true,
            ..Self::default()
        }
    }

    pub fn from_preset(name: &str) -> Option<Self> {
        match name {
            "outline" => Some(Self::outline()),
            "ink" => Some(Self::ink()),
            "neon" => Some(Self::neon()),
            "sketch" => Some(Self::sketch()),
            "toon" => Some(Self::toon()),
            "scan" => Some(Self::scan()),
            _ => None,
        }
    }

    pub fn all_presets() -> Vec<(&'static str, Self)> {
        vec![
            ("outline", Self::outline()),
            ("ink", Self::ink()),
            ("neon", Self::neon()),
            ("sketch", Self::sketch()),
            ("toon", Self::toon()),
            ("scan", Self::scan()),
        ]
    }

    /// Return a copy with a different edge color applied.
    pub fn with_edge_color(mut self, color: Vec3) -> Self {
        self.edge_color = color;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = OutlineConfig::default();
        assert!(c.use_color);
        assert!(!c.use_luminance);
        assert_eq!(c.color_threshold, 0.15);
        assert_eq!(c.edge_strength, 1.0);
        assert_eq!(c.screen_size, Vec2::new(512.0, 512.0));
    }

    #[test]
    fn test_preset_lookup() {
        assert!(OutlineConfig::from_preset("neon").is_some());
        assert!(OutlineConfig::from_preset("nonexistent").is_none());
    }

    #[test]
    fn test_all_presets_resolvable() {
        for (name, _) in OutlineConfig::all_presets() {
            assert!(OutlineConfig::from_preset(name).is_some(), "{}", name);
        }
    }
}
