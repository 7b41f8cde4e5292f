pub mod color;
pub mod config;
pub mod detect;
pub mod enhance;
pub mod exif_orientation;
pub mod palette;
pub mod pipeline;
pub mod sampler;
