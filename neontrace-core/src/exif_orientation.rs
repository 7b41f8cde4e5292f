/// Apply the EXIF orientation tag when loading photos from disk, so edges
/// are detected on the image as the user sees it.

use image::DynamicImage;
use std::path::Path;

/// Read the EXIF orientation value (1-8). None if unreadable or missing.
fn read_orientation(path: &Path) -> Option<u32> {
    let file = std::fs::File::open(path).ok()?;
    let mut reader = std::io::BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut reader).ok()?;
    let field = exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)?;
    field.value.get_uint(0)
}

/// Rotate/flip a loaded image according to its EXIF orientation.
/// Returns the image unchanged when the tag is absent or unreadable.
pub fn apply_exif_orientation(img: DynamicImage, path: &Path) -> DynamicImage {
    match read_orientation(path) {
        Some(2) => img.fliph(),
        Some(3) => img.rotate180(),
        Some(4) => img.flipv(),
        Some(5) => img.rotate270().fliph(),
        Some(6) => img.rotate90(),
        Some(7) => img.rotate90().fliph(),
        Some(8) => img.rotate270(),
        _ => img,
    }
}
