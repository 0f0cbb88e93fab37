//! RGB565 icon blobs
//!
//! The device reads `<icon>_min.bin` straight into its framebuffer: 64x64 pixels, row-major
//! from the top-left corner, each pixel a little-endian `u16` packed as `RRRRRGGGGGGBBBBB`.

use super::{flatten_onto_white, open_image};
use crate::config::ICON_MIN_SIZE;
use crate::error::ImageError;
use crate::utils::icon_min_name;
use image::DynamicImage;
use image::imageops::{self, FilterType};
use std::path::Path;

/// Size of every RGB565 icon blob in bytes
pub const ICON_MIN_BYTES: usize = (ICON_MIN_SIZE * ICON_MIN_SIZE * 2) as usize;

/// Pack an 8-bit RGB triple into RGB565
///
/// ```
/// use keira_catalog::imaging::pack_rgb565;
///
/// assert_eq!(pack_rgb565(255, 0, 0), 0xF800);
/// assert_eq!(pack_rgb565(0, 255, 0), 0x07E0);
/// assert_eq!(pack_rgb565(255, 255, 255), 0xFFFF);
/// ```
#[must_use]
pub fn pack_rgb565(r: u8, g: u8, b: u8) -> u16 {
    (u16::from(r >> 3) << 11) | (u16::from(g >> 2) << 5) | u16::from(b >> 3)
}

/// Encode a decoded icon as an RGB565 blob of exactly [`ICON_MIN_BYTES`] bytes
#[must_use]
pub fn encode_rgb565(image: &DynamicImage) -> Vec<u8> {
    let flat = flatten_onto_white(image);
    let scaled = imageops::resize(&flat, ICON_MIN_SIZE, ICON_MIN_SIZE, FilterType::Lanczos3);

    let mut out = Vec::with_capacity(ICON_MIN_BYTES);
    for pixel in scaled.pixels() {
        out.extend_from_slice(&pack_rgb565(pixel[0], pixel[1], pixel[2]).to_le_bytes());
    }
    out
}

/// Decode an icon file and encode it as RGB565
pub fn transcode_to_rgb565(icon_path: &Path) -> Result<Vec<u8>, ImageError> {
    let (image, _) = open_image(icon_path)?;
    Ok(encode_rgb565(&image))
}

/// Write the RGB565 blob for `icon_path` into `static_dir` and return its file name
pub fn write_icon_min(icon_path: &Path, static_dir: &Path) -> Result<String, ImageError> {
    let icon_file = icon_path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    let name = icon_min_name(icon_file);
    let bytes = transcode_to_rgb565(icon_path)?;

    let dest = static_dir.join(&name);
    std::fs::write(&dest, bytes).map_err(|source| ImageError::Io { path: dest, source })?;
    Ok(name)
}
