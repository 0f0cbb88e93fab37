//! Raster asset processing
//!
//! - [`normalize`] caps screenshots and icons to their configured bounds and byte size
//! - [`rgb565`] turns an icon into the fixed 64x64 RGB565 blob the device firmware loads
//!
//! Both operations are CPU-bound and synchronous; the build pipeline runs them on
//! `spawn_blocking` workers.

pub mod normalize;
pub mod rgb565;

pub use normalize::{NormalizeOutcome, normalize_image};
pub use rgb565::{ICON_MIN_BYTES, encode_rgb565, pack_rgb565, transcode_to_rgb565, write_icon_min};

use crate::error::ImageError;
use image::{DynamicImage, ImageReader, Rgb, RgbImage};
use std::path::Path;

/// Decode an image, detecting its format from the file contents
pub(crate) fn open_image(path: &Path) -> Result<(DynamicImage, image::ImageFormat), ImageError> {
    let io_error = |source| ImageError::Io {
        path: path.to_path_buf(),
        source,
    };
    let reader = ImageReader::open(path)
        .map_err(io_error)?
        .with_guessed_format()
        .map_err(io_error)?;
    let format = reader.format().ok_or_else(|| ImageError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let image = reader.decode().map_err(|source| ImageError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((image, format))
}

/// Composite an image onto an opaque white background
///
/// Palette and grayscale images are expanded first; fully opaque pixels are unchanged.
pub fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    let mut flat = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let alpha = u32::from(pixel[3]);
        let blend = |channel: u8| -> u8 {
            let mixed = u32::from(channel) * alpha + 255 * (255 - alpha);
            ((mixed + 127) / 255) as u8
        };
        flat.put_pixel(x, y, Rgb([blend(pixel[0]), blend(pixel[1]), blend(pixel[2])]));
    }
    flat
}
