//! Size and byte-size ceilings for raster assets

use super::{flatten_onto_white, open_image};
use crate::config::Bounds;
use crate::error::ImageError;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// What [`normalize_image`] did to a file
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NormalizeOutcome {
    /// Within bounds and byte ceiling; the file was not touched
    Unchanged,
    /// Scaled down to fit the bounds
    Resized {
        /// Original dimensions
        from: (u32, u32),
        /// New dimensions
        to: (u32, u32),
    },
    /// Re-encoded at the original dimensions to reduce its size
    Reencoded,
}

/// Normalize an image file in place
///
/// Images larger than `bounds` in either dimension are scaled down to fit, keeping the aspect
/// ratio; images never grow. Images within bounds but heavier than `max_file_bytes` are
/// re-encoded at their current size. PNG is re-encoded losslessly and keeps transparency;
/// every other format is flattened onto white first. `quality` applies to JPEG only: the GIF,
/// BMP and WebP encoders expose no quality setting, so those keep their format and are written
/// with the encoder defaults (WebP output is lossless).
///
/// The file is only rewritten after the new encoding succeeds.
pub fn normalize_image(
    path: &Path,
    bounds: Bounds,
    quality: u8,
    max_file_bytes: u64,
) -> Result<NormalizeOutcome, ImageError> {
    let file_size = std::fs::metadata(path)
        .map_err(|source| ImageError::Io {
            path: path.to_path_buf(),
            source,
        })?
        .len();
    let (image, format) = open_image(path)?;
    let from = (image.width(), image.height());

    let outcome = if bounds.exceeded_by(from.0, from.1) {
        let resized = image.resize(bounds.width, bounds.height, FilterType::Lanczos3);
        let to = (resized.width(), resized.height());
        write_encoded(path, &resized, format, quality)?;
        NormalizeOutcome::Resized { from, to }
    } else if file_size > max_file_bytes {
        write_encoded(path, &image, format, quality)?;
        NormalizeOutcome::Reencoded
    } else {
        NormalizeOutcome::Unchanged
    };

    debug!(path = %path.display(), ?format, ?outcome, "Normalized image");
    Ok(outcome)
}

fn write_encoded(
    path: &Path,
    image: &DynamicImage,
    format: ImageFormat,
    quality: u8,
) -> Result<(), ImageError> {
    let encode_error = |source| ImageError::Encode {
        path: path.to_path_buf(),
        source,
    };
    let mut buffer = Cursor::new(Vec::new());

    match format {
        ImageFormat::Png => {
            let encoder =
                PngEncoder::new_with_quality(&mut buffer, CompressionType::Best, PngFilter::Adaptive);
            image.write_with_encoder(encoder).map_err(encode_error)?;
        }
        ImageFormat::Jpeg => {
            let flat = DynamicImage::ImageRgb8(flatten_onto_white(image));
            let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
            flat.write_with_encoder(encoder).map_err(encode_error)?;
        }
        // No quality knob on these encoders
        other => {
            let flat = DynamicImage::ImageRgb8(flatten_onto_white(image));
            flat.write_to(&mut buffer, other).map_err(encode_error)?;
        }
    }

    std::fs::write(path, buffer.into_inner()).map_err(|source| ImageError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use tempfile::TempDir;

    const SCREENSHOT: Bounds = Bounds::new(1920, 1080);

    fn noise(width: u32, height: u32) -> RgbImage {
        let mut state: u32 = 0x1234_5678;
        RgbImage::from_fn(width, height, |_, _| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let [a, b, c, _] = state.to_le_bytes();
            Rgb([a, b, c])
        })
    }

    #[test]
    fn oversized_screenshot_fits_bounds_and_keeps_aspect() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shot.jpg");
        RgbImage::from_pixel(3000, 2000, Rgb([30, 60, 90]))
            .save(&path)
            .unwrap();

        let outcome = normalize_image(&path, SCREENSHOT, 85, 500 * 1024).unwrap();
        assert_eq!(
            outcome,
            NormalizeOutcome::Resized {
                from: (3000, 2000),
                to: (1620, 1080)
            }
        );

        let reopened = image::open(&path).unwrap();
        assert!(reopened.width() <= 1920 && reopened.height() <= 1080);
        let ratio = f64::from(reopened.width()) / f64::from(reopened.height());
        assert!((ratio - 1.5).abs() < 0.01, "aspect ratio drifted: {ratio}");
    }

    #[test]
    fn small_light_image_is_left_alone() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("icon.png");
        RgbaImage::from_pixel(32, 32, Rgba([1, 2, 3, 255]))
            .save(&path)
            .unwrap();
        let before = std::fs::read(&path).unwrap();

        let outcome = normalize_image(&path, Bounds::new(512, 512), 85, 500 * 1024).unwrap();
        assert_eq!(outcome, NormalizeOutcome::Unchanged);
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[test]
    fn heavy_image_within_bounds_is_reencoded_at_same_size() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shot.png");
        noise(200, 100).save(&path).unwrap();

        let outcome = normalize_image(&path, SCREENSHOT, 85, 1024).unwrap();
        assert_eq!(outcome, NormalizeOutcome::Reencoded);
        let reopened = image::open(&path).unwrap();
        assert_eq!((reopened.width(), reopened.height()), (200, 100));
    }

    #[test]
    fn png_keeps_transparency() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("icon.png");
        RgbaImage::from_pixel(600, 300, Rgba([200, 10, 10, 0]))
            .save(&path)
            .unwrap();

        normalize_image(&path, Bounds::new(512, 512), 85, 500 * 1024).unwrap();
        let reopened = image::open(&path).unwrap().to_rgba8();
        assert_eq!(reopened.dimensions(), (512, 256));
        assert_eq!(reopened.get_pixel(10, 10)[3], 0);
    }

    #[test]
    fn jpeg_is_resized_and_stays_light() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shot.jpg");
        RgbImage::from_pixel(40, 40, Rgb([250, 250, 250]))
            .save(&path)
            .unwrap();

        let outcome = normalize_image(&path, Bounds::new(20, 20), 85, 500 * 1024).unwrap();
        assert!(matches!(outcome, NormalizeOutcome::Resized { to: (20, 20), .. }));
        let pixel = image::open(&path).unwrap().to_rgb8().get_pixel(5, 5).0;
        assert!(pixel.iter().all(|c| *c > 240), "{pixel:?}");
    }

    #[test]
    fn bmp_keeps_its_format_and_loses_alpha() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("icon.bmp");
        RgbaImage::from_pixel(64, 32, Rgba([0, 0, 0, 0]))
            .save_with_format(&path, ImageFormat::Bmp)
            .unwrap();

        let outcome = normalize_image(&path, Bounds::new(32, 32), 10, 500 * 1024).unwrap();
        assert!(matches!(outcome, NormalizeOutcome::Resized { to: (32, 16), .. }));

        let reopened = image::ImageReader::open(&path)
            .unwrap()
            .with_guessed_format()
            .unwrap();
        assert_eq!(reopened.format(), Some(ImageFormat::Bmp));
        let pixel = reopened.decode().unwrap().to_rgba8().get_pixel(3, 3).0;
        assert_eq!(pixel, [255, 255, 255, 255]);
    }

    #[test]
    fn undecodable_file_is_an_error_and_left_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shot.png");
        std::fs::write(&path, b"\x89PNG\r\n\x1a\ntruncated").unwrap();

        let err = normalize_image(&path, SCREENSHOT, 85, 0).unwrap_err();
        assert!(matches!(err, ImageError::Decode { .. }), "{err:?}");
        assert_eq!(std::fs::read(&path).unwrap(), b"\x89PNG\r\n\x1a\ntruncated");
    }
}
