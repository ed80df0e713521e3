//! Low-resolution JPEG preview encoding.
//!
//! Derives a small JPEG from a cached full-resolution raster. The preview is
//! anchored to a target width; height follows from the source aspect ratio.
//!
//! # Design Decisions
//!
//! - **Never cached**: previews are recomputed per request. Resampling a
//!   resident raster is cheap relative to the decode+normalize work the
//!   image cache already de-duplicates.
//! - **Exact width**: the output width always equals the requested target
//!   width; the height is rounded from the aspect ratio.

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;

use crate::error::PreviewError;

/// Default JPEG quality for previews (1-100).
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// Default preview target width in pixels.
pub const DEFAULT_PREVIEW_WIDTH: u32 = 400;

/// Minimum allowed JPEG quality.
pub const MIN_JPEG_QUALITY: u8 = 1;

/// Maximum allowed JPEG quality.
pub const MAX_JPEG_QUALITY: u8 = 100;

/// Downscale an image to `target_width` and encode it as JPEG.
///
/// The height is computed from the source aspect ratio
/// (`round(height * target_width / width)`, at least 1 pixel). Downscaling
/// uses triangle filtering, which averages over the source footprint and is
/// appropriate for shrinking. Images with an alpha channel are flattened to
/// RGB before encoding since JPEG carries no alpha.
///
/// # Errors
///
/// Returns [`PreviewError::Encode`] if the source has zero width or the JPEG
/// encoder fails.
pub fn encode_preview(
    image: &DynamicImage,
    target_width: u32,
    quality: u8,
) -> Result<Bytes, PreviewError> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(PreviewError::Encode {
            message: "source image has zero width or height".to_string(),
        });
    }

    let quality = clamp_quality(quality);
    let scale = target_width as f64 / width as f64;
    let target_height = ((height as f64 * scale).round() as u32).max(1);

    let resized = image.resize_exact(target_width, target_height, FilterType::Triangle);

    // JPEG has no alpha channel; flatten before encoding.
    let resized = match resized {
        DynamicImage::ImageRgba8(_) | DynamicImage::ImageRgba16(_) => {
            DynamicImage::ImageRgb8(resized.to_rgb8())
        }
        DynamicImage::ImageLumaA8(_) | DynamicImage::ImageLumaA16(_) => {
            DynamicImage::ImageLuma8(resized.to_luma8())
        }
        other => other,
    };

    let mut output = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut output, quality);
    encoder
        .encode_image(&resized)
        .map_err(|e| PreviewError::Encode {
            message: e.to_string(),
        })?;

    Ok(Bytes::from(output))
}

/// Validate JPEG quality parameter.
///
/// Returns `true` if quality is in the valid range (1-100).
#[inline]
pub fn is_valid_quality(quality: u8) -> bool {
    (MIN_JPEG_QUALITY..=MAX_JPEG_QUALITY).contains(&quality)
}

/// Clamp quality to the valid range.
#[inline]
pub fn clamp_quality(quality: u8) -> u8 {
    quality.clamp(MIN_JPEG_QUALITY, MAX_JPEG_QUALITY)
}

// =============================================================================
// Tests
// =============================================================================
