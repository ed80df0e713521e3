//! Perceptual normalization via CLAHE.
//!
//! Applies Contrast-Limited Adaptive Histogram Equalization to enhance local
//! contrast. Grayscale images are equalized directly; color images are
//! converted to YCbCr and only the luminance channel is equalized, which
//! avoids the hue and chroma distortion that naive per-channel histogram
//! equalization would introduce.
//!
//! Normalization is best-effort: if the transform cannot be applied (exotic
//! pixel layout, degenerate dimensions) the original image is returned
//! unchanged, with the fallback explicitly flagged so callers can observe
//! which path was taken.

use image::{DynamicImage, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};
use thiserror::Error;
use tracing::{debug, warn};

/// CLAHE histogram clip limit, relative to a uniform distribution.
pub const CLAHE_CLIP_LIMIT: f32 = 2.0;

/// CLAHE tile grid dimension (8x8 tiles).
pub const CLAHE_TILE_GRID: u32 = 8;

/// Outcome of a normalization attempt.
///
/// `fell_back` is true when the transform could not be applied and `image`
/// is the original, unnormalized raster.
pub struct NormalizeOutcome {
    pub image: DynamicImage,
    pub fell_back: bool,
}

#[derive(Debug, Error)]
enum NormalizeError {
    #[error("image has zero width or height")]
    EmptyImage,

    #[error("unsupported pixel layout: {0}")]
    UnsupportedLayout(&'static str),
}

/// Normalize an image, falling back to the original on failure.
///
/// This is a total function: it never fails the load pipeline. The returned
/// image always has the same dimensions and channel count as the input.
pub fn normalize(image: DynamicImage) -> NormalizeOutcome {
    match apply_clahe(&image) {
        Ok(normalized) => {
            debug!("Image normalized using CLAHE");
            NormalizeOutcome {
                image: normalized,
                fell_back: false,
            }
        }
        Err(e) => {
            warn!("Normalization failed, keeping original image: {}", e);
            NormalizeOutcome {
                image,
                fell_back: true,
            }
        }
    }
}

fn apply_clahe(image: &DynamicImage) -> Result<DynamicImage, NormalizeError> {
    let (width, height) = (image.width(), image.height());

    match image {
        DynamicImage::ImageLuma8(gray) => {
            let plane = clahe_plane(gray.as_raw(), width, height)?;
            let out = GrayImage::from_raw(width, height, plane)
                .ok_or(NormalizeError::EmptyImage)?;
            Ok(DynamicImage::ImageLuma8(out))
        }
        DynamicImage::ImageLumaA8(gray) => {
            let raw = gray.as_raw();
            let luma: Vec<u8> = raw.iter().step_by(2).copied().collect();
            let equalized = clahe_plane(&luma, width, height)?;

            let mut out = Vec::with_capacity(raw.len());
            for (i, &l) in equalized.iter().enumerate() {
                out.push(l);
                out.push(raw[i * 2 + 1]);
            }
            let out = GrayAlphaImage::from_raw(width, height, out)
                .ok_or(NormalizeError::EmptyImage)?;
            Ok(DynamicImage::ImageLumaA8(out))
        }
        DynamicImage::ImageRgb8(rgb) => {
            let out = clahe_rgb(rgb, width, height)?;
            Ok(DynamicImage::ImageRgb8(out))
        }
        DynamicImage::ImageRgba8(rgba) => {
            let raw = rgba.as_raw();
            let n = (width as usize) * (height as usize);

            let mut rgb = Vec::with_capacity(n * 3);
            for px in raw.chunks_exact(4) {
                rgb.extend_from_slice(&px[..3]);
            }
            let rgb = RgbImage::from_raw(width, height, rgb)
                .ok_or(NormalizeError::EmptyImage)?;
            let equalized = clahe_rgb(&rgb, width, height)?;

            let mut out = Vec::with_capacity(raw.len());
            for (px, alpha) in equalized
                .as_raw()
                .chunks_exact(3)
                .zip(raw.chunks_exact(4).map(|p| p[3]))
            {
                out.extend_from_slice(px);
                out.push(alpha);
            }
            let out = RgbaImage::from_raw(width, height, out)
                .ok_or(NormalizeError::EmptyImage)?;
            Ok(DynamicImage::ImageRgba8(out))
        }
        _ => Err(NormalizeError::UnsupportedLayout(
            "only 8-bit luma and RGB layouts are normalized",
        )),
    }
}

/// CLAHE on the luminance channel of an RGB image, preserving chroma.
fn clahe_rgb(rgb: &RgbImage, width: u32, height: u32) -> Result<RgbImage, NormalizeError> {
    let n = (width as usize) * (height as usize);
    let mut luma = Vec::with_capacity(n);
    let mut cb = Vec::with_capacity(n);
    let mut cr = Vec::with_capacity(n);

    for px in rgb.as_raw().chunks_exact(3) {
        let (y, b, r) = rgb_to_ycbcr(px[0], px[1], px[2]);
        luma.push(y);
        cb.push(b);
        cr.push(r);
    }

    let equalized = clahe_plane(&luma, width, height)?;

    let mut out = Vec::with_capacity(n * 3);
    for i in 0..n {
        let (r, g, b) = ycbcr_to_rgb(equalized[i], cb[i], cr[i]);
        out.push(r);
        out.push(g);
        out.push(b);
    }

    RgbImage::from_raw(width, height, out).ok_or(NormalizeError::EmptyImage)
}

// =============================================================================
// CLAHE core
// =============================================================================

/// CLAHE over a single 8-bit plane.
///
/// The plane is divided into an 8x8 grid of tiles. Each tile gets a clipped,
/// redistributed histogram and an equalization lookup table built from its
/// CDF; output pixels are bilinearly interpolated between the four
/// surrounding tile tables to avoid visible tile seams.
fn clahe_plane(plane: &[u8], width: u32, height: u32) -> Result<Vec<u8>, NormalizeError> {
    if width == 0 || height == 0 {
        return Err(NormalizeError::EmptyImage);
    }
    let w = width as usize;
    let h = height as usize;

    // Small images get fewer tiles so every tile holds at least one pixel.
    let grid_x = (CLAHE_TILE_GRID as usize).min(w);
    let grid_y = (CLAHE_TILE_GRID as usize).min(h);

    // Per-tile equalization lookup tables.
    let mut luts = vec![[0u8; 256]; grid_x * grid_y];
    for ty in 0..grid_y {
        let y0 = ty * h / grid_y;
        let y1 = (ty + 1) * h / grid_y;
        for tx in 0..grid_x {
            let x0 = tx * w / grid_x;
            let x1 = (tx + 1) * w / grid_x;

            let mut hist = [0u32; 256];
            for y in y0..y1 {
                for x in x0..x1 {
                    hist[plane[y * w + x] as usize] += 1;
                }
            }
            let area = ((x1 - x0) * (y1 - y0)) as u32;
            luts[ty * grid_x + tx] = build_lut(&mut hist, area);
        }
    }

    // Bilinear interpolation between the four nearest tile centers.
    let tile_w = w as f32 / grid_x as f32;
    let tile_h = h as f32 / grid_y as f32;
    let mut out = vec![0u8; plane.len()];

    for y in 0..h {
        let gy = (y as f32 + 0.5) / tile_h - 0.5;
        let ty0 = gy.floor().max(0.0) as usize;
        let ty1 = (ty0 + 1).min(grid_y - 1);
        let fy = (gy - ty0 as f32).clamp(0.0, 1.0);

        for x in 0..w {
            let gx = (x as f32 + 0.5) / tile_w - 0.5;
            let tx0 = gx.floor().max(0.0) as usize;
            let tx1 = (tx0 + 1).min(grid_x - 1);
            let fx = (gx - tx0 as f32).clamp(0.0, 1.0);

            let v = plane[y * w + x] as usize;
            let top = luts[ty0 * grid_x + tx0][v] as f32 * (1.0 - fx)
                + luts[ty0 * grid_x + tx1][v] as f32 * fx;
            let bottom = luts[ty1 * grid_x + tx0][v] as f32 * (1.0 - fx)
                + luts[ty1 * grid_x + tx1][v] as f32 * fx;

            out[y * w + x] = (top * (1.0 - fy) + bottom * fy).round() as u8;
        }
    }

    Ok(out)
}

/// Clip a tile histogram, redistribute the excess and build the equalization
/// lookup table from its CDF.
fn build_lut(hist: &mut [u32; 256], area: u32) -> [u8; 256] {
    debug_assert!(area > 0);

    let clip = ((CLAHE_CLIP_LIMIT * area as f32 / 256.0) as u32).max(1);

    let mut excess = 0u32;
    for count in hist.iter_mut() {
        if *count > clip {
            excess += *count - clip;
            *count = clip;
        }
    }

    // Spread the clipped mass uniformly; the remainder goes to the first bins.
    let bonus = excess / 256;
    let residual = (excess % 256) as usize;
    for (i, count) in hist.iter_mut().enumerate() {
        *count += bonus + u32::from(i < residual);
    }

    let scale = 255.0 / area as f32;
    let mut lut = [0u8; 256];
    let mut cdf = 0u32;
    for i in 0..256 {
        cdf += hist[i];
        lut[i] = (cdf as f32 * scale).round().min(255.0) as u8;
    }
    lut
}

// =============================================================================
// Color space conversion (BT.601 full-range, as used by JPEG)
// =============================================================================

fn rgb_to_ycbcr(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let (r, g, b) = (r as f32, g as f32, b as f32);
    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let cb = 128.0 - 0.168_736 * r - 0.331_264 * g + 0.5 * b;
    let cr = 128.0 + 0.5 * r - 0.418_688 * g - 0.081_312 * b;
    (clamp_u8(y), clamp_u8(cb), clamp_u8(cr))
}

fn ycbcr_to_rgb(y: u8, cb: u8, cr: u8) -> (u8, u8, u8) {
    let y = y as f32;
    let cb = cb as f32 - 128.0;
    let cr = cr as f32 - 128.0;
    let r = y + 1.402 * cr;
    let g = y - 0.344_136 * cb - 0.714_136 * cr;
    let b = y + 1.772 * cb;
    (clamp_u8(r), clamp_u8(g), clamp_u8(b))
}

fn clamp_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

// =============================================================================
// Tests
// =============================================================================
