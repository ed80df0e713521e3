//! Preview service orchestrating the full pipeline.
//!
//! The service is the single long-lived object constructed at process start
//! and shared by all request handlers. It owns the discovered-set registry
//! and the image cache, and exposes the three core operations the HTTP layer
//! consumes:
//!
//! 1. `list_available_sets` - the discovered keys
//! 2. `quadrant_paths` - key to file path mapping (registry-gated)
//! 3. `get_preview` - key + quadrant to JPEG preview bytes

use std::sync::Arc;

use bytes::Bytes;

use crate::error::PreviewError;
use crate::image::ImageCache;
use crate::set::{Quadrant, QuadrantPaths, SetRegistry};

use super::encoder::{encode_preview, DEFAULT_JPEG_QUALITY, DEFAULT_PREVIEW_WIDTH};

// =============================================================================
// Preview Response
// =============================================================================

/// Response from the preview service.
#[derive(Debug, Clone)]
pub struct PreviewResponse {
    /// The encoded JPEG preview data
    pub data: Bytes,

    /// Whether the underlying full-resolution image came from cache
    pub cache_hit: bool,

    /// Whether normalization fell back to the original decode
    pub normalize_fallback: bool,

    /// The JPEG quality used for encoding
    pub quality: u8,
}

// =============================================================================
// Preview Service
// =============================================================================

/// Service for resolving image sets and generating previews.
pub struct PreviewService {
    /// The discovered-set registry
    registry: Arc<SetRegistry>,

    /// Cache of decoded, normalized full-resolution images
    cache: ImageCache,

    /// Preview target width in pixels
    preview_width: u32,

    /// JPEG quality for preview encoding
    jpeg_quality: u8,
}

impl PreviewService {
    /// Create a service with default preview settings and cache capacity.
    pub fn new(registry: SetRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            cache: ImageCache::new(),
            preview_width: DEFAULT_PREVIEW_WIDTH,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Create a service with explicit cache capacity and preview settings.
    ///
    /// # Arguments
    ///
    /// * `registry` - The discovered-set registry
    /// * `cache_capacity` - Maximum number of full-resolution images to cache
    /// * `preview_width` - Target preview width in pixels
    /// * `jpeg_quality` - Preview JPEG quality (1-100)
    pub fn with_settings(
        registry: SetRegistry,
        cache_capacity: usize,
        preview_width: u32,
        jpeg_quality: u8,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            cache: ImageCache::with_capacity(cache_capacity),
            preview_width,
            jpeg_quality,
        }
    }

    /// The sorted list of discovered set keys.
    pub fn list_available_sets(&self) -> &[String] {
        self.registry.available_sets()
    }

    /// Resolve the four quadrant paths for a discovered key.
    ///
    /// # Errors
    ///
    /// Returns [`PreviewError::SetNotFound`] if the key is not in the
    /// registry.
    pub fn quadrant_paths(&self, key: &str) -> Result<QuadrantPaths, PreviewError> {
        if !self.registry.contains(key) {
            return Err(PreviewError::SetNotFound {
                key: key.to_string(),
            });
        }
        Ok(self.registry.resolve(key))
    }

    /// Generate a low-resolution JPEG preview for one quadrant of a set.
    ///
    /// Loads the full-resolution image through the cache (decoding and
    /// normalizing on first access) and derives the preview on the fly.
    ///
    /// # Errors
    ///
    /// - [`PreviewError::SetNotFound`] if the key is not in the registry
    /// - [`PreviewError::FileNotFound`] if the resolved file is missing
    /// - [`PreviewError::Decode`] if the file cannot be parsed as an image
    /// - [`PreviewError::Encode`] if resampling or JPEG compression fails
    pub async fn get_preview(
        &self,
        key: &str,
        quadrant: Quadrant,
    ) -> Result<PreviewResponse, PreviewError> {
        let paths = self.quadrant_paths(key)?;
        let path = paths.get(quadrant);

        let loaded = self.cache.load(path).await?;
        let data = encode_preview(&loaded.image.image, self.preview_width, self.jpeg_quality)?;

        Ok(PreviewResponse {
            data,
            cache_hit: loaded.cache_hit,
            normalize_fallback: loaded.image.normalize_fallback,
            quality: self.jpeg_quality,
        })
    }

    /// The underlying registry.
    pub fn registry(&self) -> &Arc<SetRegistry> {
        &self.registry
    }

    /// The underlying image cache.
    pub fn cache(&self) -> &ImageCache {
        &self.cache
    }
}

// =============================================================================
// Tests
// =============================================================================
