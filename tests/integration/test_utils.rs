//! Test utilities for integration tests.
//!
//! This module provides a temporary-directory fixture that lays out complete
//! or partial quadrant sets the way the production directories do.

use image::{GrayImage, Luma, Rgb, RgbImage};
use tempfile::TempDir;

use quadview::preview::PreviewService;
use quadview::set::{PathResolver, Quadrant, SetRegistry};

// =============================================================================
// Directory Fixture
// =============================================================================

/// Three temporary source directories plus a resolver over them.
///
/// The directories live as long as the fixture; dropping it deletes them.
pub struct SetFixture {
    _reference: TempDir,
    _variant1: TempDir,
    _variant2: TempDir,
    pub resolver: PathResolver,
}

impl SetFixture {
    pub fn new() -> Self {
        let reference = TempDir::new().unwrap();
        let variant1 = TempDir::new().unwrap();
        let variant2 = TempDir::new().unwrap();
        let resolver = PathResolver::new(reference.path(), variant1.path(), variant2.path());
        Self {
            _reference: reference,
            _variant1: variant1,
            _variant2: variant2,
            resolver,
        }
    }

    /// Write four decodable PNGs for a key, one per quadrant.
    ///
    /// Each quadrant gets a distinct color gradient so previews of different
    /// quadrants differ.
    pub fn complete_set(&self, key: &str) {
        let paths = self.resolver.resolve(key);
        for (i, (_, path)) in paths.iter().enumerate() {
            let img = RgbImage::from_fn(64, 48, |x, y| {
                Rgb([(x * 4) as u8, (y * 5) as u8, (i * 60) as u8])
            });
            img.save(path).unwrap();
        }
    }

    /// Write only the reference quadrants for a key, leaving the variant
    /// outputs missing.
    pub fn partial_set(&self, key: &str) {
        let paths = self.resolver.resolve(key);
        for quadrant in [Quadrant::TopLeft, Quadrant::TopRight] {
            let img = RgbImage::from_pixel(64, 48, Rgb([40, 80, 120]));
            img.save(paths.get(quadrant)).unwrap();
        }
    }

    /// Write a complete set where every quadrant is a low-contrast grayscale
    /// gradient, useful for observing normalization.
    pub fn low_contrast_set(&self, key: &str) {
        let paths = self.resolver.resolve(key);
        for (_, path) in paths.iter() {
            let img = GrayImage::from_fn(64, 48, |x, _| Luma([100 + (x % 50) as u8]));
            img.save(path).unwrap();
        }
    }

    /// Build a service over the fixture with small test-friendly settings.
    pub fn service(&self) -> PreviewService {
        let registry = SetRegistry::new(self.resolver.clone());
        PreviewService::with_settings(registry, 8, 32, 80)
    }
}

// =============================================================================
// Assertions
// =============================================================================

/// Check that the given bytes start with the JPEG SOI marker.
pub fn is_valid_jpeg(data: &[u8]) -> bool {
    data.len() > 2 && data[0] == 0xFF && data[1] == 0xD8
}
