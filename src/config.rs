//! Configuration management for Quadview.
//!
//! This module provides a flexible configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables with `QUADVIEW_` prefix
//! - Sensible defaults for all optional settings
//!
//! # Example
//!
//! ```ignore
//! use quadview::config::Config;
//!
//! // Parse from command line and environment
//! let config = Config::parse();
//!
//! println!("Listening on {}", config.bind_address());
//! println!("Reference directory: {}", config.reference_dir.display());
//! ```
//!
//! # Environment Variables
//!
//! All configuration options can be set via environment variables with the
//! `QUADVIEW_` prefix:
//!
//! - `QUADVIEW_HOST` - Server bind address (default: 0.0.0.0)
//! - `QUADVIEW_PORT` - Server port (default: 3000)
//! - `QUADVIEW_REFERENCE_DIR` - Directory with the two reference quadrants (required)
//! - `QUADVIEW_IMAGE_DIR_1` - Directory with the first variant quadrant (required)
//! - `QUADVIEW_IMAGE_DIR_2` - Directory with the second variant quadrant (required)
//! - `QUADVIEW_CACHE_IMAGES` - Max normalized images to cache (default: 32)
//! - `QUADVIEW_JPEG_QUALITY` - Preview JPEG quality (default: 80)
//! - `QUADVIEW_PREVIEW_WIDTH` - Preview target width in pixels (default: 400)
//! - `QUADVIEW_QUADRANT_WIDTH` / `QUADVIEW_QUADRANT_HEIGHT` - Advisory display hints
//! - `QUADVIEW_CACHE_MAX_AGE` - HTTP cache max-age seconds (default: 3600)

use std::path::PathBuf;

use clap::Parser;

use crate::image::DEFAULT_IMAGE_CACHE_CAPACITY;
use crate::preview::{DEFAULT_JPEG_QUALITY, DEFAULT_PREVIEW_WIDTH};

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default advisory quadrant display width in pixels.
pub const DEFAULT_QUADRANT_WIDTH: u32 = 1200;

/// Default advisory quadrant display height in pixels.
pub const DEFAULT_QUADRANT_HEIGHT: u32 = 700;

/// Default HTTP cache max-age in seconds (1 hour).
pub const DEFAULT_CACHE_MAX_AGE: u32 = 3600;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Quadview - A preview server for four-quadrant image comparison sets.
///
/// Discovers numeric keys for which all four quadrant files exist across the
/// three configured directories and serves normalized low-resolution JPEG
/// previews of each quadrant.
#[derive(Parser, Debug, Clone)]
#[command(name = "quadview")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "QUADVIEW_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "QUADVIEW_PORT")]
    pub port: u16,

    // =========================================================================
    // Source Directories
    // =========================================================================
    /// Directory containing the two reference quadrants (basis for discovery).
    #[arg(long, env = "QUADVIEW_REFERENCE_DIR")]
    pub reference_dir: PathBuf,

    /// Directory containing the first algorithm-output quadrant.
    #[arg(long, env = "QUADVIEW_IMAGE_DIR_1")]
    pub image_dir_1: PathBuf,

    /// Directory containing the second algorithm-output quadrant.
    #[arg(long, env = "QUADVIEW_IMAGE_DIR_2")]
    pub image_dir_2: PathBuf,

    // =========================================================================
    // Cache Configuration
    // =========================================================================
    /// Maximum number of decoded, normalized full-resolution images to cache.
    #[arg(long, default_value_t = DEFAULT_IMAGE_CACHE_CAPACITY, env = "QUADVIEW_CACHE_IMAGES")]
    pub cache_images: usize,

    /// HTTP Cache-Control max-age in seconds for preview responses.
    #[arg(long, default_value_t = DEFAULT_CACHE_MAX_AGE, env = "QUADVIEW_CACHE_MAX_AGE")]
    pub cache_max_age: u32,

    // =========================================================================
    // Preview Configuration
    // =========================================================================
    /// JPEG quality for preview encoding (1-100).
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY, env = "QUADVIEW_JPEG_QUALITY")]
    pub jpeg_quality: u8,

    /// Target width in pixels for generated previews.
    #[arg(long, default_value_t = DEFAULT_PREVIEW_WIDTH, env = "QUADVIEW_PREVIEW_WIDTH")]
    pub preview_width: u32,

    /// Advisory quadrant display width surfaced to the presentation layer.
    #[arg(long, default_value_t = DEFAULT_QUADRANT_WIDTH, env = "QUADVIEW_QUADRANT_WIDTH")]
    pub quadrant_width: u32,

    /// Advisory quadrant display height surfaced to the presentation layer.
    #[arg(long, default_value_t = DEFAULT_QUADRANT_HEIGHT, env = "QUADVIEW_QUADRANT_HEIGHT")]
    pub quadrant_height: u32,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "QUADVIEW_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Static Mounts
    // =========================================================================
    /// Disable serving the source directories at /static-ref, /static-img1
    /// and /static-img2.
    #[arg(long, default_value_t = false, env = "QUADVIEW_NO_STATIC_MOUNTS")]
    pub no_static_mounts: bool,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.reference_dir.as_os_str().is_empty() {
            return Err(
                "Reference directory is required. Set --reference-dir or QUADVIEW_REFERENCE_DIR"
                    .to_string(),
            );
        }
        if self.image_dir_1.as_os_str().is_empty() {
            return Err(
                "Variant directory 1 is required. Set --image-dir-1 or QUADVIEW_IMAGE_DIR_1"
                    .to_string(),
            );
        }
        if self.image_dir_2.as_os_str().is_empty() {
            return Err(
                "Variant directory 2 is required. Set --image-dir-2 or QUADVIEW_IMAGE_DIR_2"
                    .to_string(),
            );
        }

        if self.cache_images == 0 {
            return Err("cache_images must be greater than 0".to_string());
        }

        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err("jpeg_quality must be between 1 and 100".to_string());
        }

        if self.preview_width == 0 {
            return Err("preview_width must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// Tests
// =============================================================================
