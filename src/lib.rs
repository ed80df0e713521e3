//! # Quadview
//!
//! A preview server for four-quadrant image comparison sets.
//!
//! This library serves side-by-side comparisons of algorithm outputs against
//! reference imagery. Each comparison set is keyed by a 4-digit number and
//! consists of four fixed-name PNG files spread across three directories:
//! two reference quadrants, plus one output from each of two algorithm
//! variants.
//!
//! ## Features
//!
//! - **Set discovery**: Scans the reference directory once at startup and
//!   keeps only keys for which all four quadrant files exist
//! - **Contrast normalization**: Applies CLAHE to the luminance channel of
//!   every image before serving, so dim captures stay comparable
//! - **Bounded caching**: Decoded, normalized full-resolution images live in
//!   an LRU cache; concurrent requests for the same file share one decode
//! - **JPEG previews**: Low-resolution previews are derived on the fly at a
//!   fixed target width
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`set`] - Quadrant filename templates, path resolution and set discovery
//! - [`image`] - Decode + normalize pipeline and the bounded image cache
//! - [`preview`] - JPEG preview encoding and the request-facing service
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use quadview::{create_router, PathResolver, PreviewService, RouterConfig, SetRegistry};
//!
//! #[tokio::main]
//! async fn main() {
//!     let resolver = PathResolver::new("/data/reference", "/data/variant1", "/data/variant2");
//!     let registry = SetRegistry::new(resolver);
//!     let service = PreviewService::new(registry);
//!
//!     let router = create_router(service, RouterConfig::new());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod image;
pub mod preview;
pub mod server;
pub mod set;

// Re-export commonly used types
pub use config::Config;
pub use error::{LoadError, PreviewError};
pub use image::{
    normalize, ImageCache, LoadResult, LoadedImage, NormalizeOutcome, CLAHE_CLIP_LIMIT,
    CLAHE_TILE_GRID, DEFAULT_IMAGE_CACHE_CAPACITY,
};
pub use preview::{
    clamp_quality, encode_preview, is_valid_quality, PreviewResponse, PreviewService,
    DEFAULT_JPEG_QUALITY, DEFAULT_PREVIEW_WIDTH, MAX_JPEG_QUALITY, MIN_JPEG_QUALITY,
};
pub use server::{
    create_router, health_handler, preview_handler, quadrant_urls_handler, sets_handler, AppState,
    ErrorResponse, HealthResponse, QuadrantUrlsResponse, RouterConfig, SetsResponse, StaticMounts,
};
pub use set::{PathResolver, Quadrant, QuadrantPaths, SetRegistry};
