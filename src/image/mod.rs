//! Full-resolution image loading, normalization and caching.
//!
//! This is the expensive half of the pipeline: disk read, decode and CLAHE
//! normalization happen exactly once per path and the result is retained in
//! a bounded LRU cache. Everything downstream (preview encoding) borrows the
//! cached raster.

pub mod cache;
pub mod normalize;

pub use cache::{ImageCache, LoadResult, LoadedImage, DEFAULT_IMAGE_CACHE_CAPACITY};
pub use normalize::{normalize, NormalizeOutcome, CLAHE_CLIP_LIMIT, CLAHE_TILE_GRID};
