//! Bounded cache of decoded, normalized full-resolution images.
//!
//! This cache owns the only expensive work in the pipeline: disk read, image
//! decode and CLAHE normalization. Entries are keyed by absolute file path
//! and evicted in least-recently-used order when the cache is at capacity.
//!
//! # Invariants
//!
//! - An entry present in the cache is always fully normalized (or explicitly
//!   flagged as a normalization fallback); raw decodes are never stored.
//! - Failures (missing file, undecodable file) are never cached; a later
//!   call for the same path retries from disk.
//! - A reload replaces the prior entry wholesale; entries are immutable.
//!
//! # Concurrency
//!
//! Concurrent loads for different paths proceed independently. Concurrent
//! loads for the same uncached path are coalesced: one task performs the
//! decode while the others wait and share the result.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::DynamicImage;
use lru::LruCache;
use tokio::sync::{Mutex, Notify, RwLock};
use tracing::{debug, warn};

use crate::error::LoadError;

use super::normalize::normalize;

/// Default number of distinct paths to keep resident.
pub const DEFAULT_IMAGE_CACHE_CAPACITY: usize = 32;

// =============================================================================
// Cache Entry
// =============================================================================

/// A decoded image that has passed through the normalizer.
pub struct LoadedImage {
    /// The full-resolution raster.
    pub image: DynamicImage,

    /// True when normalization failed and this is the original decode.
    pub normalize_fallback: bool,
}

/// Result of a cache load.
pub struct LoadResult {
    /// Shared handle to the cached image.
    pub image: Arc<LoadedImage>,

    /// Whether the image was served from cache without touching disk.
    pub cache_hit: bool,
}

/// State for an in-flight load operation.
struct InFlightState {
    /// Notification for waiters
    notify: Notify,
    /// Result of the load (set when complete)
    result: Mutex<Option<Result<Arc<LoadedImage>, LoadError>>>,
}

// =============================================================================
// ImageCache
// =============================================================================

/// Bounded LRU cache of normalized full-resolution images, keyed by path.
pub struct ImageCache {
    /// Cached images indexed by absolute file path
    cache: RwLock<LruCache<PathBuf, Arc<LoadedImage>>>,

    /// In-flight loads for coalescing duplicate work
    in_flight: Mutex<HashMap<PathBuf, Arc<InFlightState>>>,
}

impl ImageCache {
    /// Create a cache with the default capacity (32 paths).
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_IMAGE_CACHE_CAPACITY)
    }

    /// Create a cache holding at most `capacity` distinct paths.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero (configuration validation rejects this
    /// before construction).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: RwLock::new(LruCache::new(
                NonZeroUsize::new(capacity).expect("cache capacity must be non-zero"),
            )),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Load an image, decoding and normalizing it on first access.
    ///
    /// On a hit the stored raster is returned without disk I/O. On a miss the
    /// file is read, decoded and normalized, then stored; the least-recently
    /// used entry is evicted if the cache is at capacity. Missing files and
    /// decode failures are reported as errors and never cached.
    pub async fn load(&self, path: &Path) -> Result<LoadResult, LoadError> {
        // Fast path: check cache
        {
            let mut cache = self.cache.write().await;
            if let Some(image) = cache.get(path) {
                return Ok(LoadResult {
                    image: image.clone(),
                    cache_hit: true,
                });
            }
        }

        // Slow path: coalesce with an in-flight load or become the leader
        loop {
            let state = {
                let mut in_flight = self.in_flight.lock().await;

                if let Some(state) = in_flight.get(path) {
                    // Another task is loading this path
                    state.clone()
                } else {
                    // We're the leader for loading this path
                    let state = Arc::new(InFlightState {
                        notify: Notify::new(),
                        result: Mutex::new(None),
                    });
                    in_flight.insert(path.to_path_buf(), state.clone());
                    drop(in_flight);

                    let result = self.load_from_disk(path).await;

                    {
                        let mut result_guard = state.result.lock().await;
                        *result_guard = Some(result.clone());
                    }

                    if let Ok(ref image) = result {
                        let mut cache = self.cache.write().await;
                        cache.put(path.to_path_buf(), image.clone());
                    }

                    {
                        let mut in_flight = self.in_flight.lock().await;
                        in_flight.remove(path);
                    }
                    state.notify.notify_waiters();

                    return result.map(|image| LoadResult {
                        image,
                        cache_hit: false,
                    });
                }
            };

            // Wait for the leader to finish
            if let Some(result) = wait_for_result(&state).await {
                return result.map(|image| LoadResult {
                    image,
                    cache_hit: false,
                });
            }

            // Result not yet available, loop back (shouldn't normally happen)
        }
    }

    /// Read, decode and normalize a file (no caching).
    async fn load_from_disk(&self, path: &Path) -> Result<Arc<LoadedImage>, LoadError> {
        let exists = tokio::fs::try_exists(path).await.unwrap_or(false);
        if !exists {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }

        let bytes = tokio::fs::read(path).await.map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let decoded = image::load_from_memory(&bytes).map_err(|e| {
            warn!("Failed to decode image {}: {}", path.display(), e);
            LoadError::Decode {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?;

        debug!(
            "Loaded image {} ({}x{})",
            path.display(),
            decoded.width(),
            decoded.height()
        );

        let outcome = normalize(decoded);
        Ok(Arc::new(LoadedImage {
            image: outcome.image,
            normalize_fallback: outcome.fell_back,
        }))
    }

    /// Check whether a path is resident without updating LRU order.
    pub async fn contains(&self, path: &Path) -> bool {
        let cache = self.cache.read().await;
        cache.contains(path)
    }

    /// Remove a path from the cache.
    pub async fn invalidate(&self, path: &Path) {
        let mut cache = self.cache.write().await;
        cache.pop(path);
    }

    /// Clear all entries.
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.clear();
    }

    /// The number of resident entries.
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.len()
    }

    /// Whether the cache is empty.
    pub async fn is_empty(&self) -> bool {
        let cache = self.cache.read().await;
        cache.is_empty()
    }
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait on an in-flight load, returning its result once the leader stores it.
///
/// Interest in the notification is registered (via [`Notified::enable`])
/// before the result slot is checked. The leader stores the result and then
/// calls `notify_waiters`, which only wakes already-registered waiters, so
/// checking the slot first would leave a window where a leader finishing
/// between the in-flight map lookup and the wait strands the waiter forever.
///
/// Returns `None` only if woken without a stored result; the caller loops.
///
/// [`Notified::enable`]: tokio::sync::futures::Notified::enable
async fn wait_for_result(
    state: &InFlightState,
) -> Option<Result<Arc<LoadedImage>, LoadError>> {
    let notified = state.notify.notified();
    tokio::pin!(notified);
    notified.as_mut().enable();

    {
        let result_guard = state.result.lock().await;
        if let Some(ref result) = *result_guard {
            return Some(result.clone());
        }
    }

    notified.await;

    let result_guard = state.result.lock().await;
    result_guard.clone()
}

// =============================================================================
// Tests
// =============================================================================
