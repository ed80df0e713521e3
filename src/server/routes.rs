//! Router configuration for Quadview.
//!
//! This module defines the HTTP routes and applies middleware for CORS,
//! request tracing and static file mounts.
//!
//! # Route Structure
//!
//! ```text
//! /health                              - Health check
//! /api/image-sets                      - List discovered set keys
//! /api/image-urls/{key}                - Static URLs for a set's originals
//! /api/image-preview/{key}/{quadrant}  - Low-resolution JPEG preview
//! /static-ref, /static-img1, /static-img2 - Source directory mounts
//! ```

use std::path::PathBuf;
use std::time::Duration;

use axum::{routing::get, Router};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers::{
    health_handler, preview_handler, quadrant_urls_handler, sets_handler, AppState,
};
use crate::preview::PreviewService;

// =============================================================================
// Router Configuration
// =============================================================================

/// Static mounts for the three source directories.
///
/// When present, the full-resolution originals are served directly so the
/// presentation layer can link to them via the URLs from
/// `/api/image-urls/{key}`.
#[derive(Debug, Clone)]
pub struct StaticMounts {
    /// Reference directory, mounted at `/static-ref`
    pub reference_dir: PathBuf,

    /// First variant directory, mounted at `/static-img1`
    pub variant_dir_1: PathBuf,

    /// Second variant directory, mounted at `/static-img2`
    pub variant_dir_2: PathBuf,
}

/// Configuration for the HTTP router.
#[derive(Clone)]
pub struct RouterConfig {
    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Cache-Control max-age in seconds for preview responses
    pub cache_max_age: u32,

    /// Advisory quadrant display dimensions
    pub quadrant_hint: (u32, u32),

    /// Whether to enable request tracing
    pub enable_tracing: bool,

    /// Source directory mounts (None = originals are not served)
    pub static_mounts: Option<StaticMounts>,
}

impl RouterConfig {
    /// Create a router configuration with defaults:
    /// - CORS allows any origin
    /// - Cache max-age is 1 hour (3600 seconds)
    /// - Quadrant hints 1200x700
    /// - Tracing enabled
    /// - No static mounts
    pub fn new() -> Self {
        Self {
            cors_origins: None,
            cache_max_age: 3600,
            quadrant_hint: (1200, 700),
            enable_tracing: true,
            static_mounts: None,
        }
    }

    /// Set specific allowed CORS origins.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Set the Cache-Control max-age in seconds.
    pub fn with_cache_max_age(mut self, seconds: u32) -> Self {
        self.cache_max_age = seconds;
        self
    }

    /// Set the advisory quadrant display dimensions.
    pub fn with_quadrant_hint(mut self, width: u32, height: u32) -> Self {
        self.quadrant_hint = (width, height);
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }

    /// Mount the three source directories as static file roots.
    pub fn with_static_mounts(mut self, mounts: StaticMounts) -> Self {
        self.static_mounts = Some(mounts);
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// This function builds the complete Axum router with:
/// - Health check and JSON API routes
/// - Optional static mounts for the source directories
/// - CORS configuration
/// - Request tracing (optional)
pub fn create_router(service: PreviewService, config: RouterConfig) -> Router {
    let app_state = AppState::new(service)
        .with_cache_max_age(config.cache_max_age)
        .with_quadrant_hint(config.quadrant_hint.0, config.quadrant_hint.1);

    let cors = build_cors_layer(&config);

    let mut router = Router::new()
        .route("/health", get(health_handler))
        .route("/api/image-sets", get(sets_handler))
        .route("/api/image-urls/{key}", get(quadrant_urls_handler))
        .route(
            "/api/image-preview/{key}/{quadrant}",
            get(preview_handler),
        )
        .with_state(app_state);

    if let Some(mounts) = &config.static_mounts {
        router = router
            .nest_service("/static-ref", ServeDir::new(&mounts.reference_dir))
            .nest_service("/static-img1", ServeDir::new(&mounts.variant_dir_1))
            .nest_service("/static-img2", ServeDir::new(&mounts.variant_dir_2));
    }

    let router = router.layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => {
            // No origins allowed - this effectively disables CORS
            cors
        }
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
