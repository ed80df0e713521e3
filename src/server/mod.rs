//! HTTP server layer for Quadview.
//!
//! This module provides the HTTP API for browsing image sets and fetching
//! quadrant previews.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        HTTP Layer                            │
//! │    GET /api/image-preview/{key}/{quadrant}                   │
//! │                                                              │
//! │  ┌──────────────┐            ┌───────────────────────────┐   │
//! │  │   handlers   │            │          routes           │   │
//! │  │  (requests)  │            │  (router, CORS, statics)  │   │
//! │  └──────────────┘            └───────────────────────────┘   │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    health_handler, preview_handler, quadrant_urls_handler, sets_handler, AppState, ErrorResponse,
    HealthResponse, QuadrantUrlsResponse, SetsResponse,
};
pub use routes::{create_router, RouterConfig, StaticMounts};
