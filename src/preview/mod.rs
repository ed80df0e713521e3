//! Preview generation and request orchestration.

pub mod encoder;
pub mod service;

pub use encoder::{
    clamp_quality, encode_preview, is_valid_quality, DEFAULT_JPEG_QUALITY, DEFAULT_PREVIEW_WIDTH,
    MAX_JPEG_QUALITY, MIN_JPEG_QUALITY,
};
pub use service::{PreviewResponse, PreviewService};
