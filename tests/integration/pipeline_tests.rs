//! End-to-end pipeline tests covering normalization, caching and the
//! behavior of the service when files change underneath it.

use std::fs;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use quadview::set::Quadrant;
use quadview::{create_router, RouterConfig, StaticMounts};

use super::test_utils::{is_valid_jpeg, SetFixture};

// =============================================================================
// Normalization
// =============================================================================

#[tokio::test]
async fn test_low_contrast_source_is_stretched() {
    let fixture = SetFixture::new();
    fixture.low_contrast_set("0003");
    let service = fixture.service();

    let response = service
        .get_preview("0003", Quadrant::TopLeft)
        .await
        .unwrap();
    assert!(is_valid_jpeg(&response.data));
    assert!(!response.normalize_fallback);

    // The source only uses luma values 100..150; after contrast-limited
    // equalization the preview should span a wider range.
    let decoded = image::load_from_memory(&response.data).unwrap().to_luma8();
    let min = decoded.pixels().map(|p| p.0[0]).min().unwrap();
    let max = decoded.pixels().map(|p| p.0[0]).max().unwrap();
    assert!(
        max - min > 60,
        "expected stretched contrast, got range {}..{}",
        min,
        max
    );
}

// =============================================================================
// Cache Behavior
// =============================================================================

#[tokio::test]
async fn test_concurrent_previews_share_one_decode() {
    let fixture = SetFixture::new();
    fixture.complete_set("0001");
    let service = Arc::new(fixture.service());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            service.get_preview("0001", Quadrant::TopLeft).await
        }));
    }

    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        assert!(is_valid_jpeg(&response.data));
    }

    // All eight requests touched a single file.
    assert_eq!(service.cache().len().await, 1);
}

#[tokio::test]
async fn test_distinct_quadrants_are_cached_separately() {
    let fixture = SetFixture::new();
    fixture.complete_set("0001");
    let service = fixture.service();

    service
        .get_preview("0001", Quadrant::TopLeft)
        .await
        .unwrap();
    service
        .get_preview("0001", Quadrant::BottomRight)
        .await
        .unwrap();

    assert_eq!(service.cache().len().await, 2);
}

// =============================================================================
// Files Changing After Discovery
// =============================================================================

#[tokio::test]
async fn test_file_removed_after_discovery_returns_404() {
    let fixture = SetFixture::new();
    fixture.complete_set("0001");
    let service = fixture.service();

    // Force discovery, then delete one quadrant file.
    let paths = service.quadrant_paths("0001").unwrap();
    fs::remove_file(&paths.br).unwrap();

    let router = create_router(service, RouterConfig::new());
    let request = Request::builder()
        .uri("/api/image-preview/0001/br")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["error"], "not_found");
}

#[tokio::test]
async fn test_corrupt_file_returns_decode_error() {
    let fixture = SetFixture::new();
    fixture.complete_set("0001");
    let service = fixture.service();

    let paths = service.quadrant_paths("0001").unwrap();
    fs::write(&paths.tl, b"not a png").unwrap();

    let router = create_router(service, RouterConfig::new());
    let request = Request::builder()
        .uri("/api/image-preview/0001/tl")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["error"], "decode_error");
}

// =============================================================================
// Static Mounts
// =============================================================================

#[tokio::test]
async fn test_static_mounts_serve_originals() {
    let fixture = SetFixture::new();
    fixture.complete_set("0001");
    let service = fixture.service();

    let config = RouterConfig::new().with_static_mounts(StaticMounts {
        reference_dir: fixture.resolver.reference_dir().to_path_buf(),
        variant_dir_1: fixture.resolver.variant_dir_1().to_path_buf(),
        variant_dir_2: fixture.resolver.variant_dir_2().to_path_buf(),
    });
    let router = create_router(service, config);

    let request = Request::builder()
        .uri("/static-ref/0001-4x_cropped.png")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The original PNG comes back untouched.
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[1..4], b"PNG");
}

#[tokio::test]
async fn test_static_mounts_absent_when_disabled() {
    let fixture = SetFixture::new();
    fixture.complete_set("0001");
    let router = create_router(fixture.service(), RouterConfig::new());

    let request = Request::builder()
        .uri("/static-ref/0001-4x_cropped.png")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
