//! API integration tests for the JSON endpoints and preview retrieval.
//!
//! Tests verify:
//! - Set listing and quadrant URL resolution
//! - Preview retrieval with correct headers
//! - Error cases (unknown set, invalid quadrant, missing files)
//! - HTTP response codes and bodies

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use quadview::{create_router, RouterConfig};

use super::test_utils::{is_valid_jpeg, SetFixture};

// =============================================================================
// Health and Set Listing
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let fixture = SetFixture::new();
    let router = create_router(fixture.service(), RouterConfig::new());

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_list_sets() {
    let fixture = SetFixture::new();
    fixture.complete_set("0102");
    fixture.complete_set("0007");
    fixture.partial_set("0050");
    let router = create_router(fixture.service(), RouterConfig::new());

    let request = Request::builder()
        .uri("/api/image-sets")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    // Partial sets are excluded, complete sets come back sorted.
    assert_eq!(json["sets"], serde_json::json!(["0007", "0102"]));
    assert_eq!(json["quadrant_width"], 1200);
    assert_eq!(json["quadrant_height"], 700);
}

#[tokio::test]
async fn test_list_sets_empty_dataset() {
    let fixture = SetFixture::new();
    let router = create_router(fixture.service(), RouterConfig::new());

    let request = Request::builder()
        .uri("/api/image-sets")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["sets"], serde_json::json!([]));
}

// =============================================================================
// Quadrant URLs
// =============================================================================

#[tokio::test]
async fn test_quadrant_urls() {
    let fixture = SetFixture::new();
    fixture.complete_set("0001");
    let router = create_router(fixture.service(), RouterConfig::new());

    let request = Request::builder()
        .uri("/api/image-urls/0001")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["tl"], "/static-ref/0001-4x_cropped.png");
    assert_eq!(json["tr"], "/static-ref/0001-20x.png");
    assert_eq!(
        json["bl"],
        "/static-img1/0001-4x_cropped_HAT_RAW_FDL_grayscale_v2_TEST.png"
    );
    assert_eq!(
        json["br"],
        "/static-img2/0001-4x_cropped_HAT_DUAL_earlyfusion_FDL_grayscale_v2_TEST.png"
    );
}

#[tokio::test]
async fn test_quadrant_urls_unknown_set() {
    let fixture = SetFixture::new();
    fixture.complete_set("0001");
    let router = create_router(fixture.service(), RouterConfig::new());

    let request = Request::builder()
        .uri("/api/image-urls/9999")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["error"], "not_found");
}

// =============================================================================
// Preview Retrieval
// =============================================================================

#[tokio::test]
async fn test_preview_retrieval_success() {
    let fixture = SetFixture::new();
    fixture.complete_set("0001");
    let router = create_router(fixture.service(), RouterConfig::new());

    let request = Request::builder()
        .uri("/api/image-preview/0001/tl")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Verify content type and cache headers
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "image/jpeg"
    );
    assert!(response.headers().contains_key("cache-control"));

    // Verify the response body is a valid JPEG
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(is_valid_jpeg(&body), "Response should be a valid JPEG");
}

#[tokio::test]
async fn test_preview_all_quadrants() {
    let fixture = SetFixture::new();
    fixture.complete_set("0001");
    let router = create_router(fixture.service(), RouterConfig::new());

    for code in ["tl", "tr", "bl", "br"] {
        let request = Request::builder()
            .uri(format!("/api/image-preview/0001/{}", code))
            .body(Body::empty())
            .unwrap();

        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "quadrant {}", code);
    }
}

#[tokio::test]
async fn test_cache_hit_header() {
    let fixture = SetFixture::new();
    fixture.complete_set("0001");
    let router = create_router(fixture.service(), RouterConfig::new());

    // First request - cache miss
    let request1 = Request::builder()
        .uri("/api/image-preview/0001/tr")
        .body(Body::empty())
        .unwrap();

    let response1 = router.clone().oneshot(request1).await.unwrap();
    assert_eq!(response1.status(), StatusCode::OK);
    assert_eq!(
        response1.headers().get("x-image-cache-hit").unwrap(),
        "false"
    );

    // Second request - cache hit
    let request2 = Request::builder()
        .uri("/api/image-preview/0001/tr")
        .body(Body::empty())
        .unwrap();

    let response2 = router.oneshot(request2).await.unwrap();
    assert_eq!(response2.status(), StatusCode::OK);
    assert_eq!(
        response2.headers().get("x-image-cache-hit").unwrap(),
        "true"
    );
}

#[tokio::test]
async fn test_normalize_fallback_header_false_for_rgb() {
    let fixture = SetFixture::new();
    fixture.complete_set("0001");
    let router = create_router(fixture.service(), RouterConfig::new());

    let request = Request::builder()
        .uri("/api/image-preview/0001/bl")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-normalize-fallback").unwrap(),
        "false"
    );
}

#[tokio::test]
async fn test_cache_max_age_header() {
    let fixture = SetFixture::new();
    fixture.complete_set("0001");
    let config = RouterConfig::new().with_cache_max_age(60);
    let router = create_router(fixture.service(), config);

    let request = Request::builder()
        .uri("/api/image-preview/0001/tl")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get("cache-control").unwrap(),
        "public, max-age=60"
    );
}

// =============================================================================
// Error Cases
// =============================================================================

#[tokio::test]
async fn test_preview_unknown_set() {
    let fixture = SetFixture::new();
    fixture.complete_set("0001");
    let router = create_router(fixture.service(), RouterConfig::new());

    let request = Request::builder()
        .uri("/api/image-preview/9999/tl")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["error"], "not_found");
}

#[tokio::test]
async fn test_preview_invalid_quadrant() {
    let fixture = SetFixture::new();
    fixture.complete_set("0001");
    let router = create_router(fixture.service(), RouterConfig::new());

    let request = Request::builder()
        .uri("/api/image-preview/0001/xx")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["error"], "invalid_quadrant");
}

#[tokio::test]
async fn test_preview_partial_set_not_served() {
    // A key whose variant outputs are missing is never discovered, so a
    // preview request for its (existing) reference quadrant still 404s.
    let fixture = SetFixture::new();
    fixture.partial_set("0050");
    let router = create_router(fixture.service(), RouterConfig::new());

    let request = Request::builder()
        .uri("/api/image-preview/0050/tl")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
