//! Integration tests for AR sessions, VR intents, and sharing.
//!
//! AR flows run against a scripted XR runtime that feeds hit-test poses on
//! demand, so the reticle and placement behavior is deterministic. The
//! default runtime covers the unsupported-device path.

use std::sync::Arc;

use axum::http::StatusCode;

use shopverse_core::viewer::{HitPose, ScriptedXrRuntime};
use shopverse_integration_tests::{TestApp, body_text, coin_balance, header_text};

/// App whose XR runtime will report three hit-test poses.
fn ar_capable_app() -> TestApp {
    TestApp::with_xr(Arc::new(ScriptedXrRuntime::with_hits([
        HitPose::from_translation(0.0, 0.0, -1.0),
        HitPose::from_translation(0.5, 0.0, -1.5),
        HitPose::from_translation(1.0, 0.0, -2.0),
    ])))
}

// ============================================================================
// AR session lifecycle
// ============================================================================

#[tokio::test]
async fn test_ar_flow_places_and_repositions_the_model() {
    let mut app = ar_capable_app();

    // Enter: the session starts presenting and the first hit sets a reticle.
    let response = app.post_form_htmx("/viewer/3/ar/enter", "").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header_text(&response, "hx-trigger"),
        Some("coins-updated, analytics-updated")
    );
    let body = body_text(response).await;
    assert!(body.contains("AR Session Active"));
    assert!(body.contains("Surface detected"));
    assert!(body.contains("Place Here"));

    // Place: anchors the model at the reticle.
    let response = app.post_form_htmx("/viewer/3/ar/place", "").await;
    assert_eq!(
        header_text(&response, "hx-trigger"),
        Some("analytics-updated")
    );
    let body = body_text(response).await;
    assert!(body.contains("Model placed in your room"));
    assert!(body.contains("Reposition"));

    // Reset: back to the reticle flow, next hit re-arms placement.
    let response = app.post_form_htmx("/viewer/3/ar/reset", "").await;
    let body = body_text(response).await;
    assert!(body.contains("Surface detected"));
    assert!(body.contains("Place Here"));

    // Exit: back to the inline preview with the AR entry point.
    let response = app.post_form_htmx("/viewer/3/ar/exit", "").await;
    let body = body_text(response).await;
    assert!(!body.contains("AR Session Active"));
    assert!(body.contains("View in Your Space (AR)"));

    // Only starting the session is rewarded.
    let balance = body_text(app.get_htmx("/rewards/balance").await).await;
    assert_eq!(coin_balance(&balance), 1270);
}

#[tokio::test]
async fn test_ar_session_survives_between_requests() {
    let mut app = ar_capable_app();

    app.post_form_htmx("/viewer/3/ar/enter", "").await;

    // A full page load restores the presenting session from the snapshot.
    let body = body_text(app.get("/viewer/3").await).await;
    assert!(body.contains("AR Session Active"));
}

#[tokio::test]
async fn test_unsupported_runtime_renders_remediation() {
    let mut app = TestApp::new();

    let response = app.post_form_htmx("/viewer/3/ar/enter", "").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("AR Not Supported"));
    assert!(body.contains("immersive AR is not supported on this device"));
    assert!(body.contains("Chrome on Android with ARCore"));
    assert!(body.contains("Learn More About WebXR"));

    // A session that never started earns nothing.
    let balance = body_text(app.get_htmx("/rewards/balance").await).await;
    assert_eq!(coin_balance(&balance), 1250);
}

// ============================================================================
// VR intent
// ============================================================================

#[tokio::test]
async fn test_vr_intent_returns_the_banner_and_coins() {
    let mut app = TestApp::new();

    let response = app.post_form_htmx("/viewer/3/vr", "").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header_text(&response, "hx-trigger"),
        Some("coins-updated, analytics-updated")
    );
    let body = body_text(response).await;
    assert!(body.contains("VR view of Modern L-Shaped Sofa coming soon"));

    let balance = body_text(app.get_htmx("/rewards/balance").await).await;
    assert_eq!(coin_balance(&balance), 1265);
}

#[tokio::test]
async fn test_vr_intent_requires_a_vr_product() {
    let mut app = TestApp::new();

    // Product 2 has AR but no VR experience.
    let response = app.post_form_htmx("/viewer/2/vr", "").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Sharing
// ============================================================================

#[tokio::test]
async fn test_share_returns_the_link_panel() {
    let mut app = TestApp::new();

    let response = app.post_form_htmx("/viewer/3/share", "").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("AR experience shared!"));
    assert!(body.contains("http://localhost:3000/viewer/3"));

    let balance = body_text(app.get_htmx("/rewards/balance").await).await;
    assert_eq!(coin_balance(&balance), 1265);
}

#[tokio::test]
async fn test_share_without_htmx_redirects_to_the_viewer() {
    let mut app = TestApp::new();

    let response = app.post_form("/viewer/3/share", "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(header_text(&response, "location"), Some("/viewer/3"));
}
