//! Integration tests for the 3D product viewer.
//!
//! The scene is rebuilt from the session snapshot on every request, so these
//! tests cover both the in-request behavior (swatches, controls, pointer
//! interactions) and what survives between requests.

use axum::http::StatusCode;

use shopverse_integration_tests::{TestApp, body_text, coin_balance, header_text};

// ============================================================================
// Viewer page
// ============================================================================

#[tokio::test]
async fn test_viewer_page_renders_product_and_scene() {
    let mut app = TestApp::new();

    let response = app.get("/viewer/3").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Modern L-Shaped Sofa"));
    assert!(body.contains(r#"id="viewer-scene""#));
    assert!(body.contains("Place this furniture in your room"));
    assert!(body.contains("Camera distance 5.0"));

    // Opening the viewer awards coins before the page renders.
    assert_eq!(coin_balance(&body), 1260);

    // The default runtime cannot present, so the fragment shows guidance.
    assert!(body.contains("AR Not Supported"));
    assert!(body.contains("Learn More About WebXR"));
}

#[tokio::test]
async fn test_viewer_rejects_products_without_a_model() {
    let mut app = TestApp::new();

    let response = app.get("/viewer/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Product 7 exists but ships no 3D asset.
    let response = app.get("/viewer/7").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_viewer_rejects_malformed_ids() {
    let mut app = TestApp::new();

    let response = app.get("/viewer/not-a-number").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Color customization
// ============================================================================

#[tokio::test]
async fn test_swatch_applies_a_palette_color() {
    let mut app = TestApp::new();

    let response = app
        .post_form_htmx("/viewer/3/color", "color=%23ff0000")
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header_text(&response, "hx-trigger"),
        Some("coins-updated, analytics-updated")
    );

    let body = body_text(response).await;
    assert!(body.contains("--model-color: #ff0000"));
    assert!(body.contains("is-selected"));

    let balance = body_text(app.get_htmx("/rewards/balance").await).await;
    assert_eq!(coin_balance(&balance), 1255);
}

#[tokio::test]
async fn test_selected_color_survives_to_the_next_page_load() {
    let mut app = TestApp::new();

    app.post_form_htmx("/viewer/3/color", "color=%230000ff")
        .await;

    let body = body_text(app.get("/viewer/3").await).await;
    assert!(body.contains("--model-color: #0000ff"));
}

#[tokio::test]
async fn test_color_must_come_from_the_palette() {
    let mut app = TestApp::new();

    // Well-formed hex, but not a swatch.
    let response = app
        .post_form_htmx("/viewer/3/color", "color=%23123456")
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Invalid color value");

    let response = app.post_form_htmx("/viewer/3/color", "color=red").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Controls & interactions
// ============================================================================

#[tokio::test]
async fn test_zoom_control_moves_the_camera() {
    let mut app = TestApp::new();

    let response = app
        .post_form_htmx("/viewer/3/control", "action=zoom_in")
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Camera distance 4.0"));

    let response = app
        .post_form_htmx("/viewer/3/control", "action=reset")
        .await;
    assert!(body_text(response).await.contains("Camera distance 5.0"));
}

#[tokio::test]
async fn test_animate_control_toggles_rotation() {
    let mut app = TestApp::new();

    let body = body_text(app.get("/viewer/3").await).await;
    assert!(body.contains("is-rotating"));
    assert!(body.contains("Pause Rotation"));

    let response = app
        .post_form_htmx("/viewer/3/control", "action=animate")
        .await;
    let body = body_text(response).await;
    assert!(!body.contains("is-rotating"));
    assert!(body.contains("Auto Rotate"));
}

#[tokio::test]
async fn test_unknown_control_is_rejected() {
    let mut app = TestApp::new();

    let response = app
        .post_form_htmx("/viewer/3/control", "action=teleport")
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Unknown viewer control");
}

#[tokio::test]
async fn test_model_click_freezes_rotation() {
    let mut app = TestApp::new();

    let response = app
        .post_form_htmx("/viewer/3/interaction", "action=click")
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(!body.contains("is-rotating"));
    assert!(body.contains("click to resume"));

    // A second click resumes.
    let response = app
        .post_form_htmx("/viewer/3/interaction", "action=click")
        .await;
    assert!(body_text(response).await.contains("is-rotating"));
}

#[tokio::test]
async fn test_unknown_interaction_is_rejected() {
    let mut app = TestApp::new();

    let response = app
        .post_form_htmx("/viewer/3/interaction", "action=wiggle")
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Fallback & close
// ============================================================================

#[tokio::test]
async fn test_plain_command_posts_redirect_to_the_viewer_page() {
    let mut app = TestApp::new();

    let response = app.post_form("/viewer/3/color", "color=%2300ff00").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(header_text(&response, "location"), Some("/viewer/3"));
}

#[tokio::test]
async fn test_close_returns_home() {
    let mut app = TestApp::new();
    app.get("/viewer/3").await;

    let response = app.post_form("/viewer/3/close", "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(header_text(&response, "location"), Some("/"));
}
