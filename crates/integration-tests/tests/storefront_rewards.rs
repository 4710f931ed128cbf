//! Integration tests for ShopCoins rewards and the engagement dashboard.
//!
//! The coin schedule is the heart of the gamification loop, so the accrual
//! test walks one session through every rewarded interaction and checks the
//! final balance against the schedule by hand.

use axum::http::StatusCode;
use serde_json::json;

use shopverse_integration_tests::{TestApp, body_text, coin_balance, header_text};

/// Balance shown on a rendered rewards panel.
fn panel_balance(body: &str) -> i64 {
    body.split(r#"class="balance-value">"#)
        .nth(1)
        .and_then(|rest| rest.split('<').next())
        .and_then(|digits| digits.trim().parse().ok())
        .unwrap_or_else(|| panic!("no balance card in body: {body}"))
}

// ============================================================================
// Coin accrual
// ============================================================================

#[tokio::test]
async fn test_engagement_accrues_coins_across_the_session() {
    let mut app = TestApp::new();

    // 1250 seed + 10 for opening the viewer.
    app.get("/viewer/3").await;
    // +5 color customization.
    app.post_form_htmx("/viewer/3/color", "color=%23ff0000")
        .await;
    // +1 control press.
    app.post_form_htmx("/viewer/3/control", "action=zoom_in")
        .await;
    // +2 model interaction.
    app.post_form_htmx("/viewer/3/interaction", "action=click")
        .await;
    // +5 cart addition.
    app.post_form_htmx("/cart/add", "product_id=3").await;
    // +15 share.
    app.post_form_htmx("/viewer/3/share", "").await;
    // +15 VR intent.
    app.post_form_htmx("/viewer/3/vr", "").await;

    let balance = body_text(app.get_htmx("/rewards/balance").await).await;
    assert_eq!(coin_balance(&balance), 1303);
}

#[tokio::test]
async fn test_rewards_panel_shows_progress_and_activities() {
    let mut app = TestApp::new();

    let body = body_text(app.get_htmx("/rewards/panel").await).await;
    assert_eq!(panel_balance(&body), 1250);
    assert!(body.contains("No activities yet"));
    assert!(body.contains("Win up to 500 coins"));

    app.post_form_htmx("/viewer/3/color", "color=%23ff0000")
        .await;

    let body = body_text(app.get_htmx("/rewards/panel").await).await;
    assert_eq!(panel_balance(&body), 1255);
    assert!(body.contains("3745 coins to Platinum"));
    assert!(body.contains("Customized Modern L-Shaped Sofa color"));
    assert!(body.contains("+5"));
}

#[tokio::test]
async fn test_rewards_panel_asks_visitors_to_sign_in() {
    let mut app = TestApp::new();

    app.post_form("/auth/logout", "").await;

    let body = body_text(app.get_htmx("/rewards/panel").await).await;
    assert!(body.contains("Sign in to earn ShopCoins"));
    assert!(body.contains("Sign In"));
}

// ============================================================================
// Daily spin
// ============================================================================

#[tokio::test]
async fn test_daily_spin_awards_within_bounds() {
    let mut app = TestApp::new();

    let response = app.post_form_htmx("/rewards/spin", "").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header_text(&response, "hx-trigger"),
        Some("coins-updated, analytics-updated")
    );

    let body = body_text(response).await;
    let balance = panel_balance(&body);
    assert!(
        (1251..=1750).contains(&balance),
        "spin of {} coins is out of range",
        balance - 1250
    );
    assert!(body.contains("Daily Spin reward"));
}

#[tokio::test]
async fn test_daily_spin_redirects_plain_posts_back() {
    let mut app = TestApp::new();

    let response = app
        .post_form_from("/rewards/spin", "", "http://localhost:3000/?category=apparel")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        header_text(&response, "location"),
        Some("/?category=apparel")
    );
}

// ============================================================================
// Analytics
// ============================================================================

#[tokio::test]
async fn test_dashboard_counts_the_event_mix() {
    let mut app = TestApp::new();

    // Scene load + viewer open, then one cart addition.
    app.get("/viewer/3").await;
    app.post_form_htmx("/cart/add", "product_id=3").await;

    let body = body_text(app.get_htmx("/analytics/dashboard").await).await;
    assert!(body.contains(r#"class="total-value">3<"#));
    // "add_to_cart" carries the "ar" substring, so it counts as an AR view
    // alongside the viewer-open event.
    assert!(body.contains("width: 100%; background: #8b5cf6"));
    assert!(body.contains("width: 50%; background: #f59e0b"));
    assert!(body.contains("33.3%"));
    assert!(body.contains("Add To Cart"));
}

#[tokio::test]
async fn test_visibility_beacon_records_quietly() {
    let mut app = TestApp::new();

    let response = app
        .post_json("/analytics/visibility", &json!({ "hidden": true }))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let body = body_text(app.get_htmx("/analytics/dashboard").await).await;
    assert!(body.contains(r#"class="total-value">1<"#));
    assert!(body.contains("Page Visibility Changed"));
}
