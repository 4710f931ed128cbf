//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (category/q query params)
//! GET  /health                 - Health check
//!
//! # Theme
//! POST /theme/toggle           - Dark mode flip, redirects back
//!
//! # Cart (HTMX fragments)
//! POST /cart/add               - Merge-add a line, +5 coins (count fragment)
//! POST /cart/update            - Set a line quantity (0 removes)
//! POST /cart/remove            - Remove a line
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Viewer
//! GET  /viewer/{id}            - Viewer page, +10 coins
//! POST /viewer/{id}/color      - Apply a palette swatch, +5 coins
//! POST /viewer/{id}/control    - Control strip action, +1 coin
//! POST /viewer/{id}/interaction - Click/hover on the model, +2 coins
//! POST /viewer/{id}/ar/enter   - Start an immersive session, +20 coins
//! POST /viewer/{id}/ar/place   - Anchor the model at the reticle
//! POST /viewer/{id}/ar/reset   - Back to reticle placement
//! POST /viewer/{id}/ar/exit    - End the immersive session
//! POST /viewer/{id}/vr         - VR view intent, +15 coins
//! POST /viewer/{id}/share      - Share the AR experience, +15 coins
//! POST /viewer/{id}/close      - Close the viewer, back home
//!
//! # Rewards (HTMX fragments)
//! GET  /rewards/panel          - Rewards panel (fragment)
//! GET  /rewards/balance        - Header coin badge (fragment)
//! POST /rewards/spin           - Daily spin, 1-500 coins
//!
//! # Analytics
//! GET  /analytics/dashboard    - Engagement dashboard (fragment)
//! POST /analytics/visibility   - Page visibility beacon
//!
//! # Auth (mock session)
//! POST /auth/login             - Sign in as the demo user
//! POST /auth/logout            - Sign out
//! ```

pub mod analytics;
pub mod auth;
pub mod cart;
pub mod home;
pub mod rewards;
pub mod theme;
pub mod viewer;

use axum::{
    Router,
    http::HeaderMap,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the viewer routes router.
pub fn viewer_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(viewer::show))
        .route("/{id}/color", post(viewer::set_color))
        .route("/{id}/control", post(viewer::control))
        .route("/{id}/interaction", post(viewer::interaction))
        .route("/{id}/ar/enter", post(viewer::enter_ar))
        .route("/{id}/ar/place", post(viewer::place))
        .route("/{id}/ar/reset", post(viewer::reset_placement))
        .route("/{id}/ar/exit", post(viewer::exit_ar))
        .route("/{id}/vr", post(viewer::vr_view))
        .route("/{id}/share", post(viewer::share))
        .route("/{id}/close", post(viewer::close))
}

/// Create the rewards routes router.
pub fn rewards_routes() -> Router<AppState> {
    Router::new()
        .route("/panel", get(rewards::panel))
        .route("/balance", get(rewards::balance))
        .route("/spin", post(rewards::spin))
}

/// Create the analytics routes router.
pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(analytics::dashboard))
        .route("/visibility", post(analytics::visibility))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Theme toggle
        .route("/theme/toggle", post(theme::toggle))
        // Cart routes
        .nest("/cart", cart_routes())
        // Viewer routes
        .nest("/viewer", viewer_routes())
        // Rewards routes
        .nest("/rewards", rewards_routes())
        // Analytics routes
        .nest("/analytics", analytics_routes())
        // Auth routes
        .nest("/auth", auth_routes())
}

// =============================================================================
// Shared Request Helpers
// =============================================================================

/// Whether the request came from HTMX.
///
/// HTMX requests get fragments; plain form posts get a redirect so the
/// storefront still works without client-side script.
pub(crate) fn is_htmx(headers: &HeaderMap) -> bool {
    headers.contains_key("hx-request")
}

/// The path to send a plain form post back to.
///
/// Only the path and query of the Referer are kept, so the redirect can
/// never leave the site. Falls back to the home page.
pub(crate) fn back_path(headers: &HeaderMap) -> String {
    headers
        .get(axum::http::header::REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(|referer| url::Url::parse(referer).ok())
        .map_or_else(
            || "/".to_owned(),
            |url| match url.query() {
                Some(query) => format!("{}?{query}", url.path()),
                None => url.path().to_owned(),
            },
        )
}
