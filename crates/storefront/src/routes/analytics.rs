//! Engagement analytics route handlers.
//!
//! The dashboard fragment other endpoints refresh through the
//! `analytics-updated` trigger, plus the page-visibility beacon the
//! frontend fires on tab changes.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use shopverse_core::store::StoreState;
use shopverse_core::types::{AnalyticsStats, EventPayload, kinds};

use crate::error::Result;
use crate::filters;
use crate::models::session::{load_store, record_engagement};

/// Events shown in the dashboard's recent feed.
const RECENT_EVENTS: usize = 5;

// =============================================================================
// View Models
// =============================================================================

/// One bar in the engagement breakdown.
#[derive(Clone)]
pub struct BarView {
    pub label: &'static str,
    pub value: usize,
    /// Width relative to the largest bar.
    pub percent: usize,
    pub color: &'static str,
}

/// One entry in the recent-events feed.
#[derive(Clone)]
pub struct EventView {
    pub kind: String,
    /// Wall-clock time, preformatted for the feed.
    pub time: String,
}

/// Analytics dashboard display data.
#[derive(Clone)]
pub struct AnalyticsView {
    pub stats: AnalyticsStats,
    /// Conversion rate preformatted to one decimal place.
    pub conversion_display: String,
    pub bars: Vec<BarView>,
    pub recent: Vec<EventView>,
}

impl AnalyticsView {
    pub fn from_state(state: &StoreState) -> Self {
        let stats = state.analytics_stats();
        let counts = [
            ("AR Views", stats.ar_views, "#8b5cf6"),
            ("VR Views", stats.vr_views, "#3b82f6"),
            ("Customizations", stats.customizations, "#10b981"),
            ("Cart Additions", stats.cart_additions, "#f59e0b"),
        ];
        let max = counts
            .iter()
            .map(|(_, value, _)| *value)
            .max()
            .unwrap_or(0)
            .max(1);
        let bars = counts
            .into_iter()
            .map(|(label, value, color)| BarView {
                label,
                value,
                percent: value * 100 / max,
                color,
            })
            .collect();
        let recent = state
            .analytics_events
            .iter()
            .take(RECENT_EVENTS)
            .map(|event| EventView {
                kind: event.kind.clone(),
                time: event.at.format("%H:%M:%S").to_string(),
            })
            .collect();

        Self {
            stats,
            conversion_display: format!("{:.1}", stats.conversion_rate),
            bars,
            recent,
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Analytics dashboard fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/analytics_panel.html")]
pub struct AnalyticsPanelTemplate {
    pub analytics: AnalyticsView,
}

// =============================================================================
// Handlers
// =============================================================================

/// Get the analytics dashboard (HTMX).
#[instrument(skip(session))]
pub async fn dashboard(session: Session) -> impl IntoResponse {
    let store = load_store(&session).await;
    AnalyticsPanelTemplate {
        analytics: AnalyticsView::from_state(&store),
    }
}

/// Beacon payload sent by the frontend on `visibilitychange`.
#[derive(Debug, Deserialize)]
pub struct VisibilityBeacon {
    pub hidden: bool,
}

/// Record a page-visibility change.
///
/// Fired by `navigator.sendBeacon`, which ignores the response body, so
/// this returns an empty 204.
#[instrument(skip(session))]
pub async fn visibility(
    session: Session,
    Json(beacon): Json<VisibilityBeacon>,
) -> Result<StatusCode> {
    let mut store = load_store(&session).await;
    record_engagement(
        &session,
        &mut store,
        kinds::PAGE_VISIBILITY_CHANGED,
        EventPayload::Visibility {
            hidden: beacon.hidden,
        },
        None,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shopverse_core::store::Action;

    fn record(state: &mut StoreState, kind: &str) {
        state.dispatch(
            Action::RecordEvent {
                kind: kind.to_owned(),
                payload: EventPayload::Empty,
            },
            Utc::now(),
        );
    }

    #[test]
    fn test_bars_scale_against_the_largest_count() {
        let mut state = StoreState::default();
        record(&mut state, kinds::AR_VIEWER_OPENED);
        record(&mut state, kinds::AR_VIEWER_OPENED);
        record(&mut state, kinds::ADD_TO_CART);

        let view = AnalyticsView::from_state(&state);
        // add_to_cart counts toward AR views too (substring match on "ar").
        assert_eq!(view.bars[0].label, "AR Views");
        assert_eq!(view.bars[0].value, 3);
        assert_eq!(view.bars[0].percent, 100);
        assert_eq!(view.bars[3].label, "Cart Additions");
        assert_eq!(view.bars[3].value, 1);
        assert_eq!(view.bars[3].percent, 33);
    }

    #[test]
    fn test_empty_state_renders_without_dividing_by_zero() {
        let view = AnalyticsView::from_state(&StoreState::default());
        assert!(view.bars.iter().all(|bar| bar.percent == 0));
        assert_eq!(view.conversion_display, "0.0");
        assert!(view.recent.is_empty());
    }

    #[test]
    fn test_recent_feed_keeps_the_newest_events() {
        let mut state = StoreState::default();
        for i in 0..7 {
            record(&mut state, &format!("event_{i}"));
        }
        let view = AnalyticsView::from_state(&state);
        assert_eq!(view.recent.len(), RECENT_EVENTS);
        assert_eq!(view.recent[0].kind, "event_6");
    }
}
