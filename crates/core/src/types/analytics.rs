//! Engagement analytics events and derived statistics.
//!
//! Event kinds stay free-form strings (the [`kinds`] constants cover every
//! kind this codebase emits), while payloads are a closed union validated
//! where events are created. Statistics are derived by the same substring
//! matching the dashboard has always used, quirks included.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::id::ProductId;

/// Event kinds emitted by this codebase.
///
/// Emit sites must use these constants; inbound kinds from forms are checked
/// against them before an event is recorded.
pub mod kinds {
    pub const APP_INITIALIZED: &str = "app_initialized";
    pub const PAGE_VISIBILITY_CHANGED: &str = "page_visibility_changed";
    pub const ADD_TO_CART: &str = "add_to_cart";
    pub const VR_VIEW_INITIATED: &str = "vr_view_initiated";
    pub const AR_VIEWER_OPENED: &str = "ar_viewer_opened";
    pub const AR_VIEWER_CLOSED: &str = "ar_viewer_closed";
    pub const COLOR_CUSTOMIZATION: &str = "color_customization";
    pub const MODEL_INTERACTION: &str = "model_interaction";
    pub const CONTROL: &str = "control";
    pub const SCENE_LOADED: &str = "3d_scene_loaded";
    pub const AR_SESSION_STARTED: &str = "ar_session_started";
    pub const AR_SESSION_ENDED: &str = "ar_session_ended";
    pub const AR_PLACEMENT: &str = "ar_placement";
    pub const AR_RESET: &str = "ar_reset";
    pub const SHARE_AR_EXPERIENCE: &str = "share_ar_experience";
    pub const DAILY_SPIN: &str = "daily_spin";
}

/// Structured payload attached to an event.
///
/// One variant per payload shape; the event kind selects which shape an emit
/// site uses. `Empty` covers kinds that carry nothing beyond their name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "schema", rename_all = "snake_case")]
pub enum EventPayload {
    /// `app_initialized`: client context captured on the first request.
    Lifecycle { user_agent: Option<String> },
    /// `page_visibility_changed`: the document visibility beacon.
    Visibility { hidden: bool },
    /// `add_to_cart` / `vr_view_initiated`: which product was acted on.
    Product {
        product_id: ProductId,
        product_name: String,
        price: Option<Decimal>,
        category: Option<String>,
    },
    /// Viewer open/close/load kinds: what the viewer was showing.
    Viewer {
        product_name: String,
        ar_kind: Option<String>,
        model: Option<String>,
    },
    /// `color_customization`: the swatch that was applied.
    Customization { value: String },
    /// `control`: which viewer control was used.
    Control { action: String },
    /// `model_interaction`: pointer activity on the 3D model. Hover carries
    /// no color.
    Interaction {
        action: String,
        model: String,
        color: Option<String>,
    },
    /// `ar_placement` / `ar_reset`: placement lifecycle.
    Placement { action: String },
    #[default]
    Empty,
}

/// One engagement event in the session's analytics log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub id: Uuid,
    pub kind: String,
    #[serde(default)]
    pub payload: EventPayload,
    pub at: DateTime<Utc>,
}

impl AnalyticsEvent {
    #[must_use]
    pub fn new(kind: impl Into<String>, payload: EventPayload, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: kind.into(),
            payload,
            at,
        }
    }
}

/// Aggregates the dashboard renders.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnalyticsStats {
    pub ar_views: usize,
    pub vr_views: usize,
    pub customizations: usize,
    pub cart_additions: usize,
    pub total_interactions: usize,
    /// Cart additions per interaction, as a percentage. Defined as 0 for an
    /// empty log.
    pub conversion_rate: f64,
}

impl AnalyticsStats {
    /// Derive the dashboard counters from the event log.
    ///
    /// Category counts match on substrings of the kind, so kinds that merely
    /// contain "ar" (including `add_to_cart`) count as AR views. That is the
    /// long-standing dashboard behavior and is pinned by tests.
    #[must_use]
    pub fn from_events(events: &[AnalyticsEvent]) -> Self {
        let total_interactions = events.len();
        let ar_views = events.iter().filter(|e| e.kind.contains("ar")).count();
        let vr_views = events.iter().filter(|e| e.kind.contains("vr")).count();
        let customizations = events
            .iter()
            .filter(|e| e.kind.contains("customization"))
            .count();
        let cart_additions = events
            .iter()
            .filter(|e| e.kind == kinds::ADD_TO_CART)
            .count();
        let conversion_rate = if total_interactions == 0 {
            0.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            {
                cart_additions as f64 / total_interactions as f64 * 100.0
            }
        };
        Self {
            ar_views,
            vr_views,
            customizations,
            cart_additions,
            total_interactions,
            conversion_rate,
        }
    }
}
