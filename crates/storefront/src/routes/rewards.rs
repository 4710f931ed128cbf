//! Rewards route handlers.
//!
//! The rewards panel, the header coin badge, and the daily spin. The panel
//! and badge are HTMX fragments other endpoints refresh through the
//! `coins-updated` trigger.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use shopverse_core::store::{Action, StoreState};
use shopverse_core::types::{ActivityKind, EventPayload, RewardActivity, kinds};

use crate::error::Result;
use crate::models::session::{apply_actions, load_store};
use crate::rewards::{DAILY_SPIN_MAX, daily_spin};
use crate::routes::{back_path, is_htmx};

/// Activities shown in the panel's recent feed.
const RECENT_ACTIVITIES: usize = 5;

// =============================================================================
// View Models
// =============================================================================

/// One entry in the recent-activities feed.
#[derive(Clone)]
pub struct ActivityView {
    pub earned: bool,
    pub description: String,
    pub amount: i64,
}

impl From<&RewardActivity> for ActivityView {
    fn from(activity: &RewardActivity) -> Self {
        Self {
            earned: activity.kind == ActivityKind::Earned,
            description: activity.description.clone(),
            amount: activity.amount,
        }
    }
}

/// Rewards panel display data.
#[derive(Clone)]
pub struct RewardsPanelView {
    /// False renders the sign-in prompt instead of the balance.
    pub signed_in: bool,
    pub coins: i64,
    pub tier: String,
    pub next_tier: Option<String>,
    pub coins_to_next: i64,
    /// Progress-bar width toward the next tier.
    pub progress_percent: u32,
    pub activities: Vec<ActivityView>,
    /// Upper bound of the daily spin, for the quick-action copy.
    pub spin_max: i64,
}

impl RewardsPanelView {
    pub fn from_state(state: &StoreState) -> Self {
        let activities = state
            .reward_activities
            .iter()
            .take(RECENT_ACTIVITIES)
            .map(ActivityView::from)
            .collect();

        match state.user.as_ref().filter(|_| state.is_authenticated) {
            Some(user) => {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let progress_percent = user.tier_progress_percent() as u32;
                Self {
                    signed_in: true,
                    coins: user.shop_coins,
                    tier: user.tier.to_string(),
                    next_tier: user.tier.next().map(|tier| tier.to_string()),
                    coins_to_next: user.coins_to_next_tier(),
                    progress_percent,
                    activities,
                    spin_max: DAILY_SPIN_MAX,
                }
            }
            None => Self {
                signed_in: false,
                coins: 0,
                tier: String::new(),
                next_tier: None,
                coins_to_next: 0,
                progress_percent: 0,
                activities,
                spin_max: DAILY_SPIN_MAX,
            },
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Rewards panel fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/rewards_panel.html")]
pub struct RewardsPanelTemplate {
    pub rewards: RewardsPanelView,
}

/// Header coin badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/coin_badge.html")]
pub struct CoinBadgeTemplate {
    pub coins: i64,
}

// =============================================================================
// Handlers
// =============================================================================

/// Get the rewards panel (HTMX).
#[instrument(skip(session))]
pub async fn panel(session: Session) -> impl IntoResponse {
    let store = load_store(&session).await;
    RewardsPanelTemplate {
        rewards: RewardsPanelView::from_state(&store),
    }
}

/// Get the header coin badge (HTMX).
#[instrument(skip(session))]
pub async fn balance(session: Session) -> impl IntoResponse {
    let store = load_store(&session).await;
    CoinBadgeTemplate {
        coins: store.coin_balance(),
    }
}

/// Run the daily spin (HTMX).
///
/// Draws a uniform 1..=500 coin award, records the spin event, and returns
/// the refreshed panel so the new activity shows immediately.
#[instrument(skip(session, headers))]
pub async fn spin(session: Session, headers: HeaderMap) -> Result<Response> {
    let reward = daily_spin(&mut rand::rng());
    tracing::debug!(coins = reward.coins, "daily spin rolled");

    let mut store = load_store(&session).await;
    apply_actions(
        &session,
        &mut store,
        [
            Action::RecordEvent {
                kind: kinds::DAILY_SPIN.to_owned(),
                payload: EventPayload::Empty,
            },
            Action::AdjustCoins {
                delta: reward.coins,
                description: reward.description,
            },
        ],
    )
    .await?;

    if is_htmx(&headers) {
        Ok((
            AppendHeaders([("HX-Trigger", "coins-updated, analytics-updated")]),
            RewardsPanelTemplate {
                rewards: RewardsPanelView::from_state(&store),
            },
        )
            .into_response())
    } else {
        Ok(Redirect::to(&back_path(&headers)).into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_panel_view_tracks_tier_progress() {
        let state = StoreState::default();
        let view = RewardsPanelView::from_state(&state);
        assert!(view.signed_in);
        assert_eq!(view.coins, 1_250);
        assert_eq!(view.tier, "Gold");
        assert_eq!(view.next_tier.as_deref(), Some("Platinum"));
        assert_eq!(view.coins_to_next, 3_750);
        // 1250 / 5000 of the way to Platinum.
        assert_eq!(view.progress_percent, 25);
    }

    #[test]
    fn test_panel_view_caps_the_activity_feed() {
        let mut state = StoreState::default();
        for i in 0..8 {
            state.dispatch(
                Action::AdjustCoins {
                    delta: i + 1,
                    description: format!("entry {i}"),
                },
                Utc::now(),
            );
        }
        let view = RewardsPanelView::from_state(&state);
        assert_eq!(view.activities.len(), RECENT_ACTIVITIES);
        assert_eq!(view.activities[0].amount, 8);
        assert!(view.activities[0].earned);
    }

    #[test]
    fn test_panel_view_signed_out_keeps_safe_defaults() {
        let mut state = StoreState::default();
        state.dispatch(Action::Logout, Utc::now());
        let view = RewardsPanelView::from_state(&state);
        assert!(!view.signed_in);
        assert_eq!(view.coins, 0);
        assert_eq!(view.progress_percent, 0);
    }
}
