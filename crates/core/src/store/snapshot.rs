//! Versioned persistence codec for the store.
//!
//! One namespaced record holds the whitelisted subset of the state. Decoding
//! never fails outward: malformed records, records from a newer schema, and
//! records needing migration all come back as a usable state plus a
//! [`Capability`] describing what happened.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::capability::Capability;
use crate::store::StoreState;
use crate::types::{AnalyticsEvent, CartItem, RewardActivity, User};

/// Key the record is stored under, wherever the host keeps records.
pub const STORE_RECORD_KEY: &str = "shopverse-store";

/// Current schema version. v1 predates the loyalty and analytics logs.
pub const SCHEMA_VERSION: u32 = 2;

/// The persisted subset of [`StoreState`].
///
/// Collection fields default so records written before a field existed
/// rehydrate with empty lists instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub version: u32,
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default)]
    pub cart_items: Vec<CartItem>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub is_authenticated: bool,
    #[serde(default)]
    pub reward_activities: Vec<RewardActivity>,
    #[serde(default)]
    pub analytics_events: Vec<AnalyticsEvent>,
}

impl StoreSnapshot {
    /// Capture the persisted subset of `state` at the current version.
    #[must_use]
    pub fn capture(state: &StoreState) -> Self {
        Self {
            version: SCHEMA_VERSION,
            dark_mode: state.dark_mode,
            cart_items: state.cart_items.clone(),
            user: state.user.clone(),
            is_authenticated: state.is_authenticated,
            reward_activities: state.reward_activities.clone(),
            analytics_events: state.analytics_events.clone(),
        }
    }

    /// Expand into a full state; ephemeral fields take their defaults.
    #[must_use]
    pub fn into_state(self) -> StoreState {
        StoreState {
            dark_mode: self.dark_mode,
            cart_items: self.cart_items,
            user: self.user,
            is_authenticated: self.is_authenticated,
            reward_activities: self.reward_activities,
            analytics_events: self.analytics_events,
            ..StoreState::default()
        }
    }
}

/// The result of loading a persisted record: always a usable state.
#[derive(Debug, Clone, PartialEq)]
pub struct Rehydration {
    pub state: StoreState,
    pub outcome: Capability,
}

impl Rehydration {
    fn fresh() -> Self {
        Self {
            state: StoreState::default(),
            outcome: Capability::Available,
        }
    }

    fn fallback(reason: impl Into<String>) -> Self {
        Self {
            state: StoreState::default(),
            outcome: Capability::degraded(reason),
        }
    }
}

/// Serialize the persisted subset of `state` as the record body.
///
/// # Errors
///
/// Returns the underlying serializer error; callers log it and keep the
/// in-memory state authoritative.
pub fn encode(state: &StoreState) -> Result<String, serde_json::Error> {
    serde_json::to_string(&StoreSnapshot::capture(state))
}

/// Rebuild the state from a raw record, repairing whatever it takes.
///
/// `None` means no record exists yet (a first visit) and is not degradation.
#[must_use]
pub fn rehydrate(raw: Option<&str>) -> Rehydration {
    let Some(raw) = raw else {
        return Rehydration::fresh();
    };

    let mut snapshot = match serde_json::from_str::<StoreSnapshot>(raw) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            warn!(error = %err, "discarding malformed store record");
            return Rehydration::fallback(format!("malformed record: {err}"));
        }
    };

    if snapshot.version > SCHEMA_VERSION {
        warn!(
            version = snapshot.version,
            "store record is from a newer schema"
        );
        return Rehydration::fallback(format!(
            "record schema v{} is newer than v{SCHEMA_VERSION}",
            snapshot.version
        ));
    }

    let mut outcome = Capability::Available;
    if snapshot.version < SCHEMA_VERSION {
        let from = snapshot.version;
        migrate(&mut snapshot);
        outcome = Capability::degraded(format!("migrated record from v{from}"));
    }

    let dropped = drop_empty_lines(&mut snapshot);
    if dropped > 0 {
        warn!(dropped, "dropped zero-quantity cart lines from record");
        if outcome.is_available() {
            outcome = Capability::degraded("repaired cart lines");
        }
    }

    Rehydration {
        state: snapshot.into_state(),
        outcome,
    }
}

/// Bring an older record up to the current schema.
///
/// Serde defaults already backfilled the collections; what remains is the
/// account: v1 records predate the stored user, so one is installed.
fn migrate(snapshot: &mut StoreSnapshot) {
    if snapshot.user.is_none() {
        snapshot.user = Some(User::demo());
        snapshot.is_authenticated = true;
    }
    snapshot.version = SCHEMA_VERSION;
}

fn drop_empty_lines(snapshot: &mut StoreSnapshot) -> usize {
    let before = snapshot.cart_items.len();
    snapshot.cart_items.retain(|line| line.quantity > 0);
    before - snapshot.cart_items.len()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::store::Action;
    use crate::types::{ProductId, Tier};
    use chrono::Utc;

    #[test]
    fn encode_then_rehydrate_round_trips_the_persisted_subset() {
        let catalog = Catalog::demo();
        let mut state = StoreState::default();
        state.dispatch(Action::ToggleDarkMode, Utc::now());
        state.dispatch(
            Action::AddToCart {
                product: catalog.find(ProductId::new(5)).unwrap().clone(),
                quantity: 2,
            },
            Utc::now(),
        );
        state.dispatch(
            Action::AdjustCoins {
                delta: 5,
                description: "Added item to cart".to_owned(),
            },
            Utc::now(),
        );
        // Ephemeral fields must not survive the round trip.
        state.dispatch(Action::SetSearchQuery("kurta".to_owned()), Utc::now());

        let raw = encode(&state).unwrap();
        let rehydrated = rehydrate(Some(&raw));

        assert_eq!(rehydrated.outcome, Capability::Available);
        assert!(rehydrated.state.dark_mode);
        assert_eq!(rehydrated.state.cart_items, state.cart_items);
        assert_eq!(rehydrated.state.reward_activities, state.reward_activities);
        assert_eq!(rehydrated.state.search_query, "");
        assert_eq!(rehydrated.state.selected_category, "all");
    }

    #[test]
    fn no_record_loads_the_default_state_without_degradation() {
        let rehydrated = rehydrate(None);
        assert_eq!(rehydrated.outcome, Capability::Available);
        assert_eq!(rehydrated.state.coin_balance(), 1_250);
        assert!(rehydrated.state.cart_items.is_empty());
    }

    #[test]
    fn malformed_records_fall_back_to_defaults_with_a_degraded_outcome() {
        let rehydrated = rehydrate(Some("{not json"));
        assert!(rehydrated.outcome.is_degraded());
        assert_eq!(rehydrated.state, StoreState::default());

        // Valid JSON of the wrong shape degrades the same way.
        let rehydrated = rehydrate(Some(r#"{"version":"two"}"#));
        assert!(rehydrated.outcome.is_degraded());
    }

    #[test]
    fn v1_records_backfill_collections_and_the_stored_user() {
        let raw = r#"{"version":1,"dark_mode":true}"#;
        let rehydrated = rehydrate(Some(raw));

        assert!(rehydrated.outcome.is_degraded());
        assert!(rehydrated.state.dark_mode);
        assert!(rehydrated.state.reward_activities.is_empty());
        assert!(rehydrated.state.analytics_events.is_empty());
        let user = rehydrated.state.user.as_ref().unwrap();
        assert_eq!(user.tier, Tier::Gold);
        assert!(rehydrated.state.is_authenticated);
    }

    #[test]
    fn records_from_a_newer_schema_are_not_trusted() {
        let raw = format!(r#"{{"version":{}}}"#, SCHEMA_VERSION + 1);
        let rehydrated = rehydrate(Some(&raw));
        assert!(rehydrated.outcome.is_degraded());
        assert_eq!(rehydrated.state, StoreState::default());
    }

    #[test]
    fn logged_out_records_stay_logged_out() {
        let mut state = StoreState::default();
        state.dispatch(Action::Logout, Utc::now());
        let raw = encode(&state).unwrap();

        let rehydrated = rehydrate(Some(&raw));
        assert_eq!(rehydrated.outcome, Capability::Available);
        assert!(rehydrated.state.user.is_none());
        assert!(!rehydrated.state.is_authenticated);
    }

    #[test]
    fn zero_quantity_lines_are_repaired_away() {
        let catalog = Catalog::demo();
        let mut state = StoreState::default();
        state.dispatch(
            Action::AddToCart {
                product: catalog.find(ProductId::new(1)).unwrap().clone(),
                quantity: 1,
            },
            Utc::now(),
        );
        let mut snapshot = StoreSnapshot::capture(&state);
        snapshot.cart_items.first_mut().unwrap().quantity = 0;
        let raw = serde_json::to_string(&snapshot).unwrap();

        let rehydrated = rehydrate(Some(&raw));
        assert!(rehydrated.state.cart_items.is_empty());
        assert_eq!(
            rehydrated.outcome,
            Capability::degraded("repaired cart lines")
        );
    }
}
