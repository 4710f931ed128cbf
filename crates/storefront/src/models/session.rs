//! Session persistence for the store record and viewer scenes.
//!
//! The session plays the role a browser's local storage would: it holds the
//! serialized store record plus one scene snapshot per open viewer. Loads
//! never fail outward; a missing or damaged record rehydrates to a fresh
//! state and the damage is logged.

use chrono::Utc;
use tower_sessions::Session;

use shopverse_core::store::{Action, Effect, StoreState, snapshot};
use shopverse_core::types::{EventPayload, ProductId};
use shopverse_core::viewer::SceneSnapshot;

use crate::error::Result;
use crate::rewards::reward_for;

/// Session keys for per-visitor state.
pub mod keys {
    use shopverse_core::types::ProductId;

    /// Key for the serialized store record. Matches the record key the
    /// snapshot codec stamps into the payload.
    pub const STORE: &str = shopverse_core::store::STORE_RECORD_KEY;

    /// Key marking that this session already recorded `app_initialized`.
    pub const APP_INITIALIZED: &str = "app_initialized";

    /// Key for one product's persisted viewer scene.
    #[must_use]
    pub fn viewer_scene(id: ProductId) -> String {
        format!("viewer_scene:{id}")
    }
}

/// Load the session's store record, falling back to a fresh state.
///
/// Session read failures and damaged records both degrade to the default
/// state rather than failing the request.
pub async fn load_store(session: &Session) -> StoreState {
    let raw = match session.get::<String>(keys::STORE).await {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(error = %err, "failed to read store record from session");
            None
        }
    };

    let rehydration = snapshot::rehydrate(raw.as_deref());
    if let Some(reason) = rehydration.outcome.reason() {
        tracing::warn!(reason, "store record rehydrated with repairs");
    }
    rehydration.state
}

/// Write the persisted slice of `state` back to the session.
pub async fn save_store(session: &Session, state: &StoreState) -> Result<()> {
    let encoded = snapshot::encode(state)
        .map_err(|err| crate::error::AppError::Internal(format!("encode store record: {err}")))?;
    session.insert(keys::STORE, encoded).await?;
    Ok(())
}

/// Dispatch `actions` in order, then persist once if any of them changed
/// persisted state.
pub async fn apply_actions(
    session: &Session,
    state: &mut StoreState,
    actions: impl IntoIterator<Item = Action>,
) -> Result<()> {
    let now = Utc::now();
    let mut persist = false;
    for action in actions {
        persist |= state.dispatch(action, now).contains(&Effect::Persist);
    }
    if persist {
        save_store(session, state).await?;
    }
    Ok(())
}

/// Record one engagement event, apply any coin award it earns, and persist.
pub async fn record_engagement(
    session: &Session,
    state: &mut StoreState,
    kind: &str,
    payload: EventPayload,
    product_name: Option<&str>,
) -> Result<()> {
    let mut actions = vec![Action::RecordEvent {
        kind: kind.to_owned(),
        payload,
    }];
    if let Some(reward) = reward_for(kind, product_name) {
        actions.push(Action::AdjustCoins {
            delta: reward.coins,
            description: reward.description,
        });
    }
    apply_actions(session, state, actions).await
}

/// Load a product's persisted scene slice, default when absent.
pub async fn load_scene(session: &Session, id: ProductId) -> SceneSnapshot {
    match session.get::<SceneSnapshot>(&keys::viewer_scene(id)).await {
        Ok(Some(snapshot)) => snapshot,
        Ok(None) => SceneSnapshot::default(),
        Err(err) => {
            tracing::warn!(error = %err, product = %id, "failed to read scene snapshot");
            SceneSnapshot::default()
        }
    }
}

/// Persist a product's scene slice.
pub async fn save_scene(session: &Session, id: ProductId, snapshot: SceneSnapshot) -> Result<()> {
    session.insert(&keys::viewer_scene(id), snapshot).await?;
    Ok(())
}
