//! Theme route handler.

use axum::{http::HeaderMap, response::Redirect};
use tower_sessions::Session;
use tracing::instrument;

use shopverse_core::store::Action;

use crate::error::Result;
use crate::models::session::{apply_actions, load_store};
use crate::routes::back_path;

/// Flip dark mode and redirect back.
///
/// A plain form post on purpose: the flipped flag lands in the persisted
/// record and the reloaded page picks it up, so the toggle works with no
/// client-side script at all.
#[instrument(skip(session, headers))]
pub async fn toggle(session: Session, headers: HeaderMap) -> Result<Redirect> {
    let mut store = load_store(&session).await;
    apply_actions(&session, &mut store, [Action::ToggleDarkMode]).await?;

    Ok(Redirect::to(&back_path(&headers)))
}
