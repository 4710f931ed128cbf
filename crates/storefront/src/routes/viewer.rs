//! 3D/AR viewer route handlers.
//!
//! The viewer page rebuilds a [`ViewerScene`] from the session snapshot on
//! every request, applies one command, persists the new snapshot, and drains
//! the scene's event sink into the engagement log. HTMX requests get the
//! refreshed scene fragment; plain form posts redirect back to the page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use shopverse_core::Capability;
use shopverse_core::store::{Action, StoreState};
use shopverse_core::types::{EventPayload, Price, Product, ProductId, kinds};
use shopverse_core::viewer::{
    CollectedEvents, Color, ControlAction, PALETTE, ViewerError, ViewerScene,
};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::models::session::{apply_actions, load_scene, load_store, record_engagement, save_scene};
use crate::routes::home::HeaderView;
use crate::routes::{back_path, is_htmx};
use crate::state::AppState;

/// Trigger set for commands that can award coins.
const COIN_TRIGGERS: &str = "coins-updated, analytics-updated";
/// Trigger set for commands that only move analytics.
const ANALYTICS_TRIGGERS: &str = "analytics-updated";

// =============================================================================
// View Models
// =============================================================================

/// One material row in the scene readout.
pub struct MaterialView {
    pub name: String,
    pub hex: Option<String>,
    pub colorable: bool,
}

/// One palette swatch.
pub struct SwatchView {
    pub hex: String,
    pub selected: bool,
}

/// Everything the scene fragment renders.
pub struct SceneView {
    pub product_id: ProductId,
    pub product_name: String,
    pub model_name: String,
    /// False when the asset failed to load entirely (guidance-only scene).
    pub model_available: bool,
    pub model_note: Option<String>,
    pub instructions: &'static str,
    pub selected_hex: String,
    pub auto_rotate: bool,
    pub frozen: bool,
    pub camera_distance: String,
    pub materials: Vec<MaterialView>,
    pub palette: Vec<SwatchView>,
    /// AR session flags for the placement controls.
    pub presenting: bool,
    pub has_reticle: bool,
    pub placed: bool,
    /// False renders the WebXR remediation panel instead of the AR entry.
    pub ar_available: bool,
    pub ar_note: Option<String>,
}

impl SceneView {
    pub fn new(
        product: &Product,
        scene: &ViewerScene<CollectedEvents>,
        ar_support: &Capability,
    ) -> Self {
        let selected = scene.selected_color();
        Self {
            product_id: product.id,
            product_name: scene.product_name().to_owned(),
            model_name: scene.model_name().to_owned(),
            model_available: !scene.model().is_unavailable(),
            model_note: scene.model().reason().map(ToOwned::to_owned),
            instructions: scene.instructions(),
            selected_hex: selected.to_hex(),
            auto_rotate: scene.auto_rotate(),
            frozen: scene.is_frozen(),
            camera_distance: format!("{:.1}", scene.camera().distance),
            materials: scene
                .materials()
                .iter()
                .map(|material| MaterialView {
                    name: material.name.clone(),
                    hex: material.base_color.map(|color| color.to_hex()),
                    colorable: material.is_colorable(),
                })
                .collect(),
            palette: PALETTE
                .iter()
                .map(|color| SwatchView {
                    hex: color.to_hex(),
                    selected: *color == selected,
                })
                .collect(),
            presenting: scene.ar().is_presenting(),
            has_reticle: scene.ar().reticle().is_some(),
            placed: scene.ar().placed().is_some(),
            ar_available: !ar_support.is_unavailable(),
            ar_note: ar_support.reason().map(ToOwned::to_owned),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Full viewer page template.
#[derive(Template, WebTemplate)]
#[template(path = "viewer.html")]
pub struct ViewerTemplate {
    pub header: HeaderView,
    pub product_name: String,
    pub brand: String,
    pub price: Price,
    pub original_price: Option<Price>,
    pub description: String,
    pub features: Vec<String>,
    pub in_stock: bool,
    pub coin_reward: i64,
    pub has_vr: bool,
    pub scene: SceneView,
}

/// Scene fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/viewer_scene.html")]
pub struct ViewerSceneTemplate {
    pub scene: SceneView,
}

/// Share confirmation fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/share_panel.html")]
pub struct SharePanelTemplate {
    pub product_name: String,
    pub share_url: String,
}

/// VR intent banner fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/vr_banner.html")]
pub struct VrBannerTemplate {
    pub product_name: String,
}

// =============================================================================
// Forms
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ColorForm {
    pub color: String,
}

#[derive(Debug, Deserialize)]
pub struct ControlForm {
    pub action: String,
}

#[derive(Debug, Deserialize)]
pub struct InteractionForm {
    pub action: String,
}

// =============================================================================
// Scene Plumbing
// =============================================================================

/// Look up a viewable product and rebuild its scene from the session.
///
/// The sink still holds the load event after this; `show` drains it into
/// the log, command handlers clear it so only their own events land.
async fn open_for(
    state: &AppState,
    session: &Session,
    id: ProductId,
) -> Result<(Product, ViewerScene<CollectedEvents>)> {
    let product = state
        .catalog()
        .find(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("no product {id}")))?;
    if !product.viewable() {
        return Err(AppError::NotFound(format!(
            "no 3D experience for {}",
            product.name
        )));
    }
    let snapshot = load_scene(session, id).await;
    let mut scene = ViewerScene::open(state.models(), &product, CollectedEvents::default()).await;
    scene.restore(&snapshot);
    Ok((product, scene))
}

/// Persist the scene and flush its pending events into the engagement log.
async fn commit(
    session: &Session,
    store: &mut StoreState,
    product: &Product,
    scene: &mut ViewerScene<CollectedEvents>,
) -> Result<()> {
    save_scene(session, product.id, scene.snapshot()).await?;
    for event in std::mem::take(&mut scene.sink_mut().0) {
        record_engagement(
            session,
            store,
            event.kind(),
            event.payload(),
            Some(&product.name),
        )
        .await?;
    }
    Ok(())
}

/// Scene fragment for HTMX, full-page redirect otherwise.
fn scene_response(
    headers: &HeaderMap,
    product: &Product,
    scene: &ViewerScene<CollectedEvents>,
    ar_support: &Capability,
    triggers: &'static str,
) -> Response {
    if is_htmx(headers) {
        (
            AppendHeaders([("HX-Trigger", triggers)]),
            ViewerSceneTemplate {
                scene: SceneView::new(product, scene, ar_support),
            },
        )
            .into_response()
    } else {
        Redirect::to(&format!("/viewer/{}", product.id)).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Show the viewer page for a product.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<ViewerTemplate> {
    let id = ProductId::new(id);
    let (product, mut scene) = open_for(&state, &session, id).await?;

    let mut store = load_store(&session).await;
    apply_actions(&session, &mut store, [Action::SetArMode(true)]).await?;

    for event in std::mem::take(&mut scene.sink_mut().0) {
        record_engagement(
            &session,
            &mut store,
            event.kind(),
            event.payload(),
            Some(&product.name),
        )
        .await?;
    }
    record_engagement(
        &session,
        &mut store,
        kinds::AR_VIEWER_OPENED,
        EventPayload::Viewer {
            product_name: product.name.clone(),
            ar_kind: product.ar_kind.map(|kind| kind.as_str().to_owned()),
            model: Some(scene.model_name().to_owned()),
        },
        Some(&product.name),
    )
    .await?;
    let id_string = id.to_string();
    add_breadcrumb(
        "viewer",
        "Opened product viewer",
        Some(&[("product_id", id_string.as_str())]),
    );

    let probe = state.xr().probe();
    Ok(ViewerTemplate {
        header: HeaderView::from_state(&store),
        product_name: product.name.clone(),
        brand: product.brand.clone(),
        price: product.price,
        original_price: product.original_price,
        description: product.description.clone(),
        features: product.features.clone(),
        in_stock: product.in_stock,
        coin_reward: product.coin_reward,
        has_vr: product.has_vr,
        scene: SceneView::new(&product, &scene, &probe),
    })
}

/// Apply a palette color to the scene.
#[instrument(skip(state, session, headers))]
pub async fn set_color(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    headers: HeaderMap,
    Form(form): Form<ColorForm>,
) -> Result<Response> {
    let color = Color::from_hex(&form.color)?;
    if !PALETTE.contains(&color) {
        return Err(ViewerError::InvalidColor(form.color).into());
    }

    let (product, mut scene) = open_for(&state, &session, ProductId::new(id)).await?;
    scene.sink_mut().0.clear();
    scene.set_color(color);

    let mut store = load_store(&session).await;
    commit(&session, &mut store, &product, &mut scene).await?;
    Ok(scene_response(
        &headers,
        &product,
        &scene,
        &state.xr().probe(),
        COIN_TRIGGERS,
    ))
}

/// Apply a camera or rotation control.
#[instrument(skip(state, session, headers))]
pub async fn control(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    headers: HeaderMap,
    Form(form): Form<ControlForm>,
) -> Result<Response> {
    let action: ControlAction = form.action.parse()?;

    let (product, mut scene) = open_for(&state, &session, ProductId::new(id)).await?;
    scene.sink_mut().0.clear();
    scene.control(action);

    let mut store = load_store(&session).await;
    commit(&session, &mut store, &product, &mut scene).await?;
    Ok(scene_response(
        &headers,
        &product,
        &scene,
        &state.xr().probe(),
        COIN_TRIGGERS,
    ))
}

/// Report a pointer interaction with the model.
#[instrument(skip(state, session, headers))]
pub async fn interaction(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    headers: HeaderMap,
    Form(form): Form<InteractionForm>,
) -> Result<Response> {
    let (product, mut scene) = open_for(&state, &session, ProductId::new(id)).await?;
    scene.sink_mut().0.clear();
    match form.action.as_str() {
        "click" => scene.click(),
        "hover" => scene.pointer_enter(),
        other => {
            return Err(AppError::BadRequest(format!(
                "unknown interaction: {other}"
            )));
        }
    }

    let mut store = load_store(&session).await;
    commit(&session, &mut store, &product, &mut scene).await?;
    Ok(scene_response(
        &headers,
        &product,
        &scene,
        &state.xr().probe(),
        COIN_TRIGGERS,
    ))
}

/// Start an AR session.
///
/// An unavailable runtime is not an error: the fragment renders the
/// remediation panel instead of the session view.
#[instrument(skip(state, session, headers))]
pub async fn enter_ar(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Result<Response> {
    let (product, mut scene) = open_for(&state, &session, ProductId::new(id)).await?;
    scene.sink_mut().0.clear();

    let outcome = scene.enter_ar(state.xr());
    if outcome.is_available() {
        scene.pump_ar(state.xr());
    } else {
        tracing::warn!(reason = ?outcome.reason(), "AR session unavailable");
    }

    let mut store = load_store(&session).await;
    commit(&session, &mut store, &product, &mut scene).await?;
    Ok(scene_response(
        &headers, &product, &scene, &outcome, COIN_TRIGGERS,
    ))
}

/// Place the model at the current reticle pose.
#[instrument(skip(state, session, headers))]
pub async fn place(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Result<Response> {
    let (product, mut scene) = open_for(&state, &session, ProductId::new(id)).await?;
    scene.sink_mut().0.clear();

    scene.pump_ar(state.xr());
    scene.place_in_room();

    let mut store = load_store(&session).await;
    commit(&session, &mut store, &product, &mut scene).await?;
    Ok(scene_response(
        &headers,
        &product,
        &scene,
        &state.xr().probe(),
        ANALYTICS_TRIGGERS,
    ))
}

/// Clear the placement and return to the reticle flow.
#[instrument(skip(state, session, headers))]
pub async fn reset_placement(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Result<Response> {
    let (product, mut scene) = open_for(&state, &session, ProductId::new(id)).await?;
    scene.sink_mut().0.clear();

    scene.reset_placement();
    scene.pump_ar(state.xr());

    let mut store = load_store(&session).await;
    commit(&session, &mut store, &product, &mut scene).await?;
    Ok(scene_response(
        &headers,
        &product,
        &scene,
        &state.xr().probe(),
        ANALYTICS_TRIGGERS,
    ))
}

/// End the AR session and return to the inline preview.
#[instrument(skip(state, session, headers))]
pub async fn exit_ar(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Result<Response> {
    let (product, mut scene) = open_for(&state, &session, ProductId::new(id)).await?;
    scene.sink_mut().0.clear();

    scene.exit_ar(state.xr());

    let mut store = load_store(&session).await;
    commit(&session, &mut store, &product, &mut scene).await?;
    Ok(scene_response(
        &headers,
        &product,
        &scene,
        &state.xr().probe(),
        ANALYTICS_TRIGGERS,
    ))
}

/// Record a VR view intent for a product.
#[instrument(skip(state, session, headers))]
pub async fn vr_view(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Result<Response> {
    let id = ProductId::new(id);
    let product = state
        .catalog()
        .find(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("no product {id}")))?;
    if !product.has_vr {
        return Err(AppError::NotFound(format!(
            "no VR experience for {}",
            product.name
        )));
    }

    let mut store = load_store(&session).await;
    apply_actions(&session, &mut store, [Action::SetVrMode(true)]).await?;
    record_engagement(
        &session,
        &mut store,
        kinds::VR_VIEW_INITIATED,
        EventPayload::Product {
            product_id: id,
            product_name: product.name.clone(),
            price: None,
            category: None,
        },
        Some(&product.name),
    )
    .await?;

    if is_htmx(&headers) {
        Ok((
            AppendHeaders([("HX-Trigger", COIN_TRIGGERS)]),
            VrBannerTemplate {
                product_name: product.name,
            },
        )
            .into_response())
    } else {
        Ok(Redirect::to(&back_path(&headers)).into_response())
    }
}

/// Record a share intent and return the share panel.
#[instrument(skip(state, session, headers))]
pub async fn share(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Result<Response> {
    let id = ProductId::new(id);
    let product = state
        .catalog()
        .find(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("no product {id}")))?;

    let mut store = load_store(&session).await;
    record_engagement(
        &session,
        &mut store,
        kinds::SHARE_AR_EXPERIENCE,
        EventPayload::Product {
            product_id: id,
            product_name: product.name.clone(),
            price: None,
            category: None,
        },
        Some(&product.name),
    )
    .await?;

    if is_htmx(&headers) {
        Ok((
            AppendHeaders([("HX-Trigger", COIN_TRIGGERS)]),
            SharePanelTemplate {
                product_name: product.name,
                share_url: state.share_url(id),
            },
        )
            .into_response())
    } else {
        Ok(Redirect::to(&format!("/viewer/{id}")).into_response())
    }
}

/// Close the viewer and return home.
#[instrument(skip(state, session))]
pub async fn close(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    let id = ProductId::new(id);
    let product = state
        .catalog()
        .find(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("no product {id}")))?;

    let mut store = load_store(&session).await;
    apply_actions(&session, &mut store, [Action::SetArMode(false)]).await?;
    record_engagement(
        &session,
        &mut store,
        kinds::AR_VIEWER_CLOSED,
        EventPayload::Viewer {
            product_name: product.name.clone(),
            ar_kind: product.ar_kind.map(|kind| kind.as_str().to_owned()),
            model: None,
        },
        Some(&product.name),
    )
    .await?;
    Ok(Redirect::to("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopverse_core::catalog::Catalog;
    use shopverse_core::viewer::{ModelLibrary, NullXrRuntime, ScriptedXrRuntime, XrRuntime};

    async fn open_demo_scene(id: i32) -> (Product, ViewerScene<CollectedEvents>) {
        let catalog = Catalog::demo();
        let product = catalog
            .find(ProductId::new(id))
            .cloned()
            .unwrap_or_else(|| panic!("demo catalog has product {id}"));
        let scene =
            ViewerScene::open(&ModelLibrary::new(), &product, CollectedEvents::default()).await;
        (product, scene)
    }

    #[tokio::test]
    async fn test_scene_view_marks_the_selected_swatch() {
        let (product, mut scene) = open_demo_scene(1).await;
        scene.set_color(PALETTE[2]);

        let view = SceneView::new(&product, &scene, &Capability::Available);
        assert_eq!(view.selected_hex, PALETTE[2].to_hex());
        assert!(view.palette[2].selected);
        assert_eq!(view.palette.iter().filter(|s| s.selected).count(), 1);
        assert!(view.model_available);
    }

    #[tokio::test]
    async fn test_scene_view_surfaces_ar_remediation() {
        let (product, scene) = open_demo_scene(1).await;
        let probe = NullXrRuntime.probe();

        let view = SceneView::new(&product, &scene, &probe);
        assert!(!view.ar_available);
        assert!(view.ar_note.is_some());
        assert!(!view.presenting);
    }

    #[tokio::test]
    async fn test_scene_view_tracks_the_placement_flow() {
        let (product, mut scene) = open_demo_scene(3).await;
        let runtime = ScriptedXrRuntime::with_hits([
            shopverse_core::viewer::HitPose::from_translation(0.0, 0.0, -1.0),
        ]);

        assert!(scene.enter_ar(&runtime).is_available());
        scene.pump_ar(&runtime);
        let before = SceneView::new(&product, &scene, &Capability::Available);
        assert!(before.presenting);
        assert!(before.has_reticle);
        assert!(!before.placed);

        scene.place_in_room();
        let after = SceneView::new(&product, &scene, &Capability::Available);
        assert!(after.placed);
    }
}
