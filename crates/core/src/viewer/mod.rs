//! Product viewer: inline 3D scene, color customization, and AR placement.
//!
//! [`ViewerScene`] owns everything one open viewer tracks. It is transport
//! agnostic: hosts drive it with parsed commands and observe it through a
//! [`ViewerSink`], which receives every engagement event exactly once so the
//! caller can log it and award coins without duplicating emit sites.

pub mod ar;
pub mod assets;
pub mod camera;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capability::Capability;
use crate::types::analytics::{EventPayload, kinds};
use crate::types::{ArKind, Product};

pub use ar::{ArSession, HitPose, NullXrRuntime, ScriptedXrRuntime, XrRuntime};
pub use assets::{Color, MaterialSpec, ModelAsset, ModelLibrary, PALETTE};
pub use camera::OrbitCamera;

const YAW_PER_FRAME: f32 = 0.005;
const HOVER_SCALE: f32 = 1.1;
const SCALE_LERP: f32 = 0.1;
const BOB_AMPLITUDE: f32 = 0.1;

const CUSTOM_METALNESS: f32 = 0.1;
const CUSTOM_ROUGHNESS: f32 = 0.4;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("unknown model asset: {0}")]
    UnknownAsset(String),
    #[error("invalid color literal: {0}")]
    InvalidColor(String),
    #[error("unknown viewer control: {0}")]
    UnknownControl(String),
    #[error("immersive session unavailable: {0}")]
    SessionUnavailable(String),
}

/// A button on the viewer control strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlAction {
    Reset,
    ZoomIn,
    ZoomOut,
    Fullscreen,
    Animate,
}

impl ControlAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reset => "reset",
            Self::ZoomIn => "zoom_in",
            Self::ZoomOut => "zoom_out",
            Self::Fullscreen => "fullscreen",
            Self::Animate => "animate",
        }
    }
}

impl std::fmt::Display for ControlAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ControlAction {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reset" => Ok(Self::Reset),
            "zoom_in" => Ok(Self::ZoomIn),
            "zoom_out" => Ok(Self::ZoomOut),
            "fullscreen" => Ok(Self::Fullscreen),
            "animate" => Ok(Self::Animate),
            other => Err(ViewerError::UnknownControl(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Click,
    Hover,
}

impl InteractionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Hover => "hover",
        }
    }
}

/// Everything a scene reports outward.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    SceneLoaded {
        product_name: String,
        ar_kind: Option<ArKind>,
        model: String,
    },
    Interaction {
        action: InteractionKind,
        model: String,
        color: Option<Color>,
    },
    ColorChanged {
        color: Color,
    },
    Control {
        action: ControlAction,
    },
    ArSessionStarted,
    ArSessionEnded,
    ModelPlaced,
    PlacementReset,
}

impl ViewerEvent {
    /// The analytics kind this event records as.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SceneLoaded { .. } => kinds::SCENE_LOADED,
            Self::Interaction { .. } => kinds::MODEL_INTERACTION,
            Self::ColorChanged { .. } => kinds::COLOR_CUSTOMIZATION,
            Self::Control { .. } => kinds::CONTROL,
            Self::ArSessionStarted => kinds::AR_SESSION_STARTED,
            Self::ArSessionEnded => kinds::AR_SESSION_ENDED,
            Self::ModelPlaced => kinds::AR_PLACEMENT,
            Self::PlacementReset => kinds::AR_RESET,
        }
    }

    /// The structured payload this event records with.
    #[must_use]
    pub fn payload(&self) -> EventPayload {
        match self {
            Self::SceneLoaded {
                product_name,
                ar_kind,
                model,
            } => EventPayload::Viewer {
                product_name: product_name.clone(),
                ar_kind: ar_kind.map(|kind| kind.as_str().to_owned()),
                model: Some(model.clone()),
            },
            Self::Interaction {
                action,
                model,
                color,
            } => EventPayload::Interaction {
                action: action.as_str().to_owned(),
                model: model.clone(),
                color: color.map(Color::to_hex),
            },
            Self::ColorChanged { color } => EventPayload::Customization {
                value: color.to_hex(),
            },
            Self::Control { action } => EventPayload::Control {
                action: action.as_str().to_owned(),
            },
            Self::ArSessionStarted | Self::ArSessionEnded => EventPayload::Empty,
            Self::ModelPlaced => EventPayload::Placement {
                action: "placed".to_owned(),
            },
            Self::PlacementReset => EventPayload::Placement {
                action: "reset".to_owned(),
            },
        }
    }
}

/// Receives every event a scene emits.
pub trait ViewerSink {
    fn event(&mut self, event: &ViewerEvent);
}

/// Sink that keeps events in order for the caller to drain.
#[derive(Debug, Default)]
pub struct CollectedEvents(pub Vec<ViewerEvent>);

impl ViewerSink for CollectedEvents {
    fn event(&mut self, event: &ViewerEvent) {
        self.0.push(event.clone());
    }
}

/// Per-request persistable slice of a scene.
///
/// `color` stays `None` until the user customizes, so restoring never paints
/// over an asset's factory materials.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSnapshot {
    pub color: Option<Color>,
    pub auto_rotate: bool,
    pub frozen: bool,
    pub camera: OrbitCamera,
    pub presenting: bool,
    pub placed: Option<HitPose>,
}

impl Default for SceneSnapshot {
    fn default() -> Self {
        Self {
            color: None,
            auto_rotate: true,
            frozen: false,
            camera: OrbitCamera::default(),
            presenting: false,
            placed: None,
        }
    }
}

/// One open product viewer.
pub struct ViewerScene<S> {
    product_name: String,
    ar_kind: Option<ArKind>,
    model_name: String,
    model: Capability,
    materials: Vec<MaterialSpec>,
    color: Option<Color>,
    camera: OrbitCamera,
    auto_rotate: bool,
    hovered: bool,
    frozen: bool,
    yaw: f32,
    scale: f32,
    bob: f32,
    elapsed: f32,
    ar: ArSession,
    sink: S,
}

impl<S: ViewerSink> ViewerScene<S> {
    /// Open a viewer for `product`, resolving its asset through `library`.
    ///
    /// Never fails: an unknown asset substitutes the default for the
    /// product's kind and degrades the scene, and a scene with no asset at
    /// all still opens so the page can show guidance.
    pub async fn open(library: &ModelLibrary, product: &Product, sink: S) -> Self {
        let mut scene = Self {
            product_name: product.name.clone(),
            ar_kind: product.ar_kind,
            model_name: String::new(),
            model: Capability::Available,
            materials: Vec::new(),
            color: None,
            camera: OrbitCamera::default(),
            auto_rotate: true,
            hovered: false,
            frozen: false,
            yaw: 0.0,
            scale: 1.0,
            bob: 0.0,
            elapsed: 0.0,
            ar: ArSession::default(),
            sink,
        };

        let url = assets::resolve_model_url(product.model_url.as_deref(), product.ar_kind);
        match library.load(&url).await {
            Ok(asset) => scene.attach(&asset, Capability::Available),
            Err(err) => {
                tracing::warn!(product = %product.name, %err, "substituting default asset");
                let fallback =
                    assets::default_model_url(product.ar_kind.unwrap_or(ArKind::Furniture));
                match library.load(fallback).await {
                    Ok(asset) => scene.attach(&asset, Capability::degraded(err.to_string())),
                    Err(fallback_err) => {
                        scene.model = Capability::unavailable(fallback_err.to_string());
                    }
                }
            }
        }
        scene
    }

    fn attach(&mut self, asset: &ModelAsset, outcome: Capability) {
        self.model_name = asset.name.clone();
        self.materials = asset.working_materials();
        self.model = outcome;
        self.emit(ViewerEvent::SceneLoaded {
            product_name: self.product_name.clone(),
            ar_kind: self.ar_kind,
            model: self.model_name.clone(),
        });
    }

    fn emit(&mut self, event: ViewerEvent) {
        self.sink.event(&event);
    }

    fn paint(&mut self, color: Color) {
        for material in &mut self.materials {
            if material.is_colorable() {
                material.base_color = Some(color);
                material.metalness = CUSTOM_METALNESS;
                material.roughness = CUSTOM_ROUGHNESS;
            }
        }
    }

    /// Apply a customization swatch to every colorable material.
    pub fn set_color(&mut self, color: Color) {
        self.color = Some(color);
        self.paint(color);
        self.emit(ViewerEvent::ColorChanged { color });
    }

    /// Run a control-strip action. Fullscreen is the host surface's job and
    /// only records the press.
    pub fn control(&mut self, action: ControlAction) {
        match action {
            ControlAction::Reset => self.camera.reset(),
            ControlAction::ZoomIn => self.camera.zoom_in(),
            ControlAction::ZoomOut => self.camera.zoom_out(),
            ControlAction::Animate => self.auto_rotate = !self.auto_rotate,
            ControlAction::Fullscreen => {}
        }
        self.emit(ViewerEvent::Control { action });
    }

    /// Drag-orbit the camera. Not an engagement event.
    pub fn orbit(&mut self, d_azimuth: f32, d_polar: f32) {
        self.camera.orbit(d_azimuth, d_polar);
    }

    pub fn pointer_enter(&mut self) {
        self.hovered = true;
        self.emit(ViewerEvent::Interaction {
            action: InteractionKind::Hover,
            model: self.model_name.clone(),
            color: None,
        });
    }

    pub fn pointer_leave(&mut self) {
        self.hovered = false;
    }

    /// Click toggles the rotation freeze.
    pub fn click(&mut self) {
        self.frozen = !self.frozen;
        self.emit(ViewerEvent::Interaction {
            action: InteractionKind::Click,
            model: self.model_name.clone(),
            color: Some(self.selected_color()),
        });
    }

    /// Advance one render frame.
    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
        if self.auto_rotate && !self.frozen {
            self.yaw += YAW_PER_FRAME;
        }
        let target = if self.hovered { HOVER_SCALE } else { 1.0 };
        self.scale += (target - self.scale) * SCALE_LERP;
        self.bob = self.elapsed.sin() * BOB_AMPLITUDE;
        self.ar.advance();
    }

    /// Start an immersive session, reporting the outcome as a capability.
    pub fn enter_ar(&mut self, runtime: &dyn XrRuntime) -> Capability {
        let outcome = self.ar.begin(runtime);
        if outcome.is_available() {
            self.emit(ViewerEvent::ArSessionStarted);
        }
        outcome
    }

    pub fn pump_ar(&mut self, runtime: &dyn XrRuntime) {
        self.ar.pump(runtime);
    }

    /// Anchor the model at the reticle.
    pub fn place_in_room(&mut self) -> Option<HitPose> {
        let pose = self.ar.place();
        if pose.is_some() {
            self.emit(ViewerEvent::ModelPlaced);
        }
        pose
    }

    pub fn reset_placement(&mut self) -> bool {
        let reset = self.ar.reset_placement();
        if reset {
            self.emit(ViewerEvent::PlacementReset);
        }
        reset
    }

    pub fn exit_ar(&mut self, runtime: &dyn XrRuntime) -> bool {
        let ended = self.ar.end(runtime);
        if ended {
            self.emit(ViewerEvent::ArSessionEnded);
        }
        ended
    }

    /// Capture the slice of scene state that survives across requests.
    #[must_use]
    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            color: self.color,
            auto_rotate: self.auto_rotate,
            frozen: self.frozen,
            camera: self.camera,
            presenting: self.ar.is_presenting(),
            placed: self.ar.placed(),
        }
    }

    /// Re-apply a previously captured snapshot.
    ///
    /// Silent: replaying saved state must not re-emit events, so nothing
    /// here reaches the sink.
    pub fn restore(&mut self, snapshot: &SceneSnapshot) {
        self.color = snapshot.color;
        if let Some(color) = snapshot.color {
            self.paint(color);
        }
        self.auto_rotate = snapshot.auto_rotate;
        self.frozen = snapshot.frozen;
        self.camera = snapshot.camera;
        self.ar.resume(snapshot.presenting, snapshot.placed);
    }

    /// User guidance shown under the scene, by presentation kind.
    #[must_use]
    pub fn instructions(&self) -> &'static str {
        match self.ar_kind {
            Some(ArKind::Furniture) => {
                "Place this furniture in your room using AR to see how it fits your space"
            }
            Some(ArKind::Electronics) => {
                "View this device in 360\u{b0} and experience it in your environment"
            }
            Some(ArKind::Apparel) => "Try on this item virtually and see different color options",
            None => "Experience this product in augmented reality",
        }
    }

    #[must_use]
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    #[must_use]
    pub const fn ar_kind(&self) -> Option<ArKind> {
        self.ar_kind
    }

    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    #[must_use]
    pub const fn model(&self) -> &Capability {
        &self.model
    }

    #[must_use]
    pub fn materials(&self) -> &[MaterialSpec] {
        &self.materials
    }

    /// The highlighted swatch. White until the user customizes.
    #[must_use]
    pub fn selected_color(&self) -> Color {
        self.color.unwrap_or(Color::WHITE)
    }

    #[must_use]
    pub const fn camera(&self) -> OrbitCamera {
        self.camera
    }

    #[must_use]
    pub const fn auto_rotate(&self) -> bool {
        self.auto_rotate
    }

    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.frozen
    }

    #[must_use]
    pub const fn yaw(&self) -> f32 {
        self.yaw
    }

    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    #[must_use]
    pub const fn bob(&self) -> f32 {
        self.bob
    }

    #[must_use]
    pub const fn ar(&self) -> &ArSession {
        &self.ar
    }

    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
