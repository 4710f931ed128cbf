//! Immersive AR session state and the runtime seam behind it.
//!
//! [`XrRuntime`] abstracts whatever provides hit-test poses so the session
//! logic stays testable. [`NullXrRuntime`] is the production default on
//! hosts without an immersive runtime and reports the capability as
//! unavailable instead of failing requests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::capability::Capability;
use crate::viewer::ViewerError;

/// Placement scale applied to the model when it is anchored in the room.
pub const AR_PLACEMENT_SCALE: f32 = 0.5;

/// Spin applied per frame to an anchored model.
pub const AR_SPIN_PER_FRAME: f32 = 0.01;

/// A hit-test result as a column-major transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitPose {
    pub matrix: [[f32; 4]; 4],
}

impl HitPose {
    #[must_use]
    pub const fn from_translation(x: f32, y: f32, z: f32) -> Self {
        Self {
            matrix: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [x, y, z, 1.0],
            ],
        }
    }

    #[must_use]
    pub const fn translation(&self) -> [f32; 3] {
        let [_, _, _, t] = self.matrix;
        let [x, y, z, _] = t;
        [x, y, z]
    }
}

/// Access to an immersive runtime: support probing, session lifecycle, and
/// the hit-test feed.
pub trait XrRuntime: Send + Sync {
    /// Whether an immersive session could be started right now.
    fn probe(&self) -> Capability;

    /// Start an immersive session.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::SessionUnavailable`] when the runtime cannot
    /// start one despite probing as available.
    fn begin_session(&self) -> Result<(), ViewerError>;

    /// Next hit-test pose, if the runtime produced one since the last poll.
    fn poll_hit(&self) -> Option<HitPose>;

    fn end_session(&self);
}

/// Runtime for hosts without immersive support. Never starts a session.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullXrRuntime;

impl XrRuntime for NullXrRuntime {
    fn probe(&self) -> Capability {
        Capability::unavailable("immersive AR is not supported on this device")
    }

    fn begin_session(&self) -> Result<(), ViewerError> {
        Err(ViewerError::SessionUnavailable(
            "immersive AR is not supported on this device".to_owned(),
        ))
    }

    fn poll_hit(&self) -> Option<HitPose> {
        None
    }

    fn end_session(&self) {}
}

/// Runtime fed from a fixed list of poses, for exercising session flows.
#[derive(Debug, Default)]
pub struct ScriptedXrRuntime {
    hits: Mutex<VecDeque<HitPose>>,
    active: AtomicBool,
}

impl ScriptedXrRuntime {
    #[must_use]
    pub fn with_hits(hits: impl IntoIterator<Item = HitPose>) -> Self {
        Self {
            hits: Mutex::new(hits.into_iter().collect()),
            active: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

impl XrRuntime for ScriptedXrRuntime {
    fn probe(&self) -> Capability {
        Capability::Available
    }

    fn begin_session(&self) -> Result<(), ViewerError> {
        self.active.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn poll_hit(&self) -> Option<HitPose> {
        if !self.is_active() {
            return None;
        }
        self.hits.lock().ok()?.pop_front()
    }

    fn end_session(&self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
enum ArPhase {
    #[default]
    Inline,
    Presenting,
}

/// Hit-test driven placement state for one viewer.
///
/// While presenting, the reticle follows every polled pose. The model stays
/// hidden until the first placement commits the current reticle pose, after
/// which further hits move only the reticle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ArSession {
    phase: ArPhase,
    reticle: Option<HitPose>,
    placed: Option<HitPose>,
    spin: f32,
}

impl ArSession {
    /// Start presenting through `runtime`.
    ///
    /// Returns the capability outcome rather than an error: an absent
    /// runtime leaves the session inline and the caller shows guidance.
    pub fn begin(&mut self, runtime: &dyn XrRuntime) -> Capability {
        match runtime.probe() {
            Capability::Available => match runtime.begin_session() {
                Ok(()) => {
                    self.phase = ArPhase::Presenting;
                    self.reticle = None;
                    self.placed = None;
                    self.spin = 0.0;
                    Capability::Available
                }
                Err(err) => Capability::unavailable(err.to_string()),
            },
            other => other,
        }
    }

    /// Pull the latest hit-test pose into the reticle.
    pub fn pump(&mut self, runtime: &dyn XrRuntime) {
        if self.phase != ArPhase::Presenting {
            return;
        }
        if let Some(pose) = runtime.poll_hit() {
            self.reticle = Some(pose);
        }
    }

    /// Anchor the model at the current reticle pose.
    ///
    /// One-shot: returns `None` when not presenting, already placed, or no
    /// hit has arrived yet.
    pub fn place(&mut self) -> Option<HitPose> {
        if self.phase != ArPhase::Presenting || self.placed.is_some() {
            return None;
        }
        let pose = self.reticle?;
        self.placed = Some(pose);
        Some(pose)
    }

    /// Un-anchor the model so the next select places it again.
    pub fn reset_placement(&mut self) -> bool {
        self.phase == ArPhase::Presenting && self.placed.take().is_some()
    }

    /// Leave the immersive session. Returns whether one was active.
    pub fn end(&mut self, runtime: &dyn XrRuntime) -> bool {
        if self.phase != ArPhase::Presenting {
            return false;
        }
        runtime.end_session();
        self.phase = ArPhase::Inline;
        self.reticle = None;
        self.placed = None;
        self.spin = 0.0;
        true
    }

    /// Advance one frame: an anchored model slowly spins in place.
    pub fn advance(&mut self) {
        if self.phase == ArPhase::Presenting && self.placed.is_some() {
            self.spin += AR_SPIN_PER_FRAME;
        }
    }

    #[must_use]
    pub fn is_presenting(&self) -> bool {
        self.phase == ArPhase::Presenting
    }

    #[must_use]
    pub const fn reticle(&self) -> Option<HitPose> {
        self.reticle
    }

    #[must_use]
    pub const fn placed(&self) -> Option<HitPose> {
        self.placed
    }

    #[must_use]
    pub const fn spin(&self) -> f32 {
        self.spin
    }

    /// Restore a session captured from a previous request.
    pub fn resume(&mut self, presenting: bool, placed: Option<HitPose>) {
        self.phase = if presenting {
            ArPhase::Presenting
        } else {
            ArPhase::Inline
        };
        self.reticle = None;
        self.placed = if presenting { placed } else { None };
        self.spin = 0.0;
    }
}
