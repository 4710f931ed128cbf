//! Bounded orbit camera for the inline 3D view.

use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_6, PI};

pub const MIN_DISTANCE: f32 = 2.0;
pub const MAX_DISTANCE: f32 = 10.0;
pub const MIN_POLAR: f32 = FRAC_PI_6;
pub const MAX_POLAR: f32 = PI - FRAC_PI_6;

const ZOOM_IN_FACTOR: f32 = 0.8;
const ZOOM_OUT_FACTOR: f32 = 1.2;

/// Spherical camera position around the model origin.
///
/// `polar` is measured from the up axis and stays inside a wedge so the
/// camera can neither flip over the top nor dive under the model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitCamera {
    pub distance: f32,
    pub polar: f32,
    pub azimuth: f32,
}

impl OrbitCamera {
    pub fn zoom_in(&mut self) {
        self.distance = (self.distance * ZOOM_IN_FACTOR).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn zoom_out(&mut self) {
        self.distance = (self.distance * ZOOM_OUT_FACTOR).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn orbit(&mut self, d_azimuth: f32, d_polar: f32) {
        self.azimuth += d_azimuth;
        self.polar = (self.polar + d_polar).clamp(MIN_POLAR, MAX_POLAR);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Cartesian position, up axis second.
    #[must_use]
    pub fn position(&self) -> [f32; 3] {
        [
            self.distance * self.polar.sin() * self.azimuth.sin(),
            self.distance * self.polar.cos(),
            self.distance * self.polar.sin() * self.azimuth.cos(),
        ]
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            distance: 5.0,
            polar: FRAC_PI_2,
            azimuth: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_stays_within_the_distance_bounds() {
        let mut camera = OrbitCamera::default();
        for _ in 0..20 {
            camera.zoom_in();
        }
        assert!((camera.distance - MIN_DISTANCE).abs() < f32::EPSILON);

        for _ in 0..20 {
            camera.zoom_out();
        }
        assert!((camera.distance - MAX_DISTANCE).abs() < f32::EPSILON);
    }

    #[test]
    fn polar_stays_inside_the_wedge() {
        let mut camera = OrbitCamera::default();
        camera.orbit(0.0, -PI);
        assert!((camera.polar - MIN_POLAR).abs() < f32::EPSILON);
        camera.orbit(0.0, PI * 2.0);
        assert!((camera.polar - MAX_POLAR).abs() < f32::EPSILON);
    }

    #[test]
    fn reset_returns_to_the_front_view() {
        let mut camera = OrbitCamera::default();
        camera.zoom_in();
        camera.orbit(1.0, 0.2);
        camera.reset();

        let [x, y, z] = camera.position();
        assert!(x.abs() < 1e-6);
        assert!(y.abs() < 1e-6);
        assert!((z - 5.0).abs() < 1e-6);
    }
}
