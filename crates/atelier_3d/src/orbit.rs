//! Damped orbit camera controller
//!
//! Orbits around a target point; user input moves a set of target
//! angles and the controller eases the actual angles toward them over
//! successive frames instead of snapping.

use glam::{Vec2, Vec3};
use std::f32::consts::PI;

/// Per-frame user input consumed by the controller
#[derive(Clone, Copy, Debug, Default)]
pub struct OrbitInput {
    /// Cursor movement in pixels while the rotate button is held
    pub rotate_delta: Vec2,
    /// Scroll wheel movement, positive = zoom in
    pub scroll_delta: f32,
}

impl OrbitInput {
    /// Input representing no interaction this frame
    pub fn idle() -> Self {
        Self::default()
    }
}

/// Damped orbit controller
///
/// Azimuth/elevation/distance move toward their targets with an
/// exponential damping factor, so rotation and zoom glide to rest.
#[derive(Clone, Debug)]
pub struct OrbitController {
    /// Point the camera orbits around
    pub target: Vec3,
    /// Current distance from target
    pub distance: f32,
    /// Horizontal angle in radians (0 = looking down -Z)
    pub azimuth: f32,
    /// Vertical angle in radians (0 = horizontal)
    pub elevation: f32,

    /// Minimum distance from target
    pub min_distance: f32,
    /// Maximum distance from target
    pub max_distance: f32,
    /// Elevation clamp, keeps the camera off the poles
    pub max_elevation: f32,

    /// Rotation sensitivity (radians per pixel)
    pub rotation_speed: f32,
    /// Zoom sensitivity (fraction of distance per scroll unit)
    pub zoom_speed: f32,
    /// Damping factor (0 = instant, toward 1 = slower easing)
    pub damping: f32,

    target_azimuth: f32,
    target_elevation: f32,
    target_distance: f32,
}

impl OrbitController {
    /// Create a controller at the given angles
    pub fn new(target: Vec3, distance: f32) -> Self {
        Self {
            target,
            distance,
            azimuth: 0.0,
            elevation: 0.3,

            min_distance: 0.1,
            max_distance: 1000.0,
            max_elevation: PI * 0.45,

            rotation_speed: 0.005,
            zoom_speed: 0.1,
            damping: 0.1,

            target_azimuth: 0.0,
            target_elevation: 0.3,
            target_distance: distance,
        }
    }

    /// Create a controller whose initial pose matches looking from
    /// `eye` at `target`
    pub fn from_eye(target: Vec3, eye: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(1e-4);
        let elevation = (offset.y / distance).clamp(-1.0, 1.0).asin();
        let azimuth = offset.x.atan2(offset.z);
        let mut controller = Self::new(target, distance);
        controller.set_angles(azimuth, elevation);
        controller
    }

    /// Set the distance bounds, clamping the current distance into them
    pub fn with_distance_bounds(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min;
        self.max_distance = max;
        self.distance = self.distance.clamp(min, max);
        self.target_distance = self.distance;
        self
    }

    /// Set angles instantly (in radians)
    pub fn set_angles(&mut self, azimuth: f32, elevation: f32) {
        self.azimuth = azimuth;
        self.elevation = elevation.clamp(-self.max_elevation, self.max_elevation);
        self.target_azimuth = self.azimuth;
        self.target_elevation = self.elevation;
    }

    /// Camera position for the current state
    pub fn eye(&self) -> Vec3 {
        let (sin_elev, cos_elev) = self.elevation.sin_cos();
        let (sin_azim, cos_azim) = self.azimuth.sin_cos();
        self.target
            + Vec3::new(
                self.distance * cos_elev * sin_azim,
                self.distance * sin_elev,
                self.distance * cos_elev * cos_azim,
            )
    }

    /// Advance the damped state one frame
    ///
    /// Applies this frame's input to the targets, then eases the
    /// actual angles toward them. `dt` is the frame time in seconds.
    pub fn update(&mut self, dt: f32, input: &OrbitInput) {
        self.target_azimuth -= input.rotate_delta.x * self.rotation_speed;
        self.target_elevation = (self.target_elevation + input.rotate_delta.y * self.rotation_speed)
            .clamp(-self.max_elevation, self.max_elevation);

        if input.scroll_delta.abs() > 0.0 {
            self.target_distance = (self.target_distance
                - input.scroll_delta * self.zoom_speed * self.distance)
                .clamp(self.min_distance, self.max_distance);
        }

        let t = 1.0 - self.damping.powf(dt * 60.0);
        self.azimuth = lerp(self.azimuth, self.target_azimuth, t);
        self.elevation = lerp(self.elevation, self.target_elevation, t);
        self.distance = lerp(self.distance, self.target_distance, t);
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn from_eye_reproduces_the_eye_position() {
        let eye = Vec3::new(0.0, 1.0, 2.0);
        let controller = OrbitController::from_eye(Vec3::ZERO, eye);
        assert!((controller.eye() - eye).length() < 1e-4);
    }

    #[test]
    fn rotation_converges_instead_of_snapping() {
        let mut controller = OrbitController::new(Vec3::ZERO, 5.0);
        let start = controller.azimuth;

        let input = OrbitInput {
            rotate_delta: Vec2::new(100.0, 0.0),
            scroll_delta: 0.0,
        };
        controller.update(DT, &input);
        let after_one = controller.azimuth;

        // One frame moves part of the way, not the whole step.
        let full_step = start - 100.0 * controller.rotation_speed;
        assert!(after_one > full_step && after_one < start);

        // Idle frames keep easing toward the target.
        for _ in 0..300 {
            controller.update(DT, &OrbitInput::idle());
        }
        assert!((controller.azimuth - full_step).abs() < 1e-3);
    }

    #[test]
    fn zoom_respects_distance_bounds() {
        let mut controller = OrbitController::new(Vec3::ZERO, 5.0).with_distance_bounds(1.5, 15.0);
        let zoom_in = OrbitInput {
            rotate_delta: Vec2::ZERO,
            scroll_delta: 50.0,
        };
        for _ in 0..600 {
            controller.update(DT, &zoom_in);
        }
        assert!(controller.distance >= 1.5 - 1e-3);

        let zoom_out = OrbitInput {
            rotate_delta: Vec2::ZERO,
            scroll_delta: -50.0,
        };
        for _ in 0..600 {
            controller.update(DT, &zoom_out);
        }
        assert!(controller.distance <= 15.0 + 1e-3);
    }
}
