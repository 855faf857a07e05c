//! Perspective camera

use glam::{Mat4, Vec3};

/// Perspective camera for 3D rendering
///
/// Holds the projection parameters; the camera's position comes from
/// the orbit controller each frame.
#[derive(Clone, Copy, Debug)]
pub struct PerspectiveCamera {
    /// Field of view in radians (vertical)
    pub fov: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
    /// Near clipping plane distance
    pub near: f32,
    /// Far clipping plane distance
    pub far: f32,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(75f32.to_radians(), 16.0 / 9.0, 0.1, 1000.0)
    }
}

impl PerspectiveCamera {
    /// Create a new perspective camera
    ///
    /// # Arguments
    /// * `fov` - Field of view in radians (vertical)
    /// * `aspect` - Aspect ratio (width / height)
    /// * `near` - Near clipping plane
    /// * `far` - Far clipping plane
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov,
            aspect,
            near,
            far,
        }
    }

    /// Update the aspect ratio after a viewport change
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Projection matrix for the current parameters
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    /// View matrix looking from `eye` at `target`, Y up
    pub fn view_matrix(eye: Vec3, target: Vec3) -> Mat4 {
        Mat4::look_at_rh(eye, target, Vec3::Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_aspect_feeds_projection() {
        let mut camera = PerspectiveCamera::default();
        camera.set_aspect(2.0);
        let proj = camera.projection_matrix();
        // For a perspective matrix, m00 = f / aspect and m11 = f.
        let ratio = proj.y_axis.y / proj.x_axis.x;
        assert!((ratio - 2.0).abs() < 1e-5);
    }
}
