//! Scene lighting

use atelier_core::Color;
use glam::Vec3;

/// Ambient light providing uniform illumination
#[derive(Clone, Copy, Debug)]
pub struct AmbientLight {
    /// Light color
    pub color: Color,
    /// Light intensity
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self::white(1.0)
    }
}

impl AmbientLight {
    /// Create a new ambient light
    pub fn new(color: Color, intensity: f32) -> Self {
        Self { color, intensity }
    }

    /// Create with white color
    pub fn white(intensity: f32) -> Self {
        Self::new(Color::WHITE, intensity)
    }
}

/// Directional light (like sunlight)
///
/// Emits parallel rays from its position toward the origin; only the
/// resulting direction matters for shading.
#[derive(Clone, Copy, Debug)]
pub struct DirectionalLight {
    /// Light color
    pub color: Color,
    /// Light intensity
    pub intensity: f32,
    /// Position the light shines from
    pub position: Vec3,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::white(1.0, Vec3::new(0.0, 5.0, 2.0))
    }
}

impl DirectionalLight {
    /// Create a new directional light
    pub fn new(color: Color, intensity: f32, position: Vec3) -> Self {
        Self {
            color,
            intensity,
            position,
        }
    }

    /// Create a white directional light
    pub fn white(intensity: f32, position: Vec3) -> Self {
        Self::new(Color::WHITE, intensity, position)
    }

    /// Unit direction the light travels in
    pub fn direction(&self) -> Vec3 {
        (-self.position).try_normalize().unwrap_or(-Vec3::Y)
    }
}

/// The fixed light setup: one ambient and one directional light
#[derive(Clone, Copy, Debug, Default)]
pub struct SceneLights {
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
}

impl SceneLights {
    pub fn new(ambient: AmbientLight, directional: DirectionalLight) -> Self {
        Self {
            ambient,
            directional,
        }
    }
}
