//! Rendering
//!
//! The scene manager talks to a [`SceneRenderer`] trait so the
//! lifecycle can run without a GPU; [`WgpuRenderer`] is the real
//! implementation over a window surface.

mod renderer;

pub use renderer::WgpuRenderer;

use crate::scene::{NodeId, PerspectiveCamera, SceneGraph, SceneLights};
use crate::viewport::Viewport;
use glam::Vec3;
use thiserror::Error;

/// Rendering errors
///
/// Only initialization errors are fatal; per-frame failures are
/// logged and the loop keeps running.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Failed to create the rendering surface
    #[error("failed to create rendering surface: {0}")]
    Surface(String),

    /// No suitable graphics adapter on this system
    #[error("no suitable graphics adapter")]
    NoAdapter,

    /// Failed to acquire the graphics device
    #[error("failed to acquire graphics device: {0}")]
    Device(String),

    /// The GPU ran out of memory
    #[error("out of GPU memory")]
    OutOfMemory,
}

/// Everything a renderer needs for one frame
pub struct FrameContext<'a> {
    /// Scene to draw
    pub graph: &'a SceneGraph,
    /// Projection parameters
    pub camera: &'a PerspectiveCamera,
    /// Camera position from the orbit controller
    pub eye: Vec3,
    /// Point the camera looks at
    pub target: Vec3,
    /// Scene lighting
    pub lights: &'a SceneLights,
}

/// Renderer seam between the scene manager and the GPU
pub trait SceneRenderer {
    /// Resize the output buffers to a new viewport
    fn resize(&mut self, viewport: Viewport);

    /// Upload geometry reachable from `root` that is not yet resident
    fn upload(&mut self, graph: &SceneGraph, root: NodeId) -> Result<(), RenderError>;

    /// Draw one frame
    fn render(&mut self, frame: &FrameContext<'_>) -> Result<(), RenderError>;
}
