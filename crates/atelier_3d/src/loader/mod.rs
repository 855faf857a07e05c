//! Asset loading
//!
//! The glTF loader produces an intermediate [`LoadedScene`] that the
//! scene manager instantiates into the scene graph. Loading runs on a
//! background thread via [`LoadTask`]; the completion is consumed on
//! the UI thread with a non-blocking poll.

mod gltf;
mod task;

pub use self::gltf::GltfLoader;
pub use task::LoadTask;

use atelier_core::Color;
use glam::{Quat, Vec3};
use std::path::PathBuf;
use thiserror::Error;

/// Error type for asset loading operations
#[derive(Error, Debug)]
pub enum LoadError {
    /// File not found
    #[error("asset not found: {0}")]
    NotFound(PathBuf),
    /// IO error
    #[error("io error reading asset: {0}")]
    Io(#[from] std::io::Error),
    /// Parse error
    #[error("failed to parse asset: {0}")]
    Parse(String),
    /// Structurally valid file with unusable content
    #[error("invalid asset data: {0}")]
    InvalidData(String),
}

/// A fully loaded 3D scene
#[derive(Clone, Debug, Default)]
pub struct LoadedScene {
    /// Scene name (usually from the file name)
    pub name: String,
    /// All mesh primitives in the scene
    pub meshes: Vec<LoadedMesh>,
    /// Scene hierarchy nodes
    pub nodes: Vec<LoadedNode>,
    /// Root node indices, in document order
    pub root_nodes: Vec<usize>,
}

impl LoadedScene {
    /// Total vertex count across all meshes
    pub fn total_vertices(&self) -> usize {
        self.meshes.iter().map(|m| m.positions.len()).sum()
    }
}

/// A node in the loaded hierarchy
///
/// Child order is preserved from the source document; the binder's
/// positional node paths depend on it.
#[derive(Clone, Debug)]
pub struct LoadedNode {
    /// Node name
    pub name: String,
    /// Local transform
    pub transform: LoadedTransform,
    /// Mesh primitives attached to this node (indices into
    /// `LoadedScene::meshes`)
    pub mesh_primitives: Vec<usize>,
    /// Child node indices, in document order
    pub children: Vec<usize>,
}

/// A mesh primitive with vertex data
#[derive(Clone, Debug)]
pub struct LoadedMesh {
    /// Mesh name
    pub name: String,
    /// Vertex positions
    pub positions: Vec<Vec3>,
    /// Vertex normals; empty when the source carries none
    pub normals: Vec<Vec3>,
    /// Triangle indices
    pub indices: Vec<u32>,
    /// Material base color
    pub base_color: Color,
}

/// Decomposed node transform
#[derive(Clone, Copy, Debug)]
pub struct LoadedTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for LoadedTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}
