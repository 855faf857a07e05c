//! Scene graph, camera and lights

mod camera;
mod graph;
mod lights;
mod mesh;

pub use camera::PerspectiveCamera;
pub use graph::{Node, NodeId, SceneGraph, Transform};
pub use lights::{AmbientLight, DirectionalLight, SceneLights};
pub use mesh::{Geometry, GeometryId, Surface};
