//! # Atelier 3D
//!
//! The reactive scene-synchronization engine behind the Atelier
//! configurator. It owns the 3D scene lifecycle, binds the external
//! color configuration to fixed nodes of a loaded glTF asset, drives
//! the per-frame render loop, and keeps camera and renderer
//! consistent with viewport changes.
//!
//! The center piece is [`SceneManager`], a linear state machine
//! (`Uninitialized -> Loading -> Ready -> Disposed`). Everything it
//! touches sits behind small seams so the lifecycle can be exercised
//! without a GPU: rendering behind [`SceneRenderer`], frame
//! scheduling behind [`FrameScheduler`], asset completion delivered
//! through [`SceneManager::on_model_loaded`].
//!
//! ```rust,ignore
//! let renderer = WgpuRenderer::new(window.clone(), viewport)?;
//! let mut manager =
//!     SceneManager::new(renderer, scheduler, viewport, store.snapshot(), options);
//! manager.mount("assets/sofa.gltf")?;
//! manager.tick(dt, &input);
//! ```

pub mod binder;
pub mod frame;
pub mod loader;
pub mod manager;
pub mod orbit;
pub mod render;
pub mod scene;
pub mod viewport;

pub use binder::{BindError, ModelBinder, NodePath, PartMap};
pub use frame::{FrameHandle, FrameScheduler};
pub use loader::{GltfLoader, LoadError, LoadTask, LoadedScene};
pub use manager::{ModelHandle, SceneManager, SceneError, SceneOptions, SceneState};
pub use orbit::{OrbitController, OrbitInput};
pub use render::{FrameContext, RenderError, SceneRenderer, WgpuRenderer};
pub use scene::{
    AmbientLight, DirectionalLight, Geometry, Node, NodeId, PerspectiveCamera, SceneGraph,
    SceneLights, Surface, Transform,
};
pub use viewport::{ResizeController, Viewport};
