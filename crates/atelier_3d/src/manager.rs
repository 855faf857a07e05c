//! Scene manager
//!
//! Owns the scene graph, camera, lights, binder and renderer, and
//! drives them through a linear lifecycle:
//!
//! ```text
//! Uninitialized -> Loading -> Ready -> Disposed
//! ```
//!
//! The model loads on a background thread; everything else happens on
//! the thread that ticks the manager. Disposal is a barrier: every
//! entry point checks for it first, so a late load completion or a
//! stray tick after teardown does nothing.

use crate::binder::{ModelBinder, PartMap};
use crate::frame::{FrameHandle, FrameScheduler};
use crate::loader::{LoadError, LoadTask, LoadedScene};
use crate::orbit::{OrbitController, OrbitInput};
use crate::render::{FrameContext, RenderError, SceneRenderer};
use crate::scene::{
    AmbientLight, DirectionalLight, Geometry, Node, NodeId, PerspectiveCamera, SceneGraph,
    SceneLights, Surface, Transform,
};
use crate::viewport::{ResizeController, Viewport};
use atelier_core::{Color, PartColors};
use glam::Vec3;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Lifecycle state, advancing strictly forward
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneState {
    /// Constructed, no load started
    Uninitialized,
    /// Model load in flight (or failed; rendering continues either way)
    Loading,
    /// Model instantiated and visible
    Ready,
    /// Torn down; every operation is a no-op
    Disposed,
}

/// Root of the instantiated model subtree
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModelHandle {
    root: NodeId,
}

impl ModelHandle {
    pub fn root(&self) -> NodeId {
        self.root
    }
}

#[derive(Error, Debug)]
pub enum SceneError {
    /// Operation attempted in a state that does not allow it
    #[error("invalid state {actual:?} for {operation}")]
    InvalidState {
        operation: &'static str,
        actual: SceneState,
    },
}

/// Scene setup parameters
#[derive(Clone, Debug)]
pub struct SceneOptions {
    /// Clear color behind the scene
    pub background: Color,
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
    /// Vertical field of view in radians
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Initial camera position
    pub eye: Vec3,
    /// Orbit pivot, also the look-at point
    pub target: Vec3,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Part to node-path map for the model asset
    pub part_map: PartMap,
    /// Share of the window width given to the viewport
    pub width_fraction: f32,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            ambient: AmbientLight::white(1.7),
            directional: DirectionalLight::white(2.0, Vec3::new(0.0, 5.0, 2.0)),
            fov: 75f32.to_radians(),
            near: 0.1,
            far: 1000.0,
            eye: Vec3::new(0.0, 1.0, 2.0),
            target: Vec3::ZERO,
            min_distance: 1.5,
            max_distance: 15.0,
            part_map: PartMap::sofa(),
            width_fraction: 0.5,
        }
    }
}

/// The scene lifecycle driver
///
/// Generic over the renderer and frame scheduler so the lifecycle can
/// be exercised without a window or GPU.
pub struct SceneManager<R, S> {
    state: SceneState,
    graph: SceneGraph,
    camera: PerspectiveCamera,
    orbit: OrbitController,
    lights: SceneLights,
    binder: ModelBinder,
    resize: ResizeController,
    viewport: Viewport,
    renderer: Option<R>,
    scheduler: S,
    load: Option<LoadTask>,
    model: Option<ModelHandle>,
    load_failed: bool,
    pending_frame: Option<FrameHandle>,
}

impl<R: SceneRenderer, S: FrameScheduler> SceneManager<R, S> {
    /// Build the scene around an already-initialized renderer
    ///
    /// Renderer construction is the fatal path and happens before
    /// this; from here on, failures are logged and survived.
    pub fn new(
        renderer: R,
        scheduler: S,
        viewport: Viewport,
        initial: PartColors,
        options: SceneOptions,
    ) -> Self {
        let mut graph = SceneGraph::new();
        graph.background = options.background;

        let camera = PerspectiveCamera::new(options.fov, viewport.aspect(), options.near, options.far);
        let orbit = OrbitController::from_eye(options.target, options.eye)
            .with_distance_bounds(options.min_distance, options.max_distance);
        let lights = SceneLights::new(options.ambient, options.directional);
        let binder = ModelBinder::new(options.part_map, initial);
        let resize = ResizeController::new(options.width_fraction);

        Self {
            state: SceneState::Uninitialized,
            graph,
            camera,
            orbit,
            lights,
            binder,
            resize,
            viewport,
            renderer: Some(renderer),
            scheduler,
            load: None,
            model: None,
            load_failed: false,
            pending_frame: None,
        }
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    pub fn model(&self) -> Option<ModelHandle> {
        self.model
    }

    /// Whether the model load finished with an error
    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn orbit(&self) -> &OrbitController {
        &self.orbit
    }

    /// The resize controller's width fraction
    pub fn width_fraction(&self) -> f32 {
        self.resize.width_fraction()
    }

    /// Start loading the model and enter the render loop
    pub fn mount(&mut self, model_path: impl Into<PathBuf>) -> Result<(), SceneError> {
        if self.state != SceneState::Uninitialized {
            return Err(SceneError::InvalidState {
                operation: "mount",
                actual: self.state,
            });
        }
        let path = model_path.into();
        tracing::info!(path = %path.display(), "mounting scene");
        self.load = Some(LoadTask::spawn(path));
        self.state = SceneState::Loading;
        self.request_frame();
        Ok(())
    }

    /// Handle the completion of the model load
    ///
    /// On success the subtree is instantiated into the graph, its
    /// geometry uploaded, and the pending configuration flushed. On
    /// failure the scene keeps rendering without a model; camera,
    /// lights and background stay live and pending configuration
    /// stays pending.
    pub fn on_model_loaded(&mut self, result: Result<LoadedScene, LoadError>) {
        if self.state != SceneState::Loading {
            tracing::debug!(state = ?self.state, "ignoring load completion");
            return;
        }
        let scene = match result {
            Ok(scene) => scene,
            Err(error) => {
                tracing::error!(%error, "model load failed; continuing without model");
                self.load_failed = true;
                return;
            }
        };

        tracing::info!(
            name = %scene.name,
            nodes = scene.nodes.len(),
            meshes = scene.meshes.len(),
            "model loaded"
        );
        let root = self.instantiate(&scene);
        if let Some(renderer) = &mut self.renderer {
            if let Err(error) = renderer.upload(&self.graph, root) {
                tracing::error!(%error, "geometry upload failed");
            }
        }
        self.model = Some(ModelHandle { root });
        self.binder.flush(root, &mut self.graph);
        self.state = SceneState::Ready;
    }

    /// React to a configuration snapshot from the store
    pub fn on_config_changed(&mut self, snapshot: PartColors) {
        if self.state == SceneState::Disposed {
            return;
        }
        let root = self.model.map(|m| m.root);
        self.binder.apply(snapshot, root, &mut self.graph);
    }

    /// React to a window resize
    pub fn on_resize(&mut self, window_width: u32, window_height: u32, pixel_ratio: f32) {
        if self.state == SceneState::Disposed {
            return;
        }
        let viewport = self
            .resize
            .viewport_for_window(window_width, window_height, pixel_ratio);
        self.viewport = viewport;
        self.camera.set_aspect(viewport.aspect());
        if let Some(renderer) = &mut self.renderer {
            renderer.resize(viewport);
        }
    }

    /// Advance one frame: poll the load, step the orbit, draw, and
    /// schedule the next tick
    ///
    /// The loop runs from `Loading` until `Disposed`; before mount
    /// and after disposal this is a no-op.
    pub fn tick(&mut self, dt: f32, input: &OrbitInput) {
        if !matches!(self.state, SceneState::Loading | SceneState::Ready) {
            return;
        }

        if let Some(mut task) = self.load.take() {
            match task.poll() {
                Some(result) => self.on_model_loaded(result),
                None => self.load = Some(task),
            }
        }

        self.orbit.update(dt, input);

        if let Some(renderer) = &mut self.renderer {
            let frame = FrameContext {
                graph: &self.graph,
                camera: &self.camera,
                eye: self.orbit.eye(),
                target: self.orbit.target,
                lights: &self.lights,
            };
            match renderer.render(&frame) {
                Ok(()) => {}
                Err(RenderError::OutOfMemory) => {
                    tracing::error!("out of GPU memory, disposing scene");
                    self.dispose();
                    return;
                }
                Err(error) => tracing::warn!(%error, "frame skipped"),
            }
        }

        self.request_frame();
    }

    /// Tear the scene down
    ///
    /// Idempotent. Cancels the scheduled frame, abandons any in-flight
    /// load, and releases the renderer.
    pub fn dispose(&mut self) {
        if self.state == SceneState::Disposed {
            return;
        }
        tracing::info!(state = ?self.state, "disposing scene");
        if let Some(handle) = self.pending_frame.take() {
            handle.cancel();
        }
        self.load = None;
        self.renderer = None;
        self.model = None;
        self.state = SceneState::Disposed;
    }

    fn request_frame(&mut self) {
        self.pending_frame = Some(self.scheduler.request_frame());
    }

    /// Instantiate a loaded scene under a fresh node, returning the
    /// subtree root
    fn instantiate(&mut self, scene: &LoadedScene) -> NodeId {
        let geometries: Vec<Arc<Geometry>> = scene
            .meshes
            .iter()
            .map(|mesh| {
                Arc::new(Geometry::new(
                    mesh.positions.clone(),
                    mesh.normals.clone(),
                    mesh.indices.clone(),
                ))
            })
            .collect();

        let scene_root = self.graph.root();
        let model_root = self
            .graph
            .attach(scene_root, Node::new(scene.name.clone()))
            .unwrap_or(scene_root);
        for &index in &scene.root_nodes {
            self.instantiate_node(scene, &geometries, index, model_root);
        }
        model_root
    }

    fn instantiate_node(
        &mut self,
        scene: &LoadedScene,
        geometries: &[Arc<Geometry>],
        index: usize,
        parent: NodeId,
    ) {
        let loaded = &scene.nodes[index];
        let transform = Transform {
            position: loaded.transform.position,
            rotation: loaded.transform.rotation,
            scale: loaded.transform.scale,
        };
        let mut node = Node::new(loaded.name.clone()).with_transform(transform);
        if let Some(&first) = loaded.mesh_primitives.first() {
            node = node.with_surface(Surface::new(
                geometries[first].clone(),
                scene.meshes[first].base_color,
            ));
        }
        let Some(id) = self.graph.attach(parent, node) else {
            return;
        };
        for &child in &loaded.children {
            self.instantiate_node(scene, geometries, child, id);
        }
        // Extra primitives become trailing children so declared child
        // positions stay stable.
        for &primitive in loaded.mesh_primitives.iter().skip(1) {
            let extra = Node::new(format!("{}-{primitive}", loaded.name)).with_surface(
                Surface::new(
                    geometries[primitive].clone(),
                    scene.meshes[primitive].base_color,
                ),
            );
            self.graph.attach(id, extra);
        }
    }
}
