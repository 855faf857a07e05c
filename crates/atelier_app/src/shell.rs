//! Windowed shell
//!
//! Owns the winit event loop, the configuration store, and the scene
//! manager; keyboard swatches feed the store, mouse input feeds the
//! orbit controller, and redraw requests drive the render loop.
//!
//! Swatch bindings: keys 1-4 pick the active part (base, wood, back,
//! cushion), keys Q/W/E/R apply a palette color to it.

use crate::settings::Settings;
use anyhow::{Context, Result};
use atelier_3d::{
    FrameHandle, FrameScheduler, OrbitInput, ResizeController, SceneManager, SceneOptions,
    WgpuRenderer,
};
use atelier_core::{Color, ConfigStore, Part, PartColors};
use glam::Vec2;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

/// Everything the shell needs to start
pub struct AppConfig {
    pub model_path: PathBuf,
    pub window_width: u32,
    pub window_height: u32,
    pub settings: Settings,
}

/// Run the application until the window closes
pub fn run(config: AppConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);
    let mut app = App::new(config)?;
    event_loop.run_app(&mut app).context("event loop failed")?;
    Ok(())
}

/// Frame scheduler backed by winit redraw requests
///
/// Keeps one side of the latest frame handle so a redraw delivered
/// after disposal can be recognized and dropped.
struct WinitFrameScheduler {
    window: Arc<Window>,
    pending: Rc<RefCell<Option<FrameHandle>>>,
}

impl FrameScheduler for WinitFrameScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle::new();
        *self.pending.borrow_mut() = Some(handle.clone());
        self.window.request_redraw();
        handle
    }
}

struct App {
    config: AppConfig,
    store: ConfigStore,
    /// Snapshots pushed by the store subscription, drained into the
    /// scene manager on the same pass
    updates: Rc<RefCell<VecDeque<PartColors>>>,
    palette: Vec<Color>,
    active_part: Part,

    window: Option<Arc<Window>>,
    manager: Option<SceneManager<WgpuRenderer, WinitFrameScheduler>>,
    pending_frame: Rc<RefCell<Option<FrameHandle>>>,

    dragging: bool,
    last_cursor: Option<(f64, f64)>,
    rotate_delta: Vec2,
    scroll_delta: f32,
    last_tick: Instant,
    load_failure_shown: bool,
}

impl App {
    fn new(config: AppConfig) -> Result<Self> {
        let initial = config.settings.initial_colors()?;
        let palette = config.settings.palette_colors()?;
        let mut store = ConfigStore::new(initial);

        let updates: Rc<RefCell<VecDeque<PartColors>>> = Rc::default();
        let queue = updates.clone();
        store.subscribe(move |snapshot: &PartColors| {
            queue.borrow_mut().push_back(*snapshot);
        });

        Ok(Self {
            config,
            store,
            updates,
            palette,
            active_part: Part::Base,
            window: None,
            manager: None,
            pending_frame: Rc::default(),
            dragging: false,
            last_cursor: None,
            rotate_delta: Vec2::ZERO,
            scroll_delta: 0.0,
            last_tick: Instant::now(),
            load_failure_shown: false,
        })
    }

    fn apply_swatch(&mut self, index: usize) {
        let Some(&color) = self.palette.get(index) else {
            return;
        };
        tracing::debug!(part = %self.active_part, ?color, "swatch applied");
        self.store.set(self.active_part, color);
        self.drain_updates();
    }

    fn drain_updates(&mut self) {
        let Some(manager) = &mut self.manager else {
            return;
        };
        while let Some(snapshot) = self.updates.borrow_mut().pop_front() {
            manager.on_config_changed(snapshot);
        }
    }

    fn on_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Digit1 => self.active_part = Part::Base,
            KeyCode::Digit2 => self.active_part = Part::Wood,
            KeyCode::Digit3 => self.active_part = Part::Back,
            KeyCode::Digit4 => self.active_part = Part::Cushion,
            KeyCode::KeyQ => self.apply_swatch(0),
            KeyCode::KeyW => self.apply_swatch(1),
            KeyCode::KeyE => self.apply_swatch(2),
            KeyCode::KeyR => self.apply_swatch(3),
            _ => {}
        }
    }

    fn redraw(&mut self) {
        // A redraw delivered after disposal carries a cancelled
        // handle; drop it.
        let handle = self.pending_frame.borrow_mut().take();
        match handle {
            Some(handle) if !handle.is_cancelled() => {}
            _ => return,
        }
        let Some(manager) = &mut self.manager else {
            return;
        };

        let now = Instant::now();
        let dt = (now - self.last_tick).as_secs_f32().min(0.1);
        self.last_tick = now;

        let input = OrbitInput {
            rotate_delta: self.rotate_delta,
            scroll_delta: self.scroll_delta,
        };
        self.rotate_delta = Vec2::ZERO;
        self.scroll_delta = 0.0;

        manager.tick(dt, &input);

        if manager.load_failed() && !self.load_failure_shown {
            self.load_failure_shown = true;
            if let Some(window) = &self.window {
                window.set_title("atelier (model failed to load)");
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title("atelier")
            .with_inner_size(LogicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let pixel_ratio = window.scale_factor() as f32;
        let resize = ResizeController::new(self.config.settings.width_fraction);
        let viewport = resize.viewport_for_window(size.width, size.height, pixel_ratio);

        let renderer = match WgpuRenderer::new(window.clone(), viewport) {
            Ok(renderer) => renderer,
            Err(e) => {
                tracing::error!("failed to initialize renderer: {e}");
                event_loop.exit();
                return;
            }
        };

        let scheduler = WinitFrameScheduler {
            window: window.clone(),
            pending: self.pending_frame.clone(),
        };
        let options = SceneOptions {
            min_distance: self.config.settings.min_distance,
            max_distance: self.config.settings.max_distance,
            width_fraction: self.config.settings.width_fraction,
            ..SceneOptions::default()
        };
        let mut manager = SceneManager::new(
            renderer,
            scheduler,
            viewport,
            self.store.snapshot(),
            options,
        );
        if let Err(e) = manager.mount(self.config.model_path.clone()) {
            tracing::error!("failed to mount scene: {e}");
            event_loop.exit();
            return;
        }

        self.last_tick = Instant::now();
        self.window = Some(window);
        self.manager = Some(manager);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                if let Some(manager) = &mut self.manager {
                    manager.dispose();
                }
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                let pixel_ratio = self
                    .window
                    .as_ref()
                    .map(|w| w.scale_factor() as f32)
                    .unwrap_or(1.0);
                if let Some(manager) = &mut self.manager {
                    manager.on_resize(size.width, size.height, pixel_ratio);
                }
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => self.on_key(code),

            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                self.dragging = state == ElementState::Pressed;
                if !self.dragging {
                    self.last_cursor = None;
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                if self.dragging {
                    if let Some((x, y)) = self.last_cursor {
                        self.rotate_delta +=
                            Vec2::new((position.x - x) as f32, (position.y - y) as f32);
                    }
                }
                self.last_cursor = Some((position.x, position.y));
            }

            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll_delta += match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32 / 60.0,
                };
            }

            WindowEvent::RedrawRequested => {
                self.drain_updates();
                self.redraw();
            }

            _ => {}
        }
    }
}
