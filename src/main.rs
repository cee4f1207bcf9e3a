//! Meadow - GPU grass demo

use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use meadow::core::{logging, time::FrameTimer};
use meadow::params::{ParamChange, ParamGroup, ParameterSet};
use meadow::render::context::GpuContext;
use meadow::session::GrassSession;

const WINDOW_WIDTH: u32 = 900;
const WINDOW_HEIGHT: u32 = 900;

/// Gradient presets cycled with the C key, base to tip.
const COLOR_PRESETS: [[[u8; 3]; 4]; 3] = [
    [[20, 60, 10], [50, 120, 30], [110, 180, 60], [200, 230, 140]],
    [[40, 30, 10], [120, 90, 30], [190, 160, 60], [240, 220, 150]],
    [[10, 40, 50], [30, 90, 110], [80, 160, 170], [190, 230, 230]],
];

struct App {
    window: Option<Arc<Window>>,
    session: Option<GrassSession>,
    timer: FrameTimer,
    /// The control-panel side of the parameter state. Key presses mutate
    /// this copy and send snapshots, the way a widget library would.
    panel: ParameterSet,
    color_preset: usize,
}

impl App {
    fn new() -> Self {
        Self {
            window: None,
            session: None,
            timer: FrameTimer::new(),
            panel: ParameterSet::default(),
            color_preset: 0,
        }
    }

    fn send(&mut self, group: ParamGroup) {
        if let Some(session) = &mut self.session {
            session.push_change(ParamChange {
                group,
                params: self.panel.clone(),
            });
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::ArrowLeft => {
                self.panel.rotation.y -= 5.0;
                self.send(ParamGroup::View);
            }
            KeyCode::ArrowRight => {
                self.panel.rotation.y += 5.0;
                self.send(ParamGroup::View);
            }
            KeyCode::ArrowUp => {
                self.panel.rotation.x -= 5.0;
                self.send(ParamGroup::View);
            }
            KeyCode::ArrowDown => {
                self.panel.rotation.x += 5.0;
                self.send(ParamGroup::View);
            }
            KeyCode::KeyR => {
                self.panel.auto_rotate = !self.panel.auto_rotate;
                log::info!("Auto-rotate: {}", self.panel.auto_rotate);
                self.send(ParamGroup::View);
            }
            KeyCode::KeyP => {
                self.panel.orthographic = !self.panel.orthographic;
                log::info!(
                    "Projection: {}",
                    if self.panel.orthographic { "orthographic" } else { "perspective" }
                );
                self.send(ParamGroup::Projection);
            }
            KeyCode::Equal => {
                self.panel.density = (self.panel.density + 0.25).min(4.0);
                log::info!("Density: {:.2}", self.panel.density);
                self.send(ParamGroup::Scatter);
            }
            KeyCode::Minus => {
                self.panel.density = (self.panel.density - 0.25).max(0.25);
                log::info!("Density: {:.2}", self.panel.density);
                self.send(ParamGroup::Scatter);
            }
            KeyCode::BracketRight => {
                self.panel.xz_variance = (self.panel.xz_variance + 0.1).min(2.0);
                self.send(ParamGroup::Scatter);
            }
            KeyCode::BracketLeft => {
                self.panel.xz_variance = (self.panel.xz_variance - 0.1).max(0.0);
                self.send(ParamGroup::Scatter);
            }
            KeyCode::KeyC => {
                self.color_preset = (self.color_preset + 1) % COLOR_PRESETS.len();
                self.panel.colors = COLOR_PRESETS[self.color_preset];
                self.send(ParamGroup::Colors);
            }
            KeyCode::Comma => {
                self.panel.scale = (self.panel.scale - 0.1).max(0.2);
                self.send(ParamGroup::Model);
            }
            KeyCode::Period => {
                self.panel.scale = (self.panel.scale + 0.1).min(4.0);
                self.send(ParamGroup::Model);
            }
            _ => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title("Meadow")
            .with_inner_size(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("Failed to create window"),
        );

        let gpu = pollster::block_on(GpuContext::new(window.clone()))
            .expect("Failed to create GPU context");
        log::info!("GPU: {}", gpu.adapter.get_info().name);

        let session = GrassSession::new(gpu).expect("Failed to build session");

        self.window = Some(window);
        self.session = Some(session);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(session) = &mut self.session {
                    session.resize(size.width, size.height);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return;
                }
                if let PhysicalKey::Code(code) = event.physical_key {
                    if code == KeyCode::Escape {
                        event_loop.exit();
                        return;
                    }
                    self.handle_key(code);
                }
            }
            WindowEvent::RedrawRequested => {
                self.timer.tick();
                if let Some(session) = &mut self.session {
                    if let Err(e) = session.frame(self.timer.delta_secs()) {
                        log::error!("Frame failed: {}", e);
                        event_loop.exit();
                        return;
                    }
                }
                if self.timer.frame_count() % 240 == 0 {
                    log::info!("FPS: {:.1}", self.timer.fps());
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() {
    logging::init();

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
    }
}
