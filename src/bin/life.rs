//! Cellular-automaton demo: the earlier grid variant of the renderer.

use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use meadow::core::{logging, time::FrameTimer};
use meadow::life::LifeSim;
use meadow::render::context::GpuContext;

const WINDOW_SIZE: u32 = 1200;

struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    sim: Option<LifeSim>,
    timer: FrameTimer,
}

impl App {
    fn new() -> Self {
        Self {
            window: None,
            gpu: None,
            sim: None,
            timer: FrameTimer::new(),
        }
    }

    fn frame(&mut self) {
        let (Some(gpu), Some(sim)) = (&self.gpu, &mut self.sim) else {
            return;
        };

        let frame = match gpu.get_current_texture() {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("Skipping frame, surface unavailable: {}", e);
                return;
            }
        };
        let target = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("life_encoder"),
            });
        sim.step(&mut encoder);
        sim.render(&mut encoder, &target);
        gpu.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title("Meadow - Life")
            .with_inner_size(PhysicalSize::new(WINDOW_SIZE, WINDOW_SIZE));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("Failed to create window"),
        );

        let gpu = pollster::block_on(GpuContext::new(window.clone()))
            .expect("Failed to create GPU context");
        log::info!("GPU: {}", gpu.adapter.get_info().name);

        // Seed roughly a tenth of the cells, reproducibly, from a hash of
        // the cell index.
        let sim = LifeSim::new(&gpu.device, &gpu.queue, gpu.format(), |i| {
            let h = i.wrapping_mul(2654435761) ^ (i >> 13);
            h % 10 == 0
        });

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.sim = Some(sim);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                self.timer.tick();
                self.frame();
                if self.timer.frame_count() % 240 == 0 {
                    if let Some(sim) = &self.sim {
                        log::info!("FPS: {:.1}, steps: {}", self.timer.fps(), sim.steps());
                    }
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
