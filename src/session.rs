//! Demo session: owns every GPU resource and runs the frame protocol.
//!
//! One `GrassSession` holds the context, buffers, pipelines, parameter
//! state, and the pending-change queue. Changes pushed from the UI are
//! drained once at the start of each frame, so an event arriving mid-frame
//! never lands half-applied in an in-flight command buffer.

use crate::core::error::Error;
use crate::core::types::Result;
use crate::params::{ParamChange, ParamGroup, ParamQueue, ParameterSet};
use crate::render::buffer::{BladeMesh, CameraBuffer, PositionBuffer};
use crate::render::context::GpuContext;
use crate::render::pipeline::blades::{self, BladePipeline};
use crate::render::pipeline::scatter::{BLADE_COUNT, ScatterParams, ScatterPipeline};
use crate::transform::{self, CameraBlock};

/// View spin rate under auto-rotate, radians per second.
pub const AUTO_ROTATE_SPEED: f32 = 0.5;

/// Frame scheduler state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    /// Constructed, no frame requested yet.
    Idle,
    /// Steady-state loop; left only by dropping the session.
    Running,
}

/// The grass demo session.
pub struct GrassSession {
    gpu: GpuContext,
    camera_block: CameraBlock,
    camera_buffer: CameraBuffer,
    mesh: BladeMesh,
    positions: PositionBuffer,
    scatter: ScatterPipeline,
    blades: BladePipeline,
    #[allow(dead_code)]
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    params: ParameterSet,
    changes: ParamQueue,
    elapsed: f32,
    state: SchedulerState,
}

impl GrassSession {
    /// Build every buffer and pipeline, upload the initial uniform block,
    /// and run the first scatter pass.
    pub fn new(gpu: GpuContext) -> Result<Self> {
        let params = ParameterSet::default();

        let camera_buffer = CameraBuffer::new(&gpu.device);
        let mesh = BladeMesh::new(&gpu.device, &gpu.queue, &params.colors);
        let positions = PositionBuffer::new(&gpu.device);
        let scatter = ScatterPipeline::new(&gpu.device, &positions);
        let blades = BladePipeline::new(&gpu.device, gpu.format(), &camera_buffer, &positions);

        let (width, height) = gpu.size();
        let (depth_texture, depth_view) = blades::create_depth_texture(&gpu.device, width, height);

        let mut camera_block = CameraBlock::new();
        camera_block.set_projection(transform::projection_matrix(
            width as f32 / height as f32,
            params.orthographic,
        ));
        camera_block.set_view(transform::view_matrix(params.translation, params.rotation));
        camera_block.set_model(transform::model_matrix(params.scale));
        camera_block.set_time(0.0);
        camera_buffer.write_all(&gpu.queue, &camera_block);

        let mut session = Self {
            gpu,
            camera_block,
            camera_buffer,
            mesh,
            positions,
            scatter,
            blades,
            depth_texture,
            depth_view,
            params,
            changes: ParamQueue::new(),
            elapsed: 0.0,
            state: SchedulerState::Idle,
        };
        session.regenerate_positions();

        log::info!("Session ready: {} blades", BLADE_COUNT);
        Ok(session)
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn blade_count(&self) -> u32 {
        BLADE_COUNT
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Queue a parameter change for the next frame.
    pub fn push_change(&mut self, change: ParamChange) {
        self.changes.push(change);
    }

    /// Rerun the scatter pass over the fixed grid.
    ///
    /// Writes the current scatter parameters and submits one compute pass.
    /// Same parameters always produce the same position buffer contents.
    pub fn regenerate_positions(&mut self) {
        self.scatter
            .write_params(&self.gpu.queue, &ScatterParams::from_params(&self.params));

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("scatter_encoder"),
            });
        self.scatter.dispatch(&mut encoder);
        self.gpu.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Diagnostic: read the generated positions back to the CPU.
    pub fn read_positions(&self) -> Result<Vec<crate::render::buffer::GpuPosition>> {
        self.positions.read_back(&self.gpu.device, &self.gpu.queue)
    }

    /// Handle a surface resize: reconfigure, rebuild the depth attachment,
    /// and rewrite the projection slot for the new aspect ratio.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.gpu.resize(width, height);
        let (depth_texture, depth_view) =
            blades::create_depth_texture(&self.gpu.device, width, height);
        self.depth_texture = depth_texture;
        self.depth_view = depth_view;

        self.camera_block.set_projection(transform::projection_matrix(
            width as f32 / height as f32,
            self.params.orthographic,
        ));
        self.camera_buffer
            .write_projection(&self.gpu.queue, &self.camera_block);
    }

    fn apply_change(&mut self, change: ParamChange) {
        self.params = change.params;
        let (width, height) = self.gpu.size();

        match change.group {
            ParamGroup::Colors => {
                self.mesh.rebuild_colors(&self.gpu.queue, &self.params.colors);
            }
            ParamGroup::Scatter => {
                self.regenerate_positions();
            }
            ParamGroup::Model => {
                self.camera_block
                    .set_model(transform::model_matrix(self.params.scale));
                self.camera_buffer
                    .write_model(&self.gpu.queue, &self.camera_block);
            }
            ParamGroup::View => {
                self.camera_block.set_view(transform::view_matrix(
                    self.params.translation,
                    self.params.rotation,
                ));
                self.camera_buffer
                    .write_view(&self.gpu.queue, &self.camera_block);
            }
            ParamGroup::Projection => {
                self.camera_block.set_projection(transform::projection_matrix(
                    width as f32 / height as f32,
                    self.params.orthographic,
                ));
                self.camera_buffer
                    .write_projection(&self.gpu.queue, &self.camera_block);
            }
        }
    }

    /// Run one frame with the given time step.
    ///
    /// The caller owns the clock: the demo passes measured deltas, tests
    /// can pass fixed ones. A swapchain hiccup skips the frame and is not
    /// an error.
    pub fn frame(&mut self, dt: f32) -> Result<()> {
        if self.state == SchedulerState::Idle {
            self.state = SchedulerState::Running;
        }

        // Apply pending parameter changes before any buffer is read.
        let pending: Vec<ParamChange> = self.changes.drain().collect();
        for change in pending {
            self.apply_change(change);
        }

        self.elapsed += dt;
        self.camera_block.set_time(self.elapsed);
        self.camera_buffer.write_time(&self.gpu.queue, &self.camera_block);

        if self.params.auto_rotate {
            let spun = transform::spin_view(self.camera_block.view(), dt * AUTO_ROTATE_SPEED);
            self.camera_block.set_view(spun);
            self.camera_buffer.write_view(&self.gpu.queue, &self.camera_block);
        }

        let frame = match self.gpu.get_current_texture() {
            Ok(frame) => frame,
            Err(Error::Gpu(e)) => {
                log::warn!("Skipping frame, surface unavailable: {}", e);
                let (width, height) = self.gpu.size();
                self.gpu.resize(width, height);
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        let target = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });
        self.blades.render(
            &mut encoder,
            &target,
            &self.depth_view,
            &self.mesh,
            BLADE_COUNT,
        );
        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        frame.present();

        Ok(())
    }
}
