//! Cellular-automaton variant: a Game of Life grid simulated on the GPU.
//!
//! Two state buffers alternate roles across steps. The parity index is
//! explicit scheduler state: bind group `i` reads state `i` and writes
//! state `1 - i`, and one step advances the parity, so the render pass
//! always samples the buffer the step just produced.

use bytemuck::{Pod, Zeroable};

/// Cells per grid side.
pub const GRID_SIZE: u32 = 256;
/// Total cell count, also the render pass instance count.
pub const CELL_COUNT: u32 = GRID_SIZE * GRID_SIZE;
/// Workgroup side length. Must match `@workgroup_size` in life_step.wgsl.
pub const WORKGROUP_SIZE: u32 = 8;

/// Quad covering most of one grid cell, as two triangles.
const CELL_VERTICES: [f32; 12] = [
    -0.8, -0.8, 0.8, -0.8, 0.8, 0.8, //
    -0.8, -0.8, 0.8, 0.8, -0.8, 0.8,
];

/// Grid dimensions uniform. Must match `grid` in the life shaders.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct GridUniform {
    size: [f32; 2],
}

/// Explicit ping-pong parity owned by the stepper.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PingPong {
    index: u32,
}

impl PingPong {
    pub fn new() -> Self {
        Self { index: 0 }
    }

    /// Index of the buffer the next step reads.
    pub fn input(&self) -> u32 {
        self.index
    }

    /// Index of the buffer the next step writes.
    pub fn output(&self) -> u32 {
        1 - self.index
    }

    /// Advance after one simulation step.
    pub fn advance(&mut self) {
        self.index = 1 - self.index;
    }
}

/// GPU resources and scheduler state for the automaton.
pub struct LifeSim {
    #[allow(dead_code)]
    grid_buffer: wgpu::Buffer,
    #[allow(dead_code)]
    state_buffers: [wgpu::Buffer; 2],
    vertex_buffer: wgpu::Buffer,
    bind_groups: [wgpu::BindGroup; 2],
    compute_pipeline: wgpu::ComputePipeline,
    render_pipeline: wgpu::RenderPipeline,
    parity: PingPong,
    steps: u64,
}

impl LifeSim {
    /// Build buffers and pipelines and seed both state buffers from the
    /// given predicate so runs are reproducible.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        seed: impl Fn(u32) -> bool,
    ) -> Self {
        let grid_uniform = GridUniform {
            size: [GRID_SIZE as f32, GRID_SIZE as f32],
        };
        let grid_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("life_grid"),
            size: std::mem::size_of::<GridUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        queue.write_buffer(&grid_buffer, 0, bytemuck::bytes_of(&grid_uniform));

        let state_size = (CELL_COUNT as u64) * (std::mem::size_of::<u32>() as u64);
        let state_buffers = [
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("life_state_a"),
                size: state_size,
                usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }),
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("life_state_b"),
                size: state_size,
                usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }),
        ];

        let initial: Vec<u32> = (0..CELL_COUNT).map(|i| u32::from(seed(i))).collect();
        queue.write_buffer(&state_buffers[0], 0, bytemuck::cast_slice(&initial));
        queue.write_buffer(&state_buffers[1], 0, bytemuck::cast_slice(&initial));

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("life_cell_vertices"),
            size: std::mem::size_of_val(&CELL_VERTICES) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        queue.write_buffer(&vertex_buffer, 0, bytemuck::cast_slice(&CELL_VERTICES));

        // One layout serves both pipelines; the render stages simply never
        // touch the writable binding.
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("life_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX
                        | wgpu::ShaderStages::FRAGMENT
                        | wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: false },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let bind_groups = [0usize, 1].map(|i| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("life_bind_group"),
                layout: &bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: grid_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: state_buffers[i].as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: state_buffers[1 - i].as_entire_binding(),
                    },
                ],
            })
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("life_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let step_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("life_step_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../../shaders/life_step.wgsl").into()),
        });
        let compute_pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("life_step_pipeline"),
            layout: Some(&pipeline_layout),
            module: &step_shader,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        let cell_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("life_cell_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../../shaders/life.wgsl").into()),
        });
        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("life_cell_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &cell_shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: 8,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x2,
                        offset: 0,
                        shader_location: 0,
                    }],
                }],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &cell_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        Self {
            grid_buffer,
            state_buffers,
            vertex_buffer,
            bind_groups,
            compute_pipeline,
            render_pipeline,
            parity: PingPong::new(),
            steps: 0,
        }
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn parity(&self) -> PingPong {
        self.parity
    }

    /// Record one simulation step and advance the parity.
    pub fn step(&mut self, encoder: &mut wgpu::CommandEncoder) {
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("life_step_pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.compute_pipeline);
            pass.set_bind_group(0, &self.bind_groups[self.parity.input() as usize], &[]);
            let workgroups = GRID_SIZE.div_ceil(WORKGROUP_SIZE);
            pass.dispatch_workgroups(workgroups, workgroups, 1);
        }
        self.parity.advance();
        self.steps += 1;
    }

    /// Record the cell render pass reading the freshly written state.
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("life_cell_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: 0.1,
                        g: 0.2,
                        b: 0.1,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        pass.set_pipeline(&self.render_pipeline);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_bind_group(0, &self.bind_groups[self.parity.input() as usize], &[]);
        pass.draw(0..(CELL_VERTICES.len() as u32 / 2), 0..CELL_COUNT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parity_alternates() {
        let mut p = PingPong::new();
        assert_eq!(p.input(), 0);
        assert_eq!(p.output(), 1);
        p.advance();
        assert_eq!(p.input(), 1);
        assert_eq!(p.output(), 0);
        p.advance();
        assert_eq!(p, PingPong::new());
    }

    #[test]
    fn test_parity_matches_step_count() {
        let mut p = PingPong::new();
        for n in 0..7u32 {
            assert_eq!(p.input(), n % 2);
            p.advance();
        }
    }

    #[test]
    fn test_cell_count() {
        assert_eq!(CELL_COUNT, 65536);
        assert_eq!(GRID_SIZE % WORKGROUP_SIZE, 0);
    }
}
