//! Position scatter compute pipeline
//!
//! One invocation writes one blade origin, derived from a hash of the
//! invocation index and the four scatter parameters. The hash has no other
//! inputs, so equal parameters always regenerate byte-identical buffers.

use bytemuck::{Pod, Zeroable};

use crate::params::ParameterSet;
use crate::render::buffer::PositionBuffer;

/// Workgroups dispatched along x.
pub const DISPATCH_X: u32 = 16;
/// Workgroups dispatched along z.
pub const DISPATCH_Z: u32 = 16;
/// Invocations per workgroup. Must match `@workgroup_size` in scatter.wgsl.
pub const WORKGROUP_SIZE: u32 = 64;
/// Total blade origins produced by one dispatch.
pub const BLADE_COUNT: u32 = DISPATCH_X * DISPATCH_Z * WORKGROUP_SIZE;

/// GPU uniform for the scatter pass. Must match `ScatterParams` in
/// scatter.wgsl (16 bytes, 16-byte aligned).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ScatterParams {
    pub density: f32,
    pub xz_variance: f32,
    pub y_variance: f32,
    pub y_height: f32,
}

impl ScatterParams {
    pub fn from_params(params: &ParameterSet) -> Self {
        Self {
            density: params.density,
            xz_variance: params.xz_variance,
            y_variance: params.y_variance,
            y_height: params.y_height,
        }
    }
}

/// Compute pipeline that fills the blade position buffer.
pub struct ScatterPipeline {
    pipeline: wgpu::ComputePipeline,
    params_buffer: wgpu::Buffer,
    #[allow(dead_code)]
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl ScatterPipeline {
    pub fn new(device: &wgpu::Device, positions: &PositionBuffer) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scatter_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../../../shaders/scatter.wgsl").into()),
        });

        let params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scatter_params"),
            size: std::mem::size_of::<ScatterParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scatter_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: false },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scatter_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: positions.buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: params_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scatter_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("scatter_pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        Self {
            pipeline,
            params_buffer,
            bind_group_layout,
            bind_group,
        }
    }

    /// Upload scatter parameters ahead of a dispatch.
    pub fn write_params(&self, queue: &wgpu::Queue, params: &ScatterParams) {
        queue.write_buffer(&self.params_buffer, 0, bytemuck::bytes_of(params));
    }

    /// Record the fixed-grid compute pass.
    pub fn dispatch(&self, encoder: &mut wgpu::CommandEncoder) {
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("scatter_pass"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.dispatch_workgroups(DISPATCH_X, DISPATCH_Z, 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_size_and_alignment() {
        assert_eq!(std::mem::size_of::<ScatterParams>(), 16);
        assert_eq!(std::mem::size_of::<ScatterParams>() % 16, 0);
    }

    #[test]
    fn test_blade_count_matches_grid() {
        assert_eq!(BLADE_COUNT, DISPATCH_X * DISPATCH_Z * WORKGROUP_SIZE);
        assert_eq!(BLADE_COUNT, 16384);
    }

    #[test]
    fn test_packing_is_deterministic() {
        let params = ParameterSet::default();
        let a = ScatterParams::from_params(&params);
        let b = ScatterParams::from_params(&params);
        assert_eq!(bytemuck::bytes_of(&a), bytemuck::bytes_of(&b));
    }

    #[test]
    fn test_packing_order() {
        let mut params = ParameterSet::default();
        params.density = 1.0;
        params.xz_variance = 2.0;
        params.y_variance = 3.0;
        params.y_height = 4.0;
        let packed = ScatterParams::from_params(&params);
        let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&packed));
        assert_eq!(floats, &[1.0, 2.0, 3.0, 4.0]);
    }
}
