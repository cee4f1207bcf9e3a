//! Storage buffer of per-blade origins
//!
//! Written only by the scatter compute pass, read by the render pass as a
//! per-instance lookup. Contents persist across frames until the scatter
//! parameters change and the pass reruns in full.

use bytemuck::{Pod, Zeroable};

use crate::core::error::Error;
use crate::render::pipeline::scatter::BLADE_COUNT;

/// One blade origin as the compute shader writes it. Must match the
/// `array<vec4f>` element layout in scatter.wgsl.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuPosition {
    pub position: [f32; 3],
    pub _pad: f32,
}

/// Storage buffer of `BLADE_COUNT` positions plus a staging buffer for the
/// one-shot diagnostic readback.
pub struct PositionBuffer {
    storage: wgpu::Buffer,
    staging: wgpu::Buffer,
}

impl PositionBuffer {
    pub fn size_bytes() -> u64 {
        (BLADE_COUNT as u64) * (std::mem::size_of::<GpuPosition>() as u64)
    }

    pub fn new(device: &wgpu::Device) -> Self {
        let storage = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("blade_positions"),
            size: Self::size_bytes(),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("blade_positions_staging"),
            size: Self::size_bytes(),
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self { storage, staging }
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.storage
    }

    /// Copy the storage buffer to the CPU and return its records.
    ///
    /// Blocks until the GPU signals the staging buffer is host-readable and
    /// releases the mapping before returning. This is a one-shot diagnostic;
    /// it is never called on the steady-state frame path.
    pub fn read_back(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> Result<Vec<GpuPosition>, Error> {
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("position_readback_encoder"),
        });
        encoder.copy_buffer_to_buffer(&self.storage, 0, &self.staging, 0, Self::size_bytes());
        queue.submit(std::iter::once(encoder.finish()));

        let slice = self.staging.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            tx.send(result).ok();
        });
        device
            .poll(wgpu::PollType::Wait { submission_index: None, timeout: None })
            .map_err(|e| Error::Gpu(format!("poll failed: {:?}", e)))?;

        rx.recv()
            .map_err(|e| Error::Gpu(format!("readback channel closed: {}", e)))?
            .map_err(|e| Error::Gpu(format!("map failed: {:?}", e)))?;

        let positions = {
            let data = slice.get_mapped_range();
            bytemuck::cast_slice::<u8, GpuPosition>(&data).to_vec()
        };
        self.staging.unmap();

        Ok(positions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_record_size() {
        assert_eq!(std::mem::size_of::<GpuPosition>(), 16);
    }

    #[test]
    fn test_buffer_holds_all_blades() {
        assert_eq!(PositionBuffer::size_bytes(), BLADE_COUNT as u64 * 16);
    }
}
