//! GPU uniform buffer for the camera block
//!
//! The block holds projection, view, and model matrices plus the padded
//! elapsed-time field (see `transform::CameraBlock` for the exact layout).
//! Each writer targets only its own sub-range: time changes every frame,
//! view changes every frame only under auto-rotate, and the matrices change
//! on their parameter group, so whole-block uploads would waste bandwidth.

use crate::transform::CameraBlock;

/// Uniform buffer sized to one `CameraBlock`, updated by sub-range.
pub struct CameraBuffer {
    buffer: wgpu::Buffer,
}

impl CameraBuffer {
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("camera_block"),
            size: CameraBlock::SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self { buffer }
    }

    /// Upload every field of the block. Used once at startup.
    pub fn write_all(&self, queue: &wgpu::Queue, block: &CameraBlock) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(block));
    }

    pub fn write_projection(&self, queue: &wgpu::Queue, block: &CameraBlock) {
        queue.write_buffer(
            &self.buffer,
            CameraBlock::PROJECTION_OFFSET,
            bytemuck::cast_slice(block.projection_floats()),
        );
    }

    pub fn write_view(&self, queue: &wgpu::Queue, block: &CameraBlock) {
        queue.write_buffer(
            &self.buffer,
            CameraBlock::VIEW_OFFSET,
            bytemuck::cast_slice(block.view_floats()),
        );
    }

    pub fn write_model(&self, queue: &wgpu::Queue, block: &CameraBlock) {
        queue.write_buffer(
            &self.buffer,
            CameraBlock::MODEL_OFFSET,
            bytemuck::cast_slice(block.model_floats()),
        );
    }

    pub fn write_time(&self, queue: &wgpu::Queue, block: &CameraBlock) {
        queue.write_buffer(
            &self.buffer,
            CameraBlock::TIME_OFFSET,
            bytemuck::cast_slice(block.time_floats()),
        );
    }

    /// Get the raw buffer
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use crate::transform::CameraBlock;

    #[test]
    fn test_span_sizes_cover_block() {
        // Three 64-byte matrices plus the 16-byte padded time field.
        assert_eq!(CameraBlock::VIEW_OFFSET - CameraBlock::PROJECTION_OFFSET, 64);
        assert_eq!(CameraBlock::MODEL_OFFSET - CameraBlock::VIEW_OFFSET, 64);
        assert_eq!(CameraBlock::TIME_OFFSET - CameraBlock::MODEL_OFFSET, 64);
        assert_eq!(CameraBlock::SIZE - CameraBlock::TIME_OFFSET, 16);
    }

    #[test]
    fn test_sub_range_byte_lengths() {
        let block = CameraBlock::new();
        assert_eq!(bytemuck::cast_slice::<f32, u8>(block.projection_floats()).len(), 64);
        assert_eq!(bytemuck::cast_slice::<f32, u8>(block.view_floats()).len(), 64);
        assert_eq!(bytemuck::cast_slice::<f32, u8>(block.model_floats()).len(), 64);
        assert_eq!(bytemuck::cast_slice::<f32, u8>(block.time_floats()).len(), 16);
    }
}
