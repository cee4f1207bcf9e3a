//! Blade mesh: vertex and index buffers for one grass blade
//!
//! The silhouette is a symmetric 7-vertex fan (two base vertices, two pairs
//! of narrowing mid vertices, one tip), triangulated by 5 triangles. Each
//! vertex carries a color taken from a 4-stop gradient; the shape never
//! changes, so a color change rewrites the whole vertex buffer and nothing
//! else.

/// Number of vertices in the blade silhouette.
pub const BLADE_VERTEX_COUNT: usize = 7;
/// Floats per vertex: 3 position + 3 color.
pub const FLOATS_PER_VERTEX: usize = 6;
/// Byte stride of one vertex.
pub const VERTEX_STRIDE: u64 = (FLOATS_PER_VERTEX * std::mem::size_of::<f32>()) as u64;

/// Blade silhouette: vertex position and which gradient stop colors it.
/// Base pair, lower-mid pair, upper-mid pair, tip.
const SILHOUETTE: [([f32; 3], usize); BLADE_VERTEX_COUNT] = [
    ([-0.05, 0.0, 0.0], 0),
    ([0.05, 0.0, 0.0], 0),
    ([-0.04, 0.35, 0.0], 1),
    ([0.04, 0.35, 0.0], 1),
    ([-0.02, 0.7, 0.0], 2),
    ([0.02, 0.7, 0.0], 2),
    ([0.0, 1.0, 0.0], 3),
];

/// Triangulation of the silhouette: 5 triangles.
pub const BLADE_INDICES: [u32; 15] = [
    0, 1, 2, //
    1, 3, 2, //
    2, 3, 4, //
    3, 5, 4, //
    4, 5, 6,
];

/// Build the interleaved vertex data for the current gradient stops.
///
/// Color components arrive in [0, 255] and are normalized here. The output
/// is a pure function of `colors`, so rebuilding with unchanged parameters
/// yields byte-identical data.
pub fn build_blade_vertices(colors: &[[u8; 3]; 4]) -> [f32; BLADE_VERTEX_COUNT * FLOATS_PER_VERTEX] {
    let mut data = [0.0f32; BLADE_VERTEX_COUNT * FLOATS_PER_VERTEX];
    for (i, &(position, stop)) in SILHOUETTE.iter().enumerate() {
        let base = i * FLOATS_PER_VERTEX;
        data[base..base + 3].copy_from_slice(&position);
        let color = colors[stop];
        data[base + 3] = color[0] as f32 / 255.0;
        data[base + 4] = color[1] as f32 / 255.0;
        data[base + 5] = color[2] as f32 / 255.0;
    }
    data
}

/// Vertex and index buffers for the blade mesh.
pub struct BladeMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
}

impl BladeMesh {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, colors: &[[u8; 3]; 4]) -> Self {
        let vertices = build_blade_vertices(colors);
        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("blade_vertices"),
            size: std::mem::size_of_val(&vertices) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        queue.write_buffer(&vertex_buffer, 0, bytemuck::cast_slice(&vertices));

        let index_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("blade_indices"),
            size: std::mem::size_of_val(&BLADE_INDICES) as u64,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        queue.write_buffer(&index_buffer, 0, bytemuck::cast_slice(&BLADE_INDICES));

        Self {
            vertex_buffer,
            index_buffer,
        }
    }

    /// Overwrite the vertex buffer with data built from new gradient stops.
    pub fn rebuild_colors(&self, queue: &wgpu::Queue, colors: &[[u8; 3]; 4]) {
        let vertices = build_blade_vertices(colors);
        queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
    }

    pub fn vertex_buffer(&self) -> &wgpu::Buffer {
        &self.vertex_buffer
    }

    pub fn index_buffer(&self) -> &wgpu::Buffer {
        &self.index_buffer
    }

    pub fn index_count(&self) -> u32 {
        BLADE_INDICES.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_data_size() {
        let colors = [[255, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 255]];
        let data = build_blade_vertices(&colors);
        assert_eq!(data.len(), 42);
        assert_eq!(std::mem::size_of_val(&data), 42 * 4);
        assert_eq!(VERTEX_STRIDE, 24);
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let colors = [[20, 60, 10], [50, 120, 30], [110, 180, 60], [200, 230, 140]];
        let a = build_blade_vertices(&colors);
        let b = build_blade_vertices(&colors);
        assert_eq!(
            bytemuck::cast_slice::<f32, u8>(&a),
            bytemuck::cast_slice::<f32, u8>(&b)
        );
    }

    #[test]
    fn test_gradient_stops_applied_in_order() {
        let colors = [[255, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 255]];
        let data = build_blade_vertices(&colors);
        // Base vertices carry stop 0, tip carries stop 3.
        assert_eq!(data[3], 1.0);
        assert_eq!(data[4], 0.0);
        let tip = 6 * FLOATS_PER_VERTEX;
        assert_eq!(data[tip + 3], 1.0);
        assert_eq!(data[tip + 4], 1.0);
        assert_eq!(data[tip + 5], 1.0);
    }

    #[test]
    fn test_indices_form_five_triangles() {
        assert_eq!(BLADE_INDICES.len(), 15);
        assert!(BLADE_INDICES.iter().all(|&i| (i as usize) < BLADE_VERTEX_COUNT));
    }

    #[test]
    fn test_silhouette_is_symmetric() {
        // Paired vertices mirror in x and share y; the tip is centered.
        for pair in [(0, 1), (2, 3), (4, 5)] {
            let (l, _) = SILHOUETTE[pair.0];
            let (r, _) = SILHOUETTE[pair.1];
            assert_eq!(l[0], -r[0]);
            assert_eq!(l[1], r[1]);
        }
        assert_eq!(SILHOUETTE[6].0[0], 0.0);
    }
}
