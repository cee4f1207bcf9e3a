//! Camera transform derivation and the camera uniform block.
//!
//! The shader-side camera block is 52 packed floats: projection, view, and
//! model matrices followed by elapsed time padded to vec4 alignment.
//! `CameraBlock` mirrors it on the CPU so each matrix group can be rewritten
//! as exactly one sub-range upload instead of a whole-block write.

use bytemuck::{Pod, Zeroable};

use crate::core::types::{Mat4, Vec3};

/// Vertical field of view for the perspective projection, in degrees.
pub const FOV_Y_DEGREES: f32 = 90.0;
/// Near clip plane, shared by both projections.
pub const NEAR: f32 = 0.01;
/// Far clip plane, shared by both projections.
pub const FAR: f32 = 100.0;

/// Wrap an angle in degrees into [0, 360).
pub fn wrap_degrees(degrees: f32) -> f32 {
    degrees.rem_euclid(360.0)
}

/// Model matrix: uniform scale about the origin.
///
/// The model's own translation is fixed at zero; continuous spin is applied
/// on the view side (`spin_view`).
pub fn model_matrix(scale: f32) -> Mat4 {
    Mat4::from_scale(Vec3::splat(scale))
}

/// View matrix: Translation(x, y, z) * RotationX * RotationY * RotationZ.
///
/// The composition order is fixed. Rotations do not commute, so reordering
/// changes the result for any two non-zero angles.
pub fn view_matrix(translation: Vec3, rotation_degrees: Vec3) -> Mat4 {
    let rx = wrap_degrees(rotation_degrees.x).to_radians();
    let ry = wrap_degrees(rotation_degrees.y).to_radians();
    let rz = wrap_degrees(rotation_degrees.z).to_radians();

    Mat4::from_translation(translation)
        * Mat4::from_rotation_x(rx)
        * Mat4::from_rotation_y(ry)
        * Mat4::from_rotation_z(rz)
}

/// Projection matrix: perspective by default, orthographic on request.
///
/// Both share the same near/far planes so the two can be swapped at runtime
/// by rewriting only the projection slot of the camera block.
pub fn projection_matrix(aspect: f32, orthographic: bool) -> Mat4 {
    if orthographic {
        Mat4::orthographic_rh(-1.0, 1.0, -1.0, 1.0, NEAR, FAR)
    } else {
        Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), aspect, NEAR, FAR)
    }
}

/// Advance a view matrix by a small world-space Y rotation.
pub fn spin_view(view: Mat4, delta_radians: f32) -> Mat4 {
    view * Mat4::from_rotation_y(delta_radians)
}

/// CPU mirror of the camera uniform block.
///
/// Float layout: [0..16) projection, [16..32) view, [32..48) model,
/// [48] elapsed time, [49..52) padding. 208 bytes total.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraBlock {
    data: [f32; 52],
}

impl CameraBlock {
    /// Byte offset of the projection matrix within the block.
    pub const PROJECTION_OFFSET: u64 = 0;
    /// Byte offset of the view matrix.
    pub const VIEW_OFFSET: u64 = 64;
    /// Byte offset of the model matrix.
    pub const MODEL_OFFSET: u64 = 128;
    /// Byte offset of the time field (padded to 16 bytes).
    pub const TIME_OFFSET: u64 = 192;
    /// Total block size in bytes.
    pub const SIZE: u64 = 208;

    pub fn new() -> Self {
        Self::zeroed()
    }

    pub fn set_projection(&mut self, m: Mat4) {
        self.data[0..16].copy_from_slice(&m.to_cols_array());
    }

    pub fn set_view(&mut self, m: Mat4) {
        self.data[16..32].copy_from_slice(&m.to_cols_array());
    }

    pub fn set_model(&mut self, m: Mat4) {
        self.data[32..48].copy_from_slice(&m.to_cols_array());
    }

    pub fn set_time(&mut self, time: f32) {
        self.data[48] = time;
    }

    /// Read the view matrix back out for incremental updates.
    pub fn view(&self) -> Mat4 {
        let mut cols = [0.0f32; 16];
        cols.copy_from_slice(&self.data[16..32]);
        Mat4::from_cols_array(&cols)
    }

    pub fn time(&self) -> f32 {
        self.data[48]
    }

    /// The projection sub-range, for uploading at `PROJECTION_OFFSET`.
    pub fn projection_floats(&self) -> &[f32] {
        &self.data[0..16]
    }

    /// The view sub-range, for uploading at `VIEW_OFFSET`.
    pub fn view_floats(&self) -> &[f32] {
        &self.data[16..32]
    }

    /// The model sub-range, for uploading at `MODEL_OFFSET`.
    pub fn model_floats(&self) -> &[f32] {
        &self.data[32..48]
    }

    /// The padded time field, for uploading at `TIME_OFFSET`.
    pub fn time_floats(&self) -> &[f32] {
        &self.data[48..52]
    }

    pub fn as_floats(&self) -> &[f32; 52] {
        &self.data
    }
}

impl Default for CameraBlock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mats_close(a: Mat4, b: Mat4) -> bool {
        a.to_cols_array()
            .iter()
            .zip(b.to_cols_array().iter())
            .all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn test_block_size() {
        assert_eq!(std::mem::size_of::<CameraBlock>(), 208);
        assert_eq!(CameraBlock::SIZE, 208);
        assert_eq!(CameraBlock::TIME_OFFSET + 16, CameraBlock::SIZE);
    }

    #[test]
    fn test_rotation_order_matters() {
        let t = Vec3::ZERO;
        let xy = view_matrix(t, Vec3::new(90.0, 90.0, 0.0));
        // Swapped order: rotate Y first, then X
        let yx = Mat4::from_rotation_y(90.0f32.to_radians())
            * Mat4::from_rotation_x(90.0f32.to_radians());
        assert!(!mats_close(xy, yx));
    }

    #[test]
    fn test_view_matches_explicit_composition() {
        let t = Vec3::new(1.0, 2.0, 3.0);
        let expected = Mat4::from_translation(t)
            * Mat4::from_rotation_x(30.0f32.to_radians())
            * Mat4::from_rotation_y(45.0f32.to_radians())
            * Mat4::from_rotation_z(60.0f32.to_radians());
        let got = view_matrix(t, Vec3::new(30.0, 45.0, 60.0));
        assert!(mats_close(expected, got));
    }

    #[test]
    fn test_angle_wrapping() {
        let t = Vec3::new(0.0, 0.0, -5.0);
        let a = view_matrix(t, Vec3::new(45.0, 0.0, 0.0));
        let b = view_matrix(t, Vec3::new(45.0 + 360.0, 0.0, 0.0));
        let c = view_matrix(t, Vec3::new(45.0 - 360.0, 0.0, 0.0));
        assert!(mats_close(a, b));
        assert!(mats_close(a, c));
    }

    #[test]
    fn test_time_write_touches_only_time_float() {
        let mut block = CameraBlock::new();
        block.set_projection(projection_matrix(1.0, false));
        block.set_view(view_matrix(Vec3::new(0.0, -1.0, -4.0), Vec3::ZERO));
        block.set_model(model_matrix(1.0));

        let before = *block.as_floats();
        block.set_time(12.5);
        let after = *block.as_floats();

        for i in 0..52 {
            if i == 48 {
                assert_eq!(after[i], 12.5);
            } else {
                assert_eq!(before[i], after[i], "float {} changed", i);
            }
        }
    }

    #[test]
    fn test_projection_toggle_leaves_view_and_model() {
        let mut block = CameraBlock::new();
        block.set_projection(projection_matrix(1.0, false));
        block.set_view(view_matrix(Vec3::new(0.0, -1.0, -4.0), Vec3::new(20.0, 0.0, 0.0)));
        block.set_model(model_matrix(2.0));

        let view_before = block.view_floats().to_vec();
        let model_before = block.model_floats().to_vec();

        block.set_projection(projection_matrix(1.0, true));

        assert_eq!(view_before, block.view_floats());
        assert_eq!(model_before, block.model_floats());
        // And the projection really did change
        let ortho = projection_matrix(1.0, true).to_cols_array();
        assert_eq!(&ortho[..], block.projection_floats());
    }

    #[test]
    fn test_spin_view_is_incremental() {
        let base = view_matrix(Vec3::new(0.0, 0.0, -5.0), Vec3::ZERO);
        let two_steps = spin_view(spin_view(base, 0.1), 0.1);
        let one_step = spin_view(base, 0.2);
        assert!(mats_close(two_steps, one_step));
    }

    #[test]
    fn test_projection_kinds_differ() {
        let p = projection_matrix(1.0, false);
        let o = projection_matrix(1.0, true);
        assert!(!mats_close(p, o));
    }
}
