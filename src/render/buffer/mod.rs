//! GPU buffer owners
//!
//! Each buffer concern gets one owner struct that sizes its buffer at
//! creation and exposes write methods bounded by that size.

pub mod blade_mesh;
pub mod camera_buffer;
pub mod position_buffer;

pub use blade_mesh::BladeMesh;
pub use camera_buffer::CameraBuffer;
pub use position_buffer::{GpuPosition, PositionBuffer};
