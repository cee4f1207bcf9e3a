//! Compute and render pipelines

pub mod blades;
pub mod scatter;

pub use blades::BladePipeline;
pub use scatter::{ScatterParams, ScatterPipeline};
