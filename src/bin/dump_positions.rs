//! One-shot diagnostic: run the scatter pass headless and print the
//! generated blade positions.
//!
//! Useful for checking the placement distribution without opening a
//! window, and for confirming that repeated dispatches with the same
//! parameters reproduce the same buffer.

use meadow::core::logging;
use meadow::params::ParameterSet;
use meadow::render::buffer::PositionBuffer;
use meadow::render::context::request_headless_device;
use meadow::render::pipeline::scatter::{BLADE_COUNT, ScatterParams, ScatterPipeline};

fn main() {
    logging::init();

    let (device, queue) =
        pollster::block_on(request_headless_device()).expect("Failed to acquire GPU device");

    let positions = PositionBuffer::new(&device);
    let scatter = ScatterPipeline::new(&device, &positions);

    let params = ParameterSet::default();
    scatter.write_params(&queue, &ScatterParams::from_params(&params));

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("dump_encoder"),
    });
    scatter.dispatch(&mut encoder);
    queue.submit(std::iter::once(encoder.finish()));

    let records = positions
        .read_back(&device, &queue)
        .expect("Failed to read positions back");
    assert_eq!(records.len(), BLADE_COUNT as usize);

    for (i, record) in records.iter().take(8).enumerate() {
        log::info!(
            "blade {}: ({:.3}, {:.3}, {:.3})",
            i,
            record.position[0],
            record.position[1],
            record.position[2]
        );
    }

    let mut min = [f32::INFINITY; 3];
    let mut max = [f32::NEG_INFINITY; 3];
    for record in &records {
        for axis in 0..3 {
            min[axis] = min[axis].min(record.position[axis]);
            max[axis] = max[axis].max(record.position[axis]);
        }
    }
    log::info!(
        "{} blades, extent x [{:.2}, {:.2}], y [{:.2}, {:.2}], z [{:.2}, {:.2}]",
        records.len(),
        min[0],
        max[0],
        min[1],
        max[1],
        min[2],
        max[2]
    );

    // Rerun with identical parameters; the buffers must match exactly.
    scatter.write_params(&queue, &ScatterParams::from_params(&params));
    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("dump_encoder_repeat"),
    });
    scatter.dispatch(&mut encoder);
    queue.submit(std::iter::once(encoder.finish()));

    let repeat = positions
        .read_back(&device, &queue)
        .expect("Failed to read positions back");
    if records == repeat {
        log::info!("Repeat dispatch reproduced the buffer exactly");
    } else {
        log::error!("Repeat dispatch diverged");
        std::process::exit(1);
    }
}
