//! User-tunable parameter state.
//!
//! `ParameterSet` is the authoritative CPU-side record of everything the
//! control panel can touch. Producers never mutate GPU state directly:
//! they push a `ParamChange` snapshot into a `ParamQueue`, and the frame
//! scheduler drains the queue once at the start of each iteration. A change
//! arriving mid-frame is therefore always applied whole, before the next
//! submitted pass reads any buffer.

use std::collections::VecDeque;

use crate::core::types::Vec3;

/// Which logical group of parameters a change touches.
///
/// Each group maps to one GPU-side update: `Colors` rebuilds the blade
/// vertex buffer, `Scatter` reruns the position compute pass, and the
/// matrix groups rewrite one sub-range of the camera uniform block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamGroup {
    Colors,
    Scatter,
    Model,
    View,
    Projection,
}

/// Current values of all user-tunable parameters.
///
/// Ranges are enforced by the producing widget; this struct holds whatever
/// it is given. Rotation angles are wrapped, not rejected, at use.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterSet {
    /// Blade gradient stops, base to tip, each component in [0, 255].
    pub colors: [[u8; 3]; 4],

    /// Scatter controls for the position compute pass.
    pub density: f32,
    pub xz_variance: f32,
    pub y_variance: f32,
    pub y_height: f32,

    /// Uniform model scale.
    pub scale: f32,
    /// Camera translation.
    pub translation: Vec3,
    /// Camera rotation in degrees, applied X then Y then Z.
    pub rotation: Vec3,
    /// Spin the view continuously instead of holding the configured rotation.
    pub auto_rotate: bool,
    /// Use an orthographic projection instead of perspective.
    pub orthographic: bool,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            colors: [
                [20, 60, 10],
                [50, 120, 30],
                [110, 180, 60],
                [200, 230, 140],
            ],
            density: 1.0,
            xz_variance: 0.5,
            y_variance: 0.3,
            y_height: 1.0,
            scale: 1.0,
            translation: Vec3::new(0.0, -1.0, -4.0),
            rotation: Vec3::new(20.0, 0.0, 0.0),
            auto_rotate: false,
            orthographic: false,
        }
    }
}

/// One control-panel notification: the group that changed plus the new
/// authoritative snapshot of all parameters.
#[derive(Clone, Debug)]
pub struct ParamChange {
    pub group: ParamGroup,
    pub params: ParameterSet,
}

/// Single-threaded queue of pending parameter changes.
#[derive(Default)]
pub struct ParamQueue {
    events: VecDeque<ParamChange>,
}

impl ParamQueue {
    pub fn new() -> Self {
        Self { events: VecDeque::new() }
    }

    pub fn push(&mut self, change: ParamChange) {
        self.events.push_back(change);
    }

    /// Remove and return all pending changes in arrival order.
    pub fn drain(&mut self) -> impl Iterator<Item = ParamChange> + '_ {
        self.events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_preserves_order() {
        let mut queue = ParamQueue::new();
        let mut params = ParameterSet::default();
        queue.push(ParamChange { group: ParamGroup::Colors, params: params.clone() });
        params.density = 2.0;
        queue.push(ParamChange { group: ParamGroup::Scatter, params });

        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].group, ParamGroup::Colors);
        assert_eq!(drained[1].group, ParamGroup::Scatter);
        assert_eq!(drained[1].params.density, 2.0);
    }

    #[test]
    fn test_drain_empties_queue() {
        let mut queue = ParamQueue::new();
        queue.push(ParamChange {
            group: ParamGroup::View,
            params: ParameterSet::default(),
        });
        assert_eq!(queue.len(), 1);
        let _ = queue.drain().count();
        assert!(queue.is_empty());
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut queue = ParamQueue::new();
        let mut params = ParameterSet::default();
        queue.push(ParamChange { group: ParamGroup::Model, params: params.clone() });
        // Mutating the producer copy after pushing must not affect the snapshot.
        params.scale = 9.0;
        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(drained[0].params.scale, 1.0);
    }
}
