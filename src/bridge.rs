//! The bridge between the gesture core and external UI controls.
//!
//! UI widgets (a model dropdown, a rotation slider, a reset button) live
//! outside this crate. They are handed a reference to the engine at
//! construction and talk to it through the accessors here; nothing is looked
//! up by name at call time. The bridge is the single place that remembers the
//! most recently grabbed object, so every control reads the same handle.

use log::{debug, warn};

use crate::{
    data_structures::scene_graph::{NodeId, SceneGraph},
    transform::rotate_about_up,
};

/// State of the external rotation control.
///
/// The control reports absolute values, but an absolute value means something
/// different for every newly grabbed object, so only deltas between
/// consecutive reports are applied. The enabled latch turns on the first time
/// anything is ever grabbed and stays on.
#[derive(Debug, Default)]
struct RotationControl {
    last_value: f32,
    target: Option<NodeId>,
    enabled: bool,
}

/// Read-many/write-one state shared with UI collaborators.
///
/// Only the gesture core writes the grabbed handle; only UI controls write
/// the rotation value. Reads reflect the previous frame's writes.
#[derive(Debug, Default)]
pub struct UiBridge {
    last_grabbed: Option<NodeId>,
    rotation: RotationControl,
}

impl UiBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently grabbed object. Sticky across touch sequences,
    /// unlike the gesture session's handle.
    pub fn grabbed_object(&self) -> Option<NodeId> {
        self.last_grabbed
    }

    /// Record a grab. Called by the engine, never by UI.
    pub(crate) fn note_grab(&mut self, id: NodeId) {
        self.last_grabbed = Some(id);
        if !self.rotation.enabled {
            self.rotation.enabled = true;
            debug!("Rotation control enabled after first grab.");
        }
    }

    /// Re-align the rotation control with the grabbed object, once per frame.
    ///
    /// When the grabbed object changed since the last frame, the control's
    /// baseline and displayed value reset to zero: each newly grabbed object
    /// starts from an un-rotated reference in the control's frame, not from
    /// whatever rotation it was spawned with.
    pub(crate) fn sync_rotation_target(&mut self) {
        if self.rotation.target != self.last_grabbed {
            self.rotation.target = self.last_grabbed;
            self.rotation.last_value = 0.0;
        }
    }

    /// Whether the rotation control should be shown/interactable. Off until
    /// the first grab ever, on forever after.
    pub fn rotation_control_enabled(&self) -> bool {
        self.rotation.enabled
    }

    /// The value the rotation control should display.
    pub fn rotation_value(&self) -> f32 {
        self.rotation.last_value
    }

    /// Apply a new absolute control value as an incremental rotation of the
    /// targeted object about the up axis.
    pub fn set_rotation_value(&mut self, graph: &mut SceneGraph, value: f32) {
        if !self.rotation.enabled {
            warn!("Rotation control written before any object was grabbed; ignoring.");
            return;
        }
        let delta = value - self.rotation.last_value;
        self.rotation.last_value = value;
        let Some(target) = self.rotation.target else {
            return;
        };
        match graph.get_mut(target) {
            Some(node) => node.local.rotation = rotate_about_up(node.local.rotation, delta),
            None => warn!("Rotation target {:?} no longer exists; value retained.", target),
        }
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{Deg, InnerSpace, One, Rotation3};

    use crate::data_structures::scene_graph::Node;

    use super::*;

    #[test]
    fn should_stay_disabled_until_first_grab() {
        let mut graph = SceneGraph::new();
        let mut bridge = UiBridge::new();
        assert!(!bridge.rotation_control_enabled());
        bridge.set_rotation_value(&mut graph, 45.0);
        assert_eq!(bridge.rotation_value(), 0.0);

        let id = graph.add_root(Node::new("chair"));
        bridge.note_grab(id);
        assert!(bridge.rotation_control_enabled());
    }

    #[test]
    fn should_apply_value_changes_as_deltas() {
        let mut graph = SceneGraph::new();
        let id = graph.add_root(Node::new("chair"));
        let mut bridge = UiBridge::new();
        bridge.note_grab(id);
        bridge.sync_rotation_target();

        bridge.set_rotation_value(&mut graph, 30.0);
        bridge.set_rotation_value(&mut graph, 10.0);
        let rotation = graph.get(id).unwrap().local.rotation;
        let expected = cgmath::Quaternion::from_angle_y(Deg(10.0));
        assert!((rotation.s - expected.s).abs() < 1e-5);
        assert!((rotation.v - expected.v).magnitude() < 1e-5);
    }

    #[test]
    fn should_zero_the_control_when_the_grab_changes() {
        let mut graph = SceneGraph::new();
        let first = graph.add_root(Node::new("chair"));
        let second = graph.add_root(Node::new("sofa"));
        let mut bridge = UiBridge::new();
        bridge.note_grab(first);
        bridge.sync_rotation_target();
        bridge.set_rotation_value(&mut graph, 90.0);

        bridge.note_grab(second);
        bridge.sync_rotation_target();
        assert_eq!(bridge.rotation_value(), 0.0);
        let untouched = graph.get(second).unwrap().local.rotation;
        assert_eq!(untouched, cgmath::Quaternion::one());
    }
}
