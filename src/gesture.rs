//! The touch interpretation state machine.
//!
//! Raw multi-touch input is ambiguous: the same contact can mean a UI press,
//! a grab of existing content, a new placement, or one half of a pinch. This
//! module owns the per-frame classification of the touch stream and all
//! per-gesture state. It runs synchronously once per frame; there is no
//! event plumbing, every transition happens inside [`GestureSession::advance`].
//!
//! # States
//!
//! - `Idle`: no active touch.
//! - `UiCapture`: the sequence started over UI and stays UI input for its
//!   entire duration, even if the finger later leaves the widget.
//! - `Grabbed`: an object is held and being translated/scaled.
//! - `NoTarget`: the sequence began over nothing; ignored until it ends.
//!
//! A touch's first frame resolves its target within that same frame, so there
//! is no observable intermediate state between `Idle` and the other three.

use cgmath::{Vector3, Zero};
use instant::Duration;
use log::{debug, warn};
use winit::event::TouchPhase;

use crate::{
    data_structures::scene_graph::{NodeId, SceneGraph},
    spatial::SpatialQuery,
    spawn::SpawnProvider,
    tagger,
    touch::TouchTracker,
    transform::{apply_pinch, pinch_amount, translate_with_offset},
};

/// Classification of the current touch sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TouchState {
    #[default]
    Idle,
    UiCapture,
    Grabbed,
    NoTarget,
}

/// What one frame of interpretation did, for the engine to book-keep.
#[derive(Debug, Default)]
pub struct FrameOutcome {
    /// Root of a freshly spawned hierarchy, if this frame placed one.
    pub spawned: Option<NodeId>,
    /// Object that became grabbed this frame, spawned or pre-existing.
    pub grabbed: Option<NodeId>,
}

/// Authoritative per-gesture state, reset whenever all fingers lift.
#[derive(Debug)]
pub struct GestureSession {
    state: TouchState,
    grabbed: Option<NodeId>,
    offset: Vector3<f32>,
    two_finger_active: bool,
    /// Rotation at the moment a second finger lands. Captured per two-finger
    /// gesture but not consumed by any operator; rotation is driven by the
    /// external control, not by the gesture.
    rotation_baseline: Option<cgmath::Quaternion<f32>>,
    ui_capture: bool,
}

impl Default for GestureSession {
    fn default() -> Self {
        Self {
            state: TouchState::default(),
            grabbed: None,
            offset: Vector3::zero(),
            two_finger_active: false,
            rotation_baseline: None,
            ui_capture: false,
        }
    }
}

impl GestureSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TouchState {
        self.state
    }

    /// Handle currently held by the gesture, if any. Cleared on release;
    /// the UI bridge keeps its own sticky "most recently grabbed" handle.
    pub fn grabbed(&self) -> Option<NodeId> {
        self.grabbed
    }

    pub fn translation_offset(&self) -> Vector3<f32> {
        self.offset
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    /// Run one frame of touch interpretation.
    ///
    /// `model` is the identifier a placement this frame would spawn. All
    /// scene mutation happens through `graph`; `spatial` and `spawner` are
    /// only queried, never retained.
    pub fn advance<Q: SpatialQuery, S: SpawnProvider>(
        &mut self,
        graph: &mut SceneGraph,
        spatial: &Q,
        spawner: &mut S,
        model: &str,
        touches: &TouchTracker,
        dt: Duration,
    ) -> FrameOutcome {
        let mut outcome = FrameOutcome::default();

        if touches.count() == 0 {
            self.reset();
            return outcome;
        }
        let primary = match touches.primary() {
            Some(primary) => primary.clone(),
            None => return outcome,
        };

        // A grabbed handle can go dangling if the host tears the object down
        // mid-gesture. That aborts the gesture; it must never be operated on.
        if self.state == TouchState::Grabbed {
            match self.grabbed {
                Some(id) if graph.contains(id) => {}
                _ => {
                    warn!("Grabbed object disappeared mid-gesture; aborting the gesture.");
                    self.reset();
                    return outcome;
                }
            }
        }

        if primary.phase == TouchPhase::Started && self.grabbed.is_none() {
            // UI capture is sticky for the whole sequence once set.
            if self.ui_capture || spatial.is_over_ui(primary.position) {
                self.ui_capture = true;
                self.state = TouchState::UiCapture;
                return outcome;
            }

            match spatial.raycast_scene(graph, primary.position) {
                Some(hit) if graph.get(hit.node).is_some_and(|node| node.tagged) => {
                    // The hit is usually a sub-mesh; the manipulable owner is
                    // its immediate hierarchy parent. Models nested deeper
                    // than one level below their tagged root would need a
                    // walk-up to the nearest tagged ancestor instead.
                    let owner = graph.parent_of(hit.node).unwrap_or(hit.node);
                    self.offset = match (
                        graph.world_position(owner),
                        spatial.raycast_planes(primary.position),
                    ) {
                        (Some(world), Some(pose)) => world - pose.position,
                        _ => Vector3::zero(),
                    };
                    self.grabbed = Some(owner);
                    self.state = TouchState::Grabbed;
                    outcome.grabbed = Some(owner);
                    debug!("Grabbed existing object {:?}.", owner);
                }
                _ => match spatial.raycast_planes(primary.position) {
                    Some(pose) => match spawner.spawn_at(graph, model, &pose) {
                        Ok(root) => {
                            tagger::prepare_for_hit_testing(graph, root);
                            // make the fresh hierarchy hit-testable within
                            // this same frame
                            graph.update_world_transforms();
                            self.grabbed = Some(root);
                            self.offset = Vector3::zero();
                            self.state = TouchState::Grabbed;
                            outcome.spawned = Some(root);
                            outcome.grabbed = Some(root);
                            debug!("Placed {:?} as {:?}.", model, root);
                        }
                        Err(error) => {
                            warn!("Could not spawn {:?}: {:#}. Ignoring this touch.", model, error);
                            self.state = TouchState::NoTarget;
                        }
                    },
                    None => {
                        self.state = TouchState::NoTarget;
                    }
                },
            }
            return outcome;
        }

        if self.state != TouchState::Grabbed {
            // UiCapture and NoTarget sequences stay inert until all fingers
            // lift.
            return outcome;
        }
        let grabbed = match self.grabbed {
            Some(id) => id,
            None => return outcome,
        };

        if touches.count() == 1 && self.two_finger_active {
            self.two_finger_active = false;
        }

        // Translation follows the primary touch whenever it is over a plane,
        // with or without a second finger down.
        if let Some(pose) = spatial.raycast_planes(primary.position) {
            let target = translate_with_offset(pose.position, self.offset);
            graph.set_world_position(grabbed, target);
        }

        if touches.count() >= 2 {
            if !self.two_finger_active {
                self.rotation_baseline = graph.get(grabbed).map(|node| node.world.rotation);
                self.two_finger_active = true;
            }
            if let Some((first, second)) = touches.pair() {
                let amount = pinch_amount(
                    first.previous,
                    second.previous,
                    first.position,
                    second.position,
                    dt,
                );
                if let Some(node) = graph.get_mut(grabbed) {
                    node.local.scale = apply_pinch(node.local.scale, amount);
                }
            }
        }

        outcome
    }
}
