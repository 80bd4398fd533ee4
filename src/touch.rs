//! Multi-touch stream tracking.
//!
//! winit delivers touch contacts as individual [`WindowEvent::Touch`] events;
//! the gesture core wants a per-frame snapshot: how many fingers are down,
//! where each one is now and where it was when the frame started. The tracker
//! accumulates events between frames and is advanced once per frame after the
//! engine update ran.

use winit::{
    dpi::PhysicalPosition,
    event::{TouchPhase, WindowEvent},
};

/// One tracked finger.
#[derive(Clone, Debug)]
pub struct TouchPoint {
    pub id: u64,
    /// `Started` exactly on the contact's first frame, then `Moved`.
    pub phase: TouchPhase,
    pub position: PhysicalPosition<f64>,
    /// Position at the start of the current frame, for per-frame deltas.
    pub previous: PhysicalPosition<f64>,
}

/// Accumulates winit touch events into per-frame touch state.
///
/// Touch order is arrival order; the primary touch is the oldest contact
/// still down.
#[derive(Debug, Default)]
pub struct TouchTracker {
    touches: Vec<TouchPoint>,
}

impl TouchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a winit window event. Non-touch events are ignored.
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        if let WindowEvent::Touch(touch) = event {
            self.push(touch.id, touch.phase, touch.location);
        }
    }

    /// Record one contact update. Exposed separately from
    /// [`TouchTracker::handle_window_event`] so hosts without a winit event
    /// loop (and tests) can drive the tracker directly.
    pub fn push(&mut self, id: u64, phase: TouchPhase, position: PhysicalPosition<f64>) {
        match self.touches.iter_mut().find(|touch| touch.id == id) {
            Some(touch) => {
                touch.position = position;
                // a contact that started this frame keeps its Started phase
                // until the frame is over, no matter how often it moves
                if touch.phase != TouchPhase::Started || phase == TouchPhase::Ended
                    || phase == TouchPhase::Cancelled
                {
                    touch.phase = phase;
                }
            }
            None => {
                if phase == TouchPhase::Started {
                    self.touches.push(TouchPoint {
                        id,
                        phase,
                        position,
                        previous: position,
                    });
                } else {
                    log::warn!("Touch {} reported {:?} before Started; dropping event.", id, phase);
                }
            }
        }
    }

    pub fn count(&self) -> usize {
        self.touches.len()
    }

    /// The oldest contact still down.
    pub fn primary(&self) -> Option<&TouchPoint> {
        self.touches.first()
    }

    pub fn get(&self, index: usize) -> Option<&TouchPoint> {
        self.touches.get(index)
    }

    /// The two oldest contacts, when a two-finger gesture is possible.
    pub fn pair(&self) -> Option<(&TouchPoint, &TouchPoint)> {
        match (self.touches.first(), self.touches.get(1)) {
            (Some(first), Some(second)) => Some((first, second)),
            _ => None,
        }
    }

    /// Advance to the next frame: lifted contacts are dropped, surviving
    /// contacts get their `previous` position refreshed and leave `Started`.
    pub fn end_frame(&mut self) {
        self.touches.retain(|touch| {
            touch.phase != TouchPhase::Ended && touch.phase != TouchPhase::Cancelled
        });
        for touch in &mut self.touches {
            touch.previous = touch.position;
            touch.phase = TouchPhase::Moved;
        }
    }

    pub fn clear(&mut self) {
        self.touches.clear();
    }
}
