//! touch-ngin
//!
//! A touch-driven placement and manipulation engine for camera-tracked 3D
//! scenes. This crate owns the interpretation of raw multi-touch input
//! against a scene of spawned model hierarchies and a tracked ground-plane
//! model: whether a touch presses UI, grabs existing content, places a new
//! object, drags it, or pinches it. Rendering, plane tracking and asset
//! decoding stay with the host behind small trait boundaries.
//!
//! High-level modules
//! - `bridge`: accessors shared with external UI controls (dropdown, slider)
//! - `catalog`: catalog provider boundary and the current model selection
//! - `data_structures`: engine data models (transforms, bounds, scene graph)
//! - `engine`: the per-frame update loop tying everything together
//! - `gesture`: the touch interpretation state machine and session state
//! - `resources`: gltf-backed model hierarchy enumeration
//! - `spatial`: spatial query boundary (UI overlap, scene/plane raycasts)
//! - `spawn`: asset spawn boundary
//! - `tagger`: recursive tagging, collider and shadow passes
//! - `touch`: multi-touch stream tracking on top of winit events
//! - `transform`: pure transform operators (translate, pinch, rotate)
//!

pub mod bridge;
pub mod catalog;
pub mod data_structures;
pub mod engine;
pub mod gesture;
pub mod resources;
pub mod spatial;
pub mod spawn;
pub mod tagger;
pub mod touch;
pub mod transform;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use winit::dpi::PhysicalPosition;
pub use winit::event::TouchPhase;
pub use winit::event::WindowEvent;
