//! The per-frame placement engine.
//!
//! Owns the scene graph and all gesture state, and wires the external
//! collaborators (spatial queries, asset spawning, the catalog) into one
//! synchronous `update` pass per rendered frame. Hosts feed winit window
//! events in between updates and read results through the UI bridge
//! accessors.
//!
//! # Frame order
//!
//! 1. Retry the catalog latch; drop the startup probe once it populates.
//! 2. Re-assert tagging/colliders/shadows on the most recently spawned
//!    object (asset loading may attach children late).
//! 3. Re-align the rotation control with the grabbed object.
//! 4. Run the touch interpretation state machine.
//! 5. Propagate world transforms and advance the touch tracker.

use instant::Duration;
use log::warn;
use winit::{dpi::PhysicalPosition, event::TouchPhase, event::WindowEvent};

use crate::{
    bridge::UiBridge,
    catalog::{CatalogProvider, CatalogSelection},
    data_structures::scene_graph::{NodeId, SceneGraph},
    gesture::{GestureSession, TouchState},
    spatial::SpatialQuery,
    spawn::SpawnProvider,
    tagger,
    touch::TouchTracker,
};

/// Static engine configuration.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Model spawned before the catalog has responded, and probed at startup
    /// to enumerate its structure.
    pub default_model: String,
}

/// The interaction core: one instance per camera-tracked scene.
pub struct PlacementEngine<Q, S, C> {
    spatial: Q,
    spawner: S,
    catalog: C,
    config: EngineConfig,
    graph: SceneGraph,
    touches: TouchTracker,
    session: GestureSession,
    bridge: UiBridge,
    selection: CatalogSelection,
    /// Most recently spawned hierarchy, re-tagged defensively every frame.
    newest: Option<NodeId>,
    /// Transient startup spawn, destroyed when the catalog populates.
    probe: Option<NodeId>,
}

impl<Q, S, C> PlacementEngine<Q, S, C>
where
    Q: SpatialQuery,
    S: SpawnProvider,
    C: CatalogProvider,
{
    pub fn new(spatial: Q, spawner: S, catalog: C, config: EngineConfig) -> Self {
        let mut engine = Self {
            spatial,
            spawner,
            catalog,
            config,
            graph: SceneGraph::new(),
            touches: TouchTracker::new(),
            session: GestureSession::new(),
            bridge: UiBridge::new(),
            selection: CatalogSelection::new(),
            newest: None,
            probe: None,
        };
        engine.spawn_probe();
        engine
    }

    fn spawn_probe(&mut self) {
        match self.spawner.spawn_probe(&mut self.graph, &self.config.default_model) {
            Ok(probe) => {
                tagger::prepare_for_hit_testing(&mut self.graph, probe);
                self.graph.update_world_transforms();
                self.probe = Some(probe);
                self.newest = Some(probe);
            }
            Err(error) => {
                warn!(
                    "Startup probe for {:?} failed: {:#}. Continuing without it.",
                    self.config.default_model, error
                );
            }
        }
    }

    /// Feed a winit window event; only touch events are consumed.
    pub fn on_window_event(&mut self, event: &WindowEvent) {
        self.touches.handle_window_event(event);
    }

    /// Record one touch contact directly, for hosts without a winit loop.
    pub fn touch(&mut self, id: u64, phase: TouchPhase, position: PhysicalPosition<f64>) {
        self.touches.push(id, phase, position);
    }

    /// Run one frame. `dt` is the elapsed time since the previous frame.
    pub fn update(&mut self, dt: Duration) {
        if self.selection.populate_once(&self.catalog) {
            if let Some(probe) = self.probe.take() {
                self.graph.remove_subtree(probe);
                if self.newest == Some(probe) {
                    self.newest = None;
                }
            }
        }

        // Defensive re-tag: loaders may attach renderable children after the
        // spawn call returned, and those must be hit-testable too.
        match self.newest {
            Some(newest) if self.graph.contains(newest) => {
                tagger::prepare_for_hit_testing(&mut self.graph, newest);
            }
            Some(_) => self.newest = None,
            None => {}
        }

        self.bridge.sync_rotation_target();

        let model = self
            .selection
            .current_entry()
            .unwrap_or(&self.config.default_model)
            .to_string();
        let outcome = self.session.advance(
            &mut self.graph,
            &self.spatial,
            &mut self.spawner,
            &model,
            &self.touches,
            dt,
        );
        if let Some(spawned) = outcome.spawned {
            self.newest = Some(spawned);
        }
        if let Some(grabbed) = outcome.grabbed {
            self.bridge.note_grab(grabbed);
        }

        self.graph.update_world_transforms();
        self.touches.end_frame();
    }

    /// Discard all core state, as a scene reload would. The startup probe is
    /// spawned again and the catalog latch re-arms.
    pub fn reset(&mut self) {
        self.graph.clear();
        self.touches.clear();
        self.session = GestureSession::new();
        self.bridge.reset();
        self.selection = CatalogSelection::new();
        self.newest = None;
        self.probe = None;
        self.spawn_probe();
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn gesture_state(&self) -> TouchState {
        self.session.state()
    }

    // UI bridge surface

    /// The most recently grabbed object, for UI controls.
    pub fn grabbed_object(&self) -> Option<NodeId> {
        self.bridge.grabbed_object()
    }

    pub fn rotation_control_enabled(&self) -> bool {
        self.bridge.rotation_control_enabled()
    }

    pub fn rotation_value(&self) -> f32 {
        self.bridge.rotation_value()
    }

    /// Write from the rotation control; applied as an incremental rotation.
    pub fn set_rotation_value(&mut self, value: f32) {
        self.bridge.set_rotation_value(&mut self.graph, value);
    }

    /// Catalog entries for dropdown option lists; empty until populated.
    pub fn catalog_entries(&self) -> &[String] {
        self.selection.entries()
    }

    pub fn selected_index(&self) -> usize {
        self.selection.current_index()
    }

    /// Write from the dropdown; selects the model to spawn next.
    pub fn set_selected_index(&mut self, index: usize) {
        self.selection.set_current_index(index);
    }
}

/// Initialize logging for native hosts. WASM hosts use `console_log`.
pub fn init_logging() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info).expect("Could not initialize logger");
    }
}
