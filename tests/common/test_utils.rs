//! Shared fixtures: deterministic mock collaborators driving the engine.
//!
//! The mock spatial provider models a top-down orthographic view: screen
//! point `(x, y)` unprojects to the ground point `(x / 100, 0, y / 100)`,
//! and scene rays drop straight down from above.

use std::{cell::RefCell, rc::Rc};

use touch_ngin::{
    catalog::CatalogProvider,
    data_structures::{
        bounds::Aabb,
        instance::Instance,
        scene_graph::{Node, NodeId, SceneGraph},
    },
    spatial::{Pose, Ray, SceneHit, SpatialQuery, raycast_colliders},
    spawn::SpawnProvider,
};
use cgmath::{One, vec3};
use winit::dpi::PhysicalPosition;

pub fn screen(x: f64, y: f64) -> PhysicalPosition<f64> {
    PhysicalPosition::new(x, y)
}

pub fn ground(point: PhysicalPosition<f64>) -> cgmath::Vector3<f32> {
    vec3((point.x / 100.0) as f32, 0.0, (point.y / 100.0) as f32)
}

/// Top-down mock tracking stack.
pub struct MockSpatial {
    /// UI rectangles as `(min_x, min_y, max_x, max_y)` in screen space.
    pub ui_zones: Vec<(f64, f64, f64, f64)>,
    /// Whether tracked planes exist at all.
    pub planes_available: bool,
}

impl Default for MockSpatial {
    fn default() -> Self {
        Self {
            ui_zones: Vec::new(),
            planes_available: true,
        }
    }
}

impl SpatialQuery for MockSpatial {
    fn is_over_ui(&self, point: PhysicalPosition<f64>) -> bool {
        self.ui_zones.iter().any(|&(min_x, min_y, max_x, max_y)| {
            point.x >= min_x && point.x <= max_x && point.y >= min_y && point.y <= max_y
        })
    }

    fn raycast_scene(&self, graph: &SceneGraph, point: PhysicalPosition<f64>) -> Option<SceneHit> {
        let target = ground(point);
        let ray = Ray {
            origin: vec3(target.x, 10.0, target.z),
            direction: vec3(0.0, -1.0, 0.0),
        };
        raycast_colliders(graph, &ray)
    }

    fn raycast_planes(&self, point: PhysicalPosition<f64>) -> Option<Pose> {
        self.planes_available.then(|| Pose {
            position: ground(point),
            rotation: cgmath::Quaternion::one(),
        })
    }
}

/// Catalog whose entries can be filled in after engine construction, to
/// mimic a slow backing service.
#[derive(Clone, Default)]
pub struct MockCatalog {
    entries: Rc<RefCell<Vec<String>>>,
}

impl MockCatalog {
    pub fn set_entries(&self, entries: &[&str]) {
        *self.entries.borrow_mut() = entries.iter().map(|&e| e.to_string()).collect();
    }
}

impl CatalogProvider for MockCatalog {
    fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }
}

/// Spawner producing a two-level hierarchy: a grouping root named after the
/// model, with one mesh child spanning a unit footprint around the root.
#[derive(Default)]
pub struct TestSpawner {
    pub spawn_count: usize,
}

impl SpawnProvider for TestSpawner {
    fn spawn_at(
        &mut self,
        graph: &mut SceneGraph,
        model: &str,
        pose: &Pose,
    ) -> anyhow::Result<NodeId> {
        self.spawn_count += 1;
        let root = graph.add_root(Node::new(model).with_local(Instance {
            position: pose.position,
            rotation: pose.rotation,
            scale: vec3(1.0, 1.0, 1.0),
        }));
        graph.add_child(
            root,
            Node::new("body").with_mesh_bounds(Aabb::from_positions([
                [-0.5, 0.0, -0.5],
                [0.5, 1.0, 0.5],
            ])),
        );
        Ok(root)
    }
}
