//! Spatial queries against the scene and the tracked environment.
//!
//! The engine never looks at camera frames or UI widget trees itself. A host
//! implements [`SpatialQuery`] on top of its tracking and UI stack; the
//! gesture core only asks three questions per touch point. Results must be
//! stable within a frame: repeated calls with the same point return the same
//! answer.

use winit::dpi::PhysicalPosition;

use crate::data_structures::scene_graph::{NodeId, SceneGraph};

/// Position and orientation of a tracked-plane hit.
#[derive(Clone, Debug, PartialEq)]
pub struct Pose {
    pub position: cgmath::Vector3<f32>,
    pub rotation: cgmath::Quaternion<f32>,
}

/// Nearest collider intersection for a screen point.
#[derive(Clone, Debug)]
pub struct SceneHit {
    pub node: NodeId,
    pub position: cgmath::Vector3<f32>,
}

/// A world-space ray, usually unprojected from a screen point.
#[derive(Clone, Debug)]
pub struct Ray {
    pub origin: cgmath::Vector3<f32>,
    pub direction: cgmath::Vector3<f32>,
}

/// Host-provided spatial queries, polled by the gesture core each frame.
pub trait SpatialQuery {
    /// Whether the point overlaps interactive UI.
    fn is_over_ui(&self, point: PhysicalPosition<f64>) -> bool;

    /// Nearest scene-collider intersection under the point, if any.
    fn raycast_scene(&self, graph: &SceneGraph, point: PhysicalPosition<f64>) -> Option<SceneHit>;

    /// Nearest tracked-plane pose under the point, if any.
    fn raycast_planes(&self, point: PhysicalPosition<f64>) -> Option<Pose>;
}

/// Test a world-space ray against every collider in the graph and return the
/// nearest hit.
///
/// Colliders are tested as world-space boxes of their local volumes; grouping
/// nodes with empty colliders never match. Hosts with their own unprojection
/// can build [`SpatialQuery::raycast_scene`] directly on top of this.
pub fn raycast_colliders(graph: &SceneGraph, ray: &Ray) -> Option<SceneHit> {
    let mut nearest: Option<(f32, NodeId)> = None;
    for (id, node) in graph.iter() {
        let Some(collider) = &node.collider else {
            continue;
        };
        let world_bounds = collider.transformed(&node.world);
        if let Some(distance) = world_bounds.hit_distance(ray.origin, ray.direction) {
            if nearest.map_or(true, |(best, _)| distance < best) {
                nearest = Some((distance, id));
            }
        }
    }
    nearest.map(|(distance, node)| SceneHit {
        node,
        position: ray.origin + ray.direction * distance,
    })
}
