//! Spawning models into the scene graph.
//!
//! Asset decoding is a host concern; the engine only needs something that can
//! materialize a named model as a node hierarchy at a pose. The gltf-backed
//! implementation lives in [`crate::resources`].

use cgmath::One;

use crate::{
    data_structures::scene_graph::{NodeId, SceneGraph},
    spatial::Pose,
};

/// External asset pipeline, specified only at its boundary.
pub trait SpawnProvider {
    /// Materialize `model` as a hierarchy of nodes rooted at `pose`.
    ///
    /// The returned id is the hierarchy root; its name must equal `model` so
    /// a spawned instance can be matched back to its catalog entry.
    fn spawn_at(
        &mut self,
        graph: &mut SceneGraph,
        model: &str,
        pose: &Pose,
    ) -> anyhow::Result<NodeId>;

    /// Spawn a transient instance at the origin, used to enumerate a model's
    /// structure before the catalog is available. The caller destroys it.
    fn spawn_probe(&mut self, graph: &mut SceneGraph, model: &str) -> anyhow::Result<NodeId> {
        let pose = Pose {
            position: cgmath::Vector3::new(0.0, 0.0, 0.0),
            rotation: cgmath::Quaternion::one(),
        };
        self.spawn_at(graph, model, &pose)
    }
}
