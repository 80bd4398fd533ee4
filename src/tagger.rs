//! Hierarchy tagging and collision enablement for spawned content.
//!
//! A spawned model is a whole tree of nodes and any part of it must be
//! hit-testable and identifiable as placed content. The three passes here are
//! idempotent and cheap, so they are re-applied every frame to the most
//! recently spawned object: asset loading may attach renderable children
//! asynchronously after the initial spawn call returns.

use crate::data_structures::{
    bounds::Aabb,
    scene_graph::{NodeId, SceneGraph},
};

/// Set the placement marker on `root` and every descendant.
pub fn tag(graph: &mut SceneGraph, root: NodeId) {
    for id in graph.subtree(root) {
        if let Some(node) = graph.get_mut(id) {
            node.tagged = true;
        }
    }
}

/// Ensure each node under `root` carries exactly one collision volume.
///
/// The volume is the node's mesh bounds; grouping nodes without geometry get
/// an empty box that never intersects a ray. Existing colliders are kept.
pub fn ensure_colliders(graph: &mut SceneGraph, root: NodeId) {
    for id in graph.subtree(root) {
        if let Some(node) = graph.get_mut(id) {
            if node.collider.is_none() {
                node.collider = Some(node.mesh_bounds.clone().unwrap_or_else(Aabb::empty));
            }
        }
    }
}

/// Disable shadow casting on every node under `root` that renders geometry.
///
/// Real-world light sources make baked shadows arbitrary in a camera-tracked
/// scene.
pub fn disable_shadows(graph: &mut SceneGraph, root: NodeId) {
    for id in graph.subtree(root) {
        if let Some(node) = graph.get_mut(id) {
            if node.mesh_bounds.is_some() {
                node.casts_shadows = false;
            }
        }
    }
}

/// Apply all three passes in the required order: tag, collide, de-shadow.
///
/// An object must have gone through this before it participates in
/// hit-testing.
pub fn prepare_for_hit_testing(graph: &mut SceneGraph, root: NodeId) {
    tag(graph, root);
    ensure_colliders(graph, root);
    disable_shadows(graph, root);
}

#[cfg(test)]
mod tests {
    use crate::data_structures::scene_graph::Node;

    use super::*;

    fn spawned_model(graph: &mut SceneGraph) -> NodeId {
        let root = graph.add_root(Node::new("sofa"));
        let body = graph.add_child(
            root,
            Node::new("body").with_mesh_bounds(Aabb::from_positions([
                [-0.5, 0.0, -0.5],
                [0.5, 1.0, 0.5],
            ])),
        );
        graph.add_child(body, Node::new("cushion").with_mesh_bounds(Aabb::from_positions([
            [-0.2, 0.0, -0.2],
            [0.2, 0.2, 0.2],
        ])));
        root
    }

    #[test]
    fn should_tag_and_collide_every_node_in_the_subtree() {
        let mut graph = SceneGraph::new();
        let root = spawned_model(&mut graph);
        prepare_for_hit_testing(&mut graph, root);
        for id in graph.subtree(root) {
            let node = graph.get(id).unwrap();
            assert!(node.tagged);
            assert!(node.collider.is_some());
            if node.mesh_bounds.is_some() {
                assert!(!node.casts_shadows);
            }
        }
    }

    #[test]
    fn should_be_idempotent_when_applied_twice() {
        let mut graph = SceneGraph::new();
        let root = spawned_model(&mut graph);
        prepare_for_hit_testing(&mut graph, root);
        let once: Vec<_> = graph
            .subtree(root)
            .into_iter()
            .map(|id| graph.get(id).unwrap().clone())
            .collect();
        prepare_for_hit_testing(&mut graph, root);
        let twice: Vec<_> = graph
            .subtree(root)
            .into_iter()
            .map(|id| graph.get(id).unwrap().clone())
            .collect();
        for (first, second) in once.iter().zip(twice.iter()) {
            assert_eq!(first.tagged, second.tagged);
            assert_eq!(first.collider, second.collider);
            assert_eq!(first.casts_shadows, second.casts_shadows);
        }
    }

    #[test]
    fn should_keep_grouping_nodes_shadow_flag_untouched() {
        let mut graph = SceneGraph::new();
        let root = spawned_model(&mut graph);
        disable_shadows(&mut graph, root);
        // the root has no geometry, nothing to disable there
        assert!(graph.get(root).unwrap().casts_shadows);
    }
}
