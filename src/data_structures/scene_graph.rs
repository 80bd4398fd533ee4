//! Arena-based scene hierarchy.
//!
//! Spawned content lives in a flat arena of nodes linked by parent/child
//! indices. Traversals (tagging, collider injection, world-transform
//! propagation) are explicit stack walks over the arena instead of ad-hoc
//! recursion over the tree, so they can run every frame without blowing the
//! stack on deep models.

use log::warn;

use crate::data_structures::{bounds::Aabb, instance::Instance};

/// Handle to a node in the arena. Stable for the lifetime of the node; a
/// removed node's handle goes stale and never aliases a later occupant of
/// the same slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

/// One node of a spawned hierarchy.
#[derive(Clone, Debug)]
pub struct Node {
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub local: Instance,
    pub world: Instance,
    /// Placement marker identifying this node as placed content.
    pub tagged: bool,
    /// Collision volume in local space, present once the node is hit-testable.
    pub collider: Option<Aabb>,
    /// Vertex bounds of the node's mesh, `None` for grouping nodes.
    pub mesh_bounds: Option<Aabb>,
    pub casts_shadows: bool,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            local: Instance::new(),
            world: Instance::new(),
            tagged: false,
            collider: None,
            mesh_bounds: None,
            casts_shadows: true,
        }
    }

    pub fn with_local(mut self, local: Instance) -> Self {
        self.local = local;
        self
    }

    pub fn with_mesh_bounds(mut self, bounds: Aabb) -> Self {
        self.mesh_bounds = Some(bounds);
        self
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// The arena of all currently spawned nodes.
///
/// Freed slots go onto a free list and are reused by later inserts, so the
/// arena does not grow across place/remove cycles; the per-slot generation
/// keeps stale handles from resolving to the reusing node.
#[derive(Debug, Default)]
pub struct SceneGraph {
    slots: Vec<Slot>,
    free: Vec<usize>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_root(&mut self, node: Node) -> NodeId {
        self.insert(node, None)
    }

    pub fn add_child(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = self.insert(node, Some(parent));
        match self.get_mut(parent) {
            Some(parent_node) => parent_node.children.push(id),
            None => warn!("Attaching node to missing parent {:?}; node becomes a root.", parent),
        }
        id
    }

    fn insert(&mut self, mut node: Node, parent: Option<NodeId>) -> NodeId {
        node.parent = parent;
        node.children.clear();
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.node = Some(node);
                NodeId { index, generation: slot.generation }
            }
            None => {
                self.slots.push(Slot { generation: 0, node: Some(node) });
                NodeId { index: self.slots.len() - 1, generation: 0 }
            }
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    /// The ids of `root` and every node below it, in depth-first order.
    pub fn subtree(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.get(id) {
                out.push(id);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Detach and drop `root` and its whole subtree. The freed slots become
    /// available for reuse; all handles into the subtree go stale.
    pub fn remove_subtree(&mut self, root: NodeId) {
        if let Some(parent) = self.parent_of(root) {
            if let Some(parent_node) = self.get_mut(parent) {
                parent_node.children.retain(|&child| child != root);
            }
        }
        for id in self.subtree(root) {
            let slot = &mut self.slots[id.index];
            slot.node = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(id.index);
        }
    }

    pub fn roots(&self) -> Vec<NodeId> {
        self.iter()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(id, _)| id)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.node
                .as_ref()
                .map(|node| (NodeId { index, generation: slot.generation }, node))
        })
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.node.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }

    pub fn world_position(&self, id: NodeId) -> Option<cgmath::Vector3<f32>> {
        self.get(id).map(|node| node.world.position)
    }

    /// Move `id` so that its world position becomes `position`.
    ///
    /// For child nodes the requested world position is mapped through the
    /// parent's cached world transform; the cache is refreshed on the next
    /// [`SceneGraph::update_world_transforms`] pass.
    pub fn set_world_position(&mut self, id: NodeId, position: cgmath::Vector3<f32>) {
        let local_position = match self.parent_of(id).and_then(|parent| self.get(parent)) {
            Some(parent) => parent.world.inverse_transform_point(position),
            None => position,
        };
        if let Some(node) = self.get_mut(id) {
            node.local.position = local_position;
        }
    }

    /// Recompute every cached world transform from the roots down.
    pub fn update_world_transforms(&mut self) {
        let mut stack: Vec<(NodeId, Instance)> = self
            .roots()
            .into_iter()
            .map(|id| (id, Instance::new()))
            .collect();
        while let Some((id, parent_world)) = stack.pop() {
            let children = match self.get_mut(id) {
                Some(node) => {
                    node.world = &parent_world * &node.local;
                    node.children.clone()
                }
                None => continue,
            };
            let world = self.get(id).map(|node| node.world.clone()).unwrap_or_default();
            stack.extend(children.into_iter().map(|child| (child, world.clone())));
        }
    }
}
