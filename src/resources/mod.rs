/**
 * This module contains all logic for materializing model files as scene-graph
 * hierarchies. Only structure is needed here: node trees, local transforms
 * and vertex bounds for collision volumes. Rendering-side resources (buffers,
 * textures, materials) belong to the host.
 */
use std::{
    collections::HashMap,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context;
use log::warn;

use crate::{
    data_structures::{
        bounds::Aabb,
        instance::Instance,
        scene_graph::{Node, NodeId, SceneGraph},
    },
    spatial::Pose,
    spawn::SpawnProvider,
};

/// One node of a loaded model, before instantiation.
#[derive(Clone, Debug)]
struct TemplateNode {
    name: String,
    local: Instance,
    bounds: Option<Aabb>,
    children: Vec<TemplateNode>,
}

/// A parsed model hierarchy, cached per identifier.
#[derive(Clone, Debug, Default)]
struct ModelTemplate {
    roots: Vec<TemplateNode>,
}

/// Spawn provider backed by gltf files under a fixed asset directory.
///
/// Model identifiers are file names relative to the asset root. Each file is
/// parsed once and cached; spawning is pure arena insertion afterwards.
#[derive(Debug, Default)]
pub struct GltfSpawner {
    asset_root: PathBuf,
    cache: HashMap<String, ModelTemplate>,
}

impl GltfSpawner {
    pub fn new(asset_root: impl Into<PathBuf>) -> Self {
        Self {
            asset_root: asset_root.into(),
            cache: HashMap::new(),
        }
    }

    fn template(&mut self, model: &str) -> anyhow::Result<&ModelTemplate> {
        if !self.cache.contains_key(model) {
            let mut path = self.asset_root.join(model);
            if !path.exists() && path.extension().is_none() {
                path.set_extension("gltf");
            }
            let template = load_template(&path)
                .with_context(|| format!("loading model {:?} from {:?}", model, path))?;
            self.cache.insert(model.to_string(), template);
        }
        Ok(&self.cache[model])
    }
}

impl SpawnProvider for GltfSpawner {
    fn spawn_at(
        &mut self,
        graph: &mut SceneGraph,
        model: &str,
        pose: &Pose,
    ) -> anyhow::Result<NodeId> {
        let template = self.template(model)?.clone();
        // The root carries the catalog identifier as its name so a placed
        // instance can be matched back to its catalog entry.
        let root = graph.add_root(Node::new(model).with_local(Instance {
            position: pose.position,
            rotation: pose.rotation,
            scale: cgmath::Vector3::new(1.0, 1.0, 1.0),
        }));
        for template_root in &template.roots {
            instantiate(graph, root, template_root);
        }
        Ok(root)
    }
}

fn instantiate(graph: &mut SceneGraph, parent: NodeId, template: &TemplateNode) {
    let mut node = Node::new(template.name.clone()).with_local(template.local.clone());
    node.mesh_bounds = template.bounds.clone();
    let id = graph.add_child(parent, node);
    for child in &template.children {
        instantiate(graph, id, child);
    }
}

fn load_template(path: &Path) -> anyhow::Result<ModelTemplate> {
    let file = File::open(path)?;
    let gltf = gltf::Gltf::from_reader(BufReader::new(file))?;

    // Load buffers. A missing buffer degrades the affected meshes to
    // bound-less nodes instead of failing the whole model.
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut buffer_data: Vec<Option<Vec<u8>>> = Vec::new();
    for buffer in gltf.buffers() {
        let data = match buffer.source() {
            gltf::buffer::Source::Bin => gltf.blob.as_deref().map(<[u8]>::to_vec),
            gltf::buffer::Source::Uri(uri) => match std::fs::read(base_dir.join(uri)) {
                Ok(bin) => Some(bin),
                Err(error) => {
                    warn!("Buffer {:?} of {:?} could not be read: {}.", uri, path, error);
                    None
                }
            },
        };
        if data.is_none() {
            warn!("Meshes referencing buffer {} of {:?} will have no bounds.", buffer.index(), path);
        }
        buffer_data.push(data);
    }

    let mut roots = Vec::new();
    for scene in gltf.scenes() {
        for node in scene.nodes() {
            roots.push(to_template_node(node, &buffer_data, path));
        }
    }
    Ok(ModelTemplate { roots })
}

fn to_template_node(
    node: gltf::scene::Node,
    buffer_data: &[Option<Vec<u8>>],
    path: &Path,
) -> TemplateNode {
    let bounds = node.mesh().map(|mesh| {
        let mut bounds = Aabb::empty();
        for primitive in mesh.primitives() {
            let reader = primitive
                .reader(|buffer| buffer_data.get(buffer.index()).and_then(|data| data.as_deref()));
            match reader.read_positions() {
                Some(positions) => {
                    for position in positions {
                        bounds.grow(position.into());
                    }
                }
                None => warn!(
                    "Primitive {} of mesh {:?} in {:?} has no readable positions; skipping it.",
                    primitive.index(),
                    mesh.name().unwrap_or("unknown_mesh"),
                    path
                ),
            }
        }
        bounds
    });

    let (position, rotation, scale) = node.transform().decomposed();
    let local = Instance {
        position: position.into(),
        rotation: rotation.into(),
        scale: scale.into(),
    };

    let children = node
        .children()
        .map(|child| to_template_node(child, buffer_data, path))
        .collect();

    TemplateNode {
        name: node.name().unwrap_or("unnamed_node").to_string(),
        local,
        bounds,
        children,
    }
}
