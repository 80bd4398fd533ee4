/**
 * This module contains the engine data models: node transforms, bounding
 * volumes and the arena scene graph that holds all spawned content.
 */
pub mod bounds;
pub mod instance;
pub mod scene_graph;
