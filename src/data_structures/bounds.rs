//! Axis-aligned bounding volumes for hit-testing.
//!
//! Colliders for spawned content are axis-aligned boxes derived from mesh
//! vertex bounds. Rays are tested against the world-space box of each node
//! using the slab method.

use cgmath::{ElementWise, vec3};

use crate::data_structures::instance::Instance;

/// An axis-aligned bounding box in the coordinate space of its owner.
///
/// An empty box (`min > max`) is a valid collider for nodes that carry no
/// geometry; it never intersects anything.
#[derive(Clone, Debug, PartialEq)]
pub struct Aabb {
    pub min: cgmath::Vector3<f32>,
    pub max: cgmath::Vector3<f32>,
}

impl Aabb {
    pub fn empty() -> Self {
        Self {
            min: vec3(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: vec3(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Accumulate vertex positions into a bounding box.
    pub fn from_positions(positions: impl IntoIterator<Item = [f32; 3]>) -> Self {
        let mut bounds = Self::empty();
        for position in positions {
            bounds.grow(position.into());
        }
        bounds
    }

    pub fn grow(&mut self, point: cgmath::Vector3<f32>) {
        self.min = vec3(
            self.min.x.min(point.x),
            self.min.y.min(point.y),
            self.min.z.min(point.z),
        );
        self.max = vec3(
            self.max.x.max(point.x),
            self.max.y.max(point.y),
            self.max.z.max(point.z),
        );
    }

    /// The world-space box enclosing this box under `transform`.
    ///
    /// Transforms all eight corners and re-wraps them; conservative for
    /// rotated boxes, exact for axis-aligned placements.
    pub fn transformed(&self, transform: &Instance) -> Aabb {
        if self.is_empty() {
            return Aabb::empty();
        }
        let mut out = Aabb::empty();
        for corner in 0..8u8 {
            let corner = vec3(
                if corner & 1 == 0 { self.min.x } else { self.max.x },
                if corner & 2 == 0 { self.min.y } else { self.max.y },
                if corner & 4 == 0 { self.min.z } else { self.max.z },
            );
            out.grow(transform.transform_point(corner));
        }
        out
    }

    /// Distance along `direction` from `origin` to the box, if the ray hits.
    ///
    /// Slab method. A ray starting inside the box reports distance zero.
    pub fn hit_distance(
        &self,
        origin: cgmath::Vector3<f32>,
        direction: cgmath::Vector3<f32>,
    ) -> Option<f32> {
        if self.is_empty() {
            return None;
        }
        let inverse = vec3(1.0, 1.0, 1.0).div_element_wise(direction);
        let t0 = (self.min - origin).mul_element_wise(inverse);
        let t1 = (self.max - origin).mul_element_wise(inverse);
        let near = vec3(t0.x.min(t1.x), t0.y.min(t1.y), t0.z.min(t1.z));
        let far = vec3(t0.x.max(t1.x), t0.y.max(t1.y), t0.z.max(t1.z));
        let t_near = near.x.max(near.y).max(near.z);
        let t_far = far.x.min(far.y).min(far.z);
        if t_near > t_far || t_far < 0.0 {
            return None;
        }
        Some(t_near.max(0.0))
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}
