//! Indexed triangle mesh.
//!
//! The mesh is treated as immutable input: the loader (or the caller)
//! constructs it once, the kernel query only reads it. Faces reference
//! vertices by index and use counter-clockwise winding viewed from outside,
//! so face normals point outward by the right-hand rule. Consistency of that
//! winding across the whole mesh is a precondition; it is not verified here,
//! and a mesh that breaks it degrades to a "no kernel" answer downstream.

pub mod io;

use nalgebra::Vector3;

use crate::geom3::{Aabb, Triangle};

/// An indexed triangle mesh: positions plus faces as index triples.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    /// Vertex positions.
    pub positions: Vec<Vector3<f64>>,
    /// Triangle faces `[v0, v1, v2]`, counter-clockwise from outside.
    pub faces: Vec<[usize; 3]>,
}

impl Mesh {
    #[inline]
    pub const fn new() -> Self {
        Self {
            positions: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Build from parts. Face indices must be in bounds; the loaders check
    /// this while parsing, direct constructors inherit the obligation.
    #[inline]
    pub const fn from_parts(positions: Vec<Vector3<f64>>, faces: Vec<[usize; 3]>) -> Self {
        Self { positions, faces }
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// True when the mesh has no faces.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Triangle `i` with resolved vertex positions.
    ///
    /// Panics if `i` or a stored index is out of bounds.
    #[inline]
    pub fn triangle(&self, i: usize) -> Triangle {
        let [a, b, c] = self.faces[i];
        Triangle::new(self.positions[a], self.positions[b], self.positions[c])
    }

    /// Ordered triangle iteration, aligned with face indices.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.faces
            .iter()
            .map(|&[a, b, c]| Triangle::new(self.positions[a], self.positions[b], self.positions[c]))
    }

    /// Bounding box over all vertex positions; `None` when there are none.
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.positions.iter().copied())
    }
}
