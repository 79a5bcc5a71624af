//! Kernel queries for star-shaped polyhedra.
//!
//! Purpose
//! - The caller-facing entry points: take a mesh (or a file path), emit one
//!   kernel point or the definitive "no kernel" answer.
//!
//! Pipeline
//! - Map every triangle to its supporting half-space (`geom3::extract`),
//!   then ask the LP solver for a point in the intersection of all of them.
//!   The solve is bounded by the mesh's inflated bounding box; the kernel is
//!   a subset of the convex hull, so the box never cuts feasible points away.
//!
//! Outcome semantics
//! - `KernelResult::NoKernel` (LP infeasible) is a result value, not an
//!   error. Errors mean the query could not be answered: a degenerate input
//!   triangle, an empty mesh, a failed load, or a solver breakdown.
//! - An objective-unbounded feasible region collapses to success: the
//!   returned point then sits on the bounding box and still satisfies every
//!   face constraint.

use std::path::Path;

use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::geom3::{halfspaces_from_triangles, DegenerateTriangle, GeomCfg};
use crate::lp::{self, LpError, LpOutcome};
use crate::mesh::io::{self, IoError};
use crate::mesh::Mesh;

/// Outcome of a kernel query: a witness point, or the definitive absence of
/// one. Never partial, never a sentinel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KernelResult {
    /// A point from which every face of the polyhedron is visible from the
    /// inner side.
    Point(Vector3<f64>),
    /// The half-space intersection is empty; the polyhedron is not
    /// star-shaped.
    NoKernel,
}

impl KernelResult {
    #[inline]
    pub fn is_point(&self) -> bool {
        matches!(self, KernelResult::Point(_))
    }

    #[inline]
    pub fn point(&self) -> Option<Vector3<f64>> {
        match *self {
            KernelResult::Point(p) => Some(p),
            KernelResult::NoKernel => None,
        }
    }
}

/// Errors that prevent a kernel query from being answered.
#[derive(Debug, Error)]
pub enum KernelError {
    /// A face normal is undefined; carries the triangle index.
    #[error(transparent)]
    Degenerate(#[from] DegenerateTriangle),

    /// The mesh has no triangles; there is no polyhedron to query.
    #[error("mesh has no triangles")]
    EmptyMesh,

    /// The LP primitive failed for a reason distinct from infeasibility:
    /// "we don't know", as opposed to "definitely no kernel".
    #[error("kernel solve failed: {0}")]
    Solver(#[from] LpError),

    /// The mesh file could not be loaded.
    #[error(transparent)]
    Io(#[from] IoError),
}

/// Per-query configuration.
#[derive(Clone, Copy, Debug)]
pub struct KernelCfg {
    /// Tolerances shared by extraction and the solve.
    pub geom: GeomCfg,
    /// Objective direction handed to the LP. Only selects which vertex of
    /// the feasible region is reported; `(0, 0, 1)` matches the classical
    /// formulation, and any finite direction is equally valid.
    pub objective: Vector3<f64>,
    /// Seed for the randomized solver; fixed so queries replay exactly.
    pub seed: u64,
}

impl Default for KernelCfg {
    fn default() -> Self {
        Self {
            geom: GeomCfg::default(),
            objective: Vector3::new(0.0, 0.0, 1.0),
            seed: 0x7ee1,
        }
    }
}

/// Find a kernel point of `mesh`, or report that none exists.
///
/// Precondition: faces wound consistently, normals outward. A mesh that
/// violates this yields `NoKernel` indistinguishably from a genuinely empty
/// kernel; see the crate docs for the limitation.
pub fn kernel_point(mesh: &Mesh, cfg: &KernelCfg) -> Result<KernelResult, KernelError> {
    if mesh.is_empty() {
        return Err(KernelError::EmptyMesh);
    }
    let hs = halfspaces_from_triangles(mesh.triangles(), cfg.geom)?;

    let Some(bounds) = mesh.bounds() else {
        // Faces exist but reference no vertices; unreachable for meshes from
        // the loaders.
        return Err(KernelError::EmptyMesh);
    };
    // Small inflation so a kernel point on the hull boundary is not lost to
    // the box clip.
    let pad = 1e-9 + 1e-3 * bounds.diagonal();
    let cube = bounds.inflated(pad);

    let mut rng = StdRng::seed_from_u64(cfg.seed);
    match lp::linprog(cfg.objective, &hs, &cube, cfg.geom, &mut rng)? {
        LpOutcome::Feasible(x) => Ok(KernelResult::Point(x)),
        LpOutcome::Infeasible => Ok(KernelResult::NoKernel),
    }
}

/// Load a mesh file (`.obj` or `.off`) and run [`kernel_point`] on it.
pub fn kernel_point_from_path<P: AsRef<Path>>(
    path: P,
    cfg: &KernelCfg,
) -> Result<KernelResult, KernelError> {
    let mesh = io::load_mesh(path)?;
    kernel_point(&mesh, cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom3::halfspace_from_triangle;
    use nalgebra::Vector2;

    /// Closed prism over a counter-clockwise outline: side walls plus caps,
    /// all wound outward. `cap` triangulates the outline by index.
    fn extrude(outline: &[Vector2<f64>], cap: &[[usize; 3]], height: f64) -> Mesh {
        let n = outline.len();
        let mut positions = Vec::with_capacity(2 * n);
        for p in outline {
            positions.push(Vector3::new(p.x, p.y, 0.0));
        }
        for p in outline {
            positions.push(Vector3::new(p.x, p.y, height));
        }
        let mut faces = Vec::new();
        for i in 0..n {
            let j = (i + 1) % n;
            faces.push([i, j, n + j]);
            faces.push([i, n + j, n + i]);
        }
        for &[a, b, c] in cap {
            faces.push([a, c, b]); // bottom, wound for -z
            faces.push([n + a, n + b, n + c]); // top, wound for +z
        }
        Mesh::from_parts(positions, faces)
    }

    fn unit_cube() -> Mesh {
        let square = [
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(1.0, 1.0),
            Vector2::new(0.0, 1.0),
        ];
        extrude(&square, &[[0, 1, 2], [0, 2, 3]], 1.0)
    }

    /// U-shaped prism: the two arm walls facing the slot demand `x >= 2`
    /// and `x <= 1` at once, so the kernel is empty.
    fn u_prism() -> Mesh {
        let outline = [
            Vector2::new(0.0, 0.0),
            Vector2::new(3.0, 0.0),
            Vector2::new(3.0, 2.0),
            Vector2::new(2.0, 2.0),
            Vector2::new(2.0, 1.0),
            Vector2::new(1.0, 1.0),
            Vector2::new(1.0, 2.0),
            Vector2::new(0.0, 2.0),
        ];
        let cap = [
            [0, 1, 4],
            [0, 4, 5],
            [0, 5, 6],
            [0, 6, 7],
            [1, 2, 3],
            [1, 3, 4],
        ];
        extrude(&outline, &cap, 1.0)
    }

    fn assert_in_kernel(p: Vector3<f64>, mesh: &Mesh, cfg: &KernelCfg) {
        for (i, tri) in mesh.triangles().enumerate() {
            let h = halfspace_from_triangle(&tri, cfg.geom).unwrap();
            assert!(
                h.satisfies_eps(p, 1e-7),
                "face {i} excludes {p}: residual {}",
                h.residual(p)
            );
        }
    }

    #[test]
    fn unit_cube_has_a_kernel_point() {
        let cfg = KernelCfg::default();
        let mesh = unit_cube();
        assert_eq!(mesh.face_count(), 12);
        let result = kernel_point(&mesh, &cfg).unwrap();
        let p = result.point().expect("cube is star-shaped");
        assert_in_kernel(p, &mesh, &cfg);
        // The centroid is interior, so it must satisfy every face too.
        assert_in_kernel(Vector3::new(0.5, 0.5, 0.5), &mesh, &cfg);
    }

    #[test]
    fn tetrahedron_has_a_kernel_point() {
        let cfg = KernelCfg::default();
        let mesh = Mesh::from_parts(
            vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
                Vector3::new(0.0, 0.0, 1.0),
            ],
            vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
        );
        let result = kernel_point(&mesh, &cfg).unwrap();
        let p = result.point().expect("tetrahedron is star-shaped");
        assert_in_kernel(p, &mesh, &cfg);
        assert_in_kernel(Vector3::new(0.25, 0.25, 0.25), &mesh, &cfg);
    }

    #[test]
    fn u_prism_has_no_kernel() {
        let cfg = KernelCfg::default();
        let result = kernel_point(&u_prism(), &cfg).unwrap();
        assert_eq!(result, KernelResult::NoKernel);
    }

    #[test]
    fn empty_mesh_is_an_error_not_a_result() {
        let cfg = KernelCfg::default();
        assert!(matches!(
            kernel_point(&Mesh::new(), &cfg),
            Err(KernelError::EmptyMesh)
        ));
    }

    #[test]
    fn degenerate_face_carries_its_index() {
        let cfg = KernelCfg::default();
        let mut mesh = unit_cube();
        // Collapse face 5 to a point.
        let v = mesh.positions.len();
        mesh.positions.push(Vector3::new(0.5, 0.5, 0.5));
        mesh.faces[5] = [v, v, v];
        match kernel_point(&mesh, &cfg) {
            Err(KernelError::Degenerate(e)) => assert_eq!(e.index, 5),
            other => panic!("expected Degenerate, got {other:?}"),
        }
    }

    #[test]
    fn repeated_queries_stay_feasible() {
        let mesh = unit_cube();
        let cfg_a = KernelCfg::default();
        let cfg_b = KernelCfg {
            seed: 99,
            objective: Vector3::new(-1.0, 0.25, 0.5),
            ..KernelCfg::default()
        };
        for cfg in [cfg_a, cfg_b] {
            let p = kernel_point(&mesh, &cfg).unwrap().point().unwrap();
            assert_in_kernel(p, &mesh, &cfg);
        }
    }

    #[test]
    fn path_entry_point_surfaces_load_errors() {
        let cfg = KernelCfg::default();
        match kernel_point_from_path("model.stl", &cfg) {
            Err(KernelError::Io(_)) => {}
            other => panic!("expected an Io error, got {other:?}"),
        }
    }

    #[test]
    fn inverted_winding_degrades_to_no_kernel() {
        // Flipping every face makes the constraints contradictory; the query
        // cannot tell this apart from a genuinely empty kernel.
        let cfg = KernelCfg::default();
        let mut mesh = unit_cube();
        for f in &mut mesh.faces {
            f.swap(1, 2);
        }
        let result = kernel_point(&mesh, &cfg).unwrap();
        assert_eq!(result, KernelResult::NoKernel);
    }
}
