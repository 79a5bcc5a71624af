//! Star-shaped polyhedron kernel queries.
//!
//! The kernel of a polyhedron is the set of points that see every face from
//! the inner side; it is non-empty exactly for the star-shaped polyhedra.
//! This crate turns each mesh triangle into a supporting half-space and
//! decides non-emptiness of the half-space intersection with a small
//! randomized linear program, returning one witness point when the kernel
//! exists.
//!
//! Module map
//! - `geom3`: half-space and triangle types, tolerances, the triangle to
//!   half-space extraction.
//! - `lp`: randomized Seidel solver for linear programs in R^3.
//! - `mesh`: indexed triangle mesh plus OBJ/OFF loaders.
//! - `kernel`: the caller-facing kernel query.
//! - `rand3`: reproducible random star-shaped meshes for tests and benches.

pub mod geom3;
pub mod kernel;
pub mod lp;
pub mod mesh;
pub mod rand3;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::geom3::{
        halfspace_from_triangle, halfspaces_from_triangles, Aabb, DegenerateTriangle, GeomCfg,
        Hs3, Triangle,
    };
    pub use crate::kernel::{
        kernel_point, kernel_point_from_path, KernelCfg, KernelError, KernelResult,
    };
    pub use crate::mesh::{io::load_mesh, Mesh};
    pub use nalgebra::Vector3 as Vec3;
}
