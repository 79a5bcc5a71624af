//! 3D half-space geometry (plane-equation form, unit normals).
//!
//! Purpose
//! - Provide the half-space type `Hs3` in plane-equation form `n·x + d <= 0`
//!   with unit normals, plus the per-triangle extraction that produces it.
//! - Keep tolerances explicit (`GeomCfg`) so every call is reproducible; no
//!   module-level numeric state.
//!
//! Why unit normals
//! - The kernel solve compares residuals `n·x + d` across all faces; rows at
//!   mixed scales would bias the feasibility tolerance. Normalization happens
//!   exactly once, here, with an explicit per-triangle degeneracy check.

pub mod extract;
mod types;

pub use extract::{halfspace_from_triangle, halfspaces_from_triangles, DegenerateTriangle};
pub use types::{Aabb, GeomCfg, Hs3, Triangle};
