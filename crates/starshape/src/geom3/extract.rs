//! Triangle to half-space extraction.
//!
//! Each triangle `(v0, v1, v2)` maps to the supporting half-space
//! `n·x + d <= 0` with `n = (v1-v0)×(v2-v1) / ‖·‖` and `d = -(n·v0)`.
//! The sign convention depends entirely on the mesh winding being consistent
//! across all faces; the extractor does not verify that precondition, and an
//! inconsistently wound mesh degrades downstream to "no kernel".
//!
//! Degeneracy is checked per triangle, never in aggregate over the batch: a
//! single zero-area row must fail with its index instead of carrying NaN
//! into the solve.

use thiserror::Error;

use super::types::{GeomCfg, Hs3, Triangle};

/// A triangle whose vertices are collinear or coincident; the face normal is
/// undefined and no half-space can be emitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("degenerate triangle at index {index}: vertices are collinear or coincident")]
pub struct DegenerateTriangle {
    pub index: usize,
}

/// Half-space supporting one triangle, or `None` when the triangle is
/// degenerate (`‖raw normal‖ <= eps_det`, or non-finite input).
pub fn halfspace_from_triangle(tri: &Triangle, cfg: GeomCfg) -> Option<Hs3> {
    let raw = tri.raw_normal();
    let norm = raw.norm();
    if !norm.is_finite() || norm <= cfg.eps_det {
        return None;
    }
    let n = raw / norm;
    let d = -n.dot(&tri.v0);
    Some(Hs3::new(n, d))
}

/// Half-spaces for an ordered triangle sequence, index-aligned with the
/// input: half-space `i` supports triangle `i`.
pub fn halfspaces_from_triangles<I>(tris: I, cfg: GeomCfg) -> Result<Vec<Hs3>, DegenerateTriangle>
where
    I: IntoIterator<Item = Triangle>,
{
    tris.into_iter()
        .enumerate()
        .map(|(index, tri)| {
            halfspace_from_triangle(&tri, cfg).ok_or(DegenerateTriangle { index })
        })
        .collect()
}
