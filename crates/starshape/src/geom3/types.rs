//! Basic 3D types and tolerances.
//!
//! - `GeomCfg`: centralizes epsilons for degeneracy and feasibility checks.
//! - `Hs3`: closed half-space `n·x + d <= 0` with helper predicates.
//! - `Triangle`: three ordered vertices, winding fixed by the source mesh.
//! - `Aabb`: axis-aligned box used to bound the feasibility solve.

use nalgebra::Vector3;

/// Geometry configuration (tolerances).
///
/// Passed explicitly into extraction and solver calls so that tolerance
/// handling is reproducible and testable per call.
#[derive(Clone, Copy, Debug)]
pub struct GeomCfg {
    /// Threshold below which a norm or determinant counts as zero.
    pub eps_det: f64,
    /// Slack for feasibility and membership checks.
    pub eps_feas: f64,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self {
            eps_det: 1e-12,
            eps_feas: 1e-9,
        }
    }
}

/// Closed half-space `n·x + d <= 0` in R^3.
///
/// Invariants:
/// - `n` is a unit outward normal when produced by extraction; the plane
///   `n·x + d = 0` passes through the source triangle's vertices.
#[derive(Clone, Copy, Debug)]
pub struct Hs3 {
    pub n: Vector3<f64>,
    pub d: f64,
}

impl Hs3 {
    #[inline]
    pub fn new(n: Vector3<f64>, d: f64) -> Self {
        Self { n, d }
    }

    /// Signed residual `n·p + d`; non-positive inside the half-space.
    #[inline]
    pub fn residual(&self, p: Vector3<f64>) -> f64 {
        self.n.dot(&p) + self.d
    }

    #[inline]
    pub fn satisfies_eps(&self, p: Vector3<f64>, eps: f64) -> bool {
        self.residual(p) <= eps
    }
}

/// Triangle with concrete vertex positions, ordered by the mesh winding.
///
/// Immutable value type; the winding convention (counter-clockwise viewed
/// from outside, normals outward) is a precondition inherited from the mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub v0: Vector3<f64>,
    pub v1: Vector3<f64>,
    pub v2: Vector3<f64>,
}

impl Triangle {
    #[inline]
    pub fn new(v0: Vector3<f64>, v1: Vector3<f64>, v2: Vector3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    #[inline]
    pub fn from_arrays(v0: [f64; 3], v1: [f64; 3], v2: [f64; 3]) -> Self {
        Self {
            v0: Vector3::from(v0),
            v1: Vector3::from(v1),
            v2: Vector3::from(v2),
        }
    }

    /// Unnormalized normal `(v1 - v0) × (v2 - v1)`.
    ///
    /// Zero iff the vertices are collinear or coincident.
    #[inline]
    pub fn raw_normal(&self) -> Vector3<f64> {
        (self.v1 - self.v0).cross(&(self.v2 - self.v1))
    }
}

/// Axis-aligned bounding box, `min <= max` componentwise.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f64>,
    pub max: Vector3<f64>,
}

impl Aabb {
    /// Smallest box containing all points; `None` for an empty iterator.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vector3<f64>>,
    {
        let mut it = points.into_iter();
        let first = it.next()?;
        let mut aabb = Aabb {
            min: first,
            max: first,
        };
        for p in it {
            aabb.grow(p);
        }
        Some(aabb)
    }

    #[inline]
    pub fn grow(&mut self, p: Vector3<f64>) {
        self.min = self.min.inf(&p);
        self.max = self.max.sup(&p);
    }

    /// Box enlarged by `pad` on every side.
    #[inline]
    pub fn inflated(&self, pad: f64) -> Self {
        let v = Vector3::repeat(pad);
        Aabb {
            min: self.min - v,
            max: self.max + v,
        }
    }

    #[inline]
    pub fn diagonal(&self) -> f64 {
        (self.max - self.min).norm()
    }

    /// Largest distance from the origin to a corner of the box.
    #[inline]
    pub fn corner_radius(&self) -> f64 {
        let far = self.min.zip_map(&self.max, |a, b| a.abs().max(b.abs()));
        far.norm()
    }
}
