//! Randomized Seidel solver for small linear programs in R^3.
//!
//! Purpose
//! - Decide feasibility of `{ x : n_i·x + d_i <= 0 }` and return the point
//!   minimizing a caller-chosen objective direction, which only selects the
//!   vertex reported when several (or an unbounded face) are feasible.
//!
//! Contract
//! - `minimize c·x  subject to  n_i·x + d_i <= 0` over the half-spaces
//!   intersected with a caller-supplied bounding box.
//! - Returns `Feasible(x)` with `x` satisfying every constraint within
//!   `cfg.eps_feas`, or `Infeasible` when the intersection is empty. Input
//!   rows or intermediate arithmetic that go non-finite are an `LpError`,
//!   which is a different statement than infeasibility.
//! - The box keeps every subproblem bounded. When the true feasible region
//!   is unbounded in the objective direction the reported point lies on the
//!   box, which still satisfies all constraints; callers that only need
//!   feasibility treat that as success.
//! - Deterministic given the `Rng`; expected O(n) constraints processed for
//!   the fixed dimension.
//!
//! Shape of the algorithm (Seidel 1991): maintain the optimum of the
//! constraints seen so far; when a new constraint is violated the optimum
//! moves onto its plane, and the problem restricted to that plane is the
//! same recursion one dimension down (3D -> 2D -> 1D line clipping).

use nalgebra::{Vector2, Vector3};
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::geom3::{Aabb, GeomCfg, Hs3};

/// Terminal solver statuses. Feasibility only; see the module contract for
/// how unboundedness folds into `Feasible`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LpOutcome {
    Feasible(Vector3<f64>),
    Infeasible,
}

/// Solver failure distinct from infeasibility: the inputs or the arithmetic
/// broke down, so nothing is known about the feasible region.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum LpError {
    #[error("non-finite coefficient in constraint {index}")]
    NonFiniteConstraint { index: usize },
    #[error("non-finite objective direction")]
    NonFiniteObjective,
    #[error("non-finite bounding box")]
    NonFiniteBox,
    #[error("numerical breakdown while solving ({context})")]
    Breakdown { context: &'static str },
}

/// Constraint in `m·y <= b` form for the 2D subproblem.
#[derive(Clone, Copy, Debug)]
struct C2 {
    m: Vector2<f64>,
    b: f64,
}

/// Minimize `c·x` over `hs` intersected with `cube`.
///
/// With no constraints the box corner minimizing `c` is returned; callers
/// that consider the empty system an error must check before calling.
pub fn linprog<R: Rng>(
    c: Vector3<f64>,
    hs: &[Hs3],
    cube: &Aabb,
    cfg: GeomCfg,
    rng: &mut R,
) -> Result<LpOutcome, LpError> {
    if !c.iter().all(|v| v.is_finite()) {
        return Err(LpError::NonFiniteObjective);
    }
    if !(cube.min.iter().all(|v| v.is_finite()) && cube.max.iter().all(|v| v.is_finite())) {
        return Err(LpError::NonFiniteBox);
    }
    for (index, h) in hs.iter().enumerate() {
        if !(h.n.iter().all(|v| v.is_finite()) && h.d.is_finite()) {
            return Err(LpError::NonFiniteConstraint { index });
        }
    }

    // Optimum of the box alone: the corner selected by the objective sign,
    // midpoint on axes the objective ignores.
    let mut x = Vector3::new(
        pick_axis(c.x, cube.min.x, cube.max.x),
        pick_axis(c.y, cube.min.y, cube.max.y),
        pick_axis(c.z, cube.min.z, cube.max.z),
    );

    // Processed set, box rows first; rows are `n·x <= b`.
    let mut processed: Vec<(Vector3<f64>, f64)> = Vec::with_capacity(hs.len() + 6);
    for axis in 0..3 {
        let mut e = Vector3::zeros();
        e[axis] = 1.0;
        processed.push((e, cube.max[axis]));
        processed.push((-e, -cube.min[axis]));
    }

    let mut order: Vec<usize> = (0..hs.len()).collect();
    order.shuffle(rng);

    for &i in &order {
        let (n, b) = (hs[i].n, -hs[i].d);
        if n.dot(&x) <= b + cfg.eps_feas {
            processed.push((n, b));
            continue;
        }
        // Violated: the optimum of processed+this lies on `n·x = b`.
        x = match solve_on_plane(c, n, b, &processed, cube, cfg, rng)? {
            Some(p) => p,
            None => return Ok(LpOutcome::Infeasible),
        };
        processed.push((n, b));
    }

    if !x.iter().all(|v| v.is_finite()) {
        return Err(LpError::Breakdown {
            context: "optimum went non-finite",
        });
    }
    Ok(LpOutcome::Feasible(x))
}

/// Optimum restricted to the plane `n·x = b` subject to `processed`, or
/// `None` when that restriction is infeasible (then so is the full set).
fn solve_on_plane<R: Rng>(
    c: Vector3<f64>,
    n: Vector3<f64>,
    b: f64,
    processed: &[(Vector3<f64>, f64)],
    cube: &Aabb,
    cfg: GeomCfg,
    rng: &mut R,
) -> Result<Option<Vector3<f64>>, LpError> {
    let nn = n.norm();
    if nn <= cfg.eps_det {
        // A zero row reaching the violated path means sign(d) decided above.
        return Err(LpError::Breakdown {
            context: "zero normal in violated constraint",
        });
    }
    let n1 = n / nn;
    let b1 = b / nn;
    let p0 = n1 * b1;
    let (u, v) = plane_basis(n1);
    let c2 = Vector2::new(c.dot(&u), c.dot(&v));

    // Push every processed row onto plane coordinates `y`, where a point is
    // `p0 + y.x*u + y.y*v`.
    let mut cons: Vec<C2> = Vec::with_capacity(processed.len());
    for &(g, bg) in processed {
        let m = Vector2::new(g.dot(&u), g.dot(&v));
        let rhs = bg - g.dot(&p0);
        if m.norm() <= cfg.eps_det {
            if rhs < -cfg.eps_feas {
                // Plane parallel to the row and on its outside.
                return Ok(None);
            }
            continue;
        }
        cons.push(C2 { m, b: rhs });
    }

    // Any feasible point sits in the box, hence within this radius of p0.
    let bound = cube.corner_radius() + b1.abs() + 1.0;
    match seidel2(c2, &cons, bound, cfg, rng)? {
        Some(y) => Ok(Some(p0 + u * y.x + v * y.y)),
        None => Ok(None),
    }
}

/// 2D Seidel step: same incremental scheme as the 3D level, with the line
/// case solved by interval clipping.
fn seidel2<R: Rng>(
    c2: Vector2<f64>,
    cons: &[C2],
    bound: f64,
    cfg: GeomCfg,
    rng: &mut R,
) -> Result<Option<Vector2<f64>>, LpError> {
    let mut y = Vector2::new(pick_axis(c2.x, -bound, bound), pick_axis(c2.y, -bound, bound));
    let mut processed: Vec<C2> = vec![
        C2 {
            m: Vector2::new(1.0, 0.0),
            b: bound,
        },
        C2 {
            m: Vector2::new(-1.0, 0.0),
            b: bound,
        },
        C2 {
            m: Vector2::new(0.0, 1.0),
            b: bound,
        },
        C2 {
            m: Vector2::new(0.0, -1.0),
            b: bound,
        },
    ];

    let mut order: Vec<usize> = (0..cons.len()).collect();
    order.shuffle(rng);

    for &i in &order {
        let h = cons[i];
        if h.m.dot(&y) <= h.b + cfg.eps_feas {
            processed.push(h);
            continue;
        }
        y = match solve_on_line(c2, h, &processed, cfg)? {
            Some(p) => p,
            None => return Ok(None),
        };
        processed.push(h);
    }
    Ok(Some(y))
}

/// Optimum on the line `m·y = b`: clip the feasible parameter interval
/// against every processed row, then walk to the end the objective favors.
fn solve_on_line(
    c2: Vector2<f64>,
    h: C2,
    processed: &[C2],
    cfg: GeomCfg,
) -> Result<Option<Vector2<f64>>, LpError> {
    let mn = h.m.norm();
    if mn <= cfg.eps_det {
        return Err(LpError::Breakdown {
            context: "zero row in 2D subproblem",
        });
    }
    let q0 = h.m * (h.b / (mn * mn));
    let dir = Vector2::new(-h.m.y, h.m.x) / mn;

    let mut alpha_lo = f64::NEG_INFINITY;
    let mut alpha_hi = f64::INFINITY;
    for g in processed {
        let nd = g.m.dot(&dir);
        let rhs = g.b - g.m.dot(&q0);
        if nd.abs() <= cfg.eps_det {
            if rhs < -cfg.eps_feas {
                return Ok(None);
            }
        } else if nd > 0.0 {
            alpha_hi = alpha_hi.min(rhs / nd);
        } else {
            alpha_lo = alpha_lo.max(rhs / nd);
        }
        if alpha_lo > alpha_hi + cfg.eps_feas {
            return Ok(None);
        }
    }

    let slope = c2.dot(&dir);
    let mut alpha = if slope > cfg.eps_det {
        alpha_lo
    } else if slope < -cfg.eps_det {
        alpha_hi
    } else {
        0.0
    };
    if alpha < alpha_lo {
        alpha = alpha_lo;
    }
    if alpha > alpha_hi {
        alpha = alpha_hi;
    }
    if !alpha.is_finite() {
        return Err(LpError::Breakdown {
            context: "unbounded line parameter",
        });
    }
    Ok(Some(q0 + dir * alpha))
}

/// Coordinate of the box corner minimizing a linear objective on one axis.
#[inline]
fn pick_axis(c: f64, lo: f64, hi: f64) -> f64 {
    if c > 0.0 {
        lo
    } else if c < 0.0 {
        hi
    } else {
        0.5 * (lo + hi)
    }
}

/// Orthonormal basis of the plane orthogonal to the unit vector `n`.
fn plane_basis(n: Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    let ax = n.x.abs();
    let ay = n.y.abs();
    let az = n.z.abs();
    let seed = if ax <= ay && ax <= az {
        Vector3::x()
    } else if ay <= az {
        Vector3::y()
    } else {
        Vector3::z()
    };
    let u = n.cross(&seed).normalize();
    let v = n.cross(&u);
    (u, v)
}
