//! Random star-shaped meshes (radial jitter on a sphere grid).
//!
//! Purpose
//! - Provide a small, deterministic sampler of closed triangle meshes that
//!   are star-shaped around the origin by construction, for solver tests and
//!   benches. The generator is parameterizable and replayable.
//!
//! Model
//! - Take a latitude/longitude grid on the unit sphere, scale every grid
//!   direction by `base_radius * (1 + u)` with bounded jitter `u`, and
//!   triangulate: pole fans plus quad strips, wound outward. With the jitter
//!   clamped well below 1 the origin sees every face from the inner side, so
//!   the kernel query on a drawn mesh must succeed.
//! - Determinism uses a replay token `(seed, index)` mixed into one RNG.

use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::mesh::Mesh;

/// Radial-jitter sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct StarCfg {
    /// Latitude bands, at least 3 (two of them are the pole fans).
    pub stacks: usize,
    /// Longitude steps per band, at least 3.
    pub slices: usize,
    /// Radial jitter amplitude, clamped to [0, 0.45]; radii are
    /// `base_radius * (1 + u)` with `u` uniform in `[-j, j]`.
    pub radial_jitter: f64,
    /// Radius before jitter.
    pub base_radius: f64,
}

impl Default for StarCfg {
    fn default() -> Self {
        Self {
            stacks: 8,
            slices: 12,
            radial_jitter: 0.25,
            base_radius: 1.0,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing of (seed, index) into one stream key.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw a closed star-shaped mesh around the origin.
pub fn draw_star_mesh(cfg: StarCfg, tok: ReplayToken) -> Mesh {
    let mut rng = tok.to_std_rng();
    let stacks = cfg.stacks.max(3);
    let slices = cfg.slices.max(3);
    let jitter = cfg.radial_jitter.clamp(0.0, 0.45);
    let r0 = cfg.base_radius.max(1e-9);
    let radius = move |rng: &mut StdRng| {
        let u = (rng.gen::<f64>() * 2.0 - 1.0) * jitter;
        r0 * (1.0 + u)
    };

    let mut positions = Vec::with_capacity((stacks - 1) * slices + 2);
    // North pole, rings top to bottom, south pole.
    positions.push(Vector3::new(0.0, 0.0, radius(&mut rng)));
    for i in 1..stacks {
        let theta = std::f64::consts::PI * (i as f64) / (stacks as f64);
        let (st, ct) = theta.sin_cos();
        for j in 0..slices {
            let phi = std::f64::consts::TAU * (j as f64) / (slices as f64);
            let dir = Vector3::new(st * phi.cos(), st * phi.sin(), ct);
            positions.push(dir * radius(&mut rng));
        }
    }
    positions.push(Vector3::new(0.0, 0.0, -radius(&mut rng)));

    let ring = |i: usize, j: usize| 1 + (i - 1) * slices + (j % slices);
    let north = 0;
    let south = positions.len() - 1;

    let mut faces = Vec::with_capacity(2 * slices * (stacks - 1));
    for j in 0..slices {
        faces.push([north, ring(1, j), ring(1, j + 1)]);
    }
    for i in 1..stacks - 1 {
        for j in 0..slices {
            let a = ring(i, j);
            let b = ring(i, j + 1);
            let c = ring(i + 1, j + 1);
            let d = ring(i + 1, j);
            faces.push([a, d, c]);
            faces.push([a, c, b]);
        }
    }
    for j in 0..slices {
        faces.push([south, ring(stacks - 1, j + 1), ring(stacks - 1, j)]);
    }
    Mesh::from_parts(positions, faces)
}
