use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::fmt::SubscriberBuilder;

use starshape::kernel::{kernel_point, KernelCfg, KernelResult};
use starshape::mesh::io::load_mesh;

#[derive(Parser)]
#[command(name = "starshape")]
#[command(about = "Kernel-point queries for star-shaped polyhedra")]
struct Cmd {
    /// Seed for the randomized solve; fixed default keeps runs replayable
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Compute a kernel point for one mesh file (.obj or .off)
    Point {
        #[arg(long)]
        input: PathBuf,
        /// Emit a JSON report instead of plain text
        #[arg(long)]
        json: bool,
    },
    /// Run kernel queries over every matching mesh file in a directory
    Batch {
        #[arg(long)]
        dir: PathBuf,
        /// File extension to pick up
        #[arg(long, default_value = "off")]
        ext: String,
    },
}

#[derive(Serialize)]
struct Report {
    input: String,
    faces: usize,
    status: &'static str,
    point: Option<[f64; 3]>,
    elapsed_ms: f64,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    let mut cfg = KernelCfg::default();
    if let Some(seed) = cmd.seed {
        cfg.seed = seed;
    }
    match cmd.action {
        Action::Point { input, json } => point(&input, json, &cfg),
        Action::Batch { dir, ext } => batch(&dir, &ext, &cfg),
    }
}

fn query(input: &Path, cfg: &KernelCfg) -> Result<Report> {
    let mesh =
        load_mesh(input).with_context(|| format!("loading mesh {}", input.display()))?;
    let start = Instant::now();
    let result = kernel_point(&mesh, cfg)
        .with_context(|| format!("kernel query on {}", input.display()))?;
    let elapsed_ms = start.elapsed().as_secs_f64() * 1e3;
    let (status, point) = match result {
        KernelResult::Point(p) => ("kernel", Some([p.x, p.y, p.z])),
        KernelResult::NoKernel => ("no-kernel", None),
    };
    Ok(Report {
        input: input.display().to_string(),
        faces: mesh.face_count(),
        status,
        point,
        elapsed_ms,
    })
}

fn point(input: &Path, json: bool, cfg: &KernelCfg) -> Result<()> {
    let report = query(input, cfg)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    match report.point {
        Some([x, y, z]) => println!("kernel point: ({x}, {y}, {z})"),
        None => println!("no kernel: the polyhedron is not star-shaped"),
    }
    tracing::info!(faces = report.faces, elapsed_ms = report.elapsed_ms, "done");
    Ok(())
}

fn batch(dir: &Path, ext: &str, cfg: &KernelCfg) -> Result<()> {
    let mut inputs: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("reading directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(ext))
        })
        .collect();
    inputs.sort();

    let start = Instant::now();
    let mut with_kernel = 0usize;
    let mut without = 0usize;
    let mut failed = 0usize;
    for input in &inputs {
        match query(input, cfg) {
            Ok(report) => {
                if report.point.is_some() {
                    with_kernel += 1;
                } else {
                    without += 1;
                }
                tracing::info!(
                    input = %input.display(),
                    status = report.status,
                    elapsed_ms = report.elapsed_ms,
                    "query"
                );
            }
            Err(err) => {
                failed += 1;
                tracing::warn!(input = %input.display(), error = %err, "query failed");
            }
        }
    }
    let elapsed = start.elapsed().as_secs_f64();
    println!(
        "{} meshes in {elapsed:.2}s: {with_kernel} with a kernel, {without} without, {failed} failed",
        inputs.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const CUBE_OBJ: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 0 0 1
v 1 0 1
v 1 1 1
v 0 1 1
f 1 2 6 5
f 2 3 7 6
f 3 4 8 7
f 4 1 5 8
f 5 6 7 8
f 4 3 2 1
";

    #[test]
    fn query_reports_a_cube_kernel_point() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cube.obj");
        fs::write(&path, CUBE_OBJ).unwrap();
        let report = query(&path, &KernelCfg::default()).unwrap();
        assert_eq!(report.status, "kernel");
        assert_eq!(report.faces, 12);
        let [x, y, z] = report.point.unwrap();
        for v in [x, y, z] {
            assert!((-1e-6..=1.0 + 1e-6).contains(&v));
        }
    }

    #[test]
    fn query_surfaces_load_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.off");
        fs::write(&path, "OFF\n1 1 0\n0 0 0\n3 0 1 2\n").unwrap();
        assert!(query(&path, &KernelCfg::default()).is_err());
    }
}
