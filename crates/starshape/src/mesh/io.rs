//! Mesh file loading (ASCII OBJ and OFF).
//!
//! Formats
//! - **OBJ** (Wavefront): `v x y z` and `f i j k ...` records; indices are
//!   1-based, negative indices count from the end, `v/vt/vn` groups keep only
//!   the position index. Polygonal faces are fan-triangulated.
//! - **OFF**: `OFF` header, counts line `nv nf ne`, vertex block, then face
//!   lines with a leading arity and 0-based indices, fan-triangulated.
//!
//! Both parsers skip comments and blank lines, validate indices against the
//! vertex count while reading, and report the 1-based source line in every
//! parse error. Anything beyond plain geometry (materials, normals, colors)
//! is ignored.

use std::fs;
use std::path::Path;

use nalgebra::Vector3;
use thiserror::Error;

use super::Mesh;

/// Result type for mesh loading.
pub type IoResult<T> = Result<T, IoError>;

/// Errors from mesh file loading.
#[derive(Debug, Error)]
pub enum IoError {
    /// Unrecognized file extension.
    #[error("unknown mesh format: .{extension}")]
    UnknownFormat { extension: String },

    /// The file content does not parse.
    #[error("invalid mesh content at line {line}: {message}")]
    InvalidContent { line: usize, message: String },

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Supported mesh file formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeshFormat {
    Obj,
    Off,
}

impl MeshFormat {
    /// Detect format from the file extension, case-insensitive.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "obj" => Some(Self::Obj),
            "off" => Some(Self::Off),
            _ => None,
        }
    }
}

/// Load a mesh with the format chosen by the file extension.
pub fn load_mesh<P: AsRef<Path>>(path: P) -> IoResult<Mesh> {
    let path = path.as_ref();
    match MeshFormat::from_path(path) {
        Some(MeshFormat::Obj) => load_obj(path),
        Some(MeshFormat::Off) => load_off(path),
        None => Err(IoError::UnknownFormat {
            extension: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_string(),
        }),
    }
}

/// Load a Wavefront OBJ file.
pub fn load_obj<P: AsRef<Path>>(path: P) -> IoResult<Mesh> {
    parse_obj(&fs::read_to_string(path)?)
}

/// Load an OFF file.
pub fn load_off<P: AsRef<Path>>(path: P) -> IoResult<Mesh> {
    parse_off(&fs::read_to_string(path)?)
}

fn invalid(line: usize, message: impl Into<String>) -> IoError {
    IoError::InvalidContent {
        line,
        message: message.into(),
    }
}

/// Parse OBJ text. Exposed for composition and tests; `load_obj` adds the
/// file read.
pub fn parse_obj(text: &str) -> IoResult<Mesh> {
    let mut mesh = Mesh::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut tokens = trimmed.split_whitespace();
        match tokens.next() {
            Some("v") => {
                let p = parse_coords(&mut tokens, line)?;
                mesh.positions.push(p);
            }
            Some("f") => {
                let mut face = Vec::with_capacity(4);
                for tok in tokens {
                    let head = tok.split('/').next().unwrap_or("");
                    let idx: i64 = head
                        .parse()
                        .map_err(|_| invalid(line, format!("bad face index `{tok}`")))?;
                    face.push(resolve_obj_index(idx, mesh.positions.len(), line)?);
                }
                push_fan(&mut mesh, &face, line)?;
            }
            // Normals, texcoords, groups, materials: not geometry we need.
            _ => {}
        }
    }
    Ok(mesh)
}

/// Parse OFF text. Exposed for composition and tests; `load_off` adds the
/// file read.
pub fn parse_off(text: &str) -> IoResult<Mesh> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(idx, raw)| (idx + 1, raw.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'));

    let (header_line, header) = lines.next().ok_or_else(|| invalid(1, "empty OFF file"))?;
    let mut header_tokens = header.split_whitespace();
    if header_tokens.next() != Some("OFF") {
        return Err(invalid(header_line, "missing OFF header"));
    }
    // Counts may share the header line or sit on the next one.
    let mut rest = header_tokens.peekable();
    let (counts_line, counts): (usize, Vec<&str>) = if rest.peek().is_some() {
        (header_line, rest.collect())
    } else {
        let (l, c) = lines
            .next()
            .ok_or_else(|| invalid(header_line, "missing OFF counts"))?;
        (l, c.split_whitespace().collect())
    };
    if counts.len() < 2 {
        return Err(invalid(counts_line, "expected `nv nf ne` counts"));
    }
    let nv: usize = counts[0]
        .parse()
        .map_err(|_| invalid(counts_line, format!("bad vertex count `{}`", counts[0])))?;
    let nf: usize = counts[1]
        .parse()
        .map_err(|_| invalid(counts_line, format!("bad face count `{}`", counts[1])))?;

    let mut mesh = Mesh::new();
    mesh.positions.reserve(nv);
    for _ in 0..nv {
        let (line, text) = lines
            .next()
            .ok_or_else(|| invalid(counts_line, "unexpected end of vertex block"))?;
        let mut tokens = text.split_whitespace();
        let p = parse_coords(&mut tokens, line)?;
        mesh.positions.push(p);
    }
    for _ in 0..nf {
        let (line, text) = lines
            .next()
            .ok_or_else(|| invalid(counts_line, "unexpected end of face block"))?;
        let mut tokens = text.split_whitespace();
        let arity: usize = tokens
            .next()
            .ok_or_else(|| invalid(line, "empty face record"))?
            .parse()
            .map_err(|_| invalid(line, "bad face arity"))?;
        let mut face = Vec::with_capacity(arity);
        for _ in 0..arity {
            let tok = tokens
                .next()
                .ok_or_else(|| invalid(line, "face record shorter than its arity"))?;
            let idx: usize = tok
                .parse()
                .map_err(|_| invalid(line, format!("bad face index `{tok}`")))?;
            if idx >= mesh.positions.len() {
                return Err(invalid(line, format!("face index {idx} out of bounds")));
            }
            face.push(idx);
        }
        push_fan(&mut mesh, &face, line)?;
    }
    Ok(mesh)
}

fn parse_coords<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line: usize,
) -> IoResult<Vector3<f64>> {
    let mut out = [0.0f64; 3];
    for slot in &mut out {
        let tok = tokens
            .next()
            .ok_or_else(|| invalid(line, "expected 3 coordinates"))?;
        *slot = tok
            .parse()
            .map_err(|_| invalid(line, format!("bad coordinate `{tok}`")))?;
    }
    Ok(Vector3::from(out))
}

/// OBJ indices are 1-based; negative values count back from the current end.
fn resolve_obj_index(idx: i64, len: usize, line: usize) -> IoResult<usize> {
    let resolved = if idx > 0 {
        (idx - 1) as usize
    } else if idx < 0 {
        let back = (-idx) as usize;
        if back > len {
            return Err(invalid(line, format!("face index {idx} out of bounds")));
        }
        len - back
    } else {
        return Err(invalid(line, "face index 0 is not valid in OBJ"));
    };
    if resolved >= len {
        return Err(invalid(line, format!("face index {idx} out of bounds")));
    }
    Ok(resolved)
}

/// Fan-triangulate a polygonal face, preserving its winding.
fn push_fan(mesh: &mut Mesh, face: &[usize], line: usize) -> IoResult<()> {
    if face.len() < 3 {
        return Err(invalid(line, "face with fewer than 3 vertices"));
    }
    for k in 1..face.len() - 1 {
        mesh.faces.push([face[0], face[k], face[k + 1]]);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn obj_roundtrip_with_comments_and_normals() {
        let text = "\
# a single square, two ways
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 0 1
f 1/1/1 2/2/1 3/3/1
f 1 3 4
";
        let mesh = parse_obj(text).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.faces[0], [0, 1, 2]);
        assert_eq!(mesh.faces[1], [0, 2, 3]);
    }

    #[test]
    fn obj_negative_indices_and_quad_fan() {
        let text = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f -4 -3 -2 -1
";
        let mesh = parse_obj(text).unwrap();
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.faces[0], [0, 1, 2]);
        assert_eq!(mesh.faces[1], [0, 2, 3]);
    }

    #[test]
    fn obj_out_of_bounds_index_is_a_parse_error() {
        let text = "v 0 0 0\nf 1 2 3\n";
        match parse_obj(text) {
            Err(IoError::InvalidContent { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected InvalidContent, got {other:?}"),
        }
    }

    #[test]
    fn off_counts_on_their_own_line() {
        let text = "\
OFF
# tetrahedron
4 4 6
0 0 0
1 0 0
0 1 0
0 0 1
3 0 2 1
3 0 1 3
3 0 3 2
3 1 2 3
";
        let mesh = parse_off(text).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 4);
        assert_eq!(mesh.faces[3], [1, 2, 3]);
    }

    #[test]
    fn off_counts_on_the_header_line_and_quads() {
        let text = "\
OFF 4 1 4
0 0 0
1 0 0
1 1 0
0 1 0
4 0 1 2 3
";
        let mesh = parse_off(text).unwrap();
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.faces[0], [0, 1, 2]);
        assert_eq!(mesh.faces[1], [0, 2, 3]);
    }

    #[test]
    fn off_truncated_face_block_is_an_error() {
        let text = "OFF\n3 2 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2\n";
        assert!(matches!(
            parse_off(text),
            Err(IoError::InvalidContent { .. })
        ));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        match load_mesh("model.stl") {
            Err(IoError::UnknownFormat { extension }) => assert_eq!(extension, "stl"),
            other => panic!("expected UnknownFormat, got {other:?}"),
        }
    }
}
