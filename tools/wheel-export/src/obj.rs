//! OBJ reader for generated wheel meshes
//!
//! Understands the subset the generator writes: `v`, `vn`, triangular
//! `f v//vn` faces, `usemtl` and `mtllib`. Trailing `#` comments are
//! stripped. Other directives are skipped with a warning.

use anyhow::{Context, Result, bail};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One face corner: 0-based position and normal indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjCorner {
    pub vertex: usize,
    pub normal: usize,
}

/// Triangle with the material active when it was read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjFace {
    pub corners: [ObjCorner; 3],
    /// Index into [`ObjMesh::materials`]
    pub material: Option<usize>,
}

/// Parsed OBJ contents
#[derive(Debug, Clone, Default)]
pub struct ObjMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub faces: Vec<ObjFace>,
    pub material_library: Option<String>,
    /// Distinct material names in first-seen order
    pub materials: Vec<String>,
    /// Number of `usemtl` lines
    pub material_directives: usize,
}

impl ObjMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn normal_count(&self) -> usize {
        self.normals.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}

/// Load and parse an OBJ file
pub fn load_obj(input: &Path) -> Result<ObjMesh> {
    let file = File::open(input).with_context(|| format!("Failed to open OBJ: {:?}", input))?;
    parse_obj(BufReader::new(file)).with_context(|| format!("Failed to parse OBJ: {:?}", input))
}

/// Parse OBJ text from a reader
pub fn parse_obj<R: BufRead>(reader: R) -> Result<ObjMesh> {
    let mut mesh = ObjMesh::default();
    let mut current_material: Option<usize> = None;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line = match line.split_once('#') {
            Some((content, _comment)) => content,
            None => line.as_str(),
        }
        .trim();
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let line_no = line_no + 1;

        match parts[0] {
            "v" => mesh.positions.push(parse_vec3(&parts[1..], line_no)?),
            "vn" => mesh.normals.push(parse_vec3(&parts[1..], line_no)?),
            "f" => {
                if parts.len() != 4 {
                    bail!(
                        "line {}: triangles required, found {} corners",
                        line_no,
                        parts.len() - 1
                    );
                }
                let mut corners = [ObjCorner { vertex: 0, normal: 0 }; 3];
                for (corner, spec) in corners.iter_mut().zip(&parts[1..]) {
                    *corner = parse_corner(spec)
                        .with_context(|| format!("line {}: bad face corner {:?}", line_no, spec))?;
                }
                mesh.faces.push(ObjFace {
                    corners,
                    material: current_material,
                });
            }
            "usemtl" if parts.len() == 2 => {
                let name = parts[1];
                let index = match mesh.materials.iter().position(|m| m == name) {
                    Some(index) => index,
                    None => {
                        mesh.materials.push(name.to_string());
                        mesh.materials.len() - 1
                    }
                };
                current_material = Some(index);
                mesh.material_directives += 1;
            }
            "mtllib" if parts.len() == 2 => {
                if let Some(existing) = &mesh.material_library {
                    bail!(
                        "line {}: one material library allowed, found {} after {}",
                        line_no,
                        parts[1],
                        existing
                    );
                }
                mesh.material_library = Some(parts[1].to_string());
            }
            _ => tracing::warn!("line {}: unknown directive: {}", line_no, line),
        }
    }

    validate_indices(&mesh)?;
    Ok(mesh)
}

fn parse_vec3(parts: &[&str], line_no: usize) -> Result<[f32; 3]> {
    if parts.len() != 3 {
        bail!("line {}: expected 3 coordinates, found {}", line_no, parts.len());
    }
    let mut out = [0.0f32; 3];
    for (value, text) in out.iter_mut().zip(parts) {
        *value = text
            .parse()
            .with_context(|| format!("line {}: bad coordinate {:?}", line_no, text))?;
    }
    Ok(out)
}

/// Parse a `v//vn` corner reference (1-based) into 0-based indices
fn parse_corner(s: &str) -> Result<ObjCorner> {
    let mut parts = s.split('/');
    let vertex = parts.next().unwrap_or_default();
    let _tex = parts.next();
    let normal = parts.next().unwrap_or_default();
    if parts.next().is_some() {
        bail!("too many components");
    }
    Ok(ObjCorner {
        vertex: parse_index(vertex)?,
        normal: parse_index(normal)?,
    })
}

fn parse_index(s: &str) -> Result<usize> {
    let index: usize = s.parse().with_context(|| format!("bad index {:?}", s))?;
    match index.checked_sub(1) {
        Some(index) => Ok(index),
        None => bail!("OBJ indices are 1-based, found 0"),
    }
}

fn validate_indices(mesh: &ObjMesh) -> Result<()> {
    for (i, face) in mesh.faces.iter().enumerate() {
        for corner in &face.corners {
            if corner.vertex >= mesh.positions.len() {
                bail!(
                    "face {}: vertex index {} out of range ({} vertices)",
                    i + 1,
                    corner.vertex + 1,
                    mesh.positions.len()
                );
            }
            if corner.normal >= mesh.normals.len() {
                bail!(
                    "face {}: normal index {} out of range ({} normals)",
                    i + 1,
                    corner.normal + 1,
                    mesh.normals.len()
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wheel_model::{Layout, MATERIAL_LIBRARY, generate, to_obj_string};

    #[test]
    fn test_round_trip_counts() {
        for layout in [Layout::Single, Layout::Dual] {
            let mesh = generate(layout).unwrap();
            let text = to_obj_string(&mesh, MATERIAL_LIBRARY).unwrap();
            let parsed = parse_obj(text.as_bytes()).unwrap();

            assert_eq!(parsed.vertex_count(), mesh.vertex_count());
            assert_eq!(parsed.normal_count(), mesh.normal_count());
            assert_eq!(parsed.face_count(), mesh.face_count());
            assert_eq!(parsed.material_library.as_deref(), Some(MATERIAL_LIBRARY));
        }
    }

    #[test]
    fn test_round_trip_indices() {
        let mesh = generate(Layout::Single).unwrap();
        let text = to_obj_string(&mesh, MATERIAL_LIBRARY).unwrap();
        let parsed = parse_obj(text.as_bytes()).unwrap();

        for (ours, theirs) in mesh.faces().zip(&parsed.faces) {
            for (a, b) in ours.corners.iter().zip(&theirs.corners) {
                assert_eq!(a.vertex as usize, b.vertex);
                assert_eq!(a.normal as usize, b.normal);
            }
        }
    }

    #[test]
    fn test_materials_first_seen_order() {
        let mesh = generate(Layout::Single).unwrap();
        let text = to_obj_string(&mesh, MATERIAL_LIBRARY).unwrap();
        let parsed = parse_obj(text.as_bytes()).unwrap();

        // tire, flange, rim, hub, cap, hole; hub and flange share Orange
        assert_eq!(parsed.material_directives, 6);
        assert_eq!(
            parsed.materials,
            vec!["DarkGray", "Orange", "Aluminum", "PaintedSteel", "Black"]
        );
        assert!(parsed.faces.iter().all(|f| f.material.is_some()));
    }

    #[test]
    fn test_rejects_quads() {
        let text = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1 4//1\n";
        assert!(parse_obj(text.as_bytes()).is_err());
    }

    #[test]
    fn test_rejects_out_of_range() {
        let text = "v 0 0 0\nvn 0 0 1\nf 1//1 2//1 1//1\n";
        assert!(parse_obj(text.as_bytes()).is_err());
    }

    #[test]
    fn test_skips_comments_and_unknown() {
        let text = "# header\nv 0 0 0 # 1\nv 1 0 0\nv 0 1 0\nvn 0 0 1\ns off\nf 1//1 2//1 3//1\n";
        let parsed = parse_obj(text.as_bytes()).unwrap();
        assert_eq!(parsed.vertex_count(), 3);
        assert_eq!(parsed.face_count(), 1);
        assert_eq!(parsed.faces[0].material, None);
    }
}
