//! Flattened mesh data (OBJ -> per-corner indexed buffers)
//!
//! GPU vertex buffers cannot index positions and normals separately, so every
//! distinct (position, normal, material) corner becomes one output vertex,
//! assigned in first-seen order. Triangles become `u16` index triples.

use anyhow::{Context, Result};
use hashbrown::HashMap;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::obj::{ObjCorner, ObjMesh};

/// Maximum number of flattened vertices addressable by u16 indices
pub const MAX_FLAT_VERTICES: usize = u16::MAX as usize + 1;

#[derive(Debug, thiserror::Error)]
pub enum FlattenError {
    #[error(
        "mesh needs {0} flattened vertices, exceeds maximum {max} for u16 indices",
        max = MAX_FLAT_VERTICES
    )]
    TooManyVertices(usize),

    #[error("face {0} has no material; a usemtl line must precede it")]
    MissingMaterial(usize),

    #[error("face {0} references a vertex or normal that does not exist")]
    BadIndex(usize),
}

/// Indexed mesh with one attribute set per vertex
#[derive(Debug, Clone, Default, Serialize)]
pub struct FlatMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub material_refs: Vec<u16>,
    /// Material names indexed by `material_refs`
    pub materials: Vec<String>,
    pub indices: Vec<u16>,
}

impl FlatMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Flatten a parsed OBJ mesh
pub fn flatten(mesh: &ObjMesh) -> Result<FlatMesh, FlattenError> {
    let mut flat = FlatMesh {
        materials: mesh.materials.clone(),
        ..FlatMesh::default()
    };
    let mut corner_index: HashMap<(ObjCorner, usize), u16> = HashMap::new();

    for (i, face) in mesh.faces.iter().enumerate() {
        let material = face.material.ok_or(FlattenError::MissingMaterial(i + 1))?;
        for corner in face.corners {
            let key = (corner, material);
            let index = match corner_index.get(&key) {
                Some(&index) => index,
                None => {
                    let next = flat.positions.len();
                    if next >= MAX_FLAT_VERTICES {
                        return Err(FlattenError::TooManyVertices(next + 1));
                    }
                    let position = mesh.positions.get(corner.vertex);
                    let normal = mesh.normals.get(corner.normal);
                    let (Some(&position), Some(&normal)) = (position, normal) else {
                        return Err(FlattenError::BadIndex(i + 1));
                    };
                    flat.positions.push(position);
                    flat.normals.push(normal);
                    flat.material_refs.push(material as u16);
                    corner_index.insert(key, next as u16);
                    next as u16
                }
            };
            flat.indices.push(index);
        }
    }

    Ok(flat)
}

/// Flatten an OBJ file and write the result as JSON
pub fn convert_obj_to_json(input: &Path, output: &Path) -> Result<FlatMesh> {
    let mesh = crate::obj::load_obj(input)?;
    let flat = flatten(&mesh).with_context(|| format!("Failed to flatten {:?}", input))?;

    let file =
        File::create(output).with_context(|| format!("Failed to create output: {:?}", output))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &flat)
        .with_context(|| format!("Failed to write {:?}", output))?;
    writer.flush()?;

    tracing::info!(
        "Flattened {:?}: {} vertices, {} triangles, {} materials",
        input,
        flat.vertex_count(),
        flat.triangle_count(),
        flat.materials.len()
    );
    Ok(flat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obj::{ObjFace, parse_obj};
    use wheel_model::{Layout, MATERIAL_LIBRARY, generate, to_obj_string};

    #[test]
    fn test_shared_corners_merge() {
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
v 1 1 0
vn 0 0 1
usemtl Black
f 1//1 2//1 3//1
f 2//1 4//1 3//1
";
        let flat = flatten(&parse_obj(text.as_bytes()).unwrap()).unwrap();
        assert_eq!(flat.vertex_count(), 4);
        assert_eq!(flat.indices, vec![0, 1, 2, 1, 3, 2]);
        assert_eq!(flat.materials, vec!["Black"]);
        assert_eq!(flat.material_refs, vec![0; 4]);
    }

    #[test]
    fn test_material_splits_corner() {
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 0 1
usemtl Black
f 1//1 2//1 3//1
usemtl Orange
f 1//1 2//1 3//1
";
        let flat = flatten(&parse_obj(text.as_bytes()).unwrap()).unwrap();
        assert_eq!(flat.vertex_count(), 6);
        assert_eq!(flat.material_refs, vec![0, 0, 0, 1, 1, 1]);
    }

    #[test]
    fn test_missing_material() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n";
        let err = flatten(&parse_obj(text.as_bytes()).unwrap()).unwrap_err();
        assert!(matches!(err, FlattenError::MissingMaterial(1)));
    }

    #[test]
    fn test_too_many_vertices() {
        let face_count = MAX_FLAT_VERTICES / 3 + 1;
        let mesh = ObjMesh {
            positions: (0..face_count * 3).map(|i| [i as f32, 0.0, 0.0]).collect(),
            normals: vec![[0.0, 0.0, 1.0]],
            faces: (0..face_count)
                .map(|f| ObjFace {
                    corners: [0, 1, 2].map(|k| ObjCorner {
                        vertex: f * 3 + k,
                        normal: 0,
                    }),
                    material: Some(0),
                })
                .collect(),
            materials: vec!["Black".to_string()],
            ..ObjMesh::default()
        };

        let err = flatten(&mesh).unwrap_err();
        assert!(matches!(err, FlattenError::TooManyVertices(n) if n == MAX_FLAT_VERTICES + 1));
        assert_eq!(
            err.to_string(),
            "mesh needs 65537 flattened vertices, exceeds maximum 65536 for u16 indices"
        );
    }

    #[test]
    fn test_flatten_wheel() {
        let mesh = generate(Layout::Dual).unwrap();
        let text = to_obj_string(&mesh, MATERIAL_LIBRARY).unwrap();
        let flat = flatten(&parse_obj(text.as_bytes()).unwrap()).unwrap();

        assert_eq!(flat.triangle_count(), mesh.face_count());
        assert!(flat.vertex_count() >= mesh.vertex_count());
        assert!(flat.indices.iter().all(|&i| (i as usize) < flat.vertex_count()));
        assert_eq!(flat.positions.len(), flat.normals.len());
        assert_eq!(flat.positions.len(), flat.material_refs.len());
    }
}
