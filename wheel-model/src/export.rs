//! OBJ text export
//!
//! Layout, in order: the vertex block, a blank line, the normal block, a
//! blank line, the material library reference, then material directives and
//! faces exactly as they were emitted, followed by a trailing blank line.
//! Indices are written 1-based.

use std::io::{self, Write};

use crate::builder::{FaceStreamEntry, MeshBuilder};
use crate::error::MeshError;
use crate::point::Point3;

/// Companion material library referenced by generated meshes
pub const MATERIAL_LIBRARY: &str = "materials.mtl";

/// Write the builder's current mesh as OBJ text
pub fn write_obj<W: Write>(
    builder: &MeshBuilder,
    w: &mut W,
    material_library: &str,
) -> Result<(), MeshError> {
    write_points(w, "v", builder.vertices())?;
    writeln!(w)?;
    write_points(w, "vn", builder.normals())?;
    writeln!(w)?;
    writeln!(w, "mtllib {material_library}")?;

    for entry in builder.stream() {
        match entry {
            FaceStreamEntry::Material(material) => {
                writeln!(w, "usemtl {}", material.palette_name())?;
            }
            FaceStreamEntry::Face(face) => {
                let [p, q, r] = face.corners;
                writeln!(
                    w,
                    "f {}//{} {}//{} {}//{}",
                    p.vertex + 1,
                    p.normal + 1,
                    q.vertex + 1,
                    q.normal + 1,
                    r.vertex + 1,
                    r.normal + 1
                )?;
            }
        }
    }
    writeln!(w)?;
    w.flush()?;
    Ok(())
}

/// Render the builder's mesh to an OBJ string
pub fn to_obj_string(builder: &MeshBuilder, material_library: &str) -> Result<String, MeshError> {
    let mut buf = Vec::new();
    write_obj(builder, &mut buf, material_library)?;
    String::from_utf8(buf).map_err(|e| MeshError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

fn write_points<W: Write>(w: &mut W, tag: &str, points: &[Point3]) -> io::Result<()> {
    for (i, p) in points.iter().enumerate() {
        writeln!(w, "{tag} {:.6} {:.6} {:.6} # {}", p.x, p.y, p.z, i + 1)?;
    }
    Ok(())
}
