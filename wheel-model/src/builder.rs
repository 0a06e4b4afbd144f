//! Immediate-mode mesh builder
//!
//! Accepts a legacy "begin / normal / vertex / end" call stream and turns it
//! into deduplicated vertex and normal buffers plus an ordered face stream.
//!
//! Two primitive topologies are understood:
//! - [`Topology::QuadStrip`]: after three corners `a, b, c`, each new corner
//!   `d` yields triangles `(d, a, c)` and `(a, d, b)`, then the window slides
//!   to `a = c, b = d`.
//! - [`Topology::TriangleFan`]: after the apex `a` and a first rim corner `b`,
//!   each new corner `d` yields `(b, a, d)`, then `b = d`.
//!
//! Every triangle is recorded with its corners reversed (last corner first),
//! which gives the winding the OBJ consumer expects.

use std::ops::{Deref, DerefMut};

use glam::{DVec3, Vec3};
use tracing::trace;

use crate::error::MeshError;
use crate::material::Material;
use crate::point::Point3;
use crate::registry::PointRegistry;

/// Primitive topology of the open primitive
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Topology {
    /// No primitive open
    #[default]
    Idle,
    QuadStrip,
    TriangleFan,
}

/// One triangle corner: indices into the vertex and normal registries
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Corner {
    pub vertex: u32,
    pub normal: u32,
}

impl Corner {
    pub const fn new(vertex: u32, normal: u32) -> Self {
        Self { vertex, normal }
    }
}

/// Triangle with corners in final (output) winding order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Face {
    pub corners: [Corner; 3],
}

impl Face {
    /// Build a face from corners in emission order, reversing them
    fn wound(p: Corner, q: Corner, r: Corner) -> Self {
        Self {
            corners: [r, q, p],
        }
    }
}

/// Entry of the face stream
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceStreamEntry {
    /// Material directive governing the faces that follow
    Material(Material),
    Face(Face),
}

/// Progress of the sliding corner window
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum WindowState {
    /// Nothing buffered
    #[default]
    Idle,
    /// One corner buffered, waiting for the second
    Collecting2,
    /// Two corners buffered, waiting for the third
    Collecting3,
    /// Window full: each new corner emits faces
    Streaming,
}

/// Pending corners of the open primitive
#[derive(Clone, Copy, Debug, Default)]
struct CornerWindow {
    state: WindowState,
    slots: [Corner; 3],
}

impl CornerWindow {
    fn reset(&mut self) {
        *self = Self::default();
    }

    /// Feed a quad strip corner, returning the two faces it completes
    fn push_strip(&mut self, d: Corner) -> Option<[Face; 2]> {
        match self.state {
            WindowState::Idle => {
                self.slots[0] = d;
                self.state = WindowState::Collecting2;
                None
            }
            WindowState::Collecting2 => {
                self.slots[1] = d;
                self.state = WindowState::Collecting3;
                None
            }
            WindowState::Collecting3 => {
                self.slots[2] = d;
                self.state = WindowState::Streaming;
                None
            }
            WindowState::Streaming => {
                let [a, b, c] = self.slots;
                self.slots[0] = c;
                self.slots[1] = d;
                self.state = WindowState::Collecting3;
                Some([Face::wound(d, a, c), Face::wound(a, d, b)])
            }
        }
    }

    /// Feed a triangle fan corner, returning the face it completes
    fn push_fan(&mut self, d: Corner) -> Option<Face> {
        match self.state {
            WindowState::Idle => {
                self.slots[0] = d;
                self.state = WindowState::Collecting2;
                None
            }
            WindowState::Collecting2 => {
                self.slots[1] = d;
                self.state = WindowState::Streaming;
                None
            }
            // A fan window is full after two corners.
            WindowState::Collecting3 | WindowState::Streaming => {
                let [a, b, _] = self.slots;
                self.slots[1] = d;
                Some(Face::wound(b, a, d))
            }
        }
    }
}

/// Immediate-mode emulator producing an indexed triangle mesh
///
/// One builder serves one output artifact. Indices are assigned in first-seen
/// order, so the same call sequence always produces the same mesh.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    vertices: PointRegistry,
    normals: PointRegistry,
    stream: Vec<FaceStreamEntry>,
    face_count: usize,
    topology: Topology,
    window: CornerWindow,
    current_normal: Option<u32>,
    primitive_faces: usize,
    z_offset: f32,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a primitive of the given topology
    pub fn begin_primitive(&mut self, topology: Topology) -> Result<(), MeshError> {
        if self.topology != Topology::Idle {
            return Err(MeshError::PrimitiveAlreadyOpen {
                open: self.topology,
                requested: topology,
            });
        }
        if topology == Topology::Idle {
            return Err(MeshError::UnsupportedTopology(topology));
        }
        self.topology = topology;
        self.window.reset();
        self.primitive_faces = 0;
        Ok(())
    }

    /// Close the open primitive
    pub fn end_primitive(&mut self) -> Result<(), MeshError> {
        if self.topology == Topology::Idle {
            return Err(MeshError::NoOpenPrimitive("end_primitive"));
        }
        trace!(
            topology = ?self.topology,
            faces = self.primitive_faces,
            "primitive closed"
        );
        self.topology = Topology::Idle;
        self.window.reset();
        Ok(())
    }

    /// Set the normal used by subsequent vertices
    ///
    /// The vector is scaled by the reciprocal of its length before lookup, so
    /// `(3, 0, 0)` and `(1, 0, 0)` resolve to the same registry entry.
    pub fn set_current_normal(&mut self, x: f32, y: f32, z: f32) -> Result<(), MeshError> {
        if self.topology == Topology::Idle {
            return Err(MeshError::NoOpenPrimitive("set_current_normal"));
        }
        let length_squared = x * x + y * y + z * z;
        let unit = if length_squared > 0.0 && length_squared.is_finite() {
            let r_len = (1.0 / (length_squared as f64).sqrt()) as f32;
            Vec3::new(x * r_len, y * r_len, z * r_len)
        } else {
            // Squared length over- or underflows f32
            let wide = DVec3::new(x as f64, y as f64, z as f64);
            let length = wide.length();
            if length <= 0.0 || !length.is_finite() {
                return Err(MeshError::ZeroLengthNormal(x, y, z));
            }
            (wide / length).as_vec3()
        };
        self.current_normal = Some(self.normals.intern(unit));
        Ok(())
    }

    /// Emit a vertex into the open primitive
    ///
    /// The active z offset is added before lookup.
    pub fn emit_vertex(&mut self, x: f32, y: f32, z: f32) -> Result<(), MeshError> {
        if self.topology == Topology::Idle {
            return Err(MeshError::UnsupportedTopology(self.topology));
        }
        let normal = self.current_normal.ok_or(MeshError::MissingNormal)?;
        let vertex = self.vertices.intern(Vec3::new(x, y, z + self.z_offset));
        let corner = Corner::new(vertex, normal);

        match self.topology {
            Topology::QuadStrip => {
                if let Some(faces) = self.window.push_strip(corner) {
                    for face in faces {
                        self.push_face(face);
                    }
                }
            }
            Topology::TriangleFan => {
                if let Some(face) = self.window.push_fan(corner) {
                    self.push_face(face);
                }
            }
            Topology::Idle => return Err(MeshError::UnsupportedTopology(self.topology)),
        }
        Ok(())
    }

    /// Append a material directive to the face stream
    pub fn set_material(&mut self, material: Material) {
        self.stream.push(FaceStreamEntry::Material(material));
    }

    /// Append a material directive by tag name
    ///
    /// Unknown tags fail without touching the face stream.
    pub fn set_material_by_name(&mut self, tag: &str) -> Result<(), MeshError> {
        let material = tag.parse()?;
        self.set_material(material);
        Ok(())
    }

    /// Open a translation scope
    ///
    /// The returned guard dereferences to the builder. Dropping it (or calling
    /// [`TranslationScope::pop`]) resets the z offset to zero, even when the
    /// geometry emitted inside the scope failed part way.
    pub fn push_context(&mut self) -> TranslationScope<'_> {
        TranslationScope { builder: self }
    }

    /// Discard all accumulated state
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn push_face(&mut self, face: Face) {
        self.stream.push(FaceStreamEntry::Face(face));
        self.face_count += 1;
        self.primitive_faces += 1;
    }

    pub fn vertices(&self) -> &[Point3] {
        self.vertices.points()
    }

    pub fn normals(&self) -> &[Point3] {
        self.normals.points()
    }

    /// Material directives and faces in emission order
    pub fn stream(&self) -> &[FaceStreamEntry] {
        &self.stream
    }

    /// Faces in emission order, without material directives
    pub fn faces(&self) -> impl Iterator<Item = &Face> {
        self.stream.iter().filter_map(|entry| match entry {
            FaceStreamEntry::Face(face) => Some(face),
            FaceStreamEntry::Material(_) => None,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn normal_count(&self) -> usize {
        self.normals.len()
    }

    pub fn face_count(&self) -> usize {
        self.face_count
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn z_offset(&self) -> f32 {
        self.z_offset
    }

    /// Registry index of a position, if it was emitted
    pub fn vertex_index(&self, point: Point3) -> Option<u32> {
        self.vertices.get(point)
    }

    /// Registry index of a unit normal, if it was set
    pub fn normal_index(&self, normal: Point3) -> Option<u32> {
        self.normals.get(normal)
    }
}

/// Scoped z translation over a [`MeshBuilder`]
pub struct TranslationScope<'a> {
    builder: &'a mut MeshBuilder,
}

impl TranslationScope<'_> {
    /// Set the z offset applied to vertices until the scope is popped
    pub fn translate_z(&mut self, dz: f32) {
        self.builder.z_offset = dz;
    }

    /// Close the scope explicitly
    pub fn pop(self) {}
}

impl Deref for TranslationScope<'_> {
    type Target = MeshBuilder;

    fn deref(&self) -> &MeshBuilder {
        self.builder
    }
}

impl DerefMut for TranslationScope<'_> {
    fn deref_mut(&mut self) -> &mut MeshBuilder {
        self.builder
    }
}

impl Drop for TranslationScope<'_> {
    fn drop(&mut self) {
        self.builder.z_offset = 0.0;
    }
}
