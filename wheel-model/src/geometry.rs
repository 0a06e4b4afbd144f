//! Procedural tire and wheel surfaces
//!
//! Z is the axle. The tire occupies `0 <= z <= tire_width` with x and y
//! congruent to its rear face; the wheel is modelled relative to the plane
//! where the rim meets the inner tire edge. Every surface is a ring swept
//! around the axle using a precomputed unit circle, so shapes are exactly
//! axially symmetric and only need z translation to be placed.

use tracing::debug;

use crate::builder::{MeshBuilder, Topology};
use crate::error::MeshError;
use crate::material::Material;

/// Number of segments approximating a circle
pub const SEG_COUNT: usize = 24;

/// Unit circle sampled at `seg_count + 1` points
///
/// The last sample is a copy of the first, so a full sweep closes its ring
/// on bit-identical coordinates and the seam vertices deduplicate.
#[derive(Clone, Debug)]
pub struct UnitCircle {
    x: Vec<f32>,
    y: Vec<f32>,
}

impl UnitCircle {
    /// # Panics
    ///
    /// Panics if `seg_count` is zero.
    pub fn new(seg_count: usize) -> Self {
        assert!(seg_count > 0, "unit circle needs at least one segment");
        let mut x = Vec::with_capacity(seg_count + 1);
        let mut y = Vec::with_capacity(seg_count + 1);
        for i in 0..seg_count {
            let theta = 2.0 * std::f64::consts::PI * i as f64 / seg_count as f64;
            x.push(theta.cos() as f32);
            y.push(theta.sin() as f32);
        }
        x.push(x[0]);
        y.push(y[0]);
        Self { x, y }
    }

    pub fn seg_count(&self) -> usize {
        self.x.len() - 1
    }

    /// Sample `i` in `0..=seg_count`
    pub fn at(&self, i: usize) -> (f32, f32) {
        (self.x[i], self.y[i])
    }

    /// All samples from 0 through `seg_count` inclusive
    pub fn ring(&self) -> impl DoubleEndedIterator<Item = (f32, f32)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

/// Physical proportions of the wheel
///
/// Depth offsets are measured from the tire sidewall and give the heights of
/// the truncated cones forming rim, spokes and hub. The hub itself is a full
/// cone made to look rounded through its normals.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelDimensions {
    pub tire_width: f32,
    /// Gap between the two tires of a dual assembly, measured from z = 0
    pub dual_separation: f32,
    pub tire_radius: f32,
    pub tire_inner_radius: f32,
    pub rim_inner_radius: f32,
    /// Also the hub outer radius
    pub spoke_inner_radius: f32,
    /// Radial position of the bolt holes between spoke and rim, 0..1
    pub hole_location: f32,
    pub hole_radial_size: f32,
    /// Outward tilt of sidewall normals at the tire radius (inward at the inner)
    pub sidewall_bulge: f32,
    pub rim_bulge: f32,
    pub inner_rim_depth_offset: f32,
    pub inner_spoke_depth_offset: f32,
    pub hub_apex_depth_offset: f32,
    /// Bolt holes float this far in front of the spoke cone
    pub hole_visibility_offset: f32,
    pub hole_width_in_segs: usize,
    pub hole_spacing_in_segs: usize,
}

impl WheelDimensions {
    pub const STANDARD: WheelDimensions = WheelDimensions {
        tire_width: 0.2,
        dual_separation: 0.03,
        tire_radius: 0.5,
        tire_inner_radius: 0.3,
        rim_inner_radius: 0.25,
        spoke_inner_radius: 0.2,
        hole_location: 0.6,
        hole_radial_size: 0.02,
        sidewall_bulge: 0.4,
        rim_bulge: 0.4,
        inner_rim_depth_offset: -0.03,
        inner_spoke_depth_offset: 0.04,
        hub_apex_depth_offset: 0.08,
        hole_visibility_offset: 0.01,
        hole_width_in_segs: 3,
        hole_spacing_in_segs: 6,
    };

    pub fn hole_radius(&self) -> f32 {
        self.hole_location * self.rim_inner_radius
            + (1.0 - self.hole_location) * self.spoke_inner_radius
    }

    pub fn hole_inner_radius(&self) -> f32 {
        self.hole_radius() - 0.5 * self.hole_radial_size
    }

    pub fn hole_outer_radius(&self) -> f32 {
        self.hole_radius() + 0.5 * self.hole_radial_size
    }

    pub fn spoke_radial_width(&self) -> f32 {
        self.rim_inner_radius - self.spoke_inner_radius
    }

    /// Radial and axial components of the spoke/hub normal
    ///
    /// Taken from the right triangle spanned by the spoke's radial width and
    /// the inner spoke depth, normalized by its hypotenuse.
    pub fn hub_normal(&self) -> (f32, f32) {
        let depth = self.inner_spoke_depth_offset;
        let width = self.spoke_radial_width();
        let length = ((depth * depth + width * width) as f64).sqrt() as f32;
        (depth / length, width / length)
    }

    /// Axial rise of the spoke cone per unit of radius
    pub fn hub_slope(&self) -> f32 {
        (self.inner_spoke_depth_offset - self.inner_rim_depth_offset) / self.spoke_radial_width()
    }

    pub fn hole_inner_offset(&self) -> f32 {
        self.inner_rim_depth_offset
            + (self.rim_inner_radius - self.hole_inner_radius()) * self.hub_slope()
            + self.hole_visibility_offset
    }

    pub fn hole_outer_offset(&self) -> f32 {
        self.inner_rim_depth_offset
            + (self.rim_inner_radius - self.hole_outer_radius()) * self.hub_slope()
            + self.hole_visibility_offset
    }

    pub fn sidewall_bulge_complement(&self) -> f32 {
        bulge_complement(self.sidewall_bulge)
    }

    pub fn rim_bulge_complement(&self) -> f32 {
        bulge_complement(self.rim_bulge)
    }
}

impl Default for WheelDimensions {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Axial weight keeping `(bulge * radial, sqrt(1 - bulge^2))` unit length
fn bulge_complement(bulge: f32) -> f32 {
    (1.0 - (bulge * bulge) as f64).sqrt() as f32
}

/// Truck wheel generator
///
/// Holds only immutable lookup tables; every call emits into the builder it
/// is given.
#[derive(Clone, Debug)]
pub struct WheelModel {
    circle: UnitCircle,
    dims: WheelDimensions,
}

impl Default for WheelModel {
    fn default() -> Self {
        Self::new()
    }
}

impl WheelModel {
    pub fn new() -> Self {
        Self {
            circle: UnitCircle::new(SEG_COUNT),
            dims: WheelDimensions::STANDARD,
        }
    }

    pub fn circle(&self) -> &UnitCircle {
        &self.circle
    }

    pub fn dimensions(&self) -> &WheelDimensions {
        &self.dims
    }

    /// Tire only: tread, both sidewalls and the inner flange
    pub fn draw_tire(&self, b: &mut MeshBuilder) -> Result<(), MeshError> {
        let faces_before = b.face_count();
        b.set_material(Material::Tire);
        self.tread(b)?;
        self.front_sidewall(b)?;
        self.rear_sidewall(b)?;
        b.set_material(Material::Flange);
        self.flange(b)?;
        debug!(
            z_offset = b.z_offset(),
            faces = b.face_count() - faces_before,
            "tire emitted"
        );
        Ok(())
    }

    /// Wheel without tire: rim, rear closure, spokes, hub and bolt holes
    pub fn draw_wheel(&self, b: &mut MeshBuilder) -> Result<(), MeshError> {
        let faces_before = b.face_count();
        b.set_material(Material::Rim);
        self.rim(b)?;
        // the rear closure keeps the rim material
        self.rear_closure(b)?;
        b.set_material(Material::Hub);
        self.spokes(b)?;
        b.set_material(Material::Cap);
        self.hub_apex(b)?;
        b.set_material(Material::Hole);
        self.bolt_holes(b)?;
        debug!(
            z_offset = b.z_offset(),
            faces = b.face_count() - faces_before,
            "wheel emitted"
        );
        Ok(())
    }

    pub fn tread(&self, b: &mut MeshBuilder) -> Result<(), MeshError> {
        let d = &self.dims;
        let r = d.tire_radius;
        b.begin_primitive(Topology::QuadStrip)?;
        for (x, y) in self.circle.ring() {
            b.set_current_normal(x, y, 0.0)?;
            b.emit_vertex(r * x, r * y, d.tire_width)?;
            b.emit_vertex(r * x, r * y, 0.0)?;
        }
        b.end_primitive()
    }

    pub fn front_sidewall(&self, b: &mut MeshBuilder) -> Result<(), MeshError> {
        let d = &self.dims;
        let (bulge, axial) = (d.sidewall_bulge, d.sidewall_bulge_complement());
        b.begin_primitive(Topology::QuadStrip)?;
        for (x, y) in self.circle.ring() {
            b.set_current_normal(-bulge * x, -bulge * y, axial)?;
            b.emit_vertex(d.tire_inner_radius * x, d.tire_inner_radius * y, d.tire_width)?;
            b.set_current_normal(bulge * x, bulge * y, axial)?;
            b.emit_vertex(d.tire_radius * x, d.tire_radius * y, d.tire_width)?;
        }
        b.end_primitive()
    }

    pub fn rear_sidewall(&self, b: &mut MeshBuilder) -> Result<(), MeshError> {
        let d = &self.dims;
        let (bulge, axial) = (d.sidewall_bulge, d.sidewall_bulge_complement());
        b.begin_primitive(Topology::QuadStrip)?;
        for (x, y) in self.circle.ring() {
            b.set_current_normal(bulge * x, bulge * y, -axial)?;
            b.emit_vertex(d.tire_radius * x, d.tire_radius * y, 0.0)?;
            b.set_current_normal(-bulge * x, -bulge * y, -axial)?;
            b.emit_vertex(d.tire_inner_radius * x, d.tire_inner_radius * y, 0.0)?;
        }
        b.end_primitive()
    }

    pub fn flange(&self, b: &mut MeshBuilder) -> Result<(), MeshError> {
        let d = &self.dims;
        let r = d.tire_inner_radius;
        b.begin_primitive(Topology::QuadStrip)?;
        for (x, y) in self.circle.ring() {
            b.set_current_normal(-x, -y, 0.0)?;
            b.emit_vertex(r * x, r * y, 0.0)?;
            b.emit_vertex(r * x, r * y, d.tire_width)?;
        }
        b.end_primitive()
    }

    pub fn rim(&self, b: &mut MeshBuilder) -> Result<(), MeshError> {
        let d = &self.dims;
        let (bulge, axial) = (d.rim_bulge, d.rim_bulge_complement());
        b.begin_primitive(Topology::QuadStrip)?;
        for (x, y) in self.circle.ring() {
            b.set_current_normal(-bulge * x, -bulge * y, axial)?;
            b.emit_vertex(
                d.rim_inner_radius * x,
                d.rim_inner_radius * y,
                d.inner_rim_depth_offset,
            )?;
            b.set_current_normal(bulge * x, bulge * y, axial)?;
            b.emit_vertex(d.tire_inner_radius * x, d.tire_inner_radius * y, 0.0)?;
        }
        b.end_primitive()
    }

    /// Flat fan capping the bore behind the spokes, swept clockwise
    pub fn rear_closure(&self, b: &mut MeshBuilder) -> Result<(), MeshError> {
        let d = &self.dims;
        let depth = d.inner_rim_depth_offset - d.hole_visibility_offset;
        let r = d.tire_inner_radius;
        b.begin_primitive(Topology::TriangleFan)?;
        b.set_current_normal(0.0, 0.0, -1.0)?;
        b.emit_vertex(0.0, 0.0, depth)?;
        for (x, y) in self.circle.ring().rev() {
            b.emit_vertex(r * x, r * y, depth)?;
        }
        b.end_primitive()
    }

    /// Truncated cone from the hub out to the rim
    pub fn spokes(&self, b: &mut MeshBuilder) -> Result<(), MeshError> {
        let d = &self.dims;
        let (radial, axial) = d.hub_normal();
        b.begin_primitive(Topology::QuadStrip)?;
        for (x, y) in self.circle.ring() {
            b.set_current_normal(radial * x, radial * y, axial)?;
            b.emit_vertex(
                d.spoke_inner_radius * x,
                d.spoke_inner_radius * y,
                d.inner_spoke_depth_offset,
            )?;
            b.emit_vertex(
                d.rim_inner_radius * x,
                d.rim_inner_radius * y,
                d.inner_rim_depth_offset,
            )?;
        }
        b.end_primitive()
    }

    /// Cone to a single apex; the axial apex normal rounds it when shaded
    pub fn hub_apex(&self, b: &mut MeshBuilder) -> Result<(), MeshError> {
        let d = &self.dims;
        let (radial, axial) = d.hub_normal();
        b.begin_primitive(Topology::TriangleFan)?;
        b.set_current_normal(0.0, 0.0, 1.0)?;
        b.emit_vertex(0.0, 0.0, d.hub_apex_depth_offset)?;
        for (x, y) in self.circle.ring() {
            b.set_current_normal(radial * x, radial * y, axial)?;
            b.emit_vertex(
                d.spoke_inner_radius * x,
                d.spoke_inner_radius * y,
                d.inner_spoke_depth_offset,
            )?;
        }
        b.end_primitive()
    }

    /// Dark strips floating in front of the spokes, standing in for holes
    pub fn bolt_holes(&self, b: &mut MeshBuilder) -> Result<(), MeshError> {
        let d = &self.dims;
        let seg_count = self.circle.seg_count();
        let (inner_r, outer_r) = (d.hole_inner_radius(), d.hole_outer_radius());
        let (inner_z, outer_z) = (d.hole_inner_offset(), d.hole_outer_offset());
        for start in hole_starts(seg_count, d.hole_spacing_in_segs) {
            b.begin_primitive(Topology::QuadStrip)?;
            b.set_current_normal(0.0, 0.0, -1.0)?;
            for j in 0..=d.hole_width_in_segs {
                let (x, y) = self.circle.at((start + j) % seg_count);
                b.emit_vertex(inner_r * x, inner_r * y, inner_z)?;
                b.emit_vertex(outer_r * x, outer_r * y, outer_z)?;
            }
            b.end_primitive()?;
        }
        Ok(())
    }
}

/// First segment of each bolt hole
fn hole_starts(seg_count: usize, spacing: usize) -> impl Iterator<Item = usize> {
    (0..seg_count).step_by(spacing.max(1))
}
