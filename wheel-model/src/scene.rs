//! Single and dual wheel assemblies
//!
//! The call order here is part of the output contract: registry indices are
//! assigned in first-seen order, so reordering surfaces changes the file.

use std::fmt;
use std::str::FromStr;

use tracing::info;

use crate::builder::{MeshBuilder, Topology};
use crate::error::MeshError;
use crate::geometry::WheelModel;
use crate::material::Material;

/// Wheel arrangement of one artifact
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layout {
    /// One wheel with its tire
    Single,
    /// Two tires sharing a hub, origin between them
    Dual,
}

impl Layout {
    pub const fn name(self) -> &'static str {
        match self {
            Layout::Single => "single",
            Layout::Dual => "dual",
        }
    }

    /// Conventional artifact name
    pub const fn default_file_name(self) -> &'static str {
        match self {
            Layout::Single => "wheel.obj",
            Layout::Dual => "dual-wheel.obj",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Layout::Single),
            "dual" => Ok(Layout::Dual),
            other => Err(format!("unknown layout '{other}' (expected single or dual)")),
        }
    }
}

/// Single wheel; the wheel is shifted so its rim meets the front tire edge
pub fn compose_single(model: &WheelModel, b: &mut MeshBuilder) -> Result<(), MeshError> {
    model.draw_tire(b)?;
    let mut scope = b.push_context();
    scope.translate_z(model.dimensions().tire_width);
    model.draw_wheel(&mut scope)?;
    scope.pop();
    Ok(())
}

/// Dual wheel with the axle origin centred in the separation gap
///
/// A join strip bridges the gap between the inner tire faces. The outer dual
/// gets wheel and tire; the inner dual is a tire only, since its wheel would
/// coincide with the outer dual's join face.
pub fn compose_dual(model: &WheelModel, b: &mut MeshBuilder) -> Result<(), MeshError> {
    let d = model.dimensions();
    let separation = d.dual_separation;

    b.set_material(Material::Hub);
    b.begin_primitive(Topology::QuadStrip)?;
    for (x, y) in model.circle().ring() {
        let r = d.tire_inner_radius;
        b.set_current_normal(x, y, 0.0)?;
        b.emit_vertex(r * x, r * y, separation)?;
        b.emit_vertex(r * x, r * y, -separation)?;
    }
    b.end_primitive()?;

    let mut outer = b.push_context();
    outer.translate_z(separation);
    model.draw_wheel(&mut outer)?;
    model.draw_tire(&mut outer)?;
    outer.pop();

    let mut inner = b.push_context();
    inner.translate_z(-separation - d.tire_width);
    model.draw_tire(&mut inner)?;
    inner.pop();
    Ok(())
}

/// Compose `layout` into `b`
pub fn compose(layout: Layout, model: &WheelModel, b: &mut MeshBuilder) -> Result<(), MeshError> {
    match layout {
        Layout::Single => compose_single(model, b),
        Layout::Dual => compose_dual(model, b),
    }
}

/// Run one full generation pass on a fresh builder
pub fn generate(layout: Layout) -> Result<MeshBuilder, MeshError> {
    let model = WheelModel::new();
    let mut builder = MeshBuilder::new();
    compose(layout, &model, &mut builder)?;
    info!(
        %layout,
        vertices = builder.vertex_count(),
        normals = builder.normal_count(),
        faces = builder.face_count(),
        "generated wheel mesh"
    );
    Ok(builder)
}
