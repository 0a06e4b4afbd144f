//! Errors raised while building a wheel mesh
//!
//! Every variant is fatal to the generation pass that raised it: the builder
//! makes no attempt to recover, and the caller must redo the pass from a
//! fresh [`MeshBuilder`](crate::MeshBuilder).

use crate::builder::Topology;

/// Failure of a mesh builder operation or of the exporter
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    /// `begin_primitive` called while another primitive is still open
    #[error("begin_primitive({requested:?}) called while {open:?} is still open")]
    PrimitiveAlreadyOpen { open: Topology, requested: Topology },

    /// Vertex emitted with no primitive topology to feed
    #[error("vertex emitted with unsupported topology state {0:?}")]
    UnsupportedTopology(Topology),

    /// Operation that requires an open primitive called outside one
    #[error("{0}() called with no open primitive")]
    NoOpenPrimitive(&'static str),

    /// Vertex emitted before any normal was set in the current pass
    #[error("vertex emitted before any normal was set")]
    MissingNormal,

    /// Normal with zero (or non-finite) length cannot be normalized
    #[error("normal ({0}, {1}, {2}) has no usable length")]
    ZeroLengthNormal(f32, f32, f32),

    /// Material tag outside the fixed palette
    #[error("unknown material: {0}")]
    UnknownMaterial(String),

    /// Underlying sink failed while exporting
    #[error("failed to write mesh: {0}")]
    Io(#[from] std::io::Error),
}
