//! wheel-export library
//!
//! Generates truck wheel meshes from a manifest and provides the OBJ reader
//! and mesh flattening used to check and post-process them.

pub mod flatten;
pub mod manifest;
pub mod obj;

/// Extension of generated mesh files
pub const OBJ_EXT: &str = "obj";

/// Manifest read by `build` when no path is given
pub const DEFAULT_MANIFEST: &str = "wheels.toml";

pub use flatten::{FlatMesh, FlattenError, convert_obj_to_json, flatten};
pub use manifest::{BuiltMesh, Manifest, build_all, load_manifest, load_or_default};
pub use obj::{ObjMesh, load_obj, parse_obj};
