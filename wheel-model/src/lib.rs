//! Procedural truck wheel meshes
//!
//! The [`MeshBuilder`] emulates an immediate-mode "begin / normal / vertex /
//! end" call stream and converts it into a deduplicated, indexed triangle
//! mesh. [`WheelModel`] drives it to describe a tire and wheel, and the
//! [`scene`] module composes single and dual wheel assemblies.
//!
//! # Example
//! ```
//! use wheel_model::{generate, to_obj_string, Layout, MATERIAL_LIBRARY};
//!
//! let mesh = generate(Layout::Single)?;
//! let obj = to_obj_string(&mesh, MATERIAL_LIBRARY)?;
//! assert!(obj.contains("usemtl DarkGray"));
//! # Ok::<(), wheel_model::MeshError>(())
//! ```

pub mod builder;
pub mod error;
pub mod export;
pub mod geometry;
pub mod material;
pub mod point;
pub mod registry;
pub mod scene;

pub use builder::{Corner, Face, FaceStreamEntry, MeshBuilder, Topology, TranslationScope};
pub use error::MeshError;
pub use export::{MATERIAL_LIBRARY, to_obj_string, write_obj};
pub use geometry::{SEG_COUNT, UnitCircle, WheelDimensions, WheelModel};
pub use material::Material;
pub use point::{Point3, PointKey};
pub use registry::PointRegistry;
pub use scene::{Layout, compose, compose_dual, compose_single, generate};
