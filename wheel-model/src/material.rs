//! Material palette
//!
//! Surfaces are tagged with one of six materials. Several tags share a
//! palette entry in the companion material library (hub and flange are both
//! `Orange`), so the tag is what the generator reasons about while the
//! palette name is what ends up in the mesh file.

use std::fmt;
use std::str::FromStr;

use crate::error::MeshError;

/// Material tag attached to a run of faces
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Material {
    Tire,
    Rim,
    Hub,
    Cap,
    Flange,
    Hole,
}

impl Material {
    /// All tags, in declaration order
    pub const ALL: [Material; 6] = [
        Material::Tire,
        Material::Rim,
        Material::Hub,
        Material::Cap,
        Material::Flange,
        Material::Hole,
    ];

    /// Entry name in the companion material library
    pub const fn palette_name(self) -> &'static str {
        match self {
            Material::Cap => "PaintedSteel",
            Material::Flange | Material::Hub => "Orange",
            Material::Hole => "Black",
            Material::Rim => "Aluminum",
            Material::Tire => "DarkGray",
        }
    }

    /// Lowercase tag name, as accepted by [`Material::from_str`]
    pub const fn tag(self) -> &'static str {
        match self {
            Material::Tire => "tire",
            Material::Rim => "rim",
            Material::Hub => "hub",
            Material::Cap => "cap",
            Material::Flange => "flange",
            Material::Hole => "hole",
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.palette_name())
    }
}

impl FromStr for Material {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Material::ALL
            .into_iter()
            .find(|m| m.tag().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| MeshError::UnknownMaterial(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_names() {
        assert_eq!(Material::Cap.palette_name(), "PaintedSteel");
        assert_eq!(Material::Flange.palette_name(), "Orange");
        assert_eq!(Material::Hub.palette_name(), "Orange");
        assert_eq!(Material::Hole.palette_name(), "Black");
        assert_eq!(Material::Rim.palette_name(), "Aluminum");
        assert_eq!(Material::Tire.palette_name(), "DarkGray");
    }

    #[test]
    fn test_parse_tags() {
        for material in Material::ALL {
            assert_eq!(material.tag().parse::<Material>().unwrap(), material);
        }
        assert_eq!("Rim".parse::<Material>().unwrap(), Material::Rim);
    }

    #[test]
    fn test_parse_unknown_tag() {
        let err = "chrome".parse::<Material>().unwrap_err();
        assert!(matches!(err, MeshError::UnknownMaterial(ref name) if name == "chrome"));
    }
}
