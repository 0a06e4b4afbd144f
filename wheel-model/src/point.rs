//! Exact-identity point keys
//!
//! Registry lookups compare coordinates bit for bit. Ring seams and shared
//! edges between surfaces only merge because the generator reproduces the
//! very same `f32` values, so no tolerance is applied anywhere.

use glam::Vec3;

/// Three coordinates used both for positions and for unit normals
pub type Point3 = Vec3;

/// Hash key holding the raw bit pattern of a [`Point3`]
///
/// `0.0` and `-0.0` produce distinct keys, as do differently encoded NaNs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PointKey([u32; 3]);

impl PointKey {
    pub fn of(point: Point3) -> Self {
        Self(point.to_array().map(f32::to_bits))
    }
}

impl From<Point3> for PointKey {
    fn from(point: Point3) -> Self {
        Self::of(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_values_share_key() {
        let a = PointKey::of(Vec3::new(0.25, -0.5, 1.0));
        let b = PointKey::of(Vec3::new(0.25, -0.5, 1.0));
        assert_eq!(a, b);
    }

    #[test]
    fn test_signed_zero_is_distinct() {
        let pos = PointKey::of(Vec3::new(0.0, 0.0, 0.0));
        let neg = PointKey::of(Vec3::new(-0.0, 0.0, 0.0));
        assert_ne!(pos, neg);
    }

    #[test]
    fn test_nearby_values_are_distinct() {
        let a = PointKey::of(Vec3::new(0.1, 0.0, 0.0));
        let b = PointKey::of(Vec3::new(0.1 + f32::EPSILON, 0.0, 0.0));
        assert_ne!(a, b);
    }
}
