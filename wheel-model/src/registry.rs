//! Deduplicated point storage
//!
//! Indices are handed out in first-seen order and never change. Nothing is
//! ever removed, so an index stays valid for the whole generation pass.

use hashbrown::HashMap;

use crate::point::{Point3, PointKey};

/// Ordered set of unique points keyed by exact coordinate identity
#[derive(Clone, Debug, Default)]
pub struct PointRegistry {
    points: Vec<Point3>,
    index: HashMap<PointKey, u32>,
}

impl PointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the index of `point`, registering it if unseen
    pub fn intern(&mut self, point: Point3) -> u32 {
        let next = self.points.len() as u32;
        let index = *self.index.entry(PointKey::of(point)).or_insert(next);
        if index == next {
            self.points.push(point);
        }
        index
    }

    /// Index of an already registered point
    pub fn get(&self, point: Point3) -> Option<u32> {
        self.index.get(&PointKey::of(point)).copied()
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_intern_is_idempotent() {
        let mut registry = PointRegistry::new();
        let p = Vec3::new(0.5, 0.0, 0.2);

        let first = registry.intern(p);
        let second = registry.intern(p);

        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_indices_follow_first_seen_order() {
        let mut registry = PointRegistry::new();
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 1.0, 0.0);
        let c = Vec3::new(0.0, 0.0, 1.0);

        assert_eq!(registry.intern(a), 0);
        assert_eq!(registry.intern(b), 1);
        assert_eq!(registry.intern(a), 0);
        assert_eq!(registry.intern(c), 2);
        assert_eq!(registry.points(), &[a, b, c]);
        assert_eq!(registry.get(b), Some(1));
        assert_eq!(registry.get(Vec3::ONE), None);
    }

    #[test]
    fn test_count_grows_once_per_distinct_value() {
        let mut registry = PointRegistry::new();
        for i in 0..10 {
            registry.intern(Vec3::new((i % 4) as f32, 0.0, 0.0));
        }
        assert_eq!(registry.len(), 4);
    }
}
