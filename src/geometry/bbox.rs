//! Axis-aligned bounding box.

use crate::geometry::vec3::Vec3;

/// Axis-aligned box; an empty box has `min > max` on every axis.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bbox {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Bbox {
    fn default() -> Self {
        Self {
            min: Vec3::splat(f64::INFINITY),
            max: Vec3::splat(f64::NEG_INFINITY),
        }
    }
}

impl Bbox {
    pub fn from_points<'a, I: IntoIterator<Item = &'a Vec3>>(points: I) -> Self {
        let mut bb = Self::default();
        for p in points {
            bb.push(*p);
        }
        bb
    }

    /// Grows the box to contain `p`.
    #[inline]
    pub fn push(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Centre of the box (origin for an empty box).
    pub fn center(&self) -> Vec3 {
        if self.is_empty() {
            return Vec3::ZERO;
        }
        (self.min + self.max) * 0.5
    }

    /// Length of the diagonal (zero for an empty box).
    pub fn diag(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.min.distance(self.max)
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    pub fn union(&self, other: &Bbox) -> Bbox {
        Bbox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_and_measures() {
        let pts = [Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 2.0, 2.0)];
        let bb = Bbox::from_points(&pts);
        assert_eq!(bb.center(), Vec3::new(0.5, 1.0, 1.0));
        assert!((bb.diag() - 3.0).abs() < 1e-12);
        assert!(bb.contains(Vec3::new(0.5, 0.5, 0.5)));
        assert!(!bb.contains(Vec3::new(-0.1, 0.5, 0.5)));
    }

    #[test]
    fn empty_box() {
        let bb = Bbox::default();
        assert!(bb.is_empty());
        assert_eq!(bb.diag(), 0.0);
        assert_eq!(bb.center(), Vec3::ZERO);
    }
}
