//! Thin wrapper around `glam::DVec3` shared by every mesh module.
//!
//! Positions, normals and texture coordinates are all `Vec3`. The helpers
//! below cover the few operations the topology code needs beyond glam's own
//! API.

pub use glam::DVec3 as Vec3;

/// Unit used by angle-returning queries.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum AngleUnit {
    #[default]
    Rad,
    Deg,
}

impl AngleUnit {
    /// Converts a value in radians to this unit.
    #[inline]
    pub fn from_rad(self, rad: f64) -> f64 {
        match self {
            AngleUnit::Rad => rad,
            AngleUnit::Deg => rad.to_degrees(),
        }
    }
}

/// Scalar channel of a texture coordinate.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum TexChannel {
    #[default]
    U,
    V,
    W,
}

impl TexChannel {
    #[inline]
    pub fn of(self, uvw: Vec3) -> f64 {
        match self {
            TexChannel::U => uvw.x,
            TexChannel::V => uvw.y,
            TexChannel::W => uvw.z,
        }
    }
}

/// Unsigned angle between `a` and `b` in radians, in `[0, π]`.
///
/// Uses `atan2(|a×b|, a·b)`, which stays accurate for nearly parallel
/// vectors. Returns `0.0` when either vector is zero.
#[inline]
pub fn angle_between(a: Vec3, b: Vec3) -> f64 {
    if a == Vec3::ZERO || b == Vec3::ZERO {
        return 0.0;
    }
    a.cross(b).length().atan2(a.dot(b))
}

/// Normalises `v`, or returns the zero vector when `v` has (near) zero length.
#[inline]
pub fn normalize_or_zero(v: Vec3) -> Vec3 {
    v.try_normalize().unwrap_or(Vec3::ZERO)
}
