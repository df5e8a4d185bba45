//! Geometry primitives and closed-form measures.

pub mod bbox;
pub mod metrics;
pub mod tessellate;
pub mod vec3;

pub use bbox::Bbox;
pub use tessellate::TessellationMode;
pub use vec3::{AngleUnit, TexChannel, Vec3};
